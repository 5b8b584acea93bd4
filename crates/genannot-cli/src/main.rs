//! genannot: annotate genomic variants against public databases and score them.
//! Entry point for the command-line binary.

mod config;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use genannot_common::GenomicPosition;
use genannot_sources::GenomicAnnotator;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "genannot", version, about = "Multi-source genomic variant annotation and scoring")]
struct Cli {
    /// Config file (TOML or YAML). Defaults to ./genannot.toml when present.
    #[arg(long, global = true, env = config::CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Annotate and score one variant (rsID or HGVS-like id)
    Variant {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Conservation scores at a position: CHROM:POS or CHROM:POS:REF>ALT
    Position {
        position: GenomicPosition,
        #[arg(long)]
        json: bool,
    },
    /// Annotate and score several variants
    Batch {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genannot=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("genannot {}", env!("CARGO_PKG_VERSION"));

    let config = config::load(cli.config)?;
    let annotator = GenomicAnnotator::from_config(&config).context("building annotator")?;

    match cli.command {
        Command::Variant { id, json } => {
            let results = annotator.annotate_variant(&id).await;
            let score = annotator.score_variant(&results);
            if json {
                let out = json!({
                    "variant_id": id,
                    "results": results,
                    "score": score,
                    "tier": score.tier(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("=== ANNOTATION RESULTS FOR: {id} ===");
                print!("{}", render::annotation_set(&results));
                print!("{}", render::score(&score));
            }
        }
        Command::Position { position, json } => {
            let results = annotator.annotate_position(&position).await;
            if json {
                let out = json!({ "position": position.to_hgvs(), "results": results });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("=== POSITION ANNOTATION: {} ===", position.to_hgvs());
                print!("{}", render::annotation_set(&results));
            }
        }
        Command::Batch { ids, json } => {
            let reports = annotator.annotate_variants_batch(&ids).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", render::report_line(report));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_position_argument() {
        let cli = Cli::try_parse_from(["genannot", "position", "chr1:12345:A>G", "--json"]).unwrap();
        match cli.command {
            Command::Position { position, json } => {
                assert_eq!(position.chromosome, "chr1");
                assert_eq!(position.position, 12345);
                assert_eq!(position.alternate.as_deref(), Some("G"));
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_position_rejected() {
        assert!(Cli::try_parse_from(["genannot", "position", "chr1:0"]).is_err());
        assert!(Cli::try_parse_from(["genannot", "position", "nonsense"]).is_err());
    }

    #[test]
    fn test_batch_needs_ids_and_takes_global_config() {
        assert!(Cli::try_parse_from(["genannot", "batch"]).is_err());
        let cli = Cli::try_parse_from(["genannot", "batch", "rs1", "rs2", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Command::Batch { ids, json } => {
                assert_eq!(ids, vec!["rs1", "rs2"]);
                assert!(!json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
