//! genannot-sources: External annotation sources and the orchestrator.
//!
//! - Variant family: MyVariant, Ensembl VEP, ClinVar (E-utilities)
//! - Position family: UCSC conservation tracks
//! - Registry of both families, built once from configuration
//! - Fan-out of one key (or a batch of keys) to every adapter, plus scoring

pub mod sources;
pub mod registry;
pub mod pipeline;

pub use pipeline::{GenomicAnnotator, VariantReport};
pub use registry::AnnotatorRegistry;
pub use sources::{PositionAnnotator, VariantAnnotator};
