//! Adapter registry.
//!
//! Maps registry names to adapter trait objects, split by key type.
//! Built once at startup with `AnnotatorRegistry::from_config`, read-only after.

use std::collections::BTreeMap;
use std::sync::Arc;

use genannot_common::{AnnotatorConfig, HttpTransport};
use tracing::{info, warn};

use crate::sources::{
    ClinVarClient, ConservationClient, EnsemblVepClient, MyVariantClient, PositionAnnotator,
    VariantAnnotator,
};

#[derive(Clone, Default)]
pub struct AnnotatorRegistry {
    variant: BTreeMap<String, Arc<dyn VariantAnnotator>>,
    position: BTreeMap<String, Arc<dyn PositionAnnotator>>,
}

impl AnnotatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard adapter set. Every adapter gets its own pacing clock;
    /// the transport (and its connection pool) is shared.
    pub fn from_config(config: &AnnotatorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let http = &config.http;
        let sources = &config.sources;

        let mut registry = Self::new()
            .with_variant("myvariant", MyVariantClient::new(transport.clone(), http, sources))
            .with_variant("ensembl_vep", EnsemblVepClient::new(transport.clone(), http, sources))
            .with_variant("clinvar", ClinVarClient::new(transport.clone(), http, sources));

        for t in &sources.conservation_tracks {
            registry = registry.with_position(
                t.name.clone(),
                ConservationClient::new(transport.clone(), http, sources, t.track.clone()),
            );
        }

        info!(
            variant = registry.variant.len(),
            position = registry.position.len(),
            "Annotator registry ready"
        );
        registry
    }

    /// Register an identifier-keyed adapter under `name`.
    pub fn with_variant<A: VariantAnnotator + 'static>(mut self, name: impl Into<String>, adapter: A) -> Self {
        let name = name.into();
        if self.variant.insert(name.clone(), Arc::new(adapter)).is_some() {
            warn!(adapter = %name, "Replacing variant adapter");
        }
        self
    }

    /// Register a coordinate-keyed adapter under `name`.
    pub fn with_position<A: PositionAnnotator + 'static>(mut self, name: impl Into<String>, adapter: A) -> Self {
        let name = name.into();
        if self.position.insert(name.clone(), Arc::new(adapter)).is_some() {
            warn!(adapter = %name, "Replacing position adapter");
        }
        self
    }

    pub fn variant_adapters(&self) -> impl Iterator<Item = (&str, &Arc<dyn VariantAnnotator>)> {
        self.variant.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn position_adapters(&self) -> impl Iterator<Item = (&str, &Arc<dyn PositionAnnotator>)> {
        self.position.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.variant.keys().map(String::as_str).collect()
    }

    pub fn position_names(&self) -> Vec<&str> {
        self.position.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.variant.len() + self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variant.is_empty() && self.position.is_empty()
    }
}
