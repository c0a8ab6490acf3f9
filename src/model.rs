//! Model construction
//!
//! Feeds a [`Document`] through the registry one category at a time and
//! returns the committed model together with every diagnostic produced.

use semver::Version;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::diagnostics::ModelErrors;
use crate::document::Document;
use crate::registry::{PredefinedScalars, TypeRegistry};
use crate::types::{AbstractType, TypeCategory};

/// Tunables for diagnostics produced while building a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInitOptions {
    /// Attach "did you mean" hints to undefined type diagnostics
    pub suggest_names: bool,
    pub max_suggestions: usize,
}

impl Default for ModelInitOptions {
    fn default() -> Self {
        Self {
            suggest_names: true,
            max_suggestions: 3,
        }
    }
}

/// Descriptive document header, carried through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

impl DocumentMetadata {
    fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            author: doc.author.clone(),
            version: doc.version.clone(),
            description: doc.description.clone(),
        }
    }

    /// The version as a semantic version, when it is one
    pub fn semver(&self) -> Option<Version> {
        Version::parse(&self.version).ok()
    }
}

/// A document's metadata plus its type registry
#[derive(Debug, Clone)]
pub struct Model {
    pub metadata: DocumentMetadata,
    pub registry: TypeRegistry,
}

/// Build a model with default options
pub fn build_model(doc: &Document, predefined: &PredefinedScalars) -> (Model, ModelErrors) {
    build_model_with(doc, predefined, &ModelInitOptions::default())
}

/// Build a model, returning it with every diagnostic collected along the way.
///
/// Each category batch is committed or rejected on its own, so a model
/// returned alongside diagnostics holds only the batches that passed.
pub fn build_model_with(
    doc: &Document,
    predefined: &PredefinedScalars,
    options: &ModelInitOptions,
) -> (Model, ModelErrors) {
    let metadata = DocumentMetadata::from_document(doc);
    if !metadata.version.is_empty() && metadata.semver().is_none() {
        warn!(version = %metadata.version, "document version is not a semantic version");
    }

    let mut registry = TypeRegistry::with_options(predefined, options.clone());
    let mut errors = ModelErrors::new();

    debug!(count = doc.scalar_types.len(), "registering scalar types");
    for (name, decl) in &doc.scalar_types {
        errors.merge(registry.register_scalar_type(name, &decl.description));
    }

    debug!(count = doc.enumeration_types.len(), "registering enumeration types");
    for (name, decl) in &doc.enumeration_types {
        errors.merge(registry.register_enumeration_type(name, &decl.description, &decl.values));
    }

    debug!(count = doc.composite_types.len(), "registering composite types");
    errors.merge(registry.register_composite_types(&doc.composite_types));

    debug!(count = doc.entity_types.len(), "registering entity types");
    errors.merge(registry.register_entity_types(&doc.entity_types));

    if errors.has_errors() {
        info!(
            title = %metadata.title,
            errors = errors.len(),
            "model built with {} error(s)",
            errors.len()
        );
    } else {
        info!(
            title = %metadata.title,
            types = registry.total_types(),
            "model built"
        );
    }

    (Model { metadata, registry }, errors)
}

impl Model {
    /// Build a model, refusing to return one that has diagnostics
    pub fn build(doc: &Document, predefined: &PredefinedScalars) -> Result<Self, ModelErrors> {
        Self::build_with(doc, predefined, &ModelInitOptions::default())
    }

    pub fn build_with(
        doc: &Document,
        predefined: &PredefinedScalars,
        options: &ModelInitOptions,
    ) -> Result<Self, ModelErrors> {
        let (model, errors) = build_model_with(doc, predefined, options);
        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(model)
        }
    }

    pub fn summary(&self) -> ModelSummary {
        let names = |category| -> Vec<String> {
            self.registry
                .types(category)
                .map(|ty: &AbstractType| ty.name().to_string())
                .collect()
        };

        ModelSummary {
            metadata: self.metadata.clone(),
            total_types: self.registry.total_types(),
            scalar_types: names(TypeCategory::Scalar),
            enumeration_types: names(TypeCategory::Enumeration),
            composite_types: names(TypeCategory::Composite),
            entity_types: names(TypeCategory::Entity),
            relations: names(TypeCategory::Relation),
        }
    }
}

/// Counts and names per category, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub metadata: DocumentMetadata,
    pub total_types: usize,
    pub scalar_types: Vec<String>,
    pub enumeration_types: Vec<String>,
    pub composite_types: Vec<String>,
    pub entity_types: Vec<String>,
    pub relations: Vec<String>,
}

impl ModelSummary {
    pub fn count(&self, category: TypeCategory) -> usize {
        match category {
            TypeCategory::Scalar => self.scalar_types.len(),
            TypeCategory::Enumeration => self.enumeration_types.len(),
            TypeCategory::Composite => self.composite_types.len(),
            TypeCategory::Entity => self.entity_types.len(),
            TypeCategory::Relation => self.relations.len(),
        }
    }
}
