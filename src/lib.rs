//! Schemabook
//!
//! Type registry and semantic validator for schema documents. A document
//! declares scalar, enumeration, composite and entity types; entities declare
//! relations to each other. Building a model checks every declaration against
//! the naming grammar and the shared namespace, resolves every field and
//! relation endpoint, and reports all defects of a run at once.
//!
//! ## Features
//!
//! - **Atomic batches**: each registration call commits all of its types or none
//! - **Forward references**: types of one batch may reference each other
//! - **Canonical relations**: a relation has one identity no matter which end declares it
//! - **Complete diagnostics**: every defect is reported with a code, message and location
//!
//! ## Architecture
//!
//! ```text
//! Document ──► build_model ──► TypeRegistry
//!                  │              ├── scalars / enumerations
//!                  │              ├── composites ◄── resolve (fields)
//!                  │              └── entities   ◄── relation (endpoints)
//!                  └──────────► ModelErrors
//! ```

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod model;
pub mod naming;
pub mod registry;
pub mod relation;
pub mod types;

mod resolve;

pub use config::SchemabookConfig;
pub use diagnostics::{ErrorKind, ModelErr, ModelErrors};
pub use document::Document;
pub use error::{Result, SchemaError};
pub use model::{build_model, build_model_with, Model, ModelInitOptions, ModelSummary};
pub use naming::TypeReference;
pub use registry::{PredefinedScalars, TypeRegistry};
pub use types::{AbstractType, RelationDirection, TypeCategory, TypeId};
