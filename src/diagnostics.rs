//! Diagnostics
//!
//! Collects declaration defects found while validating a batch. Validation
//! never stops at the first defect: every sibling declaration is checked and
//! the batch is committed only if nothing was collected.

use serde::Serialize;
use std::fmt;

use crate::types::TypeCategory;

// =============================================================================
// Error Kinds
// =============================================================================

/// Kind of declaration defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A declared type name or relation label violates the declaration grammar
    IllegalTypeName,
    /// A referenced type is declared nowhere
    UndefinedType,
    /// A name is already taken in the global type namespace
    TypeNameCollision,
    /// An entity or relation type is used as a field type
    EntityNesting,
    /// A relation endpoint is not an entity type
    InappropriateType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IllegalTypeName => "E001",
            Self::UndefinedType => "E002",
            Self::TypeNameCollision => "E003",
            Self::EntityNesting => "E004",
            Self::InappropriateType => "E005",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::IllegalTypeName => "IllegalTypeName",
            Self::UndefinedType => "UndefinedType",
            Self::TypeNameCollision => "TypeNameCollision",
            Self::EntityNesting => "EntityNesting",
            Self::InappropriateType => "InappropriateType",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Model Error
// =============================================================================

/// A single declaration defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelErr {
    pub code: ErrorKind,
    pub message: String,
    pub location: String,
    /// Additional hints (e.g. similarly named types)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl ModelErr {
    pub fn new(code: ErrorKind, message: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: location.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }
}

impl fmt::Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} in {}",
            self.code.as_str(),
            self.code,
            self.message,
            self.location
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

impl std::error::Error for ModelErr {}

// =============================================================================
// Collection
// =============================================================================

/// Where a colliding name is already declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSource {
    Predefined,
    Declared(TypeCategory),
}

impl fmt::Display for CollisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predefined => f.write_str("predefined scalar"),
            Self::Declared(category) => f.write_str(category.as_str()),
        }
    }
}

/// Append-only list of declaration defects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelErrors {
    items: Vec<ModelErr>,
}

impl ModelErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ModelErr) {
        self.items.push(err);
    }

    /// A declared name violates the declaration grammar
    pub fn illegal_type_name(&mut self, type_name: &str, location: impl Into<String>) {
        self.push(ModelErr::new(
            ErrorKind::IllegalTypeName,
            format!("illegal type name: '{}'", type_name),
            location,
        ));
    }

    /// A declared name is already taken
    pub fn type_name_collision(
        &mut self,
        type_name: &str,
        source: CollisionSource,
        location: impl Into<String>,
    ) {
        self.push(ModelErr::new(
            ErrorKind::TypeNameCollision,
            format!("redeclaration of {} type '{}'", source, type_name),
            location,
        ));
    }

    /// A referenced type is declared nowhere
    pub fn undefined_type(
        &mut self,
        type_name: &str,
        location: impl Into<String>,
        suggestions: &[String],
    ) {
        let mut err = ModelErr::new(
            ErrorKind::UndefinedType,
            format!("undefined type '{}'", type_name),
            location,
        );
        for suggestion in suggestions {
            err = err.with_context(format!("did you mean '{}'?", suggestion));
        }
        self.push(err);
    }

    /// An entity type is used as the type of a field
    pub fn entity_nesting(&mut self, entity_name: &str, owner_name: &str, field_name: &str) {
        self.push(ModelErr::new(
            ErrorKind::EntityNesting,
            format!(
                "illegal nesting of entity types ('{}' in '{}')",
                entity_name, owner_name
            ),
            field_location(field_name, owner_name),
        ));
    }

    /// A relation type is used as the type of a field
    pub fn relation_as_field(&mut self, relation_name: &str, owner_name: &str, field_name: &str) {
        self.push(ModelErr::new(
            ErrorKind::EntityNesting,
            format!(
                "illegal use of relation type '{}' for field definition",
                relation_name
            ),
            field_location(field_name, owner_name),
        ));
    }

    /// A relation endpoint resolved to something other than an entity
    pub fn inappropriate_type(
        &mut self,
        type_name: &str,
        category: TypeCategory,
        location: impl Into<String>,
    ) {
        self.push(ModelErr::new(
            ErrorKind::InappropriateType,
            format!(
                "inappropriate type '{}' ({}), expected an entity type",
                type_name, category
            ),
            location,
        ));
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelErr> {
        self.items.iter()
    }

    pub fn all(&self) -> &[ModelErr] {
        &self.items
    }

    /// Number of collected defects of the given kind
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.items.iter().filter(|e| e.code == kind).count()
    }

    pub fn merge(&mut self, other: ModelErrors) {
        self.items.extend(other.items);
    }

    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if self.has_errors() {
            output.push_str(&format!("\n{} error(s)\n", self.len()));
        }

        output
    }
}

/// Location of a field inside its owning type
pub(crate) fn field_location(field_name: &str, owner_name: &str) -> String {
    format!("field '{}' of type '{}'", field_name, owner_name)
}

impl fmt::Display for ModelErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl std::error::Error for ModelErrors {}

impl IntoIterator for ModelErrors {
    type Item = ModelErr;
    type IntoIter = std::vec::IntoIter<ModelErr>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModelErrors {
    type Item = &'a ModelErr;
    type IntoIter = std::slice::Iter<'a, ModelErr>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
