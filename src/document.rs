//! Declaration document
//!
//! The serde shape of a schema document: metadata strings plus one name-keyed
//! declaration map per category. Type references are parsed while
//! deserializing, so a document with a malformed reference never reaches the
//! registry.
//!
//! ## Example (JSON):
//! ```json
//! {
//!   "title": "Blog",
//!   "version": "1.0.0",
//!   "composite types": {
//!     "Profile": { "description": "Public profile", "meta": {
//!       "name": { "type": "Text", "description": "Display name" }
//!     } }
//!   },
//!   "entity types": {
//!     "User": { "relations": {
//!       "posts": { "type": "Authored", "direction": "outbound", "related type": "Post" }
//!     } },
//!     "Post": {}
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SchemaError};
use crate::naming::TypeReference;
use crate::types::RelationDirection;

/// A complete schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "scalar types")]
    pub scalar_types: BTreeMap<String, ScalarDecl>,

    #[serde(default, rename = "enumeration types")]
    pub enumeration_types: BTreeMap<String, EnumerationDecl>,

    #[serde(default, rename = "composite types")]
    pub composite_types: BTreeMap<String, CompositeDecl>,

    #[serde(default, rename = "entity types")]
    pub entity_types: BTreeMap<String, EntityDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalarDecl {
    #[serde(default, alias = "descr")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumerationDecl {
    #[serde(default, alias = "descr")]
    pub description: String,
    /// Member name -> associated value
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// A field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    #[serde(rename = "type")]
    pub type_ref: TypeReference,
    #[serde(default, alias = "descr")]
    pub description: String,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeDecl {
    #[serde(default, alias = "descr")]
    pub description: String,
    #[serde(default, rename = "meta", alias = "fields")]
    pub fields: BTreeMap<String, FieldDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDecl {
    #[serde(default, alias = "descr")]
    pub description: String,
    #[serde(default, rename = "meta", alias = "fields")]
    pub fields: BTreeMap<String, FieldDecl>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationDecl>,
}

/// A relation declared on its owning entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDecl {
    #[serde(default, alias = "descr")]
    pub description: String,
    #[serde(default, rename = "meta", alias = "fields")]
    pub fields: BTreeMap<String, FieldDecl>,
    /// Relation label
    #[serde(rename = "type")]
    pub label: String,
    pub direction: RelationDirection,
    #[serde(rename = "related type", deserialize_with = "related_type_name")]
    pub related_type: String,
}

fn related_type_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    TypeReference::parse_plain(&raw)
        .map(|r| r.name)
        .map_err(serde::de::Error::custom)
}

impl FieldDecl {
    pub fn new(type_ref: TypeReference) -> Self {
        Self {
            type_ref,
            description: String::new(),
            nullable: false,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl CompositeDecl {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldDecl) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

impl EntityDecl {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldDecl) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn relation(mut self, name: impl Into<String>, relation: RelationDecl) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }
}

impl RelationDecl {
    pub fn new(
        label: impl Into<String>,
        direction: RelationDirection,
        related_type: impl Into<String>,
    ) -> Self {
        Self {
            description: String::new(),
            fields: BTreeMap::new(),
            label: label.into(),
            direction,
            related_type: related_type.into(),
        }
    }

    /// `owner -> related`
    pub fn outbound(label: impl Into<String>, related_type: impl Into<String>) -> Self {
        Self::new(label, RelationDirection::Outbound, related_type)
    }

    /// `related -> owner`
    pub fn inbound(label: impl Into<String>, related_type: impl Into<String>) -> Self {
        Self::new(label, RelationDirection::Inbound, related_type)
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldDecl) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

impl Document {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a document, choosing the format by file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match format {
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            "toml" => Self::from_toml_str(&fs::read_to_string(path)?),
            _ => Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Total number of declarations across all categories (relations included)
    pub fn total_declarations(&self) -> usize {
        self.scalar_types.len()
            + self.enumeration_types.len()
            + self.composite_types.len()
            + self.entity_types.len()
            + self
                .entity_types
                .values()
                .map(|e| e.relations.len())
                .sum::<usize>()
    }
}
