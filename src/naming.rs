//! Naming grammar and type reference parsing
//!
//! Two grammars are in play:
//! - the *declaration* grammar, applied to every newly declared type name and
//!   relation label: `^[A-Z][a-zA-Z]+$`
//! - the *reference* grammar, applied to type names used by fields and
//!   relation endpoints: a bare token `^[A-Z][a-zA-Z_]*$` or `List<Token>`
//!
//! Both are compiled once on first use and never change afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

static DECLARATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z]+$").expect("declaration grammar compiles"));

static PLAIN_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z_]*$").expect("reference grammar compiles"));

static LIST_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^List\s*<\s*([A-Z][a-zA-Z_]*)\s*>$").expect("list reference grammar compiles")
});

/// Whether `name` may be used to declare a new type or relation label
pub fn is_legal_type_name(name: &str) -> bool {
    DECLARATION_NAME.is_match(name)
}

/// Whether `name` is a legal bare (non-list) type reference
pub fn is_legal_reference_name(name: &str) -> bool {
    PLAIN_REFERENCE.is_match(name)
}

/// A reference to a named type, optionally wrapped in `List<..>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeReference {
    pub name: String,
    pub is_list: bool,
}

impl TypeReference {
    /// Plain reference to `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_list: false,
        }
    }

    /// `List<name>`
    pub fn list_of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_list: true,
        }
    }

    /// Parse a bare token only, rejecting the list wrapper
    pub fn parse_plain(s: &str) -> Result<Self, SchemaError> {
        if PLAIN_REFERENCE.is_match(s) {
            Ok(Self::named(s))
        } else {
            Err(SchemaError::InvalidTypeReference(s.to_string()))
        }
    }
}

impl FromStr for TypeReference {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(caps) = LIST_REFERENCE.captures(s) {
            return Ok(Self::list_of(&caps[1]));
        }
        Self::parse_plain(s)
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list {
            write!(f, "List<{}>", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl TryFrom<String> for TypeReference {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeReference> for String {
    fn from(value: TypeReference) -> Self {
        value.to_string()
    }
}
