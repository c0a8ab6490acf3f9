//! Model types
//!
//! Every declared type lives in one arena owned by the
//! [`TypeRegistry`](crate::registry::TypeRegistry). Cross references between
//! types (field types, relation endpoints, an entity's relations) are
//! [`TypeId`]s into that arena, never structural references.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a type in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Scalar,
    Enumeration,
    Composite,
    Entity,
    Relation,
}

impl TypeCategory {
    pub const ALL: [TypeCategory; 5] = [
        TypeCategory::Scalar,
        TypeCategory::Enumeration,
        TypeCategory::Composite,
        TypeCategory::Entity,
        TypeCategory::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Scalar => "scalar",
            TypeCategory::Enumeration => "enumeration",
            TypeCategory::Composite => "composite",
            TypeCategory::Entity => "entity",
            TypeCategory::Relation => "relation",
        }
    }

    /// Whether a type of this category may back a field
    pub fn is_field_type(&self) -> bool {
        match self {
            TypeCategory::Scalar | TypeCategory::Enumeration | TypeCategory::Composite => true,
            TypeCategory::Entity | TypeCategory::Relation => false,
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a relation as seen from the declaring entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationDirection {
    /// `related -> owner`
    Inbound,
    /// `owner -> related`
    Outbound,
}

impl fmt::Display for RelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationDirection::Inbound => f.write_str("inbound"),
            RelationDirection::Outbound => f.write_str("outbound"),
        }
    }
}

/// A named, typed field of a composite, entity or relation type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedField {
    pub name: String,
    pub description: String,
    pub nullable: bool,
    pub is_list: bool,
    pub type_name: String,
    /// Bound once the field type has been verified
    pub resolved_type: Option<TypeId>,
}

/// Field name -> field
pub type Fields = BTreeMap<String, TypedField>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarType {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationType {
    pub name: String,
    pub description: String,
    /// Member name -> associated value
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeType {
    pub name: String,
    pub description: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityType {
    pub name: String,
    pub description: String,
    pub fields: Fields,
    /// Relation name -> relation type
    pub relations: BTreeMap<String, TypeId>,
}

/// Canonical identity of a relation: `(source, label, target)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationIdentity {
    pub source: String,
    pub label: String,
    pub target: String,
}

impl RelationIdentity {
    pub const SEPARATOR: &'static str = "_";
}

impl fmt::Display for RelationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.source,
            self.label,
            self.target,
            sep = Self::SEPARATOR
        )
    }
}

/// A typed relation between two entity types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationType {
    pub identity: RelationIdentity,
    /// Canonical name (`identity` rendered)
    pub name: String,
    pub description: String,
    pub fields: Fields,
    pub direction: RelationDirection,
    pub related_type_name: String,
    pub source_type: Option<TypeId>,
    pub target_type: Option<TypeId>,
    pub related_type: Option<TypeId>,
}

impl RelationType {
    pub fn label(&self) -> &str {
        &self.identity.label
    }

    pub fn source_type_name(&self) -> &str {
        &self.identity.source
    }

    pub fn target_type_name(&self) -> &str {
        &self.identity.target
    }
}

/// Any declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum AbstractType {
    Scalar(ScalarType),
    Enumeration(EnumerationType),
    Composite(CompositeType),
    Entity(EntityType),
    Relation(RelationType),
}

impl AbstractType {
    pub fn name(&self) -> &str {
        match self {
            AbstractType::Scalar(t) => &t.name,
            AbstractType::Enumeration(t) => &t.name,
            AbstractType::Composite(t) => &t.name,
            AbstractType::Entity(t) => &t.name,
            AbstractType::Relation(t) => &t.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AbstractType::Scalar(t) => &t.description,
            AbstractType::Enumeration(t) => &t.description,
            AbstractType::Composite(t) => &t.description,
            AbstractType::Entity(t) => &t.description,
            AbstractType::Relation(t) => &t.description,
        }
    }

    pub fn category(&self) -> TypeCategory {
        match self {
            AbstractType::Scalar(_) => TypeCategory::Scalar,
            AbstractType::Enumeration(_) => TypeCategory::Enumeration,
            AbstractType::Composite(_) => TypeCategory::Composite,
            AbstractType::Entity(_) => TypeCategory::Entity,
            AbstractType::Relation(_) => TypeCategory::Relation,
        }
    }

    /// Named fields, for the categories that carry them
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            AbstractType::Scalar(_) | AbstractType::Enumeration(_) => None,
            AbstractType::Composite(t) => Some(&t.fields),
            AbstractType::Entity(t) => Some(&t.fields),
            AbstractType::Relation(t) => Some(&t.fields),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            AbstractType::Scalar(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumerationType> {
        match self {
            AbstractType::Enumeration(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeType> {
        match self {
            AbstractType::Composite(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            AbstractType::Entity(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationType> {
        match self {
            AbstractType::Relation(t) => Some(t),
            _ => None,
        }
    }
}

/// A type owning named fields whose types must be verified
pub trait FieldOwner {
    fn owner_name(&self) -> &str;
    fn fields_mut(&mut self) -> &mut Fields;
}

impl FieldOwner for CompositeType {
    fn owner_name(&self) -> &str {
        &self.name
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}

impl FieldOwner for EntityType {
    fn owner_name(&self) -> &str {
        &self.name
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}

impl FieldOwner for RelationType {
    fn owner_name(&self) -> &str {
        &self.name
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rendering() {
        let identity = RelationIdentity {
            source: "User".into(),
            label: "Authored".into(),
            target: "Post".into(),
        };
        assert_eq!(identity.to_string(), "User_Authored_Post");
    }

    #[test]
    fn test_field_type_categories() {
        let allowed: Vec<_> = TypeCategory::ALL
            .into_iter()
            .filter(TypeCategory::is_field_type)
            .collect();
        assert_eq!(
            allowed,
            [TypeCategory::Scalar, TypeCategory::Enumeration, TypeCategory::Composite]
        );
    }

    #[test]
    fn test_direction_serde() {
        let d: RelationDirection = serde_json::from_str("\"inbound\"").unwrap();
        assert_eq!(d, RelationDirection::Inbound);
        assert!(serde_json::from_str::<RelationDirection>("\"sideways\"").is_err());
    }
}
