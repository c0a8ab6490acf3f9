//! Relation linking
//!
//! A relation is declared on one entity but identified independently of the
//! declaring side: `outbound` makes the owner the source, `inbound` makes it
//! the target. Declaring `A -Likes-> B` on `A` and `B <-Likes- A` on `B`
//! yields the same identity `A_Likes_B`.

use crate::diagnostics::ModelErrors;
use crate::resolve::Scope;
use crate::types::{RelationDirection, RelationIdentity, RelationType, TypeCategory, TypeId};

/// Direction-normalized identity of a relation declared on `owner`
pub fn canonical_identity(
    owner: &str,
    label: &str,
    direction: RelationDirection,
    related: &str,
) -> RelationIdentity {
    let (source, target) = match direction {
        RelationDirection::Outbound => (owner, related),
        RelationDirection::Inbound => (related, owner),
    };

    RelationIdentity {
        source: source.to_string(),
        label: label.to_string(),
        target: target.to_string(),
    }
}

/// Location of a relation declaration
pub(crate) fn relation_location(relation_name: &str, owner: &str) -> String {
    format!("relation '{}' of entity type '{}'", relation_name, owner)
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    fn as_str(self) -> &'static str {
        match self {
            Endpoint::Source => "source",
            Endpoint::Target => "target",
        }
    }
}

/// Resolve one endpoint to an entity type, reporting into `errors`
fn resolve_endpoint(
    scope: &Scope<'_>,
    type_name: &str,
    endpoint: Endpoint,
    relation_name: &str,
    owner: &str,
    errors: &mut ModelErrors,
) -> Option<TypeId> {
    let location = format!(
        "{} type of {}",
        endpoint.as_str(),
        relation_location(relation_name, owner)
    );

    match scope.lookup(type_name) {
        None => {
            let suggestions = scope.suggestions(type_name, |category| category == TypeCategory::Entity);
            errors.undefined_type(type_name, location, &suggestions);
            None
        }
        Some((id, TypeCategory::Entity)) => Some(id),
        Some((_, category)) => {
            errors.inappropriate_type(type_name, category, location);
            None
        }
    }
}

/// Bind the source, target and related endpoints of `relation`.
///
/// Source and target are checked independently; the related type is always
/// one of the two and is bound from whichever it is.
pub(crate) fn link_endpoints(
    scope: &Scope<'_>,
    relation: &mut RelationType,
    relation_name: &str,
    owner: &str,
) -> ModelErrors {
    let mut errors = ModelErrors::new();

    let source = resolve_endpoint(
        scope,
        relation.source_type_name(),
        Endpoint::Source,
        relation_name,
        owner,
        &mut errors,
    );
    let target = resolve_endpoint(
        scope,
        relation.target_type_name(),
        Endpoint::Target,
        relation_name,
        owner,
        &mut errors,
    );

    relation.source_type = source;
    relation.target_type = target;
    relation.related_type = match relation.direction {
        RelationDirection::Outbound => target,
        RelationDirection::Inbound => source,
    };

    errors
}
