//! Metadata integrity
//!
//! Resolves the declared type of every field of a [`FieldOwner`] through a
//! two-tier [`Scope`]: the types forward-declared by the batch being
//! validated, then the committed registry. Only scalar, enumeration and
//! composite types may back a field.

use std::collections::HashMap;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::diagnostics::{field_location, CollisionSource, ModelErrors};
use crate::registry::TypeRegistry;
use crate::types::{FieldOwner, TypeCategory, TypeId};

/// Names forward-declared by the batch currently being validated
#[derive(Debug, Default)]
pub(crate) struct ForwardIndex {
    entries: HashMap<String, (TypeId, TypeCategory)>,
}

impl ForwardIndex {
    pub(crate) fn insert(&mut self, name: String, id: TypeId, category: TypeCategory) {
        self.entries.insert(name, (id, category));
    }

    pub(crate) fn get(&self, name: &str) -> Option<(TypeId, TypeCategory)> {
        self.entries.get(name).copied()
    }

    fn entries(&self) -> impl Iterator<Item = (&str, TypeCategory)> {
        self.entries
            .iter()
            .map(|(name, (_, category))| (name.as_str(), *category))
    }
}

/// Lookup scope: forward declarations first, then committed types
pub(crate) struct Scope<'a> {
    registry: &'a TypeRegistry,
    forward: &'a ForwardIndex,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, forward: &'a ForwardIndex) -> Self {
        Self { registry, forward }
    }

    /// Find a type by name
    pub(crate) fn lookup(&self, name: &str) -> Option<(TypeId, TypeCategory)> {
        if let Some(found) = self.forward.get(name) {
            return Some(found);
        }
        let id = self.registry.id_of(name)?;
        Some((id, self.registry.category_of(id)))
    }

    /// Where `name` is already declared, if anywhere
    pub(crate) fn collision(&self, name: &str) -> Option<CollisionSource> {
        if self.registry.is_predefined(name) {
            return Some(CollisionSource::Predefined);
        }
        self.lookup(name)
            .map(|(_, category)| CollisionSource::Declared(category))
    }

    /// Similarly named types of an accepted category, best match first
    pub(crate) fn suggestions(
        &self,
        name: &str,
        accepts: impl Fn(TypeCategory) -> bool,
    ) -> Vec<String> {
        let options = self.registry.options();
        if !options.suggest_names || options.max_suggestions == 0 {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let committed = self
            .registry
            .iter()
            .map(|(_, ty)| (ty.name(), ty.category()));

        let mut scored: Vec<(i64, &str)> = committed
            .chain(self.forward.entries())
            .filter(|(candidate, category)| *candidate != name && accepts(*category))
            .filter_map(|(candidate, _)| {
                matcher
                    .fuzzy_match(candidate, name)
                    .map(|score| (score, candidate))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.dedup_by(|a, b| a.1 == b.1);

        scored
            .into_iter()
            .take(options.max_suggestions)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Resolve and verify the type of every field of `owner`.
///
/// Resolved fields get their `resolved_type` bound; fields that fail stay
/// unresolved and produce one diagnostic each.
pub(crate) fn verify_metadata_integrity(
    scope: &Scope<'_>,
    owner: &mut dyn FieldOwner,
) -> ModelErrors {
    let mut errors = ModelErrors::new();
    let owner_name = owner.owner_name().to_string();

    for (field_name, field) in owner.fields_mut().iter_mut() {
        let Some((id, category)) = scope.lookup(&field.type_name) else {
            errors.undefined_type(
                &field.type_name,
                field_location(field_name, &owner_name),
                &scope.suggestions(&field.type_name, |category| category.is_field_type()),
            );
            continue;
        };

        match category {
            TypeCategory::Entity => {
                errors.entity_nesting(&field.type_name, &owner_name, field_name);
            }
            TypeCategory::Relation => {
                errors.relation_as_field(&field.type_name, &owner_name, field_name);
            }
            TypeCategory::Scalar | TypeCategory::Enumeration | TypeCategory::Composite => {
                field.resolved_type = Some(id);
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::model::ModelInitOptions;
    use crate::registry::PredefinedScalars;
    use crate::types::{CompositeType, TypedField};

    fn field(name: &str, type_name: &str) -> TypedField {
        TypedField {
            name: name.to_string(),
            description: String::new(),
            nullable: false,
            is_list: false,
            type_name: type_name.to_string(),
            resolved_type: None,
        }
    }

    fn composite(fields: &[(&str, &str)]) -> CompositeType {
        CompositeType {
            name: "Profile".to_string(),
            description: String::new(),
            fields: fields
                .iter()
                .map(|(n, t)| (n.to_string(), field(n, t)))
                .collect(),
        }
    }

    #[test]
    fn test_resolves_committed_scalar() {
        let registry = TypeRegistry::new(&PredefinedScalars::default());
        let forward = ForwardIndex::default();
        let scope = Scope::new(&registry, &forward);

        let mut owner = composite(&[("name", "Text")]);
        let errors = verify_metadata_integrity(&scope, &mut owner);

        assert!(errors.is_empty());
        assert_eq!(owner.fields["name"].resolved_type, registry.id_of("Text"));
    }

    #[test]
    fn test_forward_declaration_wins() {
        let registry = TypeRegistry::new(&PredefinedScalars::default());
        let mut forward = ForwardIndex::default();
        forward.insert("Address".to_string(), TypeId(99), TypeCategory::Composite);
        let scope = Scope::new(&registry, &forward);

        let mut owner = composite(&[("home", "Address")]);
        let errors = verify_metadata_integrity(&scope, &mut owner);

        assert!(errors.is_empty());
        assert_eq!(owner.fields["home"].resolved_type, Some(TypeId(99)));
    }

    #[test]
    fn test_every_bad_field_reported() {
        let registry = TypeRegistry::new(&PredefinedScalars::default());
        let mut forward = ForwardIndex::default();
        forward.insert("User".to_string(), TypeId(50), TypeCategory::Entity);
        forward.insert("User_Wrote_Post".to_string(), TypeId(51), TypeCategory::Relation);
        let scope = Scope::new(&registry, &forward);

        let mut owner = composite(&[
            ("author", "User"),
            ("latest", "User_Wrote_Post"),
            ("missing", "Nowhere"),
            ("ok", "Number"),
        ]);
        let errors = verify_metadata_integrity(&scope, &mut owner);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.count(ErrorKind::EntityNesting), 2);
        assert_eq!(errors.count(ErrorKind::UndefinedType), 1);
        assert!(owner.fields["author"].resolved_type.is_none());
        assert!(owner.fields["latest"].resolved_type.is_none());
        assert!(owner.fields["missing"].resolved_type.is_none());
        assert!(owner.fields["ok"].resolved_type.is_some());
    }

    #[test]
    fn test_suggestions() {
        let registry = TypeRegistry::new(&PredefinedScalars::default());
        let forward = ForwardIndex::default();
        let scope = Scope::new(&registry, &forward);

        assert_eq!(scope.suggestions("Txt", |_| true), ["Text"]);
        assert!(scope.suggestions("Comment", |_| true).is_empty());
    }

    #[test]
    fn test_suggestions_disabled() {
        let options = ModelInitOptions {
            suggest_names: false,
            ..Default::default()
        };
        let registry = TypeRegistry::with_options(&PredefinedScalars::default(), options);
        let forward = ForwardIndex::default();
        let scope = Scope::new(&registry, &forward);

        assert!(scope.suggestions("Txt", |_| true).is_empty());
    }

    #[test]
    fn test_field_suggestions_skip_entities() {
        let registry = TypeRegistry::new(&PredefinedScalars::default());
        let mut forward = ForwardIndex::default();
        forward.insert("Users".to_string(), TypeId(10), TypeCategory::Entity);
        forward.insert("UserName".to_string(), TypeId(11), TypeCategory::Composite);
        let scope = Scope::new(&registry, &forward);

        let mut owner = composite(&[("owner", "User")]);
        let errors = verify_metadata_integrity(&scope, &mut owner);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.all()[0].context, ["did you mean 'UserName'?"]);
    }
}
