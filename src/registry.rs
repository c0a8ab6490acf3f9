//! Type Registry
//!
//! Owns every committed type and orchestrates validate-then-commit for each
//! registration call. A call validates its whole batch, collecting every
//! defect, and commits only when nothing was collected. A rejected batch
//! leaves the registry exactly as it was.
//!
//! Types live in an arena (`Vec<AbstractType>`) indexed by [`TypeId`]. A batch
//! is staged with provisional ids continuing the arena, so binding a field or
//! relation endpoint to a forward-declared type needs no fix-up on commit.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::diagnostics::ModelErrors;
use crate::document::{CompositeDecl, EntityDecl, FieldDecl, RelationDecl};
use crate::model::ModelInitOptions;
use crate::naming::is_legal_type_name;
use crate::relation::{canonical_identity, link_endpoints, relation_location};
use crate::resolve::{verify_metadata_integrity, ForwardIndex, Scope};
use crate::types::{
    AbstractType, CompositeType, EntityType, EnumerationType, FieldOwner, Fields, RelationType,
    ScalarType, TypeCategory, TypeId, TypedField,
};

// =============================================================================
// Predefined Scalars
// =============================================================================

/// Built-in scalar types seeded before any user declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedScalars {
    scalars: BTreeMap<String, String>,
}

impl PredefinedScalars {
    /// An empty set
    pub fn empty() -> Self {
        Self {
            scalars: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scalars.insert(name.into(), description.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scalars.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

impl Default for PredefinedScalars {
    fn default() -> Self {
        Self::empty()
            .with("Bool", "Boolean value that's either true or false")
            .with("Number", "A signed floating point number")
            .with("Text", "A UTF8 encoded text value")
    }
}

impl FromIterator<(String, String)> for PredefinedScalars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            scalars: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Batch Staging
// =============================================================================

/// Types staged by one registration call
struct Batch {
    base: usize,
    types: Vec<AbstractType>,
    forward: ForwardIndex,
}

impl Batch {
    fn new(base: usize) -> Self {
        Self {
            base,
            types: Vec::new(),
            forward: ForwardIndex::default(),
        }
    }

    /// Forward-declare a type, returning its provisional id
    fn declare(&mut self, ty: AbstractType) -> TypeId {
        let id = TypeId((self.base + self.types.len()) as u32);
        self.forward.insert(ty.name().to_string(), id, ty.category());
        self.types.push(ty);
        id
    }

    fn slot(&self, id: TypeId) -> usize {
        id.index()
            .checked_sub(self.base)
            .filter(|slot| *slot < self.types.len())
            .unwrap_or_else(|| panic!("type {} is not staged in this batch", id))
    }
}

/// Mutable field owner of a staged composite, entity or relation
fn field_owner(ty: &mut AbstractType) -> Option<&mut dyn FieldOwner> {
    match ty {
        AbstractType::Composite(t) => Some(t),
        AbstractType::Entity(t) => Some(t),
        AbstractType::Relation(t) => Some(t),
        AbstractType::Scalar(_) | AbstractType::Enumeration(_) => None,
    }
}

fn typed_fields(decls: &BTreeMap<String, FieldDecl>) -> Fields {
    decls
        .iter()
        .map(|(name, decl)| {
            let field = TypedField {
                name: name.clone(),
                description: decl.description.clone(),
                nullable: decl.nullable,
                is_list: decl.type_ref.is_list,
                type_name: decl.type_ref.name.clone(),
                resolved_type: None,
            };
            (name.clone(), field)
        })
        .collect()
}

/// Whether two field maps declare the same fields (descriptions aside)
fn same_fields(a: &Fields, b: &Fields) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|((name_a, a), (name_b, b))| {
            name_a == name_b
                && a.type_name == b.type_name
                && a.is_list == b.is_list
                && a.nullable == b.nullable
        })
}

fn relation_type(owner: &str, decl: &RelationDecl) -> RelationType {
    let identity = canonical_identity(owner, &decl.label, decl.direction, &decl.related_type);
    RelationType {
        name: identity.to_string(),
        identity,
        description: decl.description.clone(),
        fields: typed_fields(&decl.fields),
        direction: decl.direction,
        related_type_name: decl.related_type.clone(),
        source_type: None,
        target_type: None,
        related_type: None,
    }
}

// =============================================================================
// Registry
// =============================================================================

/// All committed types of one document
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Arena of committed types
    types: Vec<AbstractType>,
    /// Unified name table, the sole authority on name uniqueness
    names: HashMap<String, TypeId>,
    scalars: BTreeMap<String, TypeId>,
    enumerations: BTreeMap<String, TypeId>,
    composites: BTreeMap<String, TypeId>,
    entities: BTreeMap<String, TypeId>,
    relations: BTreeMap<String, TypeId>,
    predefined: HashSet<String>,
    options: ModelInitOptions,
}

impl TypeRegistry {
    /// Create a registry seeded with the predefined scalars
    pub fn new(predefined: &PredefinedScalars) -> Self {
        Self::with_options(predefined, ModelInitOptions::default())
    }

    pub fn with_options(predefined: &PredefinedScalars, options: ModelInitOptions) -> Self {
        let mut registry = Self {
            types: Vec::with_capacity(predefined.len()),
            names: HashMap::new(),
            scalars: BTreeMap::new(),
            enumerations: BTreeMap::new(),
            composites: BTreeMap::new(),
            entities: BTreeMap::new(),
            relations: BTreeMap::new(),
            predefined: HashSet::with_capacity(predefined.len()),
            options,
        };

        let mut batch = Batch::new(0);
        for (name, description) in predefined.iter() {
            if !is_legal_type_name(name) {
                warn!(name, "skipping predefined scalar with an illegal type name");
                continue;
            }
            registry.predefined.insert(name.to_string());
            batch.declare(AbstractType::Scalar(ScalarType {
                name: name.to_string(),
                description: description.to_string(),
            }));
        }
        registry.commit(batch);

        registry
    }

    pub fn options(&self) -> &ModelInitOptions {
        &self.options
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a single scalar type
    pub fn register_scalar_type(&mut self, name: &str, description: &str) -> ModelErrors {
        let mut errors = ModelErrors::new();
        let mut batch = Batch::new(self.types.len());

        if self.verify_declaration(&batch.forward, name, "scalar type declaration", &mut errors) {
            batch.declare(AbstractType::Scalar(ScalarType {
                name: name.to_string(),
                description: description.to_string(),
            }));
        }

        self.finish(batch, errors, TypeCategory::Scalar)
    }

    /// Register a single enumeration type
    pub fn register_enumeration_type(
        &mut self,
        name: &str,
        description: &str,
        values: &BTreeMap<String, String>,
    ) -> ModelErrors {
        let mut errors = ModelErrors::new();
        let mut batch = Batch::new(self.types.len());

        if self.verify_declaration(
            &batch.forward,
            name,
            "enumeration type declaration",
            &mut errors,
        ) {
            batch.declare(AbstractType::Enumeration(EnumerationType {
                name: name.to_string(),
                description: description.to_string(),
                values: values.clone(),
            }));
        }

        self.finish(batch, errors, TypeCategory::Enumeration)
    }

    /// Register a batch of composite types.
    ///
    /// Every well-named composite is forward-declared before any field is
    /// resolved, so composites of one batch may reference each other.
    pub fn register_composite_types(
        &mut self,
        decls: &BTreeMap<String, CompositeDecl>,
    ) -> ModelErrors {
        let mut errors = ModelErrors::new();
        let mut batch = Batch::new(self.types.len());

        for (name, decl) in decls {
            if !self.verify_declaration(
                &batch.forward,
                name,
                "composite type declaration",
                &mut errors,
            ) {
                continue;
            }
            batch.declare(AbstractType::Composite(CompositeType {
                name: name.clone(),
                description: decl.description.clone(),
                fields: typed_fields(&decl.fields),
            }));
        }

        let Batch { types, forward, .. } = &mut batch;
        let scope = Scope::new(self, forward);
        for ty in types.iter_mut() {
            if let Some(owner) = field_owner(ty) {
                errors.merge(verify_metadata_integrity(&scope, owner));
            }
        }

        self.finish(batch, errors, TypeCategory::Composite)
    }

    /// Register a batch of entity types together with their relations.
    ///
    /// Phase 1 checks each entity on its own (name, collision, fields).
    /// Phase 2 links the relations of every entity that passed phase 1.
    /// Nothing is committed unless both phases are clean.
    pub fn register_entity_types(&mut self, decls: &BTreeMap<String, EntityDecl>) -> ModelErrors {
        let mut errors = ModelErrors::new();
        let mut batch = Batch::new(self.types.len());

        // Phase 1: forward-declare every well-named entity
        let mut declared = Vec::with_capacity(decls.len());
        for (name, decl) in decls {
            if !self.verify_declaration(
                &batch.forward,
                name,
                "entity type declaration",
                &mut errors,
            ) {
                continue;
            }
            let id = batch.declare(AbstractType::Entity(EntityType {
                name: name.clone(),
                description: decl.description.clone(),
                fields: typed_fields(&decl.fields),
                relations: BTreeMap::new(),
            }));
            declared.push((id, name.as_str(), decl));
        }

        // Phase 1: own fields
        let mut linkable = Vec::with_capacity(declared.len());
        for (id, name, decl) in declared {
            let slot = batch.slot(id);
            let Batch { types, forward, .. } = &mut batch;
            let scope = Scope::new(self, forward);
            let field_errors = match field_owner(&mut types[slot]) {
                Some(owner) => verify_metadata_integrity(&scope, owner),
                None => panic!("entity '{}' staged as a non-entity type", name),
            };

            if field_errors.is_empty() {
                linkable.push((id, name, decl));
            } else {
                errors.merge(field_errors);
            }
        }

        // Phase 2: relations
        for (entity_id, owner, decl) in linkable {
            for (relation_name, relation_decl) in &decl.relations {
                if let Some(relation_id) =
                    self.stage_relation(&mut batch, owner, relation_name, relation_decl, &mut errors)
                {
                    let slot = batch.slot(entity_id);
                    if let AbstractType::Entity(entity) = &mut batch.types[slot] {
                        entity.relations.insert(relation_name.clone(), relation_id);
                    }
                }
            }
        }

        self.finish(batch, errors, TypeCategory::Entity)
    }

    /// Validate and forward-declare one relation of `owner`.
    ///
    /// Returns the relation's provisional id when it passed every check. When
    /// the other end of the same relation was already staged by this batch
    /// with the same fields, the staged relation is shared instead.
    fn stage_relation(
        &self,
        batch: &mut Batch,
        owner: &str,
        relation_name: &str,
        decl: &RelationDecl,
        errors: &mut ModelErrors,
    ) -> Option<TypeId> {
        let location = relation_location(relation_name, owner);

        if !is_legal_type_name(&decl.label) {
            errors.illegal_type_name(&decl.label, location);
            return None;
        }

        let relation = relation_type(owner, decl);
        if let Some(id) = Self::shared_relation(batch, &relation) {
            debug!(relation = %relation.name, owner, "sharing relation declared from both ends");
            return Some(id);
        }

        if let Some(source) = Scope::new(self, &batch.forward).collision(&relation.name) {
            errors.type_name_collision(&relation.name, source, location);
            return None;
        }

        let id = batch.declare(AbstractType::Relation(relation));
        let slot = batch.slot(id);
        let Batch { types, forward, .. } = batch;
        let scope = Scope::new(self, forward);

        let AbstractType::Relation(relation) = &mut types[slot] else {
            panic!("relation '{}' staged as a non-relation type", relation_name);
        };

        let mut relation_errors = verify_metadata_integrity(&scope, &mut *relation);
        relation_errors.merge(link_endpoints(&scope, relation, relation_name, owner));

        if relation_errors.is_empty() {
            Some(id)
        } else {
            errors.merge(relation_errors);
            None
        }
    }

    /// A relation with the same identity and fields staged earlier in the batch
    fn shared_relation(batch: &mut Batch, relation: &RelationType) -> Option<TypeId> {
        let (id, TypeCategory::Relation) = batch.forward.get(&relation.name)? else {
            return None;
        };
        let slot = batch.slot(id);
        let AbstractType::Relation(staged) = &mut batch.types[slot] else {
            return None;
        };

        if staged.identity != relation.identity || !same_fields(&staged.fields, &relation.fields) {
            return None;
        }
        if staged.description.is_empty() {
            staged.description = relation.description.clone();
        }

        Some(id)
    }

    /// Check a newly declared name against the grammar and the namespace
    fn verify_declaration(
        &self,
        forward: &ForwardIndex,
        name: &str,
        location: &str,
        errors: &mut ModelErrors,
    ) -> bool {
        if !is_legal_type_name(name) {
            errors.illegal_type_name(name, location);
            return false;
        }

        if let Some(source) = Scope::new(self, forward).collision(name) {
            errors.type_name_collision(name, source, location);
            return false;
        }

        true
    }

    /// Commit the batch if no errors were collected
    fn finish(&mut self, batch: Batch, errors: ModelErrors, category: TypeCategory) -> ModelErrors {
        if errors.has_errors() {
            warn!(
                category = %category,
                staged = batch.types.len(),
                errors = errors.len(),
                "rejected {} type batch",
                category
            );
            return errors;
        }

        let committed = batch.types.len();
        self.commit(batch);
        debug!(category = %category, committed, "committed {} type batch", category);

        errors
    }

    fn commit(&mut self, batch: Batch) {
        assert_eq!(
            batch.base,
            self.types.len(),
            "batch staged against a stale registry"
        );

        for ty in batch.types {
            let id = TypeId(self.types.len() as u32);
            let name = ty.name().to_string();

            let category_map = match ty.category() {
                TypeCategory::Scalar => &mut self.scalars,
                TypeCategory::Enumeration => &mut self.enumerations,
                TypeCategory::Composite => &mut self.composites,
                TypeCategory::Entity => &mut self.entities,
                TypeCategory::Relation => &mut self.relations,
            };
            category_map.insert(name.clone(), id);

            if self.names.insert(name, id).is_some() {
                panic!("type name '{}' committed twice", ty.name());
            }
            self.types.push(ty);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<&AbstractType> {
        self.id_of(name).map(|id| self.type_at(id))
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn get_by_id(&self, id: TypeId) -> Option<&AbstractType> {
        self.types.get(id.index())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn is_predefined(&self, name: &str) -> bool {
        self.predefined.contains(name)
    }

    /// The type a resolved field points to
    pub fn field_type(&self, field: &TypedField) -> Option<&AbstractType> {
        field.resolved_type.and_then(|id| self.get_by_id(id))
    }

    /// All committed names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Every committed type in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &AbstractType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }

    /// Types of one category, ordered by name
    pub fn types(&self, category: TypeCategory) -> impl Iterator<Item = &AbstractType> {
        self.category_map(category)
            .values()
            .map(move |id| self.type_at(*id))
    }

    pub fn scalar_types(&self) -> impl Iterator<Item = &ScalarType> {
        self.types(TypeCategory::Scalar)
            .filter_map(AbstractType::as_scalar)
    }

    pub fn enumeration_types(&self) -> impl Iterator<Item = &EnumerationType> {
        self.types(TypeCategory::Enumeration)
            .filter_map(AbstractType::as_enumeration)
    }

    pub fn composite_types(&self) -> impl Iterator<Item = &CompositeType> {
        self.types(TypeCategory::Composite)
            .filter_map(AbstractType::as_composite)
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.types(TypeCategory::Entity)
            .filter_map(AbstractType::as_entity)
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationType> {
        self.types(TypeCategory::Relation)
            .filter_map(AbstractType::as_relation)
    }

    /// Relations declared on an entity, keyed by relation name
    pub fn relations_of(&self, entity: &str) -> Vec<(&str, &RelationType)> {
        let Some(entity) = self.get(entity).and_then(AbstractType::as_entity) else {
            return Vec::new();
        };

        entity
            .relations
            .iter()
            .filter_map(|(name, id)| {
                self.get_by_id(*id)
                    .and_then(AbstractType::as_relation)
                    .map(|relation| (name.as_str(), relation))
            })
            .collect()
    }

    /// Number of committed types of one category (predefined scalars included)
    pub fn count(&self, category: TypeCategory) -> usize {
        self.category_map(category).len()
    }

    pub fn total_types(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn category_of(&self, id: TypeId) -> TypeCategory {
        self.type_at(id).category()
    }

    fn type_at(&self, id: TypeId) -> &AbstractType {
        self.types
            .get(id.index())
            .unwrap_or_else(|| panic!("type {} is not in the registry", id))
    }

    fn category_map(&self, category: TypeCategory) -> &BTreeMap<String, TypeId> {
        match category {
            TypeCategory::Scalar => &self.scalars,
            TypeCategory::Enumeration => &self.enumerations,
            TypeCategory::Composite => &self.composites,
            TypeCategory::Entity => &self.entities,
            TypeCategory::Relation => &self.relations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::naming::TypeReference;

    fn registry() -> TypeRegistry {
        TypeRegistry::new(&PredefinedScalars::default())
    }

    fn text_field() -> FieldDecl {
        FieldDecl::new(TypeReference::named("Text"))
    }

    #[test]
    fn test_predefined_seeded() {
        let registry = registry();
        assert_eq!(registry.count(TypeCategory::Scalar), 3);
        assert_eq!(registry.total_types(), 3);
        assert!(registry.is_predefined("Text"));
        assert!(registry.get("Bool").and_then(AbstractType::as_scalar).is_some());
    }

    #[test]
    fn test_register_scalar() {
        let mut registry = registry();
        let errors = registry.register_scalar_type("Timestamp", "Unix time");
        assert!(errors.is_empty());
        assert_eq!(registry.count(TypeCategory::Scalar), 4);
        assert!(!registry.is_predefined("Timestamp"));
    }

    #[test]
    fn test_predefined_cannot_be_redeclared() {
        let mut registry = registry();
        let errors = registry.register_scalar_type("Text", "my own text");

        assert_eq!(errors.len(), 1);
        let err = &errors.all()[0];
        assert_eq!(err.code, ErrorKind::TypeNameCollision);
        assert!(err.message.contains("predefined scalar"));
        assert_eq!(registry.total_types(), 3);
    }

    #[test]
    fn test_enumeration_collides_with_scalar() {
        let mut registry = registry();
        assert!(registry.register_scalar_type("Color", "").is_empty());

        let values = BTreeMap::from([("Red".to_string(), "#f00".to_string())]);
        let errors = registry.register_enumeration_type("Color", "", &values);

        assert_eq!(errors.count(ErrorKind::TypeNameCollision), 1);
        assert_eq!(
            errors.all()[0].message,
            "redeclaration of scalar type 'Color'"
        );
        assert_eq!(registry.count(TypeCategory::Enumeration), 0);
    }

    #[test]
    fn test_register_enumeration() {
        let mut registry = registry();
        let values = BTreeMap::from([
            ("Admin".to_string(), "admin".to_string()),
            ("Guest".to_string(), "guest".to_string()),
        ]);
        assert!(registry.register_enumeration_type("Role", "Access role", &values).is_empty());

        let role = registry.enumeration_types().next().unwrap();
        assert_eq!(role.name, "Role");
        assert_eq!(role.values.len(), 2);
    }

    #[test]
    fn test_illegal_scalar_name() {
        let mut registry = registry();
        let errors = registry.register_scalar_type("X", "");
        assert_eq!(errors.count(ErrorKind::IllegalTypeName), 1);
        assert_eq!(errors.all()[0].location, "scalar type declaration");
    }

    #[test]
    fn test_composites_reference_each_other() {
        let mut registry = registry();
        let decls = BTreeMap::from([
            (
                "Address".to_string(),
                CompositeDecl::new("").field("street", text_field()),
            ),
            (
                "Profile".to_string(),
                CompositeDecl::new("")
                    .field("home", FieldDecl::new(TypeReference::named("Address")))
                    .field("previous", FieldDecl::new(TypeReference::list_of("Address"))),
            ),
        ]);

        assert!(registry.register_composite_types(&decls).is_empty());

        let profile = registry.get("Profile").and_then(AbstractType::as_composite).unwrap();
        let home = registry.field_type(&profile.fields["home"]).unwrap();
        assert_eq!(home.name(), "Address");
        assert!(profile.fields["previous"].is_list);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut registry = registry();
        assert!(registry.register_composite_types(&BTreeMap::new()).is_empty());
        assert!(registry.register_entity_types(&BTreeMap::new()).is_empty());
        assert_eq!(registry.total_types(), 3);
    }

    #[test]
    fn test_relation_ids_follow_entities() {
        let mut registry = registry();
        let decls = BTreeMap::from([
            (
                "Post".to_string(),
                EntityDecl::new("").relation("author", RelationDecl::inbound("Authored", "User")),
            ),
            ("User".to_string(), EntityDecl::new("")),
        ]);

        assert!(registry.register_entity_types(&decls).is_empty());

        let relation = registry.get("User_Authored_Post").and_then(AbstractType::as_relation).unwrap();
        assert_eq!(relation.source_type, registry.id_of("User"));
        assert_eq!(relation.target_type, registry.id_of("Post"));
        assert_eq!(relation.related_type, registry.id_of("User"));

        let post = registry.get("Post").and_then(AbstractType::as_entity).unwrap();
        assert_eq!(post.relations["author"], registry.id_of("User_Authored_Post").unwrap());
        assert_eq!(registry.relations_of("Post").len(), 1);
        assert!(registry.relations_of("User").is_empty());
    }

    #[test]
    fn test_entity_field_naming_sibling_entity() {
        let mut registry = registry();
        let decls = BTreeMap::from([
            (
                "Post".to_string(),
                EntityDecl::new("").field("author", FieldDecl::new(TypeReference::named("User"))),
            ),
            ("User".to_string(), EntityDecl::new("")),
        ]);

        let errors = registry.register_entity_types(&decls);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.all()[0].code, ErrorKind::EntityNesting);
        assert_eq!(registry.count(TypeCategory::Entity), 0);
    }

    #[test]
    fn test_illegal_relation_label() {
        let mut registry = registry();
        let decls = BTreeMap::from([(
            "User".to_string(),
            EntityDecl::new("").relation("friends", RelationDecl::outbound("is_friend", "User")),
        )]);

        let errors = registry.register_entity_types(&decls);
        assert_eq!(errors.len(), 1);
        let err = &errors.all()[0];
        assert_eq!(err.code, ErrorKind::IllegalTypeName);
        assert_eq!(err.location, "relation 'friends' of entity type 'User'");
        assert_eq!(registry.total_types(), 3);
    }

    #[test]
    fn test_self_relation() {
        let mut registry = registry();
        let decls = BTreeMap::from([(
            "User".to_string(),
            EntityDecl::new("").relation("follows", RelationDecl::outbound("Follows", "User")),
        )]);

        assert!(registry.register_entity_types(&decls).is_empty());
        let relation = registry.get("User_Follows_User").and_then(AbstractType::as_relation).unwrap();
        assert_eq!(relation.source_type, relation.target_type);
    }

    #[test]
    fn test_both_ends_with_different_fields_collide() {
        let mut registry = registry();
        let decls = BTreeMap::from([
            (
                "Post".to_string(),
                EntityDecl::new("").relation(
                    "author",
                    RelationDecl::inbound("Authored", "User").field("since", text_field()),
                ),
            ),
            (
                "User".to_string(),
                EntityDecl::new("").relation("posts", RelationDecl::outbound("Authored", "Post")),
            ),
        ]);

        let errors = registry.register_entity_types(&decls);
        assert_eq!(errors.len(), 1);
        let err = &errors.all()[0];
        assert_eq!(err.code, ErrorKind::TypeNameCollision);
        assert_eq!(err.location, "relation 'posts' of entity type 'User'");
        assert_eq!(registry.count(TypeCategory::Relation), 0);
    }

    #[test]
    fn test_both_ends_share_description() {
        let mut registry = registry();
        let mut posts = RelationDecl::outbound("Authored", "Post");
        posts.description = "Posts written by the user".to_string();
        let decls = BTreeMap::from([
            (
                "Post".to_string(),
                EntityDecl::new("").relation("author", RelationDecl::inbound("Authored", "User")),
            ),
            ("User".to_string(), EntityDecl::new("").relation("posts", posts)),
        ]);

        assert!(registry.register_entity_types(&decls).is_empty());
        let relation = registry.relations().next().unwrap();
        assert_eq!(relation.description, "Posts written by the user");
    }

    #[test]
    fn test_illegal_predefined_names_skipped() {
        let predefined = PredefinedScalars::empty()
            .with("List<Foo>", "")
            .with("my text", "")
            .with("Uuid", "A 128 bit identifier");
        let registry = TypeRegistry::new(&predefined);

        assert!(!registry.is_defined("List<Foo>"));
        assert!(!registry.is_defined("my text"));
        assert!(!registry.is_predefined("my text"));
        assert!(registry.is_predefined("Uuid"));
        assert_eq!(registry.total_types(), 1);
    }
}
