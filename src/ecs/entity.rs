use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

use super::{Component, ComponentKind};

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entity: an id plus at most one component of each kind
pub struct Entity {
    id: EntityId,
    components: FxHashMap<ComponentKind, Box<dyn Any>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            components: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component, replacing any existing component of the same kind
    pub fn attach<C: Component>(&mut self, component: C) -> &mut Self {
        self.components.insert(C::kind(), Box::new(component));
        self
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get(&C::kind())?.downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::kind())?.downcast_mut::<C>()
    }

    pub fn has<C: Component>(&self) -> bool {
        self.has_kind(C::kind())
    }

    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Check that every listed kind is attached
    pub fn has_all(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().all(|kind| self.has_kind(*kind))
    }

    /// Remove a component and hand ownership back to the caller.
    ///
    /// The returned value is detached from this entity entirely.
    pub fn detach<C: Component>(&mut self) -> Option<C> {
        let boxed = self.components.remove(&C::kind())?;
        boxed.downcast::<C>().ok().map(|component| *component)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.kinds().map(|kind| kind.name()).collect();
        names.sort_unstable();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &names)
            .finish()
    }
}

/// Live entities keyed by id, iterated in creation order
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> &mut Entity {
        let id = entity.id();
        self.entities.entry(id).or_insert(entity)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}
