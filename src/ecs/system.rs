use super::{ComponentKind, Entity, EntityId, EntityStore};

/// Trait for systems that process entities with specific components
pub trait System {
    /// Get the name of this system for debugging and tracked-set lookup
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Components an entity must carry to be tracked by this system
    fn required_components(&self) -> &[ComponentKind];

    /// An empty requirement set matches nothing
    fn matches(&self, entity: &Entity) -> bool {
        let required = self.required_components();
        !required.is_empty() && entity.has_all(required)
    }

    /// Called when an entity starts matching the requirement set
    fn on_entity_added(&mut self, _entity: &mut Entity) {}

    /// Called when an entity stops matching or is removed from the world
    fn on_entity_removed(&mut self, _entity: &mut Entity) {}

    /// Called every frame, in registration order
    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32);

    /// Called after every system has run `update` for the frame
    fn end_frame(&mut self, _ctx: &mut SystemContext<'_>) {}
}

/// The view of the world a system sees during `update`
///
/// `tracked` is this system's membership list; `entity`/`entity_mut`
/// reach any live entity (for weak references such as a camera target).
pub struct SystemContext<'a> {
    entities: &'a mut EntityStore,
    tracked: &'a [EntityId],
}

impl<'a> SystemContext<'a> {
    pub(crate) fn new(entities: &'a mut EntityStore, tracked: &'a [EntityId]) -> Self {
        Self { entities, tracked }
    }

    pub fn tracked(&self) -> &'a [EntityId] {
        self.tracked
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Run `f` on every tracked entity that is still alive
    pub fn for_each_tracked(&mut self, mut f: impl FnMut(&mut Entity)) {
        for id in self.tracked {
            if let Some(entity) = self.entities.get_mut(*id) {
                f(entity);
            }
        }
    }
}
