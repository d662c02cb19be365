use super::{Component, ComponentKind, Entity, EntityId, EntityStore, System, SystemContext};
use crate::error::{EngineError, EngineResult};

/// A registered system and the entities it currently tracks
struct SystemEntry {
    system: Box<dyn System>,
    tracked: Vec<EntityId>,
}

/// The ECS world that manages entities and the ordered system pipeline
///
/// Membership is only recomputed on `add_system`, `on_entity_changed` and
/// `remove_entity`. Callers that attach or detach components must call
/// `on_entity_changed` afterwards.
pub struct World {
    entities: EntityStore,
    systems: Vec<SystemEntry>,
    next_entity_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityStore::new(),
            systems: Vec::new(),
            next_entity_id: 1,
        }
    }

    /// Create a new entity with a unique, monotonically increasing id
    pub fn create_entity(&mut self) -> &mut Entity {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(Entity::new(id))
    }

    /// Remove an entity, notifying every system that tracks it
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.get_mut(id)?;

        for entry in self.systems.iter_mut() {
            if let Some(index) = entry.tracked.iter().position(|tracked| *tracked == id) {
                entry.tracked.remove(index);
                entry.system.on_entity_removed(entity);
            }
        }

        log::debug!("[ECS] Removed entity {}", id);
        self.entities.remove(id)
    }

    /// Append a system to the pipeline and back-fill its tracked set
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let mut entry = SystemEntry {
            system: Box::new(system),
            tracked: Vec::new(),
        };

        let matching: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entity| entry.system.matches(entity))
            .map(Entity::id)
            .collect();

        for id in matching {
            if let Some(entity) = self.entities.get_mut(id) {
                entry.tracked.push(id);
                entry.system.on_entity_added(entity);
            }
        }

        log::debug!(
            "[ECS] Registered system '{}' ({} existing entities matched)",
            entry.system.name(),
            entry.tracked.len()
        );
        self.systems.push(entry);
    }

    /// Recompute system membership for an entity after its components changed
    ///
    /// Only transitions fire notifications.
    pub fn on_entity_changed(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(id) else {
            log::debug!("[ECS] Ignoring change notification for missing entity {}", id);
            return;
        };

        for entry in self.systems.iter_mut() {
            let position = entry.tracked.iter().position(|tracked| *tracked == id);
            let should_track = entry.system.matches(entity);

            match (position, should_track) {
                (None, true) => {
                    entry.tracked.push(id);
                    entry.system.on_entity_added(entity);
                    log::debug!("[ECS] {} joined '{}'", id, entry.system.name());
                }
                (Some(index), false) => {
                    entry.tracked.remove(index);
                    entry.system.on_entity_removed(entity);
                    log::debug!("[ECS] {} left '{}'", id, entry.system.name());
                }
                _ => {}
            }
        }
    }

    /// Run one frame: `update` on every system in registration order,
    /// then `end_frame` on every system in registration order
    pub fn update(&mut self, delta_time: f32) {
        for entry in self.systems.iter_mut() {
            let mut ctx = SystemContext::new(&mut self.entities, &entry.tracked);
            entry.system.update(&mut ctx, delta_time);
        }

        for entry in self.systems.iter_mut() {
            let mut ctx = SystemContext::new(&mut self.entities, &entry.tracked);
            entry.system.end_frame(&mut ctx);
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Look up a component for a caller that cannot proceed without it
    pub fn component<C: Component>(&self, id: EntityId) -> EngineResult<&C> {
        let entity = self.entities.get(id).ok_or(EngineError::UnknownEntity { id })?;
        entity.get::<C>().ok_or(EngineError::MissingComponent {
            entity: id,
            component: C::kind(),
        })
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Get all live entities carrying every listed component kind
    pub fn get_entities_with(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|entity| entity.has_all(kinds))
            .map(Entity::id)
            .collect()
    }

    /// Tracked entities of the first system registered under `name`
    pub fn tracked(&self, name: &str) -> Option<&[EntityId]> {
        self.systems
            .iter()
            .find(|entry| entry.system.name() == name)
            .map(|entry| entry.tracked.as_slice())
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|entry| entry.system.name()).collect()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Marker;
    impl Component for Marker {
        const NAME: &'static str = "Marker";
    }

    struct Other;
    impl Component for Other {
        const NAME: &'static str = "Other";
    }

    /// Records lifecycle events and the order of update calls
    struct Watcher {
        name: &'static str,
        required: Vec<ComponentKind>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl System for Watcher {
        fn name(&self) -> &str {
            self.name
        }

        fn required_components(&self) -> &[ComponentKind] {
            &self.required
        }

        fn on_entity_added(&mut self, entity: &mut Entity) {
            self.log.borrow_mut().push(format!("{}+{}", self.name, entity.id().0));
        }

        fn on_entity_removed(&mut self, entity: &mut Entity) {
            self.log.borrow_mut().push(format!("{}-{}", self.name, entity.id().0));
        }

        fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) {
            self.log
                .borrow_mut()
                .push(format!("{}:update:{}", self.name, ctx.tracked().len()));
        }

        fn end_frame(&mut self, _ctx: &mut SystemContext<'_>) {
            self.log.borrow_mut().push(format!("{}:end", self.name));
        }
    }

    fn watcher(name: &'static str, required: Vec<ComponentKind>, log: &Rc<RefCell<Vec<String>>>) -> Watcher {
        Watcher {
            name,
            required,
            log: log.clone(),
        }
    }

    #[test]
    fn test_entity_ids_are_unique_and_increasing() {
        let mut world = World::new();
        let a = world.create_entity().id();
        let b = world.create_entity().id();
        world.remove_entity(a);
        let c = world.create_entity().id();

        assert!(a < b && b < c);
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_on_entity_changed_is_edge_triggered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.add_system(watcher("p", vec![Marker::kind()], &log));

        let id = world.create_entity().attach(Marker).id();
        world.on_entity_changed(id);
        world.on_entity_changed(id);
        assert_eq!(*log.borrow(), vec!["p+1".to_string()]);

        if let Some(entity) = world.entity_mut(id) {
            entity.detach::<Marker>();
        }
        world.on_entity_changed(id);
        world.on_entity_changed(id);
        assert_eq!(*log.borrow(), vec!["p+1".to_string(), "p-1".to_string()]);
        assert_eq!(world.tracked("p").map(<[EntityId]>::len), Some(0));
    }

    #[test]
    fn test_empty_requirement_set_tracks_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.add_system(watcher("empty", Vec::new(), &log));
        let id = world.create_entity().attach(Marker).id();
        world.on_entity_changed(id);

        assert_eq!(world.tracked("empty").map(<[EntityId]>::len), Some(0));
    }

    #[test]
    fn test_update_order_and_end_frame_pass() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.add_system(watcher("a", vec![Marker::kind()], &log));
        world.add_system(watcher("b", vec![Other::kind()], &log));

        world.update(0.016);

        assert_eq!(
            *log.borrow(),
            vec!["a:update:0", "b:update:0", "a:end", "b:end"]
        );
    }

    #[test]
    fn test_change_notification_for_missing_entity_is_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.add_system(watcher("p", vec![Marker::kind()], &log));
        world.on_entity_changed(EntityId(42));
        assert!(log.borrow().is_empty());
        assert!(world.remove_entity(EntityId(42)).is_none());
    }

    #[test]
    fn test_component_lookup_reports_stale_and_missing() {
        let mut world = World::new();
        let id = world.create_entity().attach(Marker).id();

        assert!(world.component::<Marker>(id).is_ok());
        assert!(matches!(
            world.component::<Other>(id),
            Err(EngineError::MissingComponent { entity, .. }) if entity == id
        ));

        world.remove_entity(id);
        assert!(matches!(world.component::<Marker>(id), Err(EngineError::UnknownEntity { .. })));
    }
}
