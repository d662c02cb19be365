// Stride Engine ECS World Integration Tests
//
// Membership bookkeeping across several systems: back-fill on registration,
// edge-triggered change notifications and removal callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use stride_engine::ecs::{Component, ComponentKind, Entity, EntityId, Movement, System, SystemContext, Transform, World};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every callback it receives
struct Recorder {
    name: &'static str,
    required: Vec<ComponentKind>,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, required: Vec<ComponentKind>, log: &Log) -> Self {
        Self {
            name,
            required,
            log: log.clone(),
        }
    }
}

impl System for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn on_entity_added(&mut self, entity: &mut Entity) {
        self.log.borrow_mut().push(format!("{}+{}", self.name, entity.id()));
    }

    fn on_entity_removed(&mut self, entity: &mut Entity) {
        self.log.borrow_mut().push(format!("{}-{}", self.name, entity.id()));
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) {
        let count = ctx.tracked().len();
        self.log.borrow_mut().push(format!("{} update {}", self.name, count));
    }
}

fn spawn(world: &mut World, movement: bool) -> EntityId {
    let entity = world.create_entity().attach(Transform::default());
    if movement {
        entity.attach(Movement::default());
    }
    let id = entity.id();
    world.on_entity_changed(id);
    id
}

#[test]
fn test_removal_notifies_every_tracking_system() {
    println!("🧪 Testing removal across systems...");
    let log = Log::default();
    let mut world = World::new();
    world.add_system(Recorder::new("spatial", vec![Transform::kind()], &log));
    world.add_system(Recorder::new("motion", vec![Transform::kind(), Movement::kind()], &log));

    let id = spawn(&mut world, true);
    log.borrow_mut().clear();

    let removed = world.remove_entity(id);

    assert!(removed.is_some());
    assert!(!world.contains(id));
    let expected = vec![format!("spatial-{}", id), format!("motion-{}", id)];
    assert_eq!(*log.borrow(), expected);
    assert_eq!(world.tracked("spatial").map(<[EntityId]>::len), Some(0));
    assert_eq!(world.tracked("motion").map(<[EntityId]>::len), Some(0));
    assert!(world.get_entities_with(&[Transform::kind(), Movement::kind()]).is_empty());
    assert!(!world.get_entities_with(&[Transform::kind()]).contains(&id));

    // Second removal is a no-op
    assert!(world.remove_entity(id).is_none());
    assert_eq!(log.borrow().len(), 2);
    println!("✅ Removal callbacks fired once per system");
}

#[test]
fn test_late_system_back_fills_existing_entities() {
    let log = Log::default();
    let mut world = World::new();
    let mover = spawn(&mut world, true);
    let statue = spawn(&mut world, false);

    world.add_system(Recorder::new("motion", vec![Transform::kind(), Movement::kind()], &log));

    assert_eq!(world.tracked("motion"), Some(&[mover][..]));
    assert_eq!(*log.borrow(), vec![format!("motion+{}", mover)]);
    assert!(world.contains(statue));
}

#[test]
fn test_detach_then_reattach_moves_membership() {
    let log = Log::default();
    let mut world = World::new();
    world.add_system(Recorder::new("motion", vec![Transform::kind(), Movement::kind()], &log));
    let id = spawn(&mut world, true);

    if let Some(entity) = world.entity_mut(id) {
        entity.detach::<Movement>();
    }
    world.on_entity_changed(id);
    // Unchanged membership fires nothing
    world.on_entity_changed(id);

    if let Some(entity) = world.entity_mut(id) {
        entity.attach(Movement::default());
    }
    world.on_entity_changed(id);

    assert_eq!(
        *log.borrow(),
        vec![format!("motion+{}", id), format!("motion-{}", id), format!("motion+{}", id)]
    );
}

#[test]
fn test_get_entities_with_queries_live_components() {
    let mut world = World::new();
    let a = spawn(&mut world, true);
    let b = spawn(&mut world, false);
    let c = spawn(&mut world, true);

    let mut movers = world.get_entities_with(&[Transform::kind(), Movement::kind()]);
    movers.sort();
    assert_eq!(movers, vec![a, c]);

    let mut placed = world.get_entities_with(&[Transform::kind()]);
    placed.sort();
    assert_eq!(placed, vec![a, b, c]);
    assert_eq!(world.entity_count(), 3);
}

#[test]
fn test_update_sees_tracked_counts_in_order() {
    let log = Log::default();
    let mut world = World::new();
    world.add_system(Recorder::new("spatial", vec![Transform::kind()], &log));
    world.add_system(Recorder::new("motion", vec![Transform::kind(), Movement::kind()], &log));
    spawn(&mut world, true);
    spawn(&mut world, false);
    log.borrow_mut().clear();

    world.update(1.0 / 60.0);

    assert_eq!(*log.borrow(), vec!["spatial update 2".to_string(), "motion update 1".to_string()]);
}
