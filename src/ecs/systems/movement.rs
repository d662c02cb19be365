use glam::Vec3;

use crate::camera::rotate_by_yaw;
use crate::ecs::{Component, ComponentKind, InputState, KeyboardState, Movement, System, SystemContext, Transform};
use crate::error::contract_violation;

/// Input-space direction: forward -Z, back +Z, left -X, right +X
/// Pure function - unit length whenever any flag is set, zero otherwise
///
/// Opposing keys do not cancel; back wins over forward and right over left.
pub fn local_direction(keyboard: &KeyboardState) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.forward {
        direction.z = -1.0;
    }
    if keyboard.back {
        direction.z = 1.0;
    }
    if keyboard.left {
        direction.x = -1.0;
    }
    if keyboard.right {
        direction.x = 1.0;
    }
    direction.normalize_or_zero()
}

/// Advance one entity's movement state by a frame
///
/// Direction only changes while a key is held, so a released character
/// keeps decelerating along its last heading.
pub fn resolve_movement(movement: &mut Movement, keyboard: &KeyboardState, delta_time: f32, deadband: f32) {
    let local = local_direction(keyboard);

    if local != Vec3::ZERO {
        let multiplier = if keyboard.sprint { movement.sprint_multiplier } else { 1.0 };
        movement.target_speed = movement.move_speed * multiplier;
        movement.local_direction = local;
        movement.direction = rotate_by_yaw(local, movement.reference_yaw);
    } else {
        movement.target_speed = 0.0;
    }

    if movement.current_speed < movement.target_speed {
        movement.current_speed =
            (movement.current_speed + movement.acceleration_speed * delta_time).min(movement.target_speed);
    } else if movement.current_speed > movement.target_speed {
        movement.current_speed =
            (movement.current_speed - movement.deceleration_speed * delta_time).max(movement.target_speed);
    }

    movement.velocity = if movement.current_speed > deadband {
        movement.direction * movement.current_speed * delta_time
    } else {
        Vec3::ZERO
    };
}

/// Turns held keys into a smoothed speed, a direction and this frame's displacement
pub struct MovementSystem {
    deadband: f32,
    required: [ComponentKind; 3],
}

impl MovementSystem {
    pub fn new(deadband: f32) -> Self {
        Self {
            deadband,
            required: [Transform::kind(), Movement::kind(), InputState::kind()],
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new(crate::constants::movement::SPEED_DEADBAND)
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        let deadband = self.deadband;
        ctx.for_each_tracked(|entity| {
            let id = entity.id();
            let Some(keyboard) = entity.get::<InputState>().map(|input| input.keyboard) else {
                contract_violation("movement", id, InputState::kind());
                return;
            };
            match entity.get_mut::<Movement>() {
                Some(movement) => resolve_movement(movement, &keyboard, delta_time, deadband),
                None => contract_violation("movement", id, Movement::kind()),
            }
        });
    }
}
