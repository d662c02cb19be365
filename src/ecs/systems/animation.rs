use crate::animation::{smooth_weights, target_weights, BlendThresholds, LocomotionClip};
use crate::config::AnimationConfig;
use crate::ecs::{AnimationState, Component, ComponentKind, InputState, Movement, System, SystemContext};
use crate::error::contract_violation;

/// Blends idle, walk and run by current speed
///
/// `AnimationState::weights` is authoritative; the mixer actions receive a
/// copy of it every frame.
pub struct AnimationSystem {
    config: AnimationConfig,
    required: [ComponentKind; 2],
}

impl AnimationSystem {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            required: [AnimationState::kind(), Movement::kind()],
        }
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &str {
        "animation"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        let config = &self.config;
        ctx.for_each_tracked(|entity| {
            let id = entity.id();
            let Some(movement) = entity.get::<Movement>().copied() else {
                contract_violation("animation", id, Movement::kind());
                return;
            };
            // Sprint is optional: entities without input never blend into run
            let sprint = entity
                .get::<InputState>()
                .map_or(false, |input| input.keyboard.sprint);

            let Some(AnimationState { mixer, actions, weights }) = entity.get_mut::<AnimationState>() else {
                contract_violation("animation", id, AnimationState::kind());
                return;
            };

            if let Some(mixer) = mixer.as_mut() {
                mixer.advance(delta_time);
            }

            let thresholds = BlendThresholds::new(
                config.walk_start_speed,
                movement.move_speed,
                movement.sprint_multiplier,
            );
            let target = target_weights(movement.current_speed, sprint, &thresholds);
            *weights = smooth_weights(*weights, target, config.smoothing_speed, delta_time);

            if let Some(mixer) = mixer.as_mut() {
                for clip in LocomotionClip::ALL {
                    if let Some(action) = actions.get(&clip) {
                        mixer.set_effective_weight(*action, weights.get(clip));
                    }
                }
            }
        });
    }
}
