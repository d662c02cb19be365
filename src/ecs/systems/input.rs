use crate::ecs::{Component, ComponentKind, InputState, System, SystemContext};
use crate::error::contract_violation;
use crate::input::{apply_event, InputEvent, InputQueue};

/// Folds queued device events into every tracked `InputState`
///
/// Events are registered once, through the queue handed out at construction.
/// Mouse deltas are zeroed in `end_frame`, after the camera has read them.
pub struct InputSystem {
    queue: InputQueue,
    pointer_captured: bool,
    required: [ComponentKind; 1],
}

impl InputSystem {
    pub fn new() -> Self {
        Self::with_queue(InputQueue::new())
    }

    pub fn with_queue(queue: InputQueue) -> Self {
        Self {
            queue,
            pointer_captured: false,
            required: [InputState::kind()],
        }
    }

    /// Another handle to the event queue this system drains
    pub fn queue(&self) -> InputQueue {
        self.queue.clone()
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for InputSystem {
    fn name(&self) -> &str {
        "input"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) {
        for event in self.queue.drain() {
            if let InputEvent::PointerCapture(captured) = event {
                if captured != self.pointer_captured {
                    log::debug!("[INPUT] Pointer capture {}", if captured { "acquired" } else { "released" });
                }
                self.pointer_captured = captured;
                continue;
            }

            let captured = self.pointer_captured;
            ctx.for_each_tracked(|entity| {
                let id = entity.id();
                match entity.get_mut::<InputState>() {
                    Some(input) => apply_event(input, &event, captured),
                    None => contract_violation("input", id, InputState::kind()),
                }
            });
        }
    }

    fn end_frame(&mut self, ctx: &mut SystemContext<'_>) {
        ctx.for_each_tracked(|entity| {
            if let Some(input) = entity.get_mut::<InputState>() {
                input.reset_mouse();
            }
        });
    }
}
