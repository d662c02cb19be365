use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use winit::event::{ElementState, MouseScrollDelta};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;

use crate::constants::input::WHEEL_LINE_PIXELS;
use crate::ecs::{InputState, KeyboardState};

/// Raw device event, already reduced to what the pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Relative pointer motion in pixels
    MouseMove { dx: f32, dy: f32 },
    /// Wheel delta in pixels, positive scrolls down (zooms out)
    Wheel { delta_y: f32 },
    /// Exclusive pointer capture was granted or released
    PointerCapture(bool),
    /// Click on the render surface
    Click,
}

/// What the host should do with an event after it has been queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Default,
    /// Suppress the platform default (page scroll)
    PreventDefault,
    /// Ask the platform for exclusive pointer capture
    RequestPointerCapture,
}

impl InputEvent {
    /// Translate a winit keyboard event
    pub fn from_winit_key(key: PhysicalKey, state: ElementState) -> Option<Self> {
        match key {
            PhysicalKey::Code(code) => Some(match state {
                ElementState::Pressed => InputEvent::KeyDown(code),
                ElementState::Released => InputEvent::KeyUp(code),
            }),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    /// Translate a winit wheel event into browser-style pixel deltas
    pub fn from_winit_scroll(delta: MouseScrollDelta) -> Self {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PIXELS,
            MouseScrollDelta::PixelDelta(position) => -position.y as f32,
        };
        InputEvent::Wheel { delta_y }
    }

    /// Translate raw device motion (`DeviceEvent::MouseMotion`)
    pub fn from_mouse_motion(delta: (f64, f64)) -> Self {
        InputEvent::MouseMove {
            dx: delta.0 as f32,
            dy: delta.1 as f32,
        }
    }

    /// Translate a DOM `KeyboardEvent.code` string
    pub fn from_dom_key(code: &str, pressed: bool) -> Option<Self> {
        let key = key_code_from_dom(code)?;
        Some(if pressed {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        })
    }
}

/// Map a DOM `KeyboardEvent.code` onto a physical key code
pub fn key_code_from_dom(code: &str) -> Option<KeyCode> {
    let key = match code {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        _ => return None,
    };
    Some(key)
}

/// Logical action a physical key drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
}

/// Physical key layout: WASD plus either shift
pub fn key_binding(key: KeyCode) -> Option<KeyBinding> {
    match key {
        KeyCode::KeyW => Some(KeyBinding::Forward),
        KeyCode::KeyS => Some(KeyBinding::Back),
        KeyCode::KeyA => Some(KeyBinding::Left),
        KeyCode::KeyD => Some(KeyBinding::Right),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(KeyBinding::Sprint),
        _ => None,
    }
}

pub fn apply_key(keyboard: &mut KeyboardState, key: KeyCode, pressed: bool) {
    match key_binding(key) {
        Some(KeyBinding::Forward) => keyboard.forward = pressed,
        Some(KeyBinding::Back) => keyboard.back = pressed,
        Some(KeyBinding::Left) => keyboard.left = pressed,
        Some(KeyBinding::Right) => keyboard.right = pressed,
        Some(KeyBinding::Sprint) => keyboard.sprint = pressed,
        None => {}
    }
}

/// Fold one event into an entity's input snapshot
///
/// Mouse deltas accumulate until the end-of-frame reset. Motion is dropped
/// unless the pointer is captured; wheel input is always accepted.
pub fn apply_event(input: &mut InputState, event: &InputEvent, pointer_captured: bool) {
    match *event {
        InputEvent::KeyDown(key) => apply_key(&mut input.keyboard, key, true),
        InputEvent::KeyUp(key) => apply_key(&mut input.keyboard, key, false),
        InputEvent::MouseMove { dx, dy } => {
            if pointer_captured {
                input.mouse.movement_x += dx;
                input.mouse.movement_y += dy;
            }
        }
        InputEvent::Wheel { delta_y } => input.mouse.wheel_delta_y += delta_y,
        InputEvent::PointerCapture(_) | InputEvent::Click => {}
    }
}

#[derive(Debug, Default)]
struct QueueState {
    events: VecDeque<InputEvent>,
}

/// Event queue shared between the host's event callbacks and the input system
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    state: Rc<RefCell<QueueState>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next frame
    pub fn push(&self, event: InputEvent) -> EventResponse {
        self.state.borrow_mut().events.push_back(event);
        match event {
            InputEvent::Wheel { .. } => EventResponse::PreventDefault,
            InputEvent::Click => EventResponse::RequestPointerCapture,
            _ => EventResponse::Default,
        }
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<InputEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut keyboard = KeyboardState::default();
        apply_key(&mut keyboard, KeyCode::KeyW, true);
        apply_key(&mut keyboard, KeyCode::ShiftRight, true);
        apply_key(&mut keyboard, KeyCode::KeyQ, true);
        assert!(keyboard.forward && keyboard.sprint);
        assert!(!keyboard.back && !keyboard.left && !keyboard.right);

        apply_key(&mut keyboard, KeyCode::ShiftRight, false);
        assert!(!keyboard.sprint);
    }

    #[test]
    fn test_mouse_motion_requires_capture() {
        let mut input = InputState::default();
        let motion = InputEvent::MouseMove { dx: 4.0, dy: -2.0 };

        apply_event(&mut input, &motion, false);
        assert!(!input.mouse.has_movement());

        apply_event(&mut input, &motion, true);
        apply_event(&mut input, &motion, true);
        assert_eq!(input.mouse.movement_x, 8.0);
        assert_eq!(input.mouse.movement_y, -4.0);
    }

    #[test]
    fn test_wheel_always_accepted() {
        let mut input = InputState::default();
        apply_event(&mut input, &InputEvent::Wheel { delta_y: 120.0 }, false);
        assert_eq!(input.mouse.wheel_delta_y, 120.0);
    }

    #[test]
    fn test_queue_responses() {
        let queue = InputQueue::new();
        let handle = queue.clone();

        assert_eq!(handle.push(InputEvent::Wheel { delta_y: 1.0 }), EventResponse::PreventDefault);
        assert_eq!(handle.push(InputEvent::Click), EventResponse::RequestPointerCapture);
        assert_eq!(handle.push(InputEvent::KeyDown(KeyCode::KeyA)), EventResponse::Default);

        assert_eq!(queue.len(), 3);
        let drained = queue.drain();
        assert_eq!(drained[1], InputEvent::Click);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dom_and_winit_translation() {
        assert_eq!(
            InputEvent::from_dom_key("KeyD", true),
            Some(InputEvent::KeyDown(KeyCode::KeyD))
        );
        assert_eq!(InputEvent::from_dom_key("Space", true), None);
        assert_eq!(
            InputEvent::from_winit_key(PhysicalKey::Code(KeyCode::ShiftLeft), ElementState::Released),
            Some(InputEvent::KeyUp(KeyCode::ShiftLeft))
        );
        assert_eq!(
            InputEvent::from_winit_scroll(MouseScrollDelta::LineDelta(0.0, -1.0)),
            InputEvent::Wheel { delta_y: 100.0 }
        );
    }
}
