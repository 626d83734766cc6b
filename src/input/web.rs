//! DOM event adapters for wasm hosts.
//!
//! Listeners registered by the host translate browser events into
//! [`InputEvent`]s with these helpers. Mouse and touch positions are both
//! client coordinates, so a drag that leaves the surface keeps one frame of
//! reference. Hosts whose surface is not at the page origin subtract its
//! bounding rect origin.

use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent, MouseEvent, TouchEvent, TouchList, WheelEvent};

use super::event::{InputEvent, MouseButton};

fn button(event: &MouseEvent) -> MouseButton {
    match event.button() {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

fn client(event: &MouseEvent) -> (f64, f64) {
    (f64::from(event.client_x()), f64::from(event.client_y()))
}

fn points(list: &TouchList) -> Vec<DVec2> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|touch| {
            DVec2::new(f64::from(touch.client_x()), f64::from(touch.client_y()))
        })
        .collect()
}

/// `mousedown` → [`InputEvent::PointerDown`].
#[must_use]
pub fn pointer_down(event: &MouseEvent) -> InputEvent {
    let (x, y) = client(event);
    InputEvent::PointerDown {
        button: button(event),
        x,
        y,
    }
}

/// `mousemove` → [`InputEvent::PointerMove`].
#[must_use]
pub fn pointer_move(event: &MouseEvent) -> InputEvent {
    let (x, y) = client(event);
    InputEvent::PointerMove { x, y }
}

/// `mouseup` (listen on the window) → [`InputEvent::PointerUp`].
#[must_use]
pub fn pointer_up(event: &MouseEvent) -> InputEvent {
    let (x, y) = client(event);
    InputEvent::PointerUp {
        button: button(event),
        x,
        y,
    }
}

/// `wheel` → [`InputEvent::Wheel`].
#[must_use]
pub fn wheel(event: &WheelEvent) -> InputEvent {
    InputEvent::Wheel {
        delta_y: event.delta_y(),
        ctrl: event.ctrl_key(),
    }
}

/// `keydown` → [`InputEvent::KeyDown`].
#[must_use]
pub fn key_down(event: &KeyboardEvent) -> InputEvent {
    InputEvent::KeyDown { key: event.key() }
}

/// `keyup` → [`InputEvent::KeyUp`].
#[must_use]
pub fn key_up(event: &KeyboardEvent) -> InputEvent {
    InputEvent::KeyUp { key: event.key() }
}

/// `touchstart` / `touchmove` / `touchend` / `touchcancel` → the matching
/// touch event. `None` for any other event type.
#[must_use]
pub fn touch(event: &TouchEvent) -> Option<InputEvent> {
    let touches = points(&event.touches());
    Some(match event.type_().as_str() {
        "touchstart" => InputEvent::TouchStart { touches },
        "touchmove" => InputEvent::TouchMove { touches },
        "touchend" => InputEvent::TouchEnd {
            touches,
            changed: points(&event.changed_touches()),
        },
        "touchcancel" => InputEvent::TouchCancel,
        _ => return None,
    })
}

/// Translate any supported DOM event by its type. Lets a host register one
/// closure for every listener.
#[must_use]
pub fn from_event(event: &Event) -> Option<InputEvent> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        return touch(touch_event);
    }
    if let Some(wheel_event) = event.dyn_ref::<WheelEvent>() {
        return Some(wheel(wheel_event));
    }
    if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
        return match event.type_().as_str() {
            "keydown" => Some(key_down(key_event)),
            "keyup" => Some(key_up(key_event)),
            _ => None,
        };
    }
    let mouse_event = event.dyn_ref::<MouseEvent>()?;
    match event.type_().as_str() {
        "mousedown" => Some(pointer_down(mouse_event)),
        "mousemove" => Some(pointer_move(mouse_event)),
        "mouseup" => Some(pointer_up(mouse_event)),
        _ => None,
    }
}
