//! Pointer input for the viewport.
//!
//! Platform callbacks feed [`PointerInput`], which turns raw button, motion
//! and scroll input into [`ViewportEvent`]s. A press and release of the left
//! button that stay within a few pixels also produce a `Click`.

use serde::{Deserialize, Serialize};

use crate::projection::ScreenPoint;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button. Drags and clicks.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// One viewport interaction, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewportEvent {
    /// Primary button pressed.
    PointerDown {
        /// Pointer X.
        x: f64,
        /// Pointer Y.
        y: f64,
    },
    /// Pointer moved.
    PointerMove {
        /// Pointer X.
        x: f64,
        /// Pointer Y.
        y: f64,
    },
    /// Primary button released.
    PointerUp {
        /// Pointer X.
        x: f64,
        /// Pointer Y.
        y: f64,
    },
    /// Pointer left the canvas.
    PointerLeave,
    /// Wheel scrolled. Negative is away from the user.
    Wheel {
        /// Vertical scroll amount.
        delta_y: f64,
    },
    /// Primary button clicked without dragging.
    Click {
        /// Pointer X.
        x: f64,
        /// Pointer Y.
        y: f64,
    },
}

impl ViewportEvent {
    /// Screen position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<ScreenPoint> {
        match *self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Click { x, y } => Some(ScreenPoint::new(x, y)),
            Self::PointerLeave | Self::Wheel { .. } => None,
        }
    }
}

/// Raw input collected between frames.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    /// Current pointer position.
    pub mouse: ScreenPoint,
    /// Mouse buttons currently held.
    buttons_down: u8,
    /// Where the left button went down.
    press_pos: Option<ScreenPoint>,
    /// Events not yet drained.
    events: Vec<ViewportEvent>,
}

impl PointerInput {
    /// Press/release distance (pixels) still counted as a click.
    pub const CLICK_DISTANCE: f64 = 5.0;

    /// Creates an empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the pointer position.
    pub fn set_mouse_pos(&mut self, x: f64, y: f64) {
        if self.mouse == ScreenPoint::new(x, y) {
            return;
        }
        self.mouse = ScreenPoint::new(x, y);
        self.events.push(ViewportEvent::PointerMove { x, y });
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        let was_down = self.buttons_down & mask != 0;
        self.buttons_down |= mask;

        if button == MouseButton::Left && !was_down {
            self.press_pos = Some(self.mouse);
            self.events.push(ViewportEvent::PointerDown {
                x: self.mouse.x,
                y: self.mouse.y,
            });
        }
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        let was_down = self.buttons_down & mask != 0;
        self.buttons_down &= !mask;

        if button != MouseButton::Left || !was_down {
            return;
        }
        let ScreenPoint { x, y } = self.mouse;
        self.events.push(ViewportEvent::PointerUp { x, y });

        if let Some(press) = self.press_pos.take() {
            let distance = (x - press.x).hypot(y - press.y);
            if distance <= Self::CLICK_DISTANCE {
                self.events.push(ViewportEvent::Click { x, y });
            }
        }
    }

    /// Records the pointer leaving the canvas. Releases every button.
    pub fn leave(&mut self) {
        self.buttons_down = 0;
        self.press_pos = None;
        self.events.push(ViewportEvent::PointerLeave);
    }

    /// Records vertical scroll input.
    pub fn scroll(&mut self, delta_y: f64) {
        if delta_y != 0.0 {
            self.events.push(ViewportEvent::Wheel { delta_y });
        }
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Number of events waiting to be drained.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_click() {
        let mut input = PointerInput::new();
        input.set_mouse_pos(10.0, 20.0);
        input.mouse_button_down(MouseButton::Left);
        assert!(input.mouse_down(MouseButton::Left));

        input.set_mouse_pos(12.0, 21.0);
        input.mouse_button_up(MouseButton::Left);
        assert!(!input.mouse_down(MouseButton::Left));

        assert_eq!(
            input.drain(),
            vec![
                ViewportEvent::PointerMove { x: 10.0, y: 20.0 },
                ViewportEvent::PointerDown { x: 10.0, y: 20.0 },
                ViewportEvent::PointerMove { x: 12.0, y: 21.0 },
                ViewportEvent::PointerUp { x: 12.0, y: 21.0 },
                ViewportEvent::Click { x: 12.0, y: 21.0 },
            ]
        );
        assert_eq!(input.pending(), 0);
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut input = PointerInput::new();
        input.mouse_button_down(MouseButton::Left);
        input.set_mouse_pos(40.0, 0.0);
        input.mouse_button_up(MouseButton::Left);

        let events = input.drain();
        assert!(!events.iter().any(|e| matches!(e, ViewportEvent::Click { .. })));
        assert_eq!(events.last(), Some(&ViewportEvent::PointerUp { x: 40.0, y: 0.0 }));
    }

    #[test]
    fn test_other_buttons_do_not_drag() {
        let mut input = PointerInput::new();
        input.mouse_button_down(MouseButton::Right);
        input.mouse_button_up(MouseButton::Right);
        input.mouse_button_down(MouseButton::Middle);
        assert!(input.mouse_down(MouseButton::Middle));
        assert!(input.drain().is_empty());
    }

    #[test]
    fn test_leave_releases_buttons() {
        let mut input = PointerInput::new();
        input.mouse_button_down(MouseButton::Left);
        input.leave();
        assert!(!input.mouse_down(MouseButton::Left));

        input.mouse_button_up(MouseButton::Left);
        assert_eq!(
            input.drain(),
            vec![
                ViewportEvent::PointerDown { x: 0.0, y: 0.0 },
                ViewportEvent::PointerLeave,
            ]
        );
    }

    #[test]
    fn test_scroll_skips_zero() {
        let mut input = PointerInput::new();
        input.scroll(0.0);
        input.scroll(-3.0);
        assert_eq!(input.drain(), vec![ViewportEvent::Wheel { delta_y: -3.0 }]);
    }

    #[test]
    fn test_event_position() {
        assert_eq!(
            ViewportEvent::Click { x: 1.0, y: 2.0 }.position(),
            Some(ScreenPoint::new(1.0, 2.0))
        );
        assert_eq!(ViewportEvent::Wheel { delta_y: 1.0 }.position(), None);
    }
}
