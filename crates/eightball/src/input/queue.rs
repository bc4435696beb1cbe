/// Custom event kinds sent by the host UI.
pub mod custom {
    /// Restart button pressed.
    pub const RESTART: u32 = 1;
}

/// Input events the table understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Relative pointer motion since the last event (axis units).
    PointerDelta { dx: f32, dy: f32 },
    /// Press-down edge of the primary action (mouse button / tap).
    PrimaryDown,
    /// A custom event from the UI layer (restart button, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Per-tick view of the queue: the two continuous axes summed, primary
/// presses counted so none are lost, restart as a flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub dx: f32,
    pub dy: f32,
    pub primary_presses: u32,
    pub restart: bool,
}

/// A queue of input events.
/// The host pushes events; the match reads them once per frame and the
/// runner drains them afterwards.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Collapse pending events into a single frame.
    pub fn frame(&self) -> InputFrame {
        self.events
            .iter()
            .fold(InputFrame::default(), |mut frame, event| {
                match *event {
                    InputEvent::PointerDelta { dx, dy } => {
                        frame.dx += dx;
                        frame.dy += dy;
                    }
                    InputEvent::PrimaryDown => frame.primary_presses += 1,
                    InputEvent::Custom { kind, .. } if kind == custom::RESTART => {
                        frame.restart = true;
                    }
                    InputEvent::Custom { .. } => {}
                }
                frame
            })
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDelta { dx: 1.0, dy: 0.0 });
        q.push(InputEvent::PrimaryDown);
        assert_eq!(q.len(), 2);
        assert_eq!(q.drain().len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn frame_sums_axes_and_flags_edges() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDelta { dx: 1.0, dy: -0.5 });
        q.push(InputEvent::PointerDelta { dx: 2.0, dy: -0.25 });
        q.push(InputEvent::PrimaryDown);
        let frame = q.frame();
        assert_eq!(frame.dx, 3.0);
        assert_eq!(frame.dy, -0.75);
        assert_eq!(frame.primary_presses, 1);
        assert!(!frame.restart);
    }

    #[test]
    fn every_press_is_counted() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PrimaryDown);
        q.push(InputEvent::PointerDelta { dx: 0.0, dy: -1.0 });
        q.push(InputEvent::PrimaryDown);
        assert_eq!(q.frame().primary_presses, 2);
    }

    #[test]
    fn restart_is_a_custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 42, a: 0.0, b: 0.0, c: 0.0 });
        assert!(!q.frame().restart);
        q.push(InputEvent::Custom { kind: custom::RESTART, a: 0.0, b: 0.0, c: 0.0 });
        assert!(q.frame().restart);
    }
}
