//! Host input as plain messages. Event listeners only enqueue; the frame
//! drains the queue at one fixed point so ordering is deterministic.

use glam::Vec2;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Window resized to `width` x `height` CSS pixels.
    Resize {
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    },
    /// Cursor position in CSS pixels relative to the viewport.
    PointerMove { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerUp,
    Wheel { delta_y: f32 },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn push(&mut self, ev: InputEvent) {
        self.pending.push_back(ev);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes everything queued so far, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }
}

/// Last known cursor, kept both in CSS pixels and in NDC.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub client: Vec2,
    pub ndc: Vec2,
    pub down: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order_and_empties() {
        let mut q = EventQueue::default();
        q.push(InputEvent::PointerMove { x: 1.0, y: 2.0 });
        q.push(InputEvent::PointerUp);
        q.push(InputEvent::Wheel { delta_y: -1.0 });
        assert_eq!(q.len(), 3);
        let got: Vec<_> = q.drain().collect();
        assert_eq!(got[0], InputEvent::PointerMove { x: 1.0, y: 2.0 });
        assert_eq!(got[2], InputEvent::Wheel { delta_y: -1.0 });
        assert!(q.is_empty());
    }
}
