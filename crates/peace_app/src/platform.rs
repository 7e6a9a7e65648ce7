use std::collections::VecDeque;

use peace_core::{KeyCode, MouseButton};

/// Window-system event, already translated out of the backend's types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    Quit,
    Key { key: KeyCode, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    /// Cursor position in window pixels, origin top-left.
    MouseMoved { x: f32, y: f32 },
    Text(char),
    Resized { width: u32, height: u32 },
}

/// Window and input backend the runner drives.
pub trait Platform {
    /// Everything that arrived since the previous call.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Hides and captures the cursor for mouse look.
    fn set_cursor_grab(&mut self, grabbed: bool);

    /// Shows the finished frame.
    fn present(&mut self);
}

/// Platform without a window: replays scripted events and asks to quit after
/// a fixed number of frames.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<PlatformEvent>>,
    max_frames: Option<u64>,
    frames: u64,
    cursor_grabbed: bool,
}

impl HeadlessPlatform {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self { max_frames, ..Self::default() }
    }

    /// Queues `events` to be delivered on the next unscripted frame.
    pub fn push_frame(&mut self, events: Vec<PlatformEvent>) {
        self.script.push_back(events);
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = self.script.pop_front().unwrap_or_default();
        if self.max_frames.is_some_and(|max| self.frames >= max) {
            events.push(PlatformEvent::Quit);
        }
        events
    }

    fn set_cursor_grab(&mut self, grabbed: bool) {
        self.cursor_grabbed = grabbed;
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_frames_replay_in_order() {
        let mut p = HeadlessPlatform::new(None);
        p.push_frame(vec![PlatformEvent::Text('a')]);
        p.push_frame(vec![PlatformEvent::Text('b')]);
        assert_eq!(p.poll_events(), vec![PlatformEvent::Text('a')]);
        assert_eq!(p.poll_events(), vec![PlatformEvent::Text('b')]);
        assert!(p.poll_events().is_empty());
    }

    #[test]
    fn quits_once_frame_budget_is_spent() {
        let mut p = HeadlessPlatform::new(Some(2));
        assert!(p.poll_events().is_empty());
        p.present();
        p.present();
        assert_eq!(p.poll_events(), vec![PlatformEvent::Quit]);
    }
}
