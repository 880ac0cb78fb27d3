//! Input sources
//!
//! Translate device events into the simulation's [`InputEvent`]s.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::{InputEvent, Key};

/// Delivers the events that arrived since the last poll
pub trait InputSource {
    fn poll(&mut self) -> Result<Vec<InputEvent>>;
}

/// Keyboard input from the controlling terminal (raw mode must be on).
///
/// Auto-repeat is only distinguishable once the terminal surface has enabled
/// key event types; legacy terminals deliver each repeat as a new press.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO).context("failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("failed to read terminal event")? {
                events.extend(map_key_event(key));
            }
        }
        Ok(events)
    }
}

/// Map a terminal key event. Events marked `Repeat` are dropped.
pub fn map_key_event(event: KeyEvent) -> Option<InputEvent> {
    if event.kind == KeyEventKind::Repeat {
        return None;
    }
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputEvent::Quit);
    }

    let key = match event.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Key::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Key::Right,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    };

    match event.kind {
        KeyEventKind::Press => Some(InputEvent::KeyDown(key)),
        KeyEventKind::Release => Some(InputEvent::KeyUp(key)),
        KeyEventKind::Repeat => None,
    }
}

/// Replays a fixed list of per-frame event batches, then reports nothing
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
