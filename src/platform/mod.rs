//! Platform abstraction layer
//!
//! Handles everything the simulation must not touch directly:
//! - Time/ticks (`time`)
//! - Input events (`input`)

pub mod input;
pub mod time;

pub use input::{InputSource, ScriptedInput, TerminalInput};
pub use time::{FixedStep, FrameClock, TickSource};
