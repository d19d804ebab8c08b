//! Interactive simulation loop
//!
//! Keyboard-driven rotation, zoom and tilt for the mode-7 sprite.

mod clock;
mod input;
mod state;

pub use clock::*;
pub use input::*;
pub use state::*;
