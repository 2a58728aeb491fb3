//! Check-in conversation state machine
//!
//! Pure transitions in the Elm Architecture style: the transition function
//! decides, the driver performs the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::ConvState;
pub use transition::{transition, TransitionError, TransitionResult};
