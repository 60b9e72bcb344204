//! Controller layer: backend events, the commission editor state machine, and command dispatch.

pub mod events;
pub mod orchestration;
pub mod reducer;
