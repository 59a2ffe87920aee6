//! The Logos agent brain: task routing, prompt composition, the completion
//! call, and response rendering.
//!
//! A run is strictly sequential: [`router`] selects a task from the trigger,
//! [`prompt`] composes the completion request, [`llm`] makes the one
//! external call, [`render`] turns the response into the run's output
//! artifacts. [`pipeline`] wires the sequence together.

pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod router;
