//! Core module
//!
//! Cross-cutting plumbing shared by the AI systems

mod events;

pub use events::{AiEvent, EventQueue};
