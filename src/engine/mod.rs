//! Application state machines: stage timeline, advisory fact, chat.

pub mod chat;
pub mod evolution;
pub mod insight;

pub use chat::{ChatMessage, ChatWidget, Role};
pub use evolution::EvolutionController;
pub use insight::InsightSlot;
