//! Chat modal: a mock conversation between a customer and a worker.

pub mod conversation;
pub mod model;

pub use conversation::Conversation;
pub use model::{ChatEvent, IMAGE_PLACEHOLDER, Message, MessageKind, Sender};
