//! Worker Connect: state machines behind the marketplace's modals.

pub mod attachment;
pub mod auth;
pub mod chat;
pub mod clock;
pub mod config;
pub mod console;
pub mod directory;
pub mod error;
pub mod reviews;
pub mod submission;
pub mod wizard;
