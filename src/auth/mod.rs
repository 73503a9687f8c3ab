//! Authentication modal: role selection followed by a login or signup form.

pub mod model;
pub mod state;

pub use model::{AuthFields, AuthPayload};
pub use state::{AuthFlow, AuthMode, Role};
