//! Worker registration wizard.
//!
//! A four-step modal (Personal Info → Contact → Documents → Review) built
//! from a clamped step sequencer, a typed form record, a skill-tag editor
//! and file slots. Submitting from the Review step hands the whole form to
//! the submission sink.

pub mod form;
pub mod registration;
pub mod skills;
pub mod step;

pub use form::{FileSlot, FormField, PROFESSIONS, RegistrationForm};
pub use registration::WorkerRegistration;
pub use skills::SkillSet;
pub use step::{RegistrationStep, StepSequencer};
