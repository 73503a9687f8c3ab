//! Worker registration wizard: four steps over one registration form.

use tracing::{debug, info};

use crate::attachment::Attachment;
use crate::config::ResetPolicy;
use crate::error::{Error, ValidationError};
use crate::submission::{self, Ack, SubmissionKind, SubmissionSink};

use super::form::{FileSlot, FormField, RegistrationForm};
use super::step::{RegistrationStep, StepSequencer};

/// State owned by an open registration modal.
#[derive(Debug, Clone)]
pub struct WorkerRegistration {
    steps: StepSequencer,
    form: RegistrationForm,
    reset_policy: ResetPolicy,
}

impl WorkerRegistration {
    pub fn new(reset_policy: ResetPolicy) -> Self {
        Self {
            steps: StepSequencer::for_registration(),
            form: RegistrationForm::default(),
            reset_policy,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn step(&self) -> RegistrationStep {
        RegistrationStep::from_position(self.steps.current())
            .unwrap_or(RegistrationStep::PersonalInfo)
    }

    pub fn progress_percent(&self) -> f64 {
        self.steps.progress_percent()
    }

    /// "Worker Registration - Step 2 of 4".
    pub fn title(&self) -> String {
        format!(
            "Worker Registration - Step {} of {}",
            self.steps.current(),
            self.steps.total()
        )
    }

    pub fn advance(&mut self) -> bool {
        self.steps.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.steps.retreat()
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        self.form.set(field, value)
    }

    pub fn add_skill(&mut self, text: &str) -> bool {
        self.form.skills.add(text)
    }

    pub fn remove_skill(&mut self, text: &str) -> bool {
        self.form.skills.remove(text)
    }

    pub fn select_files(&mut self, slot: FileSlot, files: Vec<Attachment>) {
        self.form.select_files(slot, files);
    }

    /// Check the required fields of `step` for the presentation layer.
    /// Navigation itself never validates.
    pub fn validate_step(&self, step: RegistrationStep) -> Result<(), ValidationError> {
        let fields = self.form.missing_fields(step);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                step: step.to_string(),
                fields,
            })
        }
    }

    /// Hand the full form to `sink` from the Review step, then reset per the
    /// configured policy.
    pub async fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<Ack, Error> {
        if !self.steps.is_last() {
            return Err(ValidationError::NotOnFinalStep {
                current: self.steps.current(),
                total: self.steps.total(),
            }
            .into());
        }

        info!(
            name = %self.form.full_name(),
            profession = %self.form.profession,
            skills = self.form.skills.len(),
            "Submitting worker registration"
        );
        let result = submission::send(sink, SubmissionKind::WorkerRegistration, &self.form).await;

        if self.reset_policy.should_reset(result.is_ok()) {
            self.reset();
        } else {
            debug!("Registration kept after failed submission");
        }
        Ok(result?)
    }

    /// Host closed the modal.
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.steps.reset();
        self.form = RegistrationForm::default();
    }
}

impl Default for WorkerRegistration {
    fn default() -> Self {
        Self::new(ResetPolicy::default())
    }
}
