//! Auth flow state machine: role selection × login/signup mode.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, ValidationError};
use crate::submission::{self, Ack, SubmissionKind, SubmissionSink};

use super::model::{AuthFields, AuthPayload};

/// Who is signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Worker,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "worker" => Ok(Self::Worker),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Which form is shown once a role is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Signup => write!(f, "signup"),
        }
    }
}

/// State owned by an open auth modal.
///
/// `Unset` ↔ `{Customer, Worker} × {Login, Signup}`. Mode is only
/// meaningful once a role is selected; it reads as `Login` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthFlow {
    role: Option<Role>,
    mode: AuthMode,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_unset(&self) -> bool {
        self.role.is_none()
    }

    /// Pick a role. From `Unset` this lands on the login form; from a role
    /// state it swaps the role and keeps the current mode.
    pub fn select_role(&mut self, role: Role) {
        if self.role.is_none() {
            self.mode = AuthMode::Login;
        }
        self.role = Some(role);
        debug!(role = %role, mode = %self.mode, "Auth role selected");
    }

    /// Toggle login ↔ signup. Returns false (no effect) while no role is
    /// selected.
    pub fn switch_mode(&mut self) -> bool {
        if self.role.is_none() {
            debug!("Mode switch ignored without a role");
            return false;
        }
        self.mode = self.mode.toggled();
        true
    }

    /// Back to role selection.
    pub fn back(&mut self) {
        self.reset();
    }

    /// Host closed the modal.
    pub fn reset(&mut self) {
        self.role = None;
        self.mode = AuthMode::Login;
    }

    /// Send `{role, mode, fields}` to the sink and return to `Unset`.
    ///
    /// Field presence is the presentation layer's job (see
    /// [`AuthFields::missing_required`]); this only requires a role.
    pub async fn submit(
        &mut self,
        fields: AuthFields,
        sink: &dyn SubmissionSink,
    ) -> Result<Ack, Error> {
        let role = self.role.ok_or(ValidationError::NoRoleSelected)?;
        let payload = AuthPayload {
            role,
            mode: self.mode,
            fields,
        };
        info!(role = %payload.role, mode = %payload.mode, "Submitting auth");
        let result = submission::send(sink, SubmissionKind::Auth, &payload).await;
        self.reset();
        Ok(result?)
    }

    /// Modal heading for the current state.
    pub fn title(&self) -> String {
        match self.role {
            None => "Join Worker Connect".to_string(),
            Some(role) => {
                let action = match self.mode {
                    AuthMode::Login => "Login",
                    AuthMode::Signup => "Sign Up",
                };
                let who = match role {
                    Role::Customer => "Customer",
                    Role::Worker => "Worker",
                };
                format!("{action} as {who}")
            }
        }
    }
}
