//! Login/signup form fields and the payload sent to the sink.

use serde::{Deserialize, Serialize};

use super::state::{AuthMode, Role};

/// Fields entered on the login or signup form.
///
/// Signup uses all of them; login only email and password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFields {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AuthFields {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn signup(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        location: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: Some(name.into()),
            phone: Some(phone.into()),
            location: Some(location.into()),
        }
    }

    /// Required fields still blank for `mode`. Checked by the presentation
    /// layer before it calls [`AuthFlow::submit`](super::AuthFlow::submit).
    pub fn missing_required(&self, mode: AuthMode) -> Vec<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map(str::trim).unwrap_or_default().is_empty()
        }

        let mut missing = Vec::new();
        if mode == AuthMode::Signup && blank(&self.name) {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if mode == AuthMode::Signup {
            if blank(&self.phone) {
                missing.push("phone");
            }
            if blank(&self.location) {
                missing.push("location");
            }
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

/// What the auth modal hands to the submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub role: Role,
    pub mode: AuthMode,
    pub fields: AuthFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_email_and_password() {
        assert_eq!(
            AuthFields::default().missing_required(AuthMode::Login),
            vec!["email", "password"]
        );
        let fields = AuthFields::login("a@b.c", "pw");
        assert!(fields.missing_required(AuthMode::Login).is_empty());
    }

    #[test]
    fn signup_also_requires_name_phone_location() {
        let fields = AuthFields::login("a@b.c", "pw");
        assert_eq!(
            fields.missing_required(AuthMode::Signup),
            vec!["name", "phone", "location"]
        );

        let fields = AuthFields::signup("Asha", "a@b.c", "+91 98", "Pune", "pw");
        assert!(fields.missing_required(AuthMode::Signup).is_empty());

        let blank_name = AuthFields {
            name: Some("   ".into()),
            ..fields
        };
        assert_eq!(blank_name.missing_required(AuthMode::Signup), vec!["name"]);
    }

    #[test]
    fn login_payload_omits_signup_fields() {
        let payload = AuthPayload {
            role: Role::Customer,
            mode: AuthMode::Login,
            fields: AuthFields::login("a@b.c", "pw"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["role"], "customer");
        assert_eq!(json["mode"], "login");
        assert!(json["fields"].get("phone").is_none());
    }
}
