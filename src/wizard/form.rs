//! Registration form record and its per-field accessors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attachment::Attachment;
use crate::error::ValidationError;

use super::skills::SkillSet;
use super::step::RegistrationStep;

/// Professions offered in the registration dropdown.
pub const PROFESSIONS: [&str; 11] = [
    "Electrician",
    "Plumber",
    "Carpenter",
    "Painter",
    "Mechanic",
    "Cleaner",
    "Gardener",
    "Cook",
    "Tutor",
    "Driver",
    "Other",
];

/// Maximum length of an Aadhar number.
const AADHAR_DIGITS: usize = 12;

/// Text fields of the registration form, for hosts that edit by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    FirstName,
    LastName,
    Profession,
    Experience,
    Location,
    Email,
    Phone,
    Bio,
    AadharNumber,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Profession => "profession",
            Self::Experience => "experience",
            Self::Location => "location",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Bio => "bio",
            Self::AadharNumber => "aadhar number",
        }
    }

    /// The step whose screen edits this field.
    pub fn step(&self) -> RegistrationStep {
        match self {
            Self::FirstName
            | Self::LastName
            | Self::Profession
            | Self::Experience
            | Self::Location => RegistrationStep::PersonalInfo,
            Self::Email | Self::Phone | Self::Bio => RegistrationStep::Contact,
            Self::AadharNumber => RegistrationStep::Documents,
        }
    }
}

impl std::str::FromStr for FormField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "first_name" | "firstname" => Ok(Self::FirstName),
            "last_name" | "lastname" => Ok(Self::LastName),
            "profession" => Ok(Self::Profession),
            "experience" => Ok(Self::Experience),
            "location" => Ok(Self::Location),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "bio" => Ok(Self::Bio),
            "aadhar_number" | "aadhar" => Ok(Self::AadharNumber),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// File slots on the Documents step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSlot {
    AadharCard,
    ProfilePhoto,
    WorkImages,
    IntroVideo,
}

impl FileSlot {
    /// Multi-valued slots replace their whole collection on each selection.
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::WorkImages)
    }
}

impl std::str::FromStr for FileSlot {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "aadhar_card" | "aadhar" => Ok(Self::AadharCard),
            "profile_photo" | "photo" => Ok(Self::ProfilePhoto),
            "work_images" | "work" => Ok(Self::WorkImages),
            "intro_video" | "video" => Ok(Self::IntroVideo),
            _ => Err(format!("Unknown file slot: {}", s)),
        }
    }
}

/// Everything the worker enters across the four registration steps.
///
/// `Default` is the empty template a fresh wizard starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub experience: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub skills: SkillSet,
    pub aadhar_number: String,
    pub aadhar_card: Option<Attachment>,
    pub profile_photo: Option<Attachment>,
    pub work_images: Vec<Attachment>,
    pub intro_video: Option<Attachment>,
}

impl RegistrationForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Profession => &self.profession,
            FormField::Experience => &self.experience,
            FormField::Location => &self.location,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Bio => &self.bio,
            FormField::AadharNumber => &self.aadhar_number,
        }
    }

    /// Set a text field. Experience and Aadhar number go through their
    /// dedicated normalizers.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        let slot = match field {
            FormField::Experience => return self.set_experience(value),
            FormField::AadharNumber => {
                self.set_aadhar_number(value);
                return Ok(());
            }
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Profession => &mut self.profession,
            FormField::Location => &mut self.location,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Bio => &mut self.bio,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Accept a non-negative whole number of years, or empty to clear.
    pub fn set_experience(&mut self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            self.experience.clear();
            return Ok(());
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidExperience(value.to_string()));
        }
        self.experience = value.to_string();
        Ok(())
    }

    /// Keep digits only, truncated to 12.
    pub fn set_aadhar_number(&mut self, value: &str) {
        self.aadhar_number = value
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(AADHAR_DIGITS)
            .collect();
    }

    /// Store a picker selection. Single slots take the first offered file
    /// and drop the previous one; work images replace the whole collection.
    /// An empty selection leaves the slot untouched.
    pub fn select_files(&mut self, slot: FileSlot, files: Vec<Attachment>) {
        if files.is_empty() {
            debug!(slot = ?slot, "Empty file selection ignored");
            return;
        }
        let mut files = files.into_iter();
        match slot {
            FileSlot::WorkImages => self.work_images = files.collect(),
            FileSlot::AadharCard => self.aadhar_card = files.next(),
            FileSlot::ProfilePhoto => self.profile_photo = files.next(),
            FileSlot::IntroVideo => self.intro_video = files.next(),
        }
    }

    /// Required fields of `step` that are still blank.
    pub fn missing_fields(&self, step: RegistrationStep) -> Vec<&'static str> {
        let required: &[FormField] = match step {
            RegistrationStep::PersonalInfo => &[
                FormField::FirstName,
                FormField::LastName,
                FormField::Profession,
                FormField::Experience,
                FormField::Location,
            ],
            RegistrationStep::Contact => &[FormField::Email, FormField::Phone],
            RegistrationStep::Documents => &[FormField::AadharNumber],
            RegistrationStep::Review => &[],
        };
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|field| self.get(**field).trim().is_empty())
            .map(|field| field.label())
            .collect();

        if step == RegistrationStep::Documents {
            if self.aadhar_card.is_none() {
                missing.push("aadhar card");
            }
            if self.profile_photo.is_none() {
                missing.push("profile photo");
            }
        }
        missing
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Read-only summary shown on the Review step.
    pub fn summary(&self) -> String {
        let or_dash = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.to_string() };
        let file = |a: &Option<Attachment>| {
            a.as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "not uploaded".to_string())
        };

        let mut lines = vec!["# Personal Information".to_string()];
        lines.push(format!("- Name: {}", or_dash(&self.full_name())));
        lines.push(format!("- Profession: {}", or_dash(&self.profession)));
        lines.push(format!("- Experience: {} years", or_dash(&self.experience)));
        lines.push(format!("- Location: {}", or_dash(&self.location)));

        lines.push("# Contact & Skills".to_string());
        lines.push(format!("- Email: {}", or_dash(&self.email)));
        lines.push(format!("- Phone: {}", or_dash(&self.phone)));
        if !self.bio.trim().is_empty() {
            lines.push(format!("- Bio: {}", self.bio));
        }
        if self.skills.is_empty() {
            lines.push("- Skills: -".to_string());
        } else {
            lines.push(format!(
                "- Skills: {}",
                self.skills.iter().collect::<Vec<_>>().join(", ")
            ));
        }

        lines.push("# Documents".to_string());
        lines.push(format!("- Aadhar: {}", or_dash(&self.aadhar_number)));
        lines.push(format!("- Aadhar card: {}", file(&self.aadhar_card)));
        lines.push(format!("- Profile photo: {}", file(&self.profile_photo)));
        lines.push(format!("- Work images: {}", self.work_images.len()));
        lines.push(format!("- Intro video: {}", file(&self.intro_video)));

        lines.join("\n")
    }
}
