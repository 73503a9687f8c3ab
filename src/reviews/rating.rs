//! Rating capture: star rating with hover preview, review text and a
//! capped image collection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attachment::Attachment;
use crate::config::{AppConfig, ResetPolicy};
use crate::error::{Error, ValidationError};
use crate::submission::{self, Ack, SubmissionKind, SubmissionSink};

/// Highest star value.
pub const MAX_STARS: u8 = 5;

/// Most images a single review can carry.
pub const MAX_REVIEW_IMAGES: usize = 5;

/// What the review modal hands to the submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub worker_id: String,
    pub rating: u8,
    pub text: String,
    pub anonymous: bool,
    pub images: Vec<Attachment>,
}

/// State owned by an open review modal for one worker.
#[derive(Debug, Clone)]
pub struct ReviewForm {
    worker_id: String,
    worker_name: String,
    rating: u8,
    hover: u8,
    text: String,
    anonymous: bool,
    images: Vec<Attachment>,
    reset_policy: ResetPolicy,
}

impl ReviewForm {
    pub fn new(
        worker_id: impl Into<String>,
        worker_name: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            worker_name: worker_name.into(),
            rating: 0,
            hover: 0,
            text: String::new(),
            anonymous: false,
            images: Vec::new(),
            reset_policy: config.reset_policy,
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn worker_name(&self) -> &str {
        &self.worker_name
    }

    /// Committed rating; 0 means none yet.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn hover(&self) -> u8 {
        self.hover
    }

    /// Stars to light up: the hover preview if any, else the committed value.
    pub fn display_rating(&self) -> u8 {
        if self.hover > 0 { self.hover } else { self.rating }
    }

    pub fn set_hover(&mut self, stars: u8) {
        self.hover = stars.min(MAX_STARS);
    }

    pub fn clear_hover(&mut self) {
        self.hover = 0;
    }

    /// Commit a rating in `1..=5`. Anything else is ignored.
    pub fn commit(&mut self, stars: u8) -> bool {
        if !(1..=MAX_STARS).contains(&stars) {
            debug!(stars, "Out-of-range rating ignored");
            return false;
        }
        self.rating = stars;
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn set_anonymous(&mut self, anonymous: bool) {
        self.anonymous = anonymous;
    }

    pub fn images(&self) -> &[Attachment] {
        &self.images
    }

    /// Append images up to [`MAX_REVIEW_IMAGES`]. Returns how many were
    /// kept; the rest are dropped.
    pub fn add_images(&mut self, files: Vec<Attachment>) -> usize {
        let room = MAX_REVIEW_IMAGES.saturating_sub(self.images.len());
        let offered = files.len();
        self.images.extend(files.into_iter().take(room));
        let kept = offered.min(room);
        if kept < offered {
            debug!(offered, kept, cap = MAX_REVIEW_IMAGES, "Review images over cap dropped");
        }
        kept
    }

    /// Remove the image at `index`; out of range is a no-op.
    pub fn remove_image(&mut self, index: usize) -> Option<Attachment> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    /// Hand the review to `sink`. A committed rating is required; text and
    /// images are optional.
    pub async fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<Ack, Error> {
        if self.rating == 0 {
            return Err(ValidationError::RatingRequired.into());
        }

        let payload = ReviewPayload {
            worker_id: self.worker_id.clone(),
            rating: self.rating,
            text: self.text.trim().to_string(),
            anonymous: self.anonymous,
            images: self.images.clone(),
        };
        info!(
            worker_id = %payload.worker_id,
            rating = payload.rating,
            images = payload.images.len(),
            anonymous = payload.anonymous,
            "Submitting review"
        );
        let result = submission::send(sink, SubmissionKind::Review, &payload).await;

        if self.reset_policy.should_reset(result.is_ok()) {
            self.reset();
        }
        Ok(result?)
    }

    /// Host closed the modal.
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.rating = 0;
        self.hover = 0;
        self.text.clear();
        self.anonymous = false;
        self.images.clear();
    }
}
