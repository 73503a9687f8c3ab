//! Review modal: rate a worker, optionally with text and photos.

pub mod rating;

pub use rating::{MAX_REVIEW_IMAGES, MAX_STARS, ReviewForm, ReviewPayload};
