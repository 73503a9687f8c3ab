//! Worker directory, profiles, service categories and booking history.
//!
//! All of it is mock data served through the [`DataSource`] trait.

pub mod fixtures;
pub mod model;
pub mod source;

pub use model::{
    Booking, BookingFilter, BookingStatus, ServiceCategory, WorkerProfile, WorkerSummary,
    filter_bookings, initials,
};
pub use source::{DataSource, FixtureSource};
