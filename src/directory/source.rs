//! `DataSource`: the read-only collaborator standing in for a backend.

use async_trait::async_trait;

use crate::error::DataSourceError;

use super::fixtures;
use super::model::{Booking, BookingFilter, ServiceCategory, WorkerProfile, WorkerSummary};

/// Everything the pages read: worker listings, profiles, categories and the
/// customer's bookings.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Workers highlighted on the landing page.
    async fn featured_workers(&self) -> Result<Vec<WorkerSummary>, DataSourceError>;

    /// Full profile for one worker.
    async fn worker_profile(&self, id: &str) -> Result<WorkerProfile, DataSourceError>;

    async fn service_categories(&self) -> Result<Vec<ServiceCategory>, DataSourceError>;

    /// The current customer's bookings matching `filter`.
    async fn bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, DataSourceError>;
}

/// Serves the hard-coded mock data.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    featured: Vec<WorkerSummary>,
    profiles: Vec<WorkerProfile>,
    categories: Vec<ServiceCategory>,
    bookings: Vec<Booking>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self {
            featured: fixtures::featured_workers(),
            profiles: fixtures::worker_profiles(),
            categories: fixtures::service_categories(),
            bookings: fixtures::bookings(),
        }
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn featured_workers(&self) -> Result<Vec<WorkerSummary>, DataSourceError> {
        Ok(self.featured.clone())
    }

    async fn worker_profile(&self, id: &str) -> Result<WorkerProfile, DataSourceError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound {
                entity: "worker".to_string(),
                id: id.to_string(),
            })
    }

    async fn service_categories(&self) -> Result<Vec<ServiceCategory>, DataSourceError> {
        Ok(self.categories.clone())
    }

    async fn bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, DataSourceError> {
        Ok(super::model::filter_bookings(&self.bookings, filter))
    }
}
