//! Directory data model: workers, service categories and bookings.

use serde::{Deserialize, Serialize};

use crate::error::DataSourceError;

/// A worker card on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: String,
    pub name: String,
    pub profession: String,
    pub rating: f32,
    pub reviews: u32,
    pub location: String,
    pub skills: Vec<String>,
    pub hourly_rate: String,
}

/// Full worker profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub experience_years: u32,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub rating: f32,
    pub total_reviews: u32,
    pub availability: String,
    pub completed_jobs: u32,
    pub response_time: String,
    pub work_images: usize,
}

impl WorkerProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        initials(&self.display_name())
    }
}

/// First letter of each whitespace-separated word, e.g. "John Smith" → "JS".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// A service category tile on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub title: String,
    pub description: String,
    pub worker_count: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Completed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DataSourceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            other => Err(DataSourceError::UnknownStatus(other.to_string())),
        }
    }
}

/// Tab selection on the booking history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingFilter {
    #[default]
    All,
    Status(BookingStatus),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => booking.status == *status,
        }
    }
}

impl std::str::FromStr for BookingFilter {
    type Err = DataSourceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Status)
        }
    }
}

/// A past or upcoming booking with a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub worker_id: String,
    pub worker_name: String,
    pub profession: String,
    pub status: BookingStatus,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Booking {
    /// Completed and not yet rated: the history view offers "Rate & Review".
    pub fn needs_review(&self) -> bool {
        self.status == BookingStatus::Completed && self.rating.is_none()
    }
}

/// Bookings matching `filter`, in their original order.
pub fn filter_bookings(bookings: &[Booking], filter: BookingFilter) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| filter.matches(b))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str, status: BookingStatus, rating: Option<u8>) -> Booking {
        Booking {
            id: id.into(),
            worker_id: "w".into(),
            worker_name: "Someone".into(),
            profession: "Plumber".into(),
            status,
            date: "2024-01-15".into(),
            time: "10:00 AM".into(),
            location: "Delhi".into(),
            price: "₹1,000".into(),
            rating,
        }
    }

    #[test]
    fn filter_by_status() {
        let bookings = vec![
            booking("1", BookingStatus::Completed, Some(5)),
            booking("2", BookingStatus::Pending, None),
            booking("3", BookingStatus::Completed, None),
        ];
        assert_eq!(filter_bookings(&bookings, BookingFilter::All).len(), 3);
        let completed = filter_bookings(&bookings, BookingFilter::Status(BookingStatus::Completed));
        assert_eq!(
            completed.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert!(filter_bookings(&bookings, BookingFilter::Status(BookingStatus::Approved)).is_empty());
    }

    #[test]
    fn needs_review_only_for_unrated_completed() {
        assert!(!booking("1", BookingStatus::Completed, Some(4)).needs_review());
        assert!(booking("2", BookingStatus::Completed, None).needs_review());
        assert!(!booking("3", BookingStatus::Pending, None).needs_review());
    }

    #[test]
    fn filter_parses() {
        assert_eq!("ALL".parse::<BookingFilter>().unwrap(), BookingFilter::All);
        assert_eq!(
            "approved".parse::<BookingFilter>().unwrap(),
            BookingFilter::Status(BookingStatus::Approved)
        );
        assert!(matches!(
            "cancelled".parse::<BookingFilter>(),
            Err(DataSourceError::UnknownStatus(_))
        ));
    }

    #[test]
    fn initials_from_name() {
        assert_eq!(initials("John Smith"), "JS");
        assert_eq!(initials("  Sarah   Chen "), "SC");
        assert_eq!(initials(""), "");
    }
}
