//! Mock data served by [`FixtureSource`](super::FixtureSource).

use chrono::{DateTime, Duration, Utc};

use crate::chat::Sender;

use super::model::{Booking, BookingStatus, ServiceCategory, WorkerProfile, WorkerSummary};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn featured_workers() -> Vec<WorkerSummary> {
    vec![
        WorkerSummary {
            id: "1".into(),
            name: "John Martinez".into(),
            profession: "Master Plumber".into(),
            rating: 4.9,
            reviews: 127,
            location: "Downtown Area".into(),
            skills: strings(&["Emergency Repairs", "Installations", "Maintenance"]),
            hourly_rate: "$85".into(),
        },
        WorkerSummary {
            id: "2".into(),
            name: "Sarah Chen".into(),
            profession: "Licensed Electrician".into(),
            rating: 4.8,
            reviews: 89,
            location: "Westside".into(),
            skills: strings(&["Wiring", "Panel Upgrades", "Smart Home"]),
            hourly_rate: "$75".into(),
        },
        WorkerSummary {
            id: "3".into(),
            name: "Mike Johnson".into(),
            profession: "Professional Painter".into(),
            rating: 4.9,
            reviews: 156,
            location: "East District".into(),
            skills: strings(&["Interior", "Exterior", "Decorative"]),
            hourly_rate: "$45".into(),
        },
    ]
}

pub fn worker_profiles() -> Vec<WorkerProfile> {
    vec![WorkerProfile {
        id: "1".into(),
        first_name: "John".into(),
        last_name: "Smith".into(),
        profession: "Electrician".into(),
        experience_years: 8,
        location: "Mumbai, Maharashtra".into(),
        email: "john.smith@email.com".into(),
        phone: "+91 9876543210".into(),
        bio: "Professional electrician with 8 years of experience in residential and \
              commercial electrical work. Specialized in wiring, installations, and repairs."
            .into(),
        skills: strings(&[
            "Electrical Wiring",
            "Home Automation",
            "Solar Panel Installation",
            "Circuit Repair",
            "LED Installation",
        ]),
        rating: 4.8,
        total_reviews: 127,
        availability: "Available".into(),
        completed_jobs: 156,
        response_time: "2 hours".into(),
        work_images: 3,
    }]
}

pub fn service_categories() -> Vec<ServiceCategory> {
    [
        ("Plumbing", "Repairs, installations, and maintenance", "450+ workers"),
        ("Electrical", "Wiring, repairs, and installations", "380+ workers"),
        ("Painting", "Interior and exterior painting services", "290+ workers"),
        ("Handyman", "General repairs and maintenance", "520+ workers"),
        ("Automotive", "Car repairs and maintenance", "180+ workers"),
        ("Tech Support", "Computer and device repairs", "150+ workers"),
        ("Beauty & Wellness", "Hair, nails, and beauty services", "220+ workers"),
        ("Cleaning", "Home and office cleaning services", "340+ workers"),
    ]
    .into_iter()
    .map(|(title, description, count)| ServiceCategory {
        title: title.into(),
        description: description.into(),
        worker_count: count.into(),
    })
    .collect()
}

pub fn bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: "1".into(),
            worker_id: "1".into(),
            worker_name: "John Smith".into(),
            profession: "Electrician".into(),
            status: BookingStatus::Completed,
            date: "2024-01-15".into(),
            time: "10:00 AM".into(),
            location: "Mumbai, Maharashtra".into(),
            price: "₹2,500".into(),
            rating: Some(5),
        },
        Booking {
            id: "2".into(),
            worker_id: "4".into(),
            worker_name: "Sarah Johnson".into(),
            profession: "Plumber".into(),
            status: BookingStatus::Pending,
            date: "2024-01-20".into(),
            time: "2:00 PM".into(),
            location: "Delhi, India".into(),
            price: "₹1,800".into(),
            rating: None,
        },
        Booking {
            id: "3".into(),
            worker_id: "5".into(),
            worker_name: "Mike Wilson".into(),
            profession: "Carpenter".into(),
            status: BookingStatus::Approved,
            date: "2024-01-18".into(),
            time: "9:00 AM".into(),
            location: "Bangalore, Karnataka".into(),
            price: "₹3,200".into(),
            rating: None,
        },
    ]
}

/// Earlier messages shown when a chat opens, oldest first, stamped
/// relative to `now`.
pub fn chat_history(now: DateTime<Utc>) -> Vec<(Sender, &'static str, DateTime<Utc>)> {
    vec![
        (
            Sender::Customer,
            "Hi! I'm interested in your electrical services. Do you provide home wiring?",
            now - Duration::minutes(30),
        ),
        (
            Sender::Worker,
            "Hello! Yes, I do provide complete home wiring services. What kind of work do you need?",
            now - Duration::minutes(25),
        ),
        (
            Sender::Customer,
            "I need to install new electrical outlets in my kitchen and living room. Can you help?",
            now - Duration::minutes(20),
        ),
        (
            Sender::Worker,
            "Absolutely! I can help with that. When would be a good time for me to visit and assess the work?",
            now - Duration::minutes(15),
        ),
    ]
}
