//! Integration tests for the modal state machines through the public API.
//!
//! Each test drives one modal end to end against a `RecordingSink` and checks
//! exactly what reached the sink.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::time::timeout;

use worker_connect::attachment::Attachment;
use worker_connect::auth::{AuthFields, AuthFlow, AuthMode, AuthPayload, Role};
use worker_connect::chat::{ChatEvent, Conversation, Sender};
use worker_connect::clock::{Clock, ManualClock};
use worker_connect::config::{AppConfig, ResetPolicy};
use worker_connect::directory::{BookingFilter, DataSource, FixtureSource};
use worker_connect::error::{Error, ValidationError};
use worker_connect::reviews::{ReviewForm, ReviewPayload};
use worker_connect::submission::{RecordingSink, SubmissionKind};
use worker_connect::wizard::{FileSlot, FormField, RegistrationForm, RegistrationStep, WorkerRegistration};

/// Upper bound on waiting for a broadcast event.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 20, 14, 0, 0).unwrap(),
    ))
}

#[tokio::test]
async fn worker_registration_end_to_end() {
    let sink = RecordingSink::new();
    let mut wizard = WorkerRegistration::new(ResetPolicy::Always);

    wizard.set_field(FormField::FirstName, "Jane").unwrap();
    wizard.set_field(FormField::LastName, "Doe").unwrap();
    wizard.set_field(FormField::Profession, "Electrician").unwrap();
    wizard.set_field(FormField::Experience, "5").unwrap();
    wizard.set_field(FormField::Location, "Pune").unwrap();
    assert!(wizard.validate_step(RegistrationStep::PersonalInfo).is_ok());
    assert!(wizard.advance());

    wizard.set_field(FormField::Email, "jane@mail.test").unwrap();
    wizard.set_field(FormField::Phone, "9876543210").unwrap();
    assert!(wizard.add_skill("Wiring"));
    assert!(!wizard.add_skill("Wiring"));
    assert!(wizard.add_skill("  Solar  "));
    assert!(wizard.advance());

    wizard.set_field(FormField::AadharNumber, "1234 5678 9012 345").unwrap();
    wizard.select_files(FileSlot::AadharCard, vec![Attachment::from_name("aadhar.pdf", 1024)]);
    wizard.select_files(FileSlot::ProfilePhoto, vec![Attachment::from_name("me.jpg", 2048)]);
    wizard.select_files(
        FileSlot::WorkImages,
        vec![Attachment::from_name("a.jpg", 1), Attachment::from_name("b.jpg", 1)],
    );
    wizard.select_files(FileSlot::WorkImages, vec![Attachment::from_name("c.jpg", 1)]);
    assert!(wizard.advance());
    assert_eq!(wizard.step(), RegistrationStep::Review);
    assert!(!wizard.advance());

    wizard.submit(&sink).await.unwrap();

    let sent: Vec<RegistrationForm> = sink
        .payloads_of(SubmissionKind::WorkerRegistration)
        .await
        .unwrap();
    assert_eq!(sent.len(), 1);
    let form = &sent[0];
    assert_eq!(form.full_name(), "Jane Doe");
    assert_eq!(form.skills.as_slice(), ["Wiring".to_string(), "Solar".to_string()]);
    assert_eq!(form.aadhar_number, "123456789012");
    assert_eq!(
        form.work_images.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        vec!["c.jpg"]
    );

    assert_eq!(wizard.step(), RegistrationStep::PersonalInfo);
    assert_eq!(wizard.form(), &RegistrationForm::default());
}

#[tokio::test]
async fn auth_signup_then_back_to_unset() {
    let sink = RecordingSink::new();
    let mut flow = AuthFlow::new();

    assert!(!flow.switch_mode());
    flow.select_role(Role::Customer);
    assert!(flow.switch_mode());
    assert_eq!(flow.mode(), AuthMode::Signup);
    assert_eq!(flow.title(), "Sign Up as Customer");

    let fields = AuthFields::signup("Asha", "asha@mail.test", "99999", "Delhi", "pw");
    assert!(fields.missing_required(AuthMode::Signup).is_empty());
    flow.submit(fields.clone(), &sink).await.unwrap();

    let sent: Vec<AuthPayload> = sink.payloads_of(SubmissionKind::Auth).await.unwrap();
    assert_eq!(sent[0].role, Role::Customer);
    assert_eq!(sent[0].mode, AuthMode::Signup);
    assert_eq!(sent[0].fields, fields);
    assert!(flow.is_unset());
    assert_eq!(flow.mode(), AuthMode::Login);
}

#[tokio::test(start_paused = true)]
async fn chat_reply_arrives_after_delay_in_order() {
    let clock = clock();
    let mut chat = Conversation::new("1", "John Smith", &AppConfig::default(), clock.clone());
    let mut events = chat.subscribe();

    let sent = chat.send("  hello ", None).await.unwrap();
    assert_eq!(sent.content, "hello");
    assert!(chat.is_typing().await);

    // customer message, typing on, worker reply, typing off
    let mut seen = Vec::new();
    while seen.len() < 4 {
        let event = timeout(EVENT_TIMEOUT, events.recv()).await.unwrap().unwrap();
        seen.push(event);
    }
    assert!(matches!(&seen[0], ChatEvent::MessageAppended { message } if message.sender == Sender::Customer));
    assert_eq!(seen[1], ChatEvent::Typing { active: true });
    match &seen[2] {
        ChatEvent::MessageAppended { message } => {
            assert_eq!(message.sender, Sender::Worker);
            assert_eq!(message.content, "Thanks for your message! I'll get back to you shortly.");
            assert!(message.id > sent.id);
            assert!(message.timestamp >= sent.timestamp);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(seen[3], ChatEvent::Typing { active: false });

    assert_eq!(chat.len().await, 2);
    assert!(!chat.is_typing().await);
}

#[tokio::test(start_paused = true)]
async fn chat_close_cancels_pending_reply() {
    let clock = clock();
    let mut chat = Conversation::new("1", "John Smith", &AppConfig::default(), clock.clone());

    chat.send("", Some(Attachment::from_name("leak.jpg", 10))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    chat.close().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let messages = chat.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Image");
    assert!(chat.send("again", None).await.is_none());
    assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 1, 20, 14, 0, 0).unwrap());
}

#[tokio::test]
async fn review_from_booking_history() {
    let source = FixtureSource::new();
    let sink = RecordingSink::new();

    let completed = source
        .bookings("completed".parse::<BookingFilter>().unwrap())
        .await
        .unwrap();
    let booking = &completed[0];

    let mut review = ReviewForm::new(&booking.worker_id, &booking.worker_name, &AppConfig::default());
    let err = review.submit(&sink).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::RatingRequired)));

    review.commit(5);
    review.set_text("Quick and tidy");
    let images: Vec<Attachment> = (0..7)
        .map(|i| Attachment::from_name(format!("p{i}.jpg"), 1))
        .collect();
    assert_eq!(review.add_images(images), 5);
    review.submit(&sink).await.unwrap();

    let sent: Vec<ReviewPayload> = sink.payloads_of(SubmissionKind::Review).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].worker_id, booking.worker_id);
    assert_eq!(sent[0].rating, 5);
    assert_eq!(sent[0].images.len(), 5);
    assert_eq!(review.rating(), 0);
}
