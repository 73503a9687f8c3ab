//! Submission sink: the collaborator every modal hands its finalized
//! payload to.
//!
//! The core treats a submission as a single awaited call: it never retries
//! or queues, and what it does with its own state afterwards is governed by
//! [`ResetPolicy`](crate::config::ResetPolicy).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SubmissionError;

/// Which flow produced a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Auth,
    WorkerRegistration,
    Review,
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "auth"),
            Self::WorkerRegistration => write!(f, "worker_registration"),
            Self::Review => write!(f, "review"),
        }
    }
}

/// Acknowledgement returned by a sink that accepted a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub id: Uuid,
    pub kind: SubmissionKind,
    pub received_at: DateTime<Utc>,
}

impl Ack {
    pub fn new(kind: SubmissionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            received_at: Utc::now(),
        }
    }
}

/// External collaborator accepting finalized payloads.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(
        &self,
        kind: SubmissionKind,
        payload: serde_json::Value,
    ) -> Result<Ack, SubmissionError>;
}

/// Serialize `payload` and hand it to `sink`.
pub(crate) async fn send<T: Serialize>(
    sink: &dyn SubmissionSink,
    kind: SubmissionKind,
    payload: &T,
) -> Result<Ack, SubmissionError> {
    let value = serde_json::to_value(payload)?;
    let result = sink.submit(kind, value).await;
    match &result {
        Ok(ack) => info!(kind = %kind, ack_id = %ack.id, "Submission acknowledged"),
        Err(e) => warn!(kind = %kind, error = %e, "Submission failed"),
    }
    result
}

/// A payload captured by [`RecordingSink`].
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub kind: SubmissionKind,
    pub payload: serde_json::Value,
    pub ack: Option<Ack>,
}

/// In-memory sink that keeps every payload it receives.
///
/// Optionally configured to reject everything, for exercising the
/// failure path of the reset policy.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<RecordedSubmission>>,
    reject_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records payloads but rejects each one with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            reject_with: Some(reason.into()),
        }
    }

    pub async fn records(&self) -> Vec<RecordedSubmission> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Decode every recorded payload of `kind` into `T`.
    pub async fn payloads_of<T: DeserializeOwned>(
        &self,
        kind: SubmissionKind,
    ) -> Result<Vec<T>, SubmissionError> {
        let records = self.records.lock().await;
        records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| serde_json::from_value(r.payload.clone()).map_err(SubmissionError::from))
            .collect()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(
        &self,
        kind: SubmissionKind,
        payload: serde_json::Value,
    ) -> Result<Ack, SubmissionError> {
        let ack = match &self.reject_with {
            Some(_) => None,
            None => Some(Ack::new(kind)),
        };
        self.records.lock().await.push(RecordedSubmission {
            kind,
            payload,
            ack: ack.clone(),
        });
        match (ack, &self.reject_with) {
            (Some(ack), _) => Ok(ack),
            (None, Some(reason)) => Err(SubmissionError::Rejected {
                kind,
                reason: reason.clone(),
            }),
            (None, None) => Err(SubmissionError::Unavailable("no acknowledgement".into())),
        }
    }
}

/// Sink that only logs what it receives. Used by the console when no other
/// sink is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl SubmissionSink for LogSink {
    async fn submit(
        &self,
        kind: SubmissionKind,
        payload: serde_json::Value,
    ) -> Result<Ack, SubmissionError> {
        info!(kind = %kind, payload = %payload, "Submission received");
        Ok(Ack::new(kind))
    }
}
