// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator trait definitions for the external services a phase calls
//!
//! Each work function inside a transition sequence calls exactly one of
//! these. Implementations live outside the engine; the engine only needs a
//! uniform success/failure answer plus a hint about whether retrying might
//! help (mapped onto [`StepError`] via the `From` impls below).

use crate::sequence::StepError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Object storage
// =============================================================================

/// Reference to a submission package awaiting upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    pub submission_id: String,
    pub payload: PathBuf,
}

impl PackageRef {
    pub fn new(submission_id: impl Into<String>, payload: impl Into<PathBuf>) -> Self {
        Self {
            submission_id: submission_id.into(),
            payload: payload.into(),
        }
    }
}

/// Errors from object-storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage service unavailable: {0}")]
    Unavailable(String),
    #[error("payload rejected: {0}")]
    Rejected(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether re-invoking the verb might succeed
    pub fn retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

/// Object-storage client: staging upload, promotion to permanent storage,
/// and deletion.
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// Upload a package payload to staging storage
    async fn upload(&self, package: &PackageRef) -> Result<(), StoreError>;

    /// Promote a previously uploaded package to permanent storage
    async fn promote(&self, submission_id: &str) -> Result<(), StoreError>;

    /// Delete the stored object for a submission
    async fn delete(&self, submission_id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Search index
// =============================================================================

/// An index entry for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub submission_id: String,
    pub metadata: serde_json::Value,
}

impl IndexRecord {
    pub fn new(submission_id: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            submission_id: submission_id.into(),
            metadata,
        }
    }
}

/// Errors from search-index operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index service unavailable: {0}")]
    Unavailable(String),
    #[error("record rejected: {0}")]
    Rejected(String),
    #[error("no index entry for {0}")]
    NotFound(String),
}

impl IndexError {
    pub fn retryable(&self) -> bool {
        matches!(self, IndexError::Unavailable(_))
    }
}

/// Search-index client
#[async_trait]
pub trait SearchIndex: Clone + Send + Sync + 'static {
    /// Write (or overwrite) the index entry for a submission
    async fn put(&self, record: &IndexRecord) -> Result<(), IndexError>;

    /// Remove the index entry for a submission
    async fn delete(&self, submission_id: &str) -> Result<(), IndexError>;
}

// =============================================================================
// Member repository
// =============================================================================

/// Errors from member-repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("member repository unavailable: {0}")]
    Unavailable(String),
    #[error("submission rejected by {repository}: {reason}")]
    Rejected { repository: String, reason: String },
    #[error("submission not queued at {0}")]
    NotQueued(String),
}

impl RepositoryError {
    pub fn retryable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}

/// Member-repository client: the downstream repository that picks up
/// deposited submissions.
#[async_trait]
pub trait MemberRepository: Clone + Send + Sync + 'static {
    /// Place submissions on the repository's intake queue
    async fn enqueue(&self, repository: &str, submission_ids: &[String])
        -> Result<(), RepositoryError>;

    /// Confirm the repository has picked the submissions up
    async fn retrieve(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError>;

    /// Remove submissions from the intake queue
    async fn dequeue(&self, repository: &str, submission_ids: &[String])
        -> Result<(), RepositoryError>;

    /// Withdraw the registration record for submissions
    async fn withdraw(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError>;
}

// =============================================================================
// Review desk
// =============================================================================

/// Errors from review-desk operations
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review desk unavailable: {0}")]
    Unavailable(String),
    #[error("no reviewer available for {0}")]
    NoReviewer(String),
    #[error("decision already recorded for {0}")]
    AlreadyDecided(String),
}

impl ReviewError {
    pub fn retryable(&self) -> bool {
        matches!(self, ReviewError::Unavailable(_))
    }
}

/// Human-review scheduling and decision recording
#[async_trait]
pub trait ReviewDesk: Clone + Send + Sync + 'static {
    /// Open a review for a submission
    async fn open_review(&self, submission_id: &str) -> Result<(), ReviewError>;

    /// Record an approve/reject decision
    async fn record_decision(&self, submission_id: &str, approved: bool)
        -> Result<(), ReviewError>;

    /// Put a submission on the review schedule
    async fn schedule(&self, submission_id: &str) -> Result<(), ReviewError>;

    /// Assign a scheduled review to a reviewer
    async fn assign(&self, submission_id: &str, reviewer: &str) -> Result<(), ReviewError>;
}

// =============================================================================
// Bundle
// =============================================================================

/// Collaborator bundle handed to an engine at construction
pub trait Collaborators: Clone + Send + Sync + 'static {
    type Store: ObjectStore;
    type Index: SearchIndex;
    type Repository: MemberRepository;
    type Review: ReviewDesk;

    fn store(&self) -> Self::Store;
    fn index(&self) -> Self::Index;
    fn repository(&self) -> Self::Repository;
    fn review(&self) -> Self::Review;
}

macro_rules! step_error_from {
    ($($err:ty),* $(,)?) => {$(
        impl From<$err> for StepError {
            fn from(err: $err) -> Self {
                let retry = err.retryable();
                let step = StepError::new(err.to_string());
                if retry {
                    step.with_retry()
                } else {
                    step
                }
            }
        }
    )*};
}

step_error_from!(StoreError, IndexError, RepositoryError, ReviewError);
