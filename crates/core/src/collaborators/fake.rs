//! Fake collaborator implementations for testing

use super::traits::*;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Recorded call to a collaborator method
#[derive(Debug, Clone, PartialEq)]
pub enum CollabCall {
    // Object storage
    Upload {
        submission_id: String,
        payload: PathBuf,
    },
    Promote {
        submission_id: String,
    },
    DeleteObject {
        submission_id: String,
    },

    // Search index
    IndexPut {
        submission_id: String,
    },
    IndexDelete {
        submission_id: String,
    },

    // Member repository
    Enqueue {
        repository: String,
        submission_ids: Vec<String>,
    },
    Retrieve {
        repository: String,
        submission_ids: Vec<String>,
    },
    Dequeue {
        repository: String,
        submission_ids: Vec<String>,
    },
    Withdraw {
        repository: String,
        submission_ids: Vec<String>,
    },

    // Review desk
    OpenReview {
        submission_id: String,
    },
    RecordDecision {
        submission_id: String,
        approved: bool,
    },
    ScheduleReview {
        submission_id: String,
    },
    Assign {
        submission_id: String,
        reviewer: String,
    },
}

/// Shared state for fake collaborators
#[derive(Default)]
struct FakeState {
    calls: Vec<CollabCall>,
    // Configurable failure modes
    upload_fails: bool,
    promote_fails: bool,
    delete_fails: bool,
    index_fails: bool,
    enqueue_fails: bool,
    retrieve_fails: bool,
    decision_fails: bool,
    // When set, failures read as a transient outage (retryable)
    outage: bool,
}

/// Fake collaborators with call recording for testing
#[derive(Clone, Default)]
pub struct FakeCollaborators {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: CollabCall) {
        self.lock().calls.push(call);
    }

    /// All recorded calls, in invocation order
    pub fn calls(&self) -> Vec<CollabCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn set_upload_fails(&self, fails: bool) {
        self.lock().upload_fails = fails;
    }

    pub fn set_promote_fails(&self, fails: bool) {
        self.lock().promote_fails = fails;
    }

    pub fn set_delete_fails(&self, fails: bool) {
        self.lock().delete_fails = fails;
    }

    pub fn set_index_fails(&self, fails: bool) {
        self.lock().index_fails = fails;
    }

    pub fn set_enqueue_fails(&self, fails: bool) {
        self.lock().enqueue_fails = fails;
    }

    pub fn set_retrieve_fails(&self, fails: bool) {
        self.lock().retrieve_fails = fails;
    }

    pub fn set_decision_fails(&self, fails: bool) {
        self.lock().decision_fails = fails;
    }

    /// Make configured failures read as a transient outage (retryable)
    pub fn set_outage(&self, outage: bool) {
        self.lock().outage = outage;
    }
}

#[async_trait]
impl ObjectStore for FakeCollaborators {
    async fn upload(&self, package: &PackageRef) -> Result<(), StoreError> {
        self.record(CollabCall::Upload {
            submission_id: package.submission_id.clone(),
            payload: package.payload.clone(),
        });
        let state = self.lock();
        if state.upload_fails {
            if state.outage {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            return Err(StoreError::Rejected("checksum mismatch".to_string()));
        }
        Ok(())
    }

    async fn promote(&self, submission_id: &str) -> Result<(), StoreError> {
        self.record(CollabCall::Promote {
            submission_id: submission_id.to_string(),
        });
        let state = self.lock();
        if state.promote_fails {
            if state.outage {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            return Err(StoreError::NotFound(submission_id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, submission_id: &str) -> Result<(), StoreError> {
        self.record(CollabCall::DeleteObject {
            submission_id: submission_id.to_string(),
        });
        if self.lock().delete_fails {
            return Err(StoreError::NotFound(submission_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for FakeCollaborators {
    async fn put(&self, record: &IndexRecord) -> Result<(), IndexError> {
        self.record(CollabCall::IndexPut {
            submission_id: record.submission_id.clone(),
        });
        let state = self.lock();
        if state.index_fails {
            if state.outage {
                return Err(IndexError::Unavailable("timeout".to_string()));
            }
            return Err(IndexError::Rejected("malformed metadata".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, submission_id: &str) -> Result<(), IndexError> {
        self.record(CollabCall::IndexDelete {
            submission_id: submission_id.to_string(),
        });
        if self.lock().index_fails {
            return Err(IndexError::NotFound(submission_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for FakeCollaborators {
    async fn enqueue(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError> {
        self.record(CollabCall::Enqueue {
            repository: repository.to_string(),
            submission_ids: submission_ids.to_vec(),
        });
        let state = self.lock();
        if state.enqueue_fails {
            if state.outage {
                return Err(RepositoryError::Unavailable("timeout".to_string()));
            }
            return Err(RepositoryError::Rejected {
                repository: repository.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }

    async fn retrieve(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError> {
        self.record(CollabCall::Retrieve {
            repository: repository.to_string(),
            submission_ids: submission_ids.to_vec(),
        });
        if self.lock().retrieve_fails {
            return Err(RepositoryError::NotQueued(repository.to_string()));
        }
        Ok(())
    }

    async fn dequeue(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError> {
        self.record(CollabCall::Dequeue {
            repository: repository.to_string(),
            submission_ids: submission_ids.to_vec(),
        });
        Ok(())
    }

    async fn withdraw(
        &self,
        repository: &str,
        submission_ids: &[String],
    ) -> Result<(), RepositoryError> {
        self.record(CollabCall::Withdraw {
            repository: repository.to_string(),
            submission_ids: submission_ids.to_vec(),
        });
        Ok(())
    }
}

#[async_trait]
impl ReviewDesk for FakeCollaborators {
    async fn open_review(&self, submission_id: &str) -> Result<(), ReviewError> {
        self.record(CollabCall::OpenReview {
            submission_id: submission_id.to_string(),
        });
        Ok(())
    }

    async fn record_decision(
        &self,
        submission_id: &str,
        approved: bool,
    ) -> Result<(), ReviewError> {
        self.record(CollabCall::RecordDecision {
            submission_id: submission_id.to_string(),
            approved,
        });
        let state = self.lock();
        if state.decision_fails {
            if state.outage {
                return Err(ReviewError::Unavailable("timeout".to_string()));
            }
            return Err(ReviewError::AlreadyDecided(submission_id.to_string()));
        }
        Ok(())
    }

    async fn schedule(&self, submission_id: &str) -> Result<(), ReviewError> {
        self.record(CollabCall::ScheduleReview {
            submission_id: submission_id.to_string(),
        });
        Ok(())
    }

    async fn assign(&self, submission_id: &str, reviewer: &str) -> Result<(), ReviewError> {
        self.record(CollabCall::Assign {
            submission_id: submission_id.to_string(),
            reviewer: reviewer.to_string(),
        });
        Ok(())
    }
}

impl Collaborators for FakeCollaborators {
    type Store = FakeCollaborators;
    type Index = FakeCollaborators;
    type Repository = FakeCollaborators;
    type Review = FakeCollaborators;

    fn store(&self) -> Self::Store {
        self.clone()
    }

    fn index(&self) -> Self::Index {
        self.clone()
    }

    fn repository(&self) -> Self::Repository {
        self.clone()
    }

    fn review(&self) -> Self::Review {
        self.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
