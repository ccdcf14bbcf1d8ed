// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External collaborator boundaries
//!
//! Traits for the services a phase's work functions call (object storage,
//! search index, member repository, review desk), plus recording fakes for
//! tests.

mod fake;
mod traits;

pub use fake::{CollabCall, FakeCollaborators};
pub use traits::{
    Collaborators, IndexError, IndexRecord, MemberRepository, ObjectStore, PackageRef,
    RepositoryError, ReviewDesk, ReviewError, SearchIndex, StoreError,
};
