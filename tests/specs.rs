//! Behavioral specifications for the sd workflow core.
//!
//! These tests are black-box: they drive the public engine API the way an
//! owning workflow would and verify states, conditions, callbacks, and
//! rendered status text.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/single.rs"]
mod single;

#[path = "specs/bulk.rs"]
mod bulk;

#[path = "specs/review.rs"]
mod review;
