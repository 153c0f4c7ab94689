//! Integration test crate for the guild workspace.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise full distribution cycles against the SQLite host.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p guild-integration-tests
//! ```
