//! Backend test support utilities
//!
//! Shared helpers for the backend's integration tests: unified logging
//! initialization, unique test data, and Problem Details assertions.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
