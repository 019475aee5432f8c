//! Test helpers for inbound HTTP components.
//!
//! The fixtures live in [`crate::test_support`] so integration tests can
//! reuse them; this module keeps the short import path for handler tests.

pub use crate::test_support::{
    test_http_state, test_http_state_with_policy, test_session_middleware,
};
