//! Actix middleware.

pub mod trace;
