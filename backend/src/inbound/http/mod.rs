//! HTTP inbound adapter exposing REST endpoints.

pub mod attachments;
pub mod auth;
pub mod complaints;
pub mod error;
pub mod health;
pub mod mess_menu;
pub mod payments;
pub mod renewals;
pub mod rooms;
pub mod session;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
