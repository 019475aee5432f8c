//! Outbound adapters implementing the domain's capability ports.

pub mod persistence;
pub mod security;
pub mod storage;
