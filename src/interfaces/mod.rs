//! Adapters through which messages arrive and records leave.

pub mod csv;
pub mod http;
