//! Data models
//!
//! This module contains all data models that map exactly to the
//! PostgreSQL schema with the standard conventions.

pub mod consignment;
pub mod region;
pub mod status_log;
pub mod user;
pub mod voucher;
