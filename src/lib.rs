//! Logistics point-of-sale backend
//!
//! Staff create vouchers (shipment orders) between regions, batch
//! them into consignments, and track status through a fixed lifecycle
//! with an append-only audit trail.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
