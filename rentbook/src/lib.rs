//! Rentbook - property-management records behind a JSON HTTP API
//!
//! This library provides the core components for the Rentbook server.

pub mod api;
pub mod auth;
pub mod config;
pub mod entity;
pub mod session;
pub mod store;
pub mod validation;
