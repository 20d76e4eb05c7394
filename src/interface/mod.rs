//! Interface layer - External interfaces
//!
//! This layer handles:
//! - REST API endpoints
//! - Mapping domain errors to HTTP status codes
//! - Request/response formatting

pub mod api;
