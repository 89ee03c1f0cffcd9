//! Shared infrastructure

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod ping_api;
