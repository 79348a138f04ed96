//! Data types shared across the client.

pub mod auth;
pub mod config;
