// src/lib.rs

//! ECO Codes Library
//!
//! Scrapes chess opening classification codes from a reference page,
//! caches them for a bounded time, and serves them over HTTP.

pub mod error;
pub mod models;
pub mod repository;
pub mod server;
pub mod services;
pub mod utils;
