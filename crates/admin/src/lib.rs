//! Shop Admin library.
//!
//! The back-office for orders and users, exposed as a library so the CLI
//! can reuse its user repository and password hashing, and so handlers can
//! be tested.
//!
//! # Security
//!
//! This crate can change order state and grant the admin role. Serve it on
//! an internal network only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
