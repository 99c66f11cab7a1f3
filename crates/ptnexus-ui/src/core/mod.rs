//! Core, DOM-free primitives and helpers for the Web UI.
pub mod auth;
pub mod cross_seed;
pub mod error;
pub mod guard;
pub mod logic;
pub mod params;
pub mod routes;
pub mod site_data;
pub mod store;
