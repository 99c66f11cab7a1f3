//! Transport clients for the backend API.

pub(crate) mod api;
