pub(crate) mod auth;
pub(crate) mod cross_seed;
pub(crate) mod torrents;
