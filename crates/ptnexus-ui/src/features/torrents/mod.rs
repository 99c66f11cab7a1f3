//! Torrent list and the per-torrent site dialog.

mod view;

pub(crate) use view::TorrentsView;
