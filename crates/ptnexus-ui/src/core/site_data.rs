//! Site/torrent dialog selection state.
//!
//! # Design
//! - A closed dialog holds no torrent and no downloader index.
//! - The downloader index is rebuilt from scratch on every open so ids from a
//!   previous torrent never linger.

use ptnexus_api_models::{Downloader, Torrent};
use std::collections::HashMap;

/// Label shown when a torrent references a downloader that is not configured.
pub const UNKNOWN_DOWNLOADER: &str = "未知下载器";

/// Transient state for the per-torrent site dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteDataState {
    /// Whether the dialog is open.
    pub dialog_visible: bool,
    /// Torrent shown in the dialog.
    pub current_torrent: Option<Torrent>,
    /// Downloader id → display name.
    pub downloader_index: HashMap<String, String>,
    /// Downloaders supplied on open, in order.
    pub all_downloaders: Vec<Downloader>,
}

impl SiteDataState {
    /// Open the dialog for `torrent` with the supplied downloaders.
    pub fn open_dialog(&mut self, torrent: Torrent, downloaders: Option<Vec<Downloader>>) {
        let downloaders = downloaders.unwrap_or_default();
        self.current_torrent = Some(torrent);
        self.dialog_visible = true;
        self.downloader_index.clear();
        self.downloader_index.extend(
            downloaders
                .iter()
                .map(|downloader| (downloader.id.clone(), downloader.name.clone())),
        );
        self.all_downloaders = downloaders;
    }

    /// Close the dialog and drop everything it was showing.
    pub fn close_dialog(&mut self) {
        self.dialog_visible = false;
        self.current_torrent = None;
        self.downloader_index.clear();
        self.all_downloaders.clear();
    }

    /// Replace the shown torrent without touching visibility.
    pub fn set_current_torrent(&mut self, torrent: Option<Torrent>) {
        self.current_torrent = torrent;
    }

    /// Display name for a downloader id, or [`UNKNOWN_DOWNLOADER`] when the id is
    /// unknown or its name is blank.
    #[must_use]
    pub fn downloader_name(&self, id: &str) -> &str {
        self.downloader_index
            .get(id)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_DOWNLOADER)
    }

    /// Downloaders supplied on open, in order.
    #[must_use]
    pub fn all_downloaders(&self) -> &[Downloader] {
        &self.all_downloaders
    }

    /// Names of every downloader holding the current torrent.
    #[must_use]
    pub fn current_downloader_names(&self) -> Vec<&str> {
        self.current_torrent
            .as_ref()
            .map(|torrent| {
                torrent
                    .downloader_refs()
                    .into_iter()
                    .map(|id| self.downloader_name(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(id: &str, downloaders: &[&str]) -> Torrent {
        Torrent {
            unique_id: id.into(),
            name: format!("torrent-{id}"),
            downloader_ids: downloaders.iter().map(ToString::to_string).collect(),
            ..Torrent::default()
        }
    }

    fn downloader(id: &str, name: &str) -> Downloader {
        Downloader {
            id: id.into(),
            name: name.into(),
            enabled: true,
        }
    }

    #[test]
    fn lookup_resolves_known_and_sentinel_for_unknown() {
        let mut state = SiteDataState::default();
        state.open_dialog(torrent("t1", &[]), Some(vec![downloader("a", "X")]));
        assert_eq!(state.downloader_name("a"), "X");
        assert_eq!(state.downloader_name("z"), UNKNOWN_DOWNLOADER);
    }

    #[test]
    fn blank_downloader_name_reads_as_unknown() {
        let mut state = SiteDataState::default();
        state.open_dialog(
            torrent("t1", &["blank", "a"]),
            Some(vec![downloader("blank", ""), downloader("a", "X")]),
        );
        assert_eq!(state.downloader_name("blank"), UNKNOWN_DOWNLOADER);
        assert_eq!(state.current_downloader_names(), vec![UNKNOWN_DOWNLOADER, "X"]);
    }

    #[test]
    fn close_restores_invariant_for_any_open() {
        let cases = [
            (torrent("t1", &["a"]), Some(vec![downloader("a", "X"), downloader("b", "Y")])),
            (torrent("t2", &[]), Some(Vec::new())),
            (torrent("t3", &["q"]), None),
        ];
        for (t, downloaders) in cases {
            let mut state = SiteDataState::default();
            state.open_dialog(t, downloaders);
            assert!(state.dialog_visible);
            state.close_dialog();
            assert_eq!(state, SiteDataState::default());
        }
    }

    #[test]
    fn reopening_rebuilds_index() {
        let mut state = SiteDataState::default();
        state.open_dialog(torrent("t1", &[]), Some(vec![downloader("a", "X")]));
        state.open_dialog(torrent("t2", &[]), Some(vec![downloader("b", "Y")]));
        assert_eq!(state.downloader_name("a"), UNKNOWN_DOWNLOADER);
        assert_eq!(state.downloader_name("b"), "Y");
        assert_eq!(state.all_downloaders().len(), 1);
    }

    #[test]
    fn open_without_downloaders_clears_previous_list() {
        let mut state = SiteDataState::default();
        state.open_dialog(torrent("t1", &[]), Some(vec![downloader("a", "X")]));
        state.open_dialog(torrent("t2", &[]), None);
        assert!(state.all_downloaders().is_empty());
        assert!(state.downloader_index.is_empty());
    }

    #[test]
    fn set_current_torrent_keeps_dialog_open() {
        let mut state = SiteDataState::default();
        state.open_dialog(torrent("t1", &[]), Some(vec![downloader("a", "X")]));
        state.set_current_torrent(Some(torrent("t1b", &[])));
        assert!(state.dialog_visible);
        assert_eq!(
            state.current_torrent.as_ref().map(|t| t.unique_id.as_str()),
            Some("t1b")
        );
        assert_eq!(state.downloader_name("a"), "X");
    }

    #[test]
    fn current_downloader_names_maps_each_reference() {
        let mut state = SiteDataState::default();
        state.open_dialog(
            torrent("t1", &["a", "gone"]),
            Some(vec![downloader("a", "qBittorrent")]),
        );
        assert_eq!(
            state.current_downloader_names(),
            vec!["qBittorrent", UNKNOWN_DOWNLOADER]
        );
    }
}
