//! App-wide yewdux store slices.
//!
//! # Design
//! - One store instance per app boot holds all cross-view mutable state.
//! - Each slice is mutated only through its own actions; reducers stay synchronous.

use crate::core::cross_seed::CrossSeedState;
use crate::core::site_data::SiteDataState;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// In-flight cross-seed workflow.
    pub cross_seed: CrossSeedState,
    /// Torrent site dialog selection.
    pub site_data: SiteDataState,
    /// Session flags mirrored from local storage.
    pub session: SessionSlice,
}

/// Session state visible to the shell.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionSlice {
    /// Whether a token is currently stored.
    pub signed_in: bool,
    /// Account name reported by the backend, when known.
    pub username: Option<String>,
}

impl AppStore {
    /// Clear every slice that belongs to a signed-in session.
    pub fn sign_out(&mut self) {
        self.cross_seed.reset();
        self.site_data.close_dialog();
        self.session = SessionSlice::default();
    }
}
