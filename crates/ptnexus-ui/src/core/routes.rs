//! Routing table for the PT Nexus UI.
use yew_router::prelude::*;

/// Every page the UI can render.
#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    /// Overview/info page.
    #[at("/")]
    Info,
    /// Torrent list with the per-torrent site dialog.
    #[at("/torrents")]
    Torrents,
    /// Site management.
    #[at("/sites")]
    Sites,
    /// Downloader and application settings.
    #[at("/settings")]
    Settings,
    /// Cross-seed workflow.
    #[at("/cross_seed")]
    CrossSeed,
    /// Login form.
    #[at("/login")]
    Login,
    /// First-run password change.
    #[at("/first_setup")]
    FirstSetup,
    /// Fallback for unknown paths.
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Whether this page renders without a token.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::FirstSetup)
    }

    /// Pages shown in the navigation bar, in order.
    #[must_use]
    pub const fn nav() -> [Self; 5] {
        [
            Self::Info,
            Self::Torrents,
            Self::Sites,
            Self::CrossSeed,
            Self::Settings,
        ]
    }

    /// Translation key for the page title.
    #[must_use]
    pub const fn label_key(&self) -> &'static str {
        match self {
            Self::Info => "nav.info",
            Self::Torrents => "nav.torrents",
            Self::Sites => "nav.sites",
            Self::Settings => "nav.settings",
            Self::CrossSeed => "nav.cross_seed",
            Self::Login => "nav.login",
            Self::FirstSetup => "nav.first_setup",
            Self::NotFound => "nav.not_found",
        }
    }
}
