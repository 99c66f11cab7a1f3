#![forbid(unsafe_code)]
#![deny(
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the PT Nexus backend API.
//!
//! The backend speaks a mixed casing convention (`snake_case` for most torrent
//! fields, `camelCase` for a few cross-seed and pagination keys); the serde
//! attributes below pin the exact wire names so the UI never guesses.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Response body of `GET /api/auth/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthStatus {
    /// Whether the backend handled the request.
    #[serde(default)]
    pub success: bool,
    /// Configured account name, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Set when the operator must replace the generated first-run password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
}

impl AuthStatus {
    /// Whether the backend demands a password change; a missing flag reads as `false`.
    #[must_use]
    pub fn requires_password_change(&self) -> bool {
        self.must_change_password.unwrap_or(false)
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Plain password.
    pub password: String,
}

/// Response body of `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Whether the credentials were accepted.
    #[serde(default)]
    pub success: bool,
    /// Signed session token, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Failure reason surfaced by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /api/auth/change_password`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    /// New account name (the backend falls back to `admin` when blank).
    pub username: String,
    /// New password; the backend rejects fewer than six characters.
    pub password: String,
    /// Current password used to authorise the change.
    pub old_password: String,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    /// Whether the operation succeeded.
    #[serde(default)]
    pub success: bool,
    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A configured download client backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Downloader {
    /// Stable downloader identifier.
    pub id: String,
    /// Operator-facing name.
    pub name: String,
    /// Whether the downloader is active.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

const fn enabled_default() -> bool {
    true
}

/// Per-site tracking data attached to a torrent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteData {
    /// Bytes uploaded to this site.
    #[serde(default)]
    pub uploaded: u64,
    /// Tracker comment or details link.
    #[serde(default)]
    pub comment: String,
    /// Migration flag as reported by the backend (0 = not migrated).
    #[serde(default)]
    pub migration: i64,
    /// Tracker state label.
    #[serde(default)]
    pub state: String,
    /// Seeders seen on this site.
    #[serde(default)]
    pub seeders: u64,
}

/// Aggregated torrent record as returned by `GET /api/data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Torrent {
    /// Unique torrent identifier across downloaders.
    pub unique_id: String,
    /// Display name.
    pub name: String,
    /// Save path on the downloader host.
    #[serde(default)]
    pub save_path: String,
    /// Payload size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Pre-formatted size label.
    #[serde(default)]
    pub size_formatted: String,
    /// Completion percentage (0-100).
    #[serde(default)]
    pub progress: f64,
    /// Lifecycle state label.
    #[serde(default)]
    pub state: String,
    /// Site identifier → per-site tracking data.
    #[serde(default)]
    pub sites: BTreeMap<String, SiteData>,
    /// Aggregate uploaded bytes.
    #[serde(default)]
    pub total_uploaded: u64,
    /// Pre-formatted aggregate upload label.
    #[serde(default)]
    pub total_uploaded_formatted: String,
    /// Aggregate seeders.
    #[serde(default)]
    pub seeders: u64,
    /// Single downloader id reported by older backends.
    #[serde(
        rename = "downloaderId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub downloader_id: Option<String>,
    /// Downloaders currently holding this torrent.
    #[serde(rename = "downloaderIds", default, skip_serializing_if = "Vec::is_empty")]
    pub downloader_ids: Vec<String>,
    /// Number of sites this torrent can still be cross-seeded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sites_count: Option<u32>,
}

impl Torrent {
    /// Downloader ids holding this torrent, merging the legacy single-id field.
    #[must_use]
    pub fn downloader_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.downloader_ids.iter().map(String::as_str).collect();
        if let Some(id) = self.downloader_id.as_deref()
            && !refs.contains(&id)
        {
            refs.push(id);
        }
        refs
    }
}

/// One page of torrents from `GET /api/data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TorrentPage {
    /// Rows on this page.
    #[serde(default)]
    pub data: Vec<Torrent>,
    /// Total rows across all pages.
    #[serde(default)]
    pub total: u64,
    /// One-based page index.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Rows per page.
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
}

const fn first_page() -> u32 {
    1
}

/// Page size the backend applies when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Origin torrent/site pair a cross-seed is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    /// Site nickname used for display, e.g. `MTeam`.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Site identifier used for API calls, e.g. `mteam`.
    #[serde(rename = "site")]
    pub site_identifier: String,
    /// Torrent id on the source site.
    #[serde(rename = "torrentId")]
    pub source_torrent_id: String,
}

/// Body of `POST /api/migrate/fetch_and_store`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchAndStoreRequest {
    /// Source site nickname.
    #[serde(rename = "sourceSite")]
    pub source_site: String,
    /// Torrent id (or search term) on the source site.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Local save path of the seeded copy.
    #[serde(rename = "savePath", default)]
    pub save_path: String,
    /// Local torrent name, used to locate the payload.
    #[serde(rename = "torrentName", default, skip_serializing_if = "Option::is_none")]
    pub torrent_name: Option<String>,
    /// Downloader holding the local copy.
    #[serde(rename = "downloaderId", default, skip_serializing_if = "Option::is_none")]
    pub downloader_id: Option<String>,
}

/// Response body of `POST /api/migrate/fetch_and_store`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchAndStoreResponse {
    /// Whether the source torrent was fetched and its parameters stored.
    #[serde(default)]
    pub success: bool,
    /// Prepared task id to publish against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Failure reason or status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Backend log output for the fetch step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
}

/// Response body of `GET /api/migrate/get_db_seed_info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeedInfoResponse {
    /// Whether stored parameters were found.
    #[serde(default)]
    pub success: bool,
    /// Stored cross-seed parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Where the parameters came from, e.g. `database`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Task id registered for this read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Standard key to display label lookup for the parameter editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_mappings: Option<Value>,
}

/// Body of `POST /api/migrate/publish`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishRequest {
    /// Task id issued when the source torrent was fetched.
    pub task_id: String,
    /// Edited cross-seed parameters.
    pub upload_data: Map<String, Value>,
    /// Target site nickname.
    #[serde(rename = "targetSite")]
    pub target_site: String,
    /// Source site nickname.
    #[serde(rename = "sourceSite", default, skip_serializing_if = "Option::is_none")]
    pub source_site: Option<String>,
}

/// Response body of `POST /api/migrate/publish`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishResponse {
    /// Whether the upload was accepted by the target site.
    #[serde(default)]
    pub success: bool,
    /// Backend log output for the publish step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    /// Details page of the published torrent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_status_missing_flag_reads_as_false() {
        let status: AuthStatus = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(!status.requires_password_change());

        let status: AuthStatus =
            serde_json::from_value(json!({"success": true, "must_change_password": true}))
                .unwrap();
        assert!(status.requires_password_change());
    }

    #[test]
    fn torrent_decodes_backend_row() {
        let row = json!({
            "unique_id": "abc",
            "name": "Some.Movie.2024",
            "save_path": "/data",
            "size": 1024,
            "size_formatted": "1 KB",
            "progress": 100.0,
            "state": "seeding",
            "sites": {
                "mteam": {"uploaded": 10, "comment": "x", "migration": 1, "state": "ok", "seeders": 3}
            },
            "total_uploaded": 10,
            "total_uploaded_formatted": "10 B",
            "seeders": 3,
            "downloaderId": "qb1",
            "downloaderIds": ["qb1", "tr1"]
        });
        let torrent: Torrent = serde_json::from_value(row).unwrap();
        assert_eq!(torrent.sites["mteam"].seeders, 3);
        assert_eq!(torrent.downloader_refs(), vec!["qb1", "tr1"]);
        assert_eq!(torrent.target_sites_count, None);
    }

    #[test]
    fn legacy_downloader_id_is_merged() {
        let torrent = Torrent {
            unique_id: "a".into(),
            name: "a".into(),
            downloader_id: Some("legacy".into()),
            downloader_ids: vec!["qb1".into()],
            ..Torrent::default()
        };
        assert_eq!(torrent.downloader_refs(), vec!["qb1", "legacy"]);
    }

    #[test]
    fn source_info_uses_wire_names() {
        let info = SourceInfo {
            display_name: "MTeam".into(),
            site_identifier: "mteam".into(),
            source_torrent_id: "42".into(),
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({"name": "MTeam", "site": "mteam", "torrentId": "42"})
        );
    }

    #[test]
    fn downloader_defaults_to_enabled() {
        let downloader: Downloader =
            serde_json::from_value(json!({"id": "qb1", "name": "qBittorrent"})).unwrap();
        assert!(downloader.enabled);
    }

    #[test]
    fn torrent_page_defaults_pagination() {
        let page: TorrentPage = serde_json::from_value(json!({"data": [], "total": 0})).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn fetch_and_store_request_uses_wire_names() {
        let request = FetchAndStoreRequest {
            source_site: "MTeam".into(),
            search_term: "1001".into(),
            save_path: "/data".into(),
            torrent_name: Some("Some.Movie.2024".into()),
            downloader_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "sourceSite": "MTeam",
                "searchTerm": "1001",
                "savePath": "/data",
                "torrentName": "Some.Movie.2024"
            })
        );
        let back: FetchAndStoreRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn fetch_and_store_response_carries_task_id() {
        let response: FetchAndStoreResponse = serde_json::from_value(json!({
            "success": true,
            "task_id": "9f1c",
            "message": "ok",
            "logs": "fetched"
        }))
        .unwrap();
        assert_eq!(response.task_id.as_deref(), Some("9f1c"));

        let failed: FetchAndStoreResponse =
            serde_json::from_value(json!({"success": false, "message": "bad site"})).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.task_id, None);
    }

    #[test]
    fn seed_info_response_decodes_parameters() {
        let body = json!({
            "success": true,
            "data": {"title": "Some Movie", "year": 2024},
            "source": "database",
            "task_id": "db-1",
            "reverse_mappings": {"type": {"movie": "电影"}}
        });
        let response: SeedInfoResponse = serde_json::from_value(body.clone()).unwrap();
        let data = response.data.as_ref().unwrap();
        assert_eq!(data["title"], json!("Some Movie"));
        assert_eq!(response.source.as_deref(), Some("database"));
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }
}
