//! Pure UI helpers extracted from components for non-wasm testing.

use crate::core::cross_seed::CrossSeedState;
use crate::core::params::WorkingParams;
use ptnexus_api_models::{FetchAndStoreRequest, PublishRequest, SourceInfo, Torrent};
use serde_json::{Map, Value};
use std::fmt::Write;

/// Working-parameter key holding the id of the prepared (fetched) torrent task.
pub const PREPARED_TASK_KEY: &str = "task_id";
/// Working-parameter key holding the target site nickname.
pub const TARGET_SITE_KEY: &str = "targetSite";

/// Reasons a publish request cannot be built from the workflow state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishInputError {
    /// No parameters have been loaded.
    MissingParams,
    /// Parameters lack the prepared task id.
    MissingTaskId,
    /// Parameters lack a target site.
    MissingTargetSite,
}

impl PublishInputError {
    /// Translation key describing the failure.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::MissingParams => "cross_seed.error_params",
            Self::MissingTaskId => "cross_seed.error_task",
            Self::MissingTargetSite => "cross_seed.error_target",
        }
    }
}

/// Build the publish payload from the current workflow state.
///
/// # Errors
/// Returns [`PublishInputError`] when parameters, the prepared task id, or the
/// target site are missing or blank.
pub fn build_publish_request(state: &CrossSeedState) -> Result<PublishRequest, PublishInputError> {
    let params = state
        .working_params
        .as_ref()
        .ok_or(PublishInputError::MissingParams)?;
    let task_id = non_blank(params.get_str(PREPARED_TASK_KEY))
        .ok_or(PublishInputError::MissingTaskId)?;
    let target_site = non_blank(params.get_str(TARGET_SITE_KEY))
        .ok_or(PublishInputError::MissingTargetSite)?;
    Ok(PublishRequest {
        task_id: task_id.to_string(),
        upload_data: params.as_map().clone(),
        target_site: target_site.to_string(),
        source_site: state
            .source_info
            .as_ref()
            .map(|info| info.display_name.clone()),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Build the torrents list path for one page with an optional name search.
#[must_use]
pub fn build_torrents_path(page: u32, page_size: u32, search: Option<&str>) -> String {
    let mut path = format!("/api/data?page={}&pageSize={}", page.max(1), page_size.max(1));
    if let Some(query) = search.map(str::trim).filter(|query| !query.is_empty()) {
        let _ = write!(path, "&nameSearch={}", urlencoding::encode(query));
    }
    path
}

/// Number of pages needed for `total` rows.
#[must_use]
pub fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

/// Progress label with one decimal, e.g. `99.5%`; clamps to 0-100.
#[must_use]
pub fn progress_label(progress: f64) -> String {
    let clamped = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("{clamped:.1}%")
}

/// One row of the per-torrent site table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteRow {
    /// Site identifier.
    pub site: String,
    /// Tracker state label.
    pub state: String,
    /// Seeders on the site.
    pub seeders: u64,
    /// Bytes uploaded to the site.
    pub uploaded: u64,
    /// Whether the torrent was cross-seeded onto this site.
    pub migrated: bool,
    /// Tracker comment or details link.
    pub comment: String,
}

/// Site rows for a torrent, ordered by site identifier.
#[must_use]
pub fn site_rows(torrent: &Torrent) -> Vec<SiteRow> {
    torrent
        .sites
        .iter()
        .map(|(site, data)| SiteRow {
            site: site.clone(),
            state: data.state.clone(),
            seeders: data.seeders,
            uploaded: data.uploaded,
            migrated: data.migration != 0,
            comment: data.comment.clone(),
        })
        .collect()
}

/// Source-site torrent id carried by a tracker comment.
///
/// Accepts either a bare numeric id or a details link with an `id` query value.
#[must_use]
pub fn torrent_id_from_comment(comment: &str) -> Option<String> {
    let comment = comment.trim();
    if !comment.is_empty() && comment.bytes().all(|b| b.is_ascii_digit()) {
        return Some(comment.to_string());
    }
    let (_, query) = comment.split_once('?')?;
    query
        .split(['&', '#'])
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Cross-seed source descriptor for one site row of a torrent.
#[must_use]
pub fn source_info_for(row: &SiteRow) -> SourceInfo {
    SourceInfo {
        display_name: row.site.clone(),
        site_identifier: row.site.to_ascii_lowercase(),
        source_torrent_id: torrent_id_from_comment(&row.comment).unwrap_or_default(),
    }
}

/// Fetch request preparing a cross-seed of `torrent` from `source`.
#[must_use]
pub fn fetch_request_for(source: &SourceInfo, torrent: &Torrent) -> FetchAndStoreRequest {
    FetchAndStoreRequest {
        source_site: source.display_name.clone(),
        search_term: source.source_torrent_id.clone(),
        save_path: torrent.save_path.clone(),
        torrent_name: Some(torrent.name.clone()).filter(|name| !name.is_empty()),
        downloader_id: torrent.downloader_refs().first().map(ToString::to_string),
    }
}

/// Path of the stored-parameters lookup for one source torrent.
#[must_use]
pub fn build_seed_info_path(torrent_id: &str, site_name: &str) -> String {
    format!(
        "/api/migrate/get_db_seed_info?torrent_id={}&site_name={}",
        urlencoding::encode(torrent_id),
        urlencoding::encode(site_name)
    )
}

/// Working parameters seeded from stored data plus the prepared task id.
///
/// The prepared id always wins over any `task_id` already in the stored data.
#[must_use]
pub fn prepared_params(stored: Option<Map<String, Value>>, task_id: &str) -> WorkingParams {
    let mut params = stored.map(WorkingParams::from).unwrap_or_default();
    params.set(PREPARED_TASK_KEY, Value::String(task_id.to_string()));
    params
}

/// Human-friendly byte count using binary units.
#[must_use]
pub fn format_bytes(value: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;
    const TIB: u64 = 1024 * 1024 * 1024 * 1024;
    let (unit, label) = match value {
        v if v >= TIB => (TIB, "TB"),
        v if v >= GIB => (GIB, "GB"),
        v if v >= MIB => (MIB, "MB"),
        v if v >= KIB => (KIB, "KB"),
        _ => return format!("{value} B"),
    };
    let hundredths = value.saturating_mul(100) / unit;
    format!("{}.{:02} {label}", hundredths / 100, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptnexus_api_models::SiteData;
    use serde_json::json;

    fn state_with(params: serde_json::Value) -> CrossSeedState {
        let mut state = CrossSeedState::default();
        state.set_params(WorkingParams::from_value(params).unwrap());
        state
    }

    #[test]
    fn publish_request_requires_params_task_and_target() {
        assert_eq!(
            build_publish_request(&CrossSeedState::default()),
            Err(PublishInputError::MissingParams)
        );
        assert_eq!(
            build_publish_request(&state_with(json!({"targetSite": "hdsky"}))),
            Err(PublishInputError::MissingTaskId)
        );
        assert_eq!(
            build_publish_request(&state_with(json!({"task_id": "t", "targetSite": " "}))),
            Err(PublishInputError::MissingTargetSite)
        );
    }

    #[test]
    fn publish_request_carries_params_and_source() {
        let mut state = state_with(json!({"task_id": "t1", "targetSite": "hdsky", "title": "x"}));
        state.set_source_info(SourceInfo {
            display_name: "MTeam".into(),
            site_identifier: "mteam".into(),
            source_torrent_id: "9".into(),
        });
        let request = build_publish_request(&state).unwrap();
        assert_eq!(request.task_id, "t1");
        assert_eq!(request.target_site, "hdsky");
        assert_eq!(request.source_site.as_deref(), Some("MTeam"));
        assert_eq!(request.upload_data.get("title"), Some(&json!("x")));
    }

    #[test]
    fn torrents_path_encodes_search() {
        assert_eq!(build_torrents_path(1, 50, None), "/api/data?page=1&pageSize=50");
        assert_eq!(
            build_torrents_path(0, 20, Some(" the matrix ")),
            "/api/data?page=1&pageSize=20&nameSearch=the%20matrix"
        );
        assert_eq!(build_torrents_path(2, 20, Some("  ")), "/api/data?page=2&pageSize=20");
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
    }

    #[test]
    fn progress_label_clamps() {
        assert_eq!(progress_label(99.54), "99.5%");
        assert_eq!(progress_label(120.0), "100.0%");
        assert_eq!(progress_label(f64::NAN), "0.0%");
    }

    #[test]
    fn site_rows_are_sorted_and_flag_migration() {
        let mut torrent = Torrent::default();
        torrent.sites.insert(
            "zmpt".into(),
            SiteData {
                migration: 1,
                ..SiteData::default()
            },
        );
        torrent.sites.insert("audiences".into(), SiteData::default());
        let rows = site_rows(&torrent);
        assert_eq!(rows[0].site, "audiences");
        assert!(!rows[0].migrated);
        assert!(rows[1].migrated);
    }

    #[test]
    fn bytes_use_binary_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn comment_ids_come_from_bare_values_or_details_links() {
        assert_eq!(torrent_id_from_comment(" 4242 "), Some("4242".into()));
        assert_eq!(
            torrent_id_from_comment("https://pt.example/details.php?id=77&hit=1"),
            Some("77".into())
        );
        assert_eq!(torrent_id_from_comment("https://pt.example/details.php"), None);
        assert_eq!(torrent_id_from_comment(""), None);
    }

    #[test]
    fn source_info_uses_site_row() {
        let row = SiteRow {
            site: "MTeam".into(),
            state: "working".into(),
            seeders: 3,
            uploaded: 0,
            migrated: false,
            comment: "https://kp.m-team.cc/detail?id=9".into(),
        };
        let info = source_info_for(&row);
        assert_eq!(info.display_name, "MTeam");
        assert_eq!(info.site_identifier, "mteam");
        assert_eq!(info.source_torrent_id, "9");
    }

    #[test]
    fn fetch_request_takes_local_copy_details() {
        let torrent = Torrent {
            name: "Some.Movie.2024".into(),
            save_path: "/data/movies".into(),
            downloader_ids: vec!["qb1".into()],
            ..Torrent::default()
        };
        let source = SourceInfo {
            display_name: "MTeam".into(),
            site_identifier: "mteam".into(),
            source_torrent_id: "1001".into(),
        };
        let request = fetch_request_for(&source, &torrent);
        assert_eq!(request.source_site, "MTeam");
        assert_eq!(request.search_term, "1001");
        assert_eq!(request.save_path, "/data/movies");
        assert_eq!(request.torrent_name.as_deref(), Some("Some.Movie.2024"));
        assert_eq!(request.downloader_id.as_deref(), Some("qb1"));

        let bare = fetch_request_for(&source, &Torrent::default());
        assert_eq!(bare.torrent_name, None);
        assert_eq!(bare.downloader_id, None);
    }

    #[test]
    fn seed_info_path_encodes_arguments() {
        assert_eq!(
            build_seed_info_path("10 01", "m&t"),
            "/api/migrate/get_db_seed_info?torrent_id=10%2001&site_name=m%26t"
        );
    }

    #[test]
    fn prepared_params_make_publish_possible() {
        let stored = json!({"title": "a", "targetSite": "hdsky", "task_id": "stale"});
        let Value::Object(stored) = stored else {
            unreachable!()
        };
        let mut state = CrossSeedState::default();
        state.set_params(prepared_params(Some(stored), "fresh"));
        let request = build_publish_request(&state).unwrap();
        assert_eq!(request.task_id, "fresh");
        assert_eq!(request.target_site, "hdsky");

        let empty = prepared_params(None, "only");
        assert_eq!(empty.get_str(PREPARED_TASK_KEY), Some("only"));
        assert_eq!(empty.len(), 1);
    }
}
