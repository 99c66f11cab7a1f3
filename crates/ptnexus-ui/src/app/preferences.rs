//! Persistence and environment helpers for the app shell.

use crate::core::auth::normalize_token;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use serde::Serialize;
use web_sys::Url;

/// Plain-string bearer token slot read by the navigation guard.
pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const LOCALE_KEY: &str = "ptnexus.locale";

/// Backend port used when the UI is served by the trunk dev server.
const DEV_SERVER_PORT: &str = "8080";
const DEV_BACKEND_PORT: &str = "15273";

/// Reads the token as a plain string, accepting JSON-quoted values too.
pub(crate) fn load_token() -> Option<String> {
    let raw = LocalStorage::raw().get_item(TOKEN_KEY).ok().flatten();
    normalize_token(raw.map(|value| serde_json::from_str::<String>(&value).unwrap_or(value)))
}

pub(crate) fn persist_token(token: &str) {
    if LocalStorage::raw().set_item(TOKEN_KEY, token).is_err() {
        log_storage_error("set", TOKEN_KEY, "token write rejected");
    }
}

pub(crate) fn clear_token() {
    LocalStorage::delete(TOKEN_KEY);
}

pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY)
        && let Some(locale) = LocaleCode::from_lang_tag(&value)
    {
        return locale;
    }
    if let Some(nav) = window().navigator().language()
        && let Some(locale) = LocaleCode::from_lang_tag(&nav)
    {
        return locale;
    }
    DEFAULT_LOCALE
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    set_storage(LOCALE_KEY, locale.code());
}

pub(crate) fn api_base_url() -> String {
    let href = window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:15273".to_string());

    if let Ok(url) = Url::new(&href) {
        let port = url.port();
        let mapped_port = match port.as_str() {
            "" => None,
            DEV_SERVER_PORT => Some(DEV_BACKEND_PORT),
            other => Some(other),
        };

        let mut base = format!("{}//{}", url.protocol(), url.hostname());
        if let Some(port) = mapped_port {
            base.push(':');
            base.push_str(port);
        }
        return base;
    }

    "http://localhost:15273".to_string()
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_storage_error("set", key, &err.to_string());
    }
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
