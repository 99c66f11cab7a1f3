//! Shared contexts handed to every view.
//!
//! # Design
//! - Create exactly one API client and one store dispatch per app boot.
//! - Update the session token via interior mutability to avoid rebuilding clients.

use crate::app::preferences::api_base_url;
use crate::core::store::AppStore;
use crate::services::api::ApiClient;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::Dispatch;

/// Shared API client context for UI services.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Create a new context with the configured base URL.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Writer handle for the app store, injected instead of constructed per view.
#[derive(Clone)]
pub(crate) struct StoreCtx {
    pub dispatch: Dispatch<AppStore>,
}

impl StoreCtx {
    pub(crate) fn new() -> Self {
        Self {
            dispatch: Dispatch::<AppStore>::new(),
        }
    }

    pub(crate) fn reduce(&self, f: impl FnOnce(&mut AppStore)) {
        self.dispatch.reduce_mut(f);
    }
}

impl PartialEq for StoreCtx {
    fn eq(&self, _other: &Self) -> bool {
        // One dispatch exists per boot, so every handle addresses the same store.
        true
    }
}

/// API context from the nearest provider, or a fresh client when rendered standalone.
#[hook]
pub(crate) fn use_api() -> ApiCtx {
    use_context::<ApiCtx>().unwrap_or_else(|| ApiCtx::new(api_base_url()))
}

/// Store writer from the nearest provider.
#[hook]
pub(crate) fn use_store_ctx() -> StoreCtx {
    use_context::<StoreCtx>().unwrap_or_else(StoreCtx::new)
}
