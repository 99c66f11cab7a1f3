//! HTTP client helpers (REST).

use crate::core::auth::bearer_header;
use crate::core::guard::AuthStatusProbe;
use crate::core::logic::{build_seed_info_path, build_torrents_path};
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use ptnexus_api_models::{
    Ack, AuthStatus, ChangePasswordRequest, Downloader, FetchAndStoreRequest,
    FetchAndStoreResponse, LoginRequest, LoginResponse, PublishRequest, PublishResponse,
    SeedInfoResponse, TorrentPage,
};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// Request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// Backend answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16 },
    /// Body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Backend processed the request but refused it.
    #[error("{0}")]
    Rejected(String),
}

impl From<gloo_net::Error> for ApiError {
    fn from(value: gloo_net::Error) -> Self {
        match value {
            gloo_net::Error::SerdeError(err) => Self::Decode(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub(crate) struct ApiClient {
    base_url: String,
    token: RefCell<Option<String>>,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RefCell::new(None),
        }
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: Request) -> Request {
        match self.token.borrow().as_deref() {
            Some(token) => req.header("Authorization", &bearer_header(token)),
            None => req,
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
        if !resp.ok() {
            return Err(ApiError::Status {
                status: resp.status(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let resp = self.authorize(Request::get(&self.url(path))).send().await?;
        Self::read_json(resp).await
    }

    pub(crate) async fn fetch_auth_status(&self) -> ApiResult<AuthStatus> {
        self.get_json("/api/auth/status").await
    }

    pub(crate) async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let resp = Request::post(&self.url("/api/auth/login"))
            .json(&body)?
            .send()
            .await?;
        // 401 carries a message body, so decode before checking status.
        let status = resp.status();
        let decoded = resp.json::<LoginResponse>().await.ok();
        match decoded {
            Some(LoginResponse {
                success: true,
                token: Some(token),
                ..
            }) => Ok(token),
            Some(LoginResponse {
                message: Some(message),
                ..
            }) => Err(ApiError::Rejected(message)),
            _ => Err(ApiError::Status { status }),
        }
    }

    pub(crate) async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<()> {
        let resp = self
            .authorize(Request::post(&self.url("/api/auth/change_password")))
            .json(request)?
            .send()
            .await?;
        let status = resp.status();
        match resp.json::<Ack>().await.ok() {
            Some(Ack { success: true, .. }) => Ok(()),
            Some(Ack {
                message: Some(message),
                ..
            }) => Err(ApiError::Rejected(message)),
            _ => Err(ApiError::Status { status }),
        }
    }

    pub(crate) async fn fetch_all_downloaders(&self) -> ApiResult<Vec<Downloader>> {
        self.get_json("/api/all_downloaders").await
    }

    pub(crate) async fn fetch_torrents(
        &self,
        page: u32,
        page_size: u32,
        search: Option<String>,
    ) -> ApiResult<TorrentPage> {
        self.get_json(&build_torrents_path(page, page_size, search.as_deref()))
            .await
    }

    /// Fetch the source torrent and store its parameters; returns the prepared task id.
    pub(crate) async fn fetch_and_store(&self, request: &FetchAndStoreRequest) -> ApiResult<String> {
        let resp = self
            .authorize(Request::post(&self.url("/api/migrate/fetch_and_store")))
            .json(request)?
            .send()
            .await?;
        let status = resp.status();
        match resp.json::<FetchAndStoreResponse>().await.ok() {
            Some(FetchAndStoreResponse {
                success: true,
                task_id: Some(task_id),
                ..
            }) => Ok(task_id),
            Some(FetchAndStoreResponse {
                message: Some(message),
                ..
            }) => Err(ApiError::Rejected(message)),
            _ => Err(ApiError::Status { status }),
        }
    }

    /// Stored parameters for a source torrent.
    pub(crate) async fn seed_info(
        &self,
        torrent_id: &str,
        site_name: &str,
    ) -> ApiResult<SeedInfoResponse> {
        let resp = self
            .authorize(Request::get(&self.url(&build_seed_info_path(torrent_id, site_name))))
            .send()
            .await?;
        let status = resp.status();
        match resp.json::<SeedInfoResponse>().await.ok() {
            Some(info) if info.success => Ok(info),
            Some(SeedInfoResponse {
                message: Some(message),
                ..
            }) => Err(ApiError::Rejected(message)),
            _ => Err(ApiError::Status { status }),
        }
    }

    pub(crate) async fn publish(&self, request: &PublishRequest) -> ApiResult<PublishResponse> {
        let resp = self
            .authorize(Request::post(&self.url("/api/migrate/publish")))
            .json(request)?
            .send()
            .await?;
        let response: PublishResponse = Self::read_json(resp).await?;
        if response.success {
            Ok(response)
        } else {
            Err(ApiError::Rejected(
                response.logs.unwrap_or_else(|| "publish rejected".to_string()),
            ))
        }
    }
}

#[async_trait(?Send)]
impl AuthStatusProbe for ApiClient {
    type Error = ApiError;

    async fn auth_status(&self) -> Result<AuthStatus, Self::Error> {
        self.fetch_auth_status().await
    }
}
