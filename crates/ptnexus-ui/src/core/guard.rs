//! Navigation guard deciding whether a page load may proceed.
//!
//! # Design
//! - Allow-listed pages short-circuit before any network traffic.
//! - A missing token consults the backend once; any failure routes to login.
//! - Decisions are plain data; the router layer performs the redirect and logging.
//! - Overlapping evaluations are ordered by ticket so only the latest one applies.

use async_trait::async_trait;
use ptnexus_api_models::AuthStatus;
use std::cell::Cell;
use std::fmt::Display;

/// Login page path.
pub const LOGIN_PATH: &str = "/login";
/// First-run password change page path.
pub const FIRST_SETUP_PATH: &str = "/first_setup";
/// Pages reachable without a token.
pub const ALLOW_LIST: [&str; 2] = [LOGIN_PATH, FIRST_SETUP_PATH];
/// Query key carrying the originally requested path to the login page.
pub const REDIRECT_QUERY_KEY: &str = "redirect";

/// Source of the backend authentication status.
#[async_trait(?Send)]
pub trait AuthStatusProbe {
    /// Error produced when the status cannot be retrieved.
    type Error: Display;

    /// Query `GET /api/auth/status`.
    async fn auth_status(&self) -> Result<AuthStatus, Self::Error>;
}

/// Page a blocked navigation is sent to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Destination path.
    pub path: &'static str,
    /// Originally requested full path, forwarded as the `redirect` query value.
    pub redirect: Option<String>,
}

impl RedirectTarget {
    /// Redirect to the first-run setup page.
    #[must_use]
    pub const fn first_setup() -> Self {
        Self {
            path: FIRST_SETUP_PATH,
            redirect: None,
        }
    }

    /// Redirect to the login page, remembering `requested`.
    #[must_use]
    pub fn login(requested: impl Into<String>) -> Self {
        Self {
            path: LOGIN_PATH,
            redirect: Some(requested.into()),
        }
    }

    /// Render as a relative URL, e.g. `/login?redirect=/torrents`.
    #[must_use]
    pub fn to_href(&self) -> String {
        match &self.redirect {
            Some(requested) => format!(
                "{}?{REDIRECT_QUERY_KEY}={}",
                self.path,
                encode_query_value(requested)
            ),
            None => self.path.to_string(),
        }
    }
}

/// Why a navigation was redirected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectReason {
    /// The backend requires the first-run password to be replaced.
    PasswordChangeRequired,
    /// No token and the backend reported no pending password change.
    Unauthenticated,
    /// No token and the status check failed; carries the failure text.
    StatusUnavailable(String),
}

/// Outcome of a guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested page.
    Permit,
    /// Send the user elsewhere.
    Redirect {
        /// Destination.
        target: RedirectTarget,
        /// Cause, for logging.
        reason: RedirectReason,
    },
}

impl GuardDecision {
    /// Whether the requested page may render.
    #[must_use]
    pub const fn is_permit(&self) -> bool {
        matches!(self, Self::Permit)
    }
}

/// Path component of a full path (query and fragment removed).
#[must_use]
pub fn path_of(full_path: &str) -> &str {
    full_path
        .split(['?', '#'])
        .next()
        .unwrap_or(full_path)
}

/// Whether `full_path` is reachable without a token.
#[must_use]
pub fn is_allow_listed(full_path: &str) -> bool {
    let path = path_of(full_path);
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    ALLOW_LIST.contains(&trimmed)
}

/// Decide whether navigation to `target` may proceed.
///
/// `token` is the stored credential; blank values count as absent.
#[allow(clippy::future_not_send)]
pub async fn evaluate<P>(target: &str, token: Option<&str>, probe: &P) -> GuardDecision
where
    P: AuthStatusProbe + ?Sized,
{
    if is_allow_listed(target) {
        return GuardDecision::Permit;
    }
    if token.is_some_and(|value| !value.trim().is_empty()) {
        return GuardDecision::Permit;
    }
    match probe.auth_status().await {
        Ok(status) if status.requires_password_change() => GuardDecision::Redirect {
            target: RedirectTarget::first_setup(),
            reason: RedirectReason::PasswordChangeRequired,
        },
        Ok(_) => GuardDecision::Redirect {
            target: RedirectTarget::login(target),
            reason: RedirectReason::Unauthenticated,
        },
        Err(err) => GuardDecision::Redirect {
            target: RedirectTarget::login(target),
            reason: RedirectReason::StatusUnavailable(err.to_string()),
        },
    }
}

/// Ticket identifying one guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardTicket(u64);

/// Orders overlapping evaluations so the most recent one wins.
#[derive(Debug, Default)]
pub struct GuardSequencer {
    latest: Cell<u64>,
}

impl GuardSequencer {
    /// Start an evaluation, superseding any in flight.
    #[must_use]
    pub fn begin(&self) -> GuardTicket {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        GuardTicket(next)
    }

    /// Whether `ticket` belongs to the most recent evaluation.
    #[must_use]
    pub fn is_current(&self, ticket: GuardTicket) -> bool {
        self.latest.get() == ticket.0
    }
}

fn encode_query_value(value: &str) -> String {
    // Slashes are legal in query values and keep the login URL readable.
    urlencoding::encode(value).replace("%2F", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProbe {
        result: Result<AuthStatus, String>,
        calls: Cell<u32>,
    }

    impl StubProbe {
        fn ok(must_change_password: Option<bool>) -> Self {
            Self {
                result: Ok(AuthStatus {
                    success: true,
                    username: Some("admin".into()),
                    must_change_password,
                }),
                calls: Cell::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthStatusProbe for StubProbe {
        type Error = String;

        async fn auth_status(&self) -> Result<AuthStatus, Self::Error> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn mandatory_password_change_redirects_to_setup() {
        let probe = StubProbe::ok(Some(true));
        let decision = evaluate("/torrents", None, &probe).await;
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                target: RedirectTarget::first_setup(),
                reason: RedirectReason::PasswordChangeRequired,
            }
        );
    }

    #[tokio::test]
    async fn failed_status_check_redirects_to_login_with_origin() {
        let probe = StubProbe::failing("connection refused");
        let decision = evaluate("/torrents", None, &probe).await;
        let GuardDecision::Redirect { target, reason } = decision else {
            panic!("expected redirect");
        };
        assert_eq!(target.to_href(), "/login?redirect=/torrents");
        assert_eq!(
            reason,
            RedirectReason::StatusUnavailable("connection refused".into())
        );
    }

    #[tokio::test]
    async fn no_pending_change_redirects_to_login() {
        for flag in [Some(false), None] {
            let probe = StubProbe::ok(flag);
            let decision = evaluate("/cross_seed", None, &probe).await;
            assert_eq!(
                decision,
                GuardDecision::Redirect {
                    target: RedirectTarget::login("/cross_seed"),
                    reason: RedirectReason::Unauthenticated,
                }
            );
        }
    }

    #[tokio::test]
    async fn allow_listed_pages_skip_the_network() {
        let probe = StubProbe::failing("unreachable");
        for path in ["/login", "/first_setup", "/login?redirect=/sites", "/login/"] {
            assert!(evaluate(path, None, &probe).await.is_permit());
        }
        assert_eq!(probe.calls.get(), 0);
    }

    #[tokio::test]
    async fn token_permits_without_network() {
        let probe = StubProbe::failing("unreachable");
        assert!(evaluate("/settings", Some("jwt"), &probe).await.is_permit());
        assert_eq!(probe.calls.get(), 0);
    }

    #[tokio::test]
    async fn blank_token_counts_as_absent() {
        let probe = StubProbe::ok(Some(false));
        assert!(!evaluate("/settings", Some("  "), &probe).await.is_permit());
        assert_eq!(probe.calls.get(), 1);
    }

    #[test]
    fn redirect_href_keeps_query_of_origin() {
        let target = RedirectTarget::login("/torrents?page=2&q=a b");
        assert_eq!(
            target.to_href(),
            "/login?redirect=/torrents%3Fpage%3D2%26q%3Da%20b"
        );
        assert_eq!(RedirectTarget::first_setup().to_href(), "/first_setup");
    }

    #[test]
    fn path_of_strips_query_and_fragment() {
        assert_eq!(path_of("/torrents?page=2"), "/torrents");
        assert_eq!(path_of("/sites#top"), "/sites");
        assert_eq!(path_of("/"), "/");
        assert!(!is_allow_listed("/login-help"));
    }

    #[test]
    fn sequencer_prefers_latest_evaluation() {
        let sequencer = GuardSequencer::default();
        let first = sequencer.begin();
        let second = sequencer.begin();
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }
}
