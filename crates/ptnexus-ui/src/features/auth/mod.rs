//! Login, first-run password change, and the query contract between them and the guard.

use serde::{Deserialize, Serialize};

mod view;

pub(crate) use view::{FirstSetupView, LoginView};

/// Query string carried by `/login`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LoginQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}
