//! Router-level session gate.
//!
//! Every location change runs one guard evaluation; the routed view renders only
//! after the latest evaluation permits it.

use crate::app::api::{use_api, use_store_ctx};
use crate::app::preferences::load_token;
use crate::core::guard::{
    FIRST_SETUP_PATH, GuardDecision, GuardSequencer, RedirectReason, RedirectTarget, evaluate,
};
use crate::core::routes::Route;
use crate::features::auth::LoginQuery;
use gloo::console;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GateState {
    Pending,
    Open,
}

#[derive(Properties, PartialEq)]
pub(crate) struct SessionGateProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(SessionGate)]
pub(crate) fn session_gate(props: &SessionGateProps) -> Html {
    let api = use_api();
    let store = use_store_ctx();
    let navigator = use_navigator();
    let location = use_location();
    let sequencer = use_memo(|_| GuardSequencer::default(), ());
    let gate = use_state_eq(|| GateState::Pending);

    let full_path = location.map_or_else(
        || "/".to_string(),
        |loc| format!("{}{}", loc.path(), loc.query_str()),
    );

    {
        let gate = gate.clone();
        use_effect_with_deps(
            move |full_path: &String| {
                let ticket = sequencer.begin();
                gate.set(GateState::Pending);
                let target = full_path.clone();
                yew::platform::spawn_local(async move {
                    let token = load_token();
                    api.client.set_token(token.clone());
                    let decision = evaluate(&target, token.as_deref(), api.client.as_ref()).await;
                    if !sequencer.is_current(ticket) {
                        return;
                    }
                    let signed_in = token.is_some();
                    store.reduce(|s| s.session.signed_in = signed_in);
                    match decision {
                        GuardDecision::Permit => gate.set(GateState::Open),
                        GuardDecision::Redirect { target, reason } => {
                            log_redirect(&target, &reason);
                            if let Some(navigator) = navigator {
                                redirect(&navigator, target);
                            }
                        }
                    }
                });
                || ()
            },
            full_path,
        );
    }

    match *gate {
        GateState::Pending => html! { <div class="guard-pending" aria-busy="true"></div> },
        GateState::Open => html! { <>{ for props.children.iter() }</> },
    }
}

fn redirect(navigator: &Navigator, target: RedirectTarget) {
    if target.path == FIRST_SETUP_PATH {
        navigator.replace(&Route::FirstSetup);
        return;
    }
    let query = LoginQuery {
        redirect: target.redirect,
    };
    if let Err(err) = navigator.replace_with_query(&Route::Login, &query) {
        console::error!("login redirect failed", err.to_string());
        navigator.replace(&Route::Login);
    }
}

fn log_redirect(target: &RedirectTarget, reason: &RedirectReason) {
    match reason {
        RedirectReason::StatusUnavailable(detail) => {
            console::warn!(
                "auth status unavailable; routing to login",
                detail.clone(),
                target.to_href()
            );
        }
        RedirectReason::PasswordChangeRequired => {
            console::info!("password change required", target.to_href());
        }
        RedirectReason::Unauthenticated => {
            console::info!("no session token", target.to_href());
        }
    }
}
