//! Credential forms.
//!
//! # Design
//! - Network calls run in the submit handler; the guard re-checks the session on the next navigation.
//! - Tokens are persisted before the API client is updated so a reload sees the same session.

use crate::app::api::{use_api, use_store_ctx};
use crate::app::preferences::{clear_token, persist_token};
use crate::components::toast::use_toasts;
use crate::core::auth::{
    CredentialInputError, MIN_PASSWORD_LEN, post_login_destination, split_destination,
    validate_new_password,
};
use crate::core::routes::Route;
use crate::core::store::AppStore;
use crate::features::auth::LoginQuery;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use gloo::console;
use ptnexus_api_models::ChangePasswordRequest;
use yew::prelude::*;
use yew_router::prelude::*;

fn input_setter(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
            state.set(input.value());
        }
    })
}

fn go_to(navigator: &Navigator, destination: &str) {
    let (path, pairs) = split_destination(destination);
    let route = Route::recognize(path).unwrap_or(Route::Info);
    if pairs.is_empty() {
        navigator.replace(&route);
        return;
    }
    if let Err(err) = navigator.replace_with_query(&route, &pairs) {
        console::error!("post-login navigation failed", err.to_string());
        navigator.replace(&route);
    }
}

#[function_component(LoginView)]
pub(crate) fn login_view() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let api = use_api();
    let store = use_store_ctx();
    let toasts = use_toasts();
    let navigator = use_navigator();
    let location = use_location();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let busy = use_state(|| false);

    let redirect = location
        .and_then(|loc| loc.query::<LoginQuery>().ok())
        .and_then(|query| query.redirect);

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        let busy = busy.clone();
        let empty_message = t("login.error_required");
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }
            let user = username.trim().to_string();
            if user.is_empty() || password.is_empty() {
                toasts.error(empty_message.clone());
                return;
            }
            busy.set(true);
            let pass = (*password).clone();
            let api = api.clone();
            let store = store.clone();
            let toasts = toasts.clone();
            let navigator = navigator.clone();
            let busy = busy.clone();
            let destination = post_login_destination(redirect.as_deref());
            yew::platform::spawn_local(async move {
                match api.client.login(&user, &pass).await {
                    Ok(token) => {
                        persist_token(&token);
                        api.client.set_token(Some(token));
                        store.reduce(|s| {
                            s.session.signed_in = true;
                            s.session.username = Some(user);
                        });
                        if let Some(navigator) = navigator {
                            go_to(&navigator, &destination);
                        }
                    }
                    Err(err) => toasts.error(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="auth-page">
            <form class="card" onsubmit={on_submit}>
                <header><h2>{t("login.title")}</h2></header>
                <label class="stack">
                    <span>{t("login.username")}</span>
                    <input autocomplete="username" value={(*username).clone()} oninput={input_setter(&username)} />
                </label>
                <label class="stack">
                    <span>{t("login.password")}</span>
                    <input type="password" autocomplete="current-password" value={(*password).clone()} oninput={input_setter(&password)} />
                </label>
                <button class="primary" type="submit" disabled={*busy}>{t("login.submit")}</button>
            </form>
        </div>
    }
}

fn credential_message(bundle: &TranslationBundle, err: CredentialInputError) -> String {
    match err {
        CredentialInputError::PasswordTooShort => bundle
            .text("first_setup.error_short", "")
            .replace("{min}", &MIN_PASSWORD_LEN.to_string()),
        CredentialInputError::ConfirmationMismatch => bundle.text("first_setup.error_mismatch", ""),
    }
}

#[function_component(FirstSetupView)]
pub(crate) fn first_setup_view() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let api = use_api();
    let store = use_store_ctx();
    let toasts = use_toasts();
    let navigator = use_navigator();
    let username = use_state(|| "admin".to_string());
    let old_password = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let busy = use_state(|| false);

    let on_submit = {
        let username = username.clone();
        let old_password = old_password.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let busy = busy.clone();
        let bundle = bundle.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }
            if let Err(err) = validate_new_password(&password, &confirm) {
                toasts.error(credential_message(&bundle, err));
                return;
            }
            busy.set(true);
            let request = ChangePasswordRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
                old_password: (*old_password).clone(),
            };
            let done_message = bundle.text("first_setup.done", "");
            let api = api.clone();
            let store = store.clone();
            let toasts = toasts.clone();
            let navigator = navigator.clone();
            let busy = busy.clone();
            yew::platform::spawn_local(async move {
                match api.client.change_password(&request).await {
                    Ok(()) => {
                        toasts.success(done_message);
                        clear_token();
                        api.client.set_token(None);
                        store.reduce(AppStore::sign_out);
                        if let Some(navigator) = navigator {
                            navigator.replace(&Route::Login);
                        }
                    }
                    Err(err) => toasts.error(err.to_string()),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="auth-page">
            <form class="card" onsubmit={on_submit}>
                <header><h2>{t("first_setup.title")}</h2></header>
                <p class="muted">{t("first_setup.body")}</p>
                <label class="stack">
                    <span>{t("first_setup.username")}</span>
                    <input autocomplete="username" value={(*username).clone()} oninput={input_setter(&username)} />
                </label>
                <label class="stack">
                    <span>{t("first_setup.old_password")}</span>
                    <input type="password" autocomplete="current-password" value={(*old_password).clone()} oninput={input_setter(&old_password)} />
                </label>
                <label class="stack">
                    <span>{t("first_setup.new_password")}</span>
                    <input type="password" autocomplete="new-password" value={(*password).clone()} oninput={input_setter(&password)} />
                </label>
                <label class="stack">
                    <span>{t("first_setup.confirm")}</span>
                    <input type="password" autocomplete="new-password" value={(*confirm).clone()} oninput={input_setter(&confirm)} />
                </label>
                <button class="primary" type="submit" disabled={*busy}>{t("first_setup.submit")}</button>
            </form>
        </div>
    }
}
