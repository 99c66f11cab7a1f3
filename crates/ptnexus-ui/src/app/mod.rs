//! Root component, context wiring, and wasm entry point.

pub(crate) mod api;
mod guard;
pub(crate) mod preferences;

use crate::app::api::{ApiCtx, StoreCtx, use_api, use_store_ctx};
use crate::app::guard::SessionGate;
use crate::app::preferences::{api_base_url, clear_token, load_locale, persist_locale};
use crate::components::placeholder::Placeholder;
use crate::components::shell::AppShell;
use crate::components::toast::{ToastAction, ToastCtx, ToastHost, ToastKind, ToastQueue};
use crate::core::routes::Route;
use crate::core::store::AppStore;
use crate::features::auth::{FirstSetupView, LoginView};
use crate::features::cross_seed::CrossSeedView;
use crate::features::torrents::TorrentsView;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode, TranslationBundle};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(PtNexusApp)]
fn ptnexus_app() -> Html {
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());
    let store_ctx = use_memo(|_| StoreCtx::new(), ());
    let locale = use_state_eq(load_locale);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };
    {
        use_effect_with_deps(
            move |locale: &LocaleCode| {
                persist_locale(*locale);
                || ()
            },
            *locale,
        );
    }

    let toasts = use_reducer(ToastQueue::default);
    let toast_ctx = {
        let dispatcher = toasts.dispatcher();
        use_memo(
            move |_| ToastCtx {
                push: Callback::from(move |(kind, message): (ToastKind, String)| {
                    dispatcher.dispatch(ToastAction::Push(kind, message));
                }),
            },
            (),
        )
    };
    let dismiss_toast = {
        let dispatcher = toasts.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };
    let on_locale_change = {
        let locale = locale.clone();
        Callback::from(move |next: LocaleCode| locale.set(next))
    };

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<StoreCtx> context={(*store_ctx).clone()}>
                <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                    <ContextProvider<ToastCtx> context={(*toast_ctx).clone()}>
                        <BrowserRouter>
                            <Routed {on_locale_change} />
                        </BrowserRouter>
                        <ToastHost toasts={toasts.items.clone()} on_dismiss={dismiss_toast} />
                    </ContextProvider<ToastCtx>>
                </ContextProvider<TranslationBundle>>
            </ContextProvider<StoreCtx>>
        </ContextProvider<ApiCtx>>
    }
}

#[derive(Properties, PartialEq)]
struct RoutedProps {
    on_locale_change: Callback<LocaleCode>,
}

/// Everything below the router: the gate, the shell for private pages, and the page switch.
#[function_component(Routed)]
fn routed(props: &RoutedProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let api = use_api();
    let store = use_store_ctx();
    let navigator = use_navigator();
    let username = use_selector(|s: &AppStore| s.session.username.clone());
    let active = use_route::<Route>().unwrap_or(Route::NotFound);

    let on_logout = Callback::from(move |()| {
        clear_token();
        api.client.set_token(None);
        store.reduce(AppStore::sign_out);
        if let Some(navigator) = navigator.as_ref() {
            navigator.replace(&Route::Login);
        }
    });

    let pages = html! { <Switch<Route> render={switch} /> };
    if active.is_public() {
        return html! { <SessionGate>{pages}</SessionGate> };
    }
    html! {
        <SessionGate>
            <AppShell
                active={active}
                bundle={bundle}
                username={(*username).clone()}
                on_locale_change={props.on_locale_change.clone()}
                on_logout={on_logout}
            >
                {pages}
            </AppShell>
        </SessionGate>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Torrents => html! { <TorrentsView /> },
        Route::CrossSeed => html! { <CrossSeedView /> },
        Route::Login => html! { <LoginView /> },
        Route::FirstSetup => html! { <FirstSetupView /> },
        Route::Info | Route::Sites | Route::Settings | Route::NotFound => {
            html! { <Placeholder route={route} /> }
        }
    }
}

/// Mount the app on `#root`, or on `<body>` when the element is missing.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<PtNexusApp>::with_root(root).render();
    } else {
        yew::Renderer::<PtNexusApp>::new().render();
    }
}
