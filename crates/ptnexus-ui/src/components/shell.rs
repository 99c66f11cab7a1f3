use crate::core::routes::Route;
use crate::i18n::{LocaleCode, TranslationBundle};
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
    pub active: Route,
    pub bundle: TranslationBundle,
    pub username: Option<String>,
    pub on_locale_change: Callback<LocaleCode>,
    pub on_logout: Callback<()>,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let t = |key: &str| props.bundle.text(key, "");
    let nav_open = use_state(|| false);
    let toggle_nav = {
        let nav_open = nav_open.clone();
        Callback::from(move |_| nav_open.set(!*nav_open))
    };
    let on_locale = {
        let cb = props.on_locale_change.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>()
                && let Some(locale) = LocaleCode::from_lang_tag(&select.value())
            {
                cb.emit(locale);
            }
        })
    };
    let on_logout = props.on_logout.reform(|_: MouseEvent| ());

    html! {
        <div class="app-shell">
            <aside class={classes!("sidebar", if *nav_open { "open" } else { "closed" })}>
                <div class="brand">
                    <button class="ghost mobile-only" onclick={toggle_nav.clone()} aria-label={t("shell.close_nav")}>{"✕"}</button>
                    <strong>{"PT Nexus"}</strong>
                </div>
                <nav>
                    {for Route::nav().into_iter().map(|route| nav_item(&route, &t(route.label_key()), &props.active))}
                </nav>
                <div class="sidebar-footer">
                    <div class="locale-toggle">
                        <small>{t("shell.locale")}</small>
                        <select onchange={on_locale} aria-label={t("shell.locale")}>
                            {for LocaleCode::all().into_iter().map(|locale| html! {
                                <option value={locale.code()} selected={locale == props.bundle.locale}>{locale.label()}</option>
                            })}
                        </select>
                    </div>
                </div>
            </aside>
            <div class="main">
                <header class="topbar">
                    <button class="ghost mobile-only" aria-label={t("shell.open_nav")} onclick={toggle_nav}>{"☰"}</button>
                    <h1>{t(props.active.label_key())}</h1>
                    <div class="top-actions">
                        {props.username.as_ref().map_or_else(Html::default, |name| html! {
                            <span class="pill subtle">{name.clone()}</span>
                        })}
                        <button class="ghost" onclick={on_logout}>{t("shell.logout")}</button>
                    </div>
                </header>
                <main>
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}

fn nav_item(route: &Route, label: &str, active: &Route) -> Html {
    let classes = classes!("nav-item", (active == route).then_some("active"));
    html! {
        <Link<Route> to={route.clone()} classes={classes}>{label}</Link<Route>>
    }
}
