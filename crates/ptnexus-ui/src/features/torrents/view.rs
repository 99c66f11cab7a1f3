//! Torrent list page.
//!
//! # Design
//! - Page data lives in component state; only the dialog selection is shared through the store.
//! - Downloaders load once per mount and are handed to the dialog on open.
//! - A cross-seed starts only after the backend has prepared a task and its stored parameters.

use crate::app::api::{use_api, use_store_ctx};
use crate::components::toast::use_toasts;
use crate::core::logic::{
    SiteRow, fetch_request_for, format_bytes, page_count, prepared_params, progress_label,
    site_rows, source_info_for,
};
use crate::core::routes::Route;
use crate::core::site_data::SiteDataState;
use crate::core::store::AppStore;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use crate::services::api::ApiError;
use gloo::console;
use ptnexus_api_models::{DEFAULT_PAGE_SIZE, Downloader, Torrent, TorrentPage};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(TorrentsView)]
pub(crate) fn torrents_view() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let api = use_api();
    let store = use_store_ctx();
    let toasts = use_toasts();
    let dialog = use_selector(|s: &AppStore| s.site_data.clone());
    let page = use_state_eq(|| 1_u32);
    let search = use_state_eq(String::new);
    let search_draft = use_state(String::new);
    let data = use_state(TorrentPage::default);
    let downloaders = use_state(Vec::<Downloader>::new);
    let loading = use_state_eq(|| false);

    {
        let api = api.clone();
        let toasts = toasts.clone();
        let downloaders = downloaders.clone();
        use_effect_with_deps(
            move |_| {
                yew::platform::spawn_local(async move {
                    match api.client.fetch_all_downloaders().await {
                        Ok(list) => downloaders.set(list),
                        Err(err) => toasts.error(err.to_string()),
                    }
                });
                || ()
            },
            (),
        );
    }

    {
        let data = data.clone();
        let loading = loading.clone();
        let store = store.clone();
        let toasts = toasts.clone();
        use_effect_with_deps(
            move |(page, search): &(u32, String)| {
                let page = *page;
                let query = Some(search.clone()).filter(|value| !value.trim().is_empty());
                loading.set(true);
                yew::platform::spawn_local(async move {
                    match api.client.fetch_torrents(page, DEFAULT_PAGE_SIZE, query).await {
                        Ok(result) => {
                            store.reduce(|s| refresh_open_torrent(&mut s.site_data, &result.data));
                            data.set(result);
                        }
                        Err(err) => toasts.error(err.to_string()),
                    }
                    loading.set(false);
                });
                || ()
            },
            (*page, (*search).clone()),
        );
    }

    let on_search_input = {
        let search_draft = search_draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                search_draft.set(input.value());
            }
        })
    };
    let on_search = {
        let search = search.clone();
        let search_draft = search_draft.clone();
        let page = page.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            page.set(1);
            search.set((*search_draft).clone());
        })
    };

    let on_open = {
        let store = store.clone();
        let downloaders = downloaders.clone();
        Callback::from(move |torrent: Torrent| {
            let list = (*downloaders).clone();
            store.reduce(|s| s.site_data.open_dialog(torrent, Some(list)));
        })
    };
    let on_close = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| store.reduce(|s| s.site_data.close_dialog()))
    };

    let pages = page_count(data.total, data.page_size);
    let current_page = u64::from(*page);
    let on_prev = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(page.saturating_sub(1).max(1)))
    };
    let on_next = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            if u64::from(*page) < pages {
                page.set(*page + 1);
            }
        })
    };

    html! {
        <section class="torrents">
            <form class="toolbar" onsubmit={on_search}>
                <input
                    placeholder={t("torrents.search")}
                    aria-label={t("torrents.search")}
                    value={(*search_draft).clone()}
                    oninput={on_search_input}
                />
                <button class="ghost" type="submit">{t("torrents.search_button")}</button>
                {if *loading { html! { <span class="muted">{t("torrents.loading")}</span> } } else { html! {} }}
            </form>
            <table class="torrent-table">
                <thead>
                    <tr>
                        <th>{t("torrents.col_name")}</th>
                        <th>{t("torrents.col_size")}</th>
                        <th>{t("torrents.col_progress")}</th>
                        <th>{t("torrents.col_state")}</th>
                        <th>{t("torrents.col_sites")}</th>
                        <th>{t("torrents.col_uploaded")}</th>
                    </tr>
                </thead>
                <tbody>
                    {for data.data.iter().map(|torrent| torrent_row(torrent, &on_open))}
                </tbody>
            </table>
            {if data.data.is_empty() && !*loading {
                html! { <p class="muted empty">{t("torrents.empty")}</p> }
            } else {
                html! {}
            }}
            <footer class="pager">
                <button class="ghost" onclick={on_prev} disabled={current_page <= 1}>{t("torrents.prev")}</button>
                <span>{format!("{current_page} / {pages}")}</span>
                <button class="ghost" onclick={on_next} disabled={current_page >= pages}>{t("torrents.next")}</button>
                <span class="muted">{t("torrents.total").replace("{count}", &data.total.to_string())}</span>
            </footer>
            {if dialog.dialog_visible {
                html! { <SiteDialog state={(*dialog).clone()} on_close={on_close} /> }
            } else {
                html! {}
            }}
        </section>
    }
}

fn refresh_open_torrent(state: &mut SiteDataState, rows: &[Torrent]) {
    if !state.dialog_visible {
        return;
    }
    let Some(open_id) = state.current_torrent.as_ref().map(|t| t.unique_id.clone()) else {
        return;
    };
    if let Some(fresh) = rows.iter().find(|t| t.unique_id == open_id) {
        state.set_current_torrent(Some(fresh.clone()));
    }
}

fn torrent_row(torrent: &Torrent, on_open: &Callback<Torrent>) -> Html {
    let onclick = {
        let torrent = torrent.clone();
        on_open.reform(move |_: MouseEvent| torrent.clone())
    };
    let size = if torrent.size_formatted.is_empty() {
        format_bytes(torrent.size)
    } else {
        torrent.size_formatted.clone()
    };
    let uploaded = if torrent.total_uploaded_formatted.is_empty() {
        format_bytes(torrent.total_uploaded)
    } else {
        torrent.total_uploaded_formatted.clone()
    };
    html! {
        <tr class="clickable" {onclick}>
            <td class="name" title={torrent.save_path.clone()}>{torrent.name.clone()}</td>
            <td>{size}</td>
            <td>{progress_label(torrent.progress)}</td>
            <td>{torrent.state.clone()}</td>
            <td>{torrent.sites.len()}</td>
            <td>{uploaded}</td>
        </tr>
    }
}

#[derive(Properties, PartialEq)]
struct SiteDialogProps {
    state: SiteDataState,
    on_close: Callback<MouseEvent>,
}

#[function_component(SiteDialog)]
fn site_dialog(props: &SiteDialogProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let api = use_api();
    let store = use_store_ctx();
    let toasts = use_toasts();
    let navigator = use_navigator();
    let preparing = use_state_eq(|| None as Option<String>);
    let Some(torrent) = props.state.current_torrent.as_ref() else {
        return html! {};
    };

    let on_cross_seed = {
        let torrent = torrent.clone();
        let preparing = preparing.clone();
        let missing_id = t("torrents.error_no_id");
        Callback::from(move |row: SiteRow| {
            if preparing.is_some() {
                return;
            }
            let source = source_info_for(&row);
            if source.source_torrent_id.is_empty() {
                toasts.error(missing_id.clone());
                return;
            }
            preparing.set(Some(row.site.clone()));
            let request = fetch_request_for(&source, &torrent);
            let api = api.clone();
            let store = store.clone();
            let toasts = toasts.clone();
            let navigator = navigator.clone();
            let preparing = preparing.clone();
            yew::platform::spawn_local(async move {
                let prepared = async {
                    let task_id = api.client.fetch_and_store(&request).await?;
                    let info = api
                        .client
                        .seed_info(&source.source_torrent_id, &source.site_identifier)
                        .await?;
                    Ok::<_, ApiError>(prepared_params(info.data, &task_id))
                }
                .await;
                preparing.set(None);
                match prepared {
                    Ok(params) => {
                        store.reduce(|s| {
                            s.cross_seed.reset();
                            s.cross_seed.set_source_info(source);
                            s.cross_seed.set_params(params);
                            s.site_data.close_dialog();
                        });
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::CrossSeed);
                        }
                    }
                    Err(err) => {
                        console::warn!("cross-seed preparation failed", err.to_string());
                        toasts.error(err.to_string());
                    }
                }
            });
        })
    };

    let downloaders = props.state.current_downloader_names().join(", ");

    html! {
        <div class="dialog-backdrop" role="dialog" aria-modal="true">
            <div class="card site-dialog">
                <header>
                    <h3>{torrent.name.clone()}</h3>
                    <button class="ghost" aria-label={t("torrents.close")} onclick={props.on_close.clone()}>{"✕"}</button>
                </header>
                <dl class="meta">
                    <dt>{t("torrents.downloaders")}</dt>
                    <dd>{downloaders}</dd>
                    <dt>{t("torrents.progress")}</dt>
                    <dd>{progress_label(torrent.progress)}</dd>
                    <dt>{t("torrents.seeders")}</dt>
                    <dd>{torrent.seeders}</dd>
                </dl>
                <table class="site-table">
                    <thead>
                        <tr>
                            <th>{t("torrents.col_site")}</th>
                            <th>{t("torrents.col_state")}</th>
                            <th>{t("torrents.seeders")}</th>
                            <th>{t("torrents.col_uploaded")}</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {for site_rows(torrent).into_iter().map(|row| {
                            let migrated = row.migrated;
                            let busy = preparing.as_deref() == Some(row.site.as_str());
                            let label = if migrated {
                                t("torrents.migrated")
                            } else if busy {
                                t("torrents.preparing")
                            } else {
                                t("torrents.cross_seed")
                            };
                            let onclick = {
                                let row = row.clone();
                                on_cross_seed.reform(move |_: MouseEvent| row.clone())
                            };
                            html! {
                                <tr key={row.site.clone()}>
                                    <td>{row.site.clone()}</td>
                                    <td>{row.state.clone()}</td>
                                    <td>{row.seeders}</td>
                                    <td>{format_bytes(row.uploaded)}</td>
                                    <td><button class="ghost" disabled={migrated || preparing.is_some()} {onclick}>{label}</button></td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
