//! Cross-seed workflow page.
//!
//! # Design
//! - Workflow data lives in the shared store so it survives navigating away mid-edit.
//! - The publish response is page-local; the store only records the task id.

use crate::app::api::{use_api, use_store_ctx};
use crate::components::toast::use_toasts;
use crate::core::cross_seed::{CrossSeedState, WorkflowStage};
use crate::core::logic::build_publish_request;
use crate::core::params::{coerce_input, display_value, parse_object};
use crate::core::store::AppStore;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use gloo::console;
use ptnexus_api_models::PublishResponse;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(CrossSeedView)]
pub(crate) fn cross_seed_view() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let api = use_api();
    let store = use_store_ctx();
    let toasts = use_toasts();
    let workflow = use_selector(|s: &AppStore| s.cross_seed.clone());
    let draft = use_state(String::new);
    let publishing = use_state_eq(|| false);
    let outcome = use_state(|| None as Option<PublishResponse>);

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<web_sys::HtmlTextAreaElement>() {
                draft.set(area.value());
            }
        })
    };
    let on_load = {
        let draft = draft.clone();
        let store = store.clone();
        let toasts = toasts.clone();
        let invalid = t("cross_seed.error_json");
        Callback::from(move |_: MouseEvent| match parse_object(&draft) {
            Some(params) => {
                store.reduce(|s| s.cross_seed.set_params(params));
                draft.set(String::new());
            }
            None => toasts.error(invalid.clone()),
        })
    };
    let on_field = {
        let store = store.clone();
        let toasts = toasts.clone();
        Callback::from(move |(key, raw): (String, String)| {
            let mut applied = Ok(());
            store.reduce(|s| {
                let value = coerce_input(
                    &raw,
                    s.cross_seed
                        .working_params
                        .as_ref()
                        .and_then(|params| params.get(&key)),
                );
                applied = s.cross_seed.update_param(key, value);
            });
            if let Err(err) = applied {
                console::warn!("parameter edit rejected", err.to_string());
                toasts.error(err.to_string());
            }
        })
    };
    let on_preview = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| store.reduce(|s| s.cross_seed.go_to_preview()))
    };
    let on_back = {
        let store = store.clone();
        Callback::from(move |_: MouseEvent| store.reduce(|s| s.cross_seed.back_to_edit()))
    };
    let on_publish = {
        let workflow = workflow.clone();
        let store = store.clone();
        let toasts = toasts.clone();
        let publishing = publishing.clone();
        let outcome = outcome.clone();
        let bundle = bundle.clone();
        Callback::from(move |_: MouseEvent| {
            if *publishing {
                return;
            }
            let request = match build_publish_request(&workflow) {
                Ok(request) => request,
                Err(err) => {
                    toasts.error(bundle.text(err.message_key(), ""));
                    return;
                }
            };
            publishing.set(true);
            let api = api.clone();
            let store = store.clone();
            let toasts = toasts.clone();
            let publishing = publishing.clone();
            let outcome = outcome.clone();
            let published = bundle.text("cross_seed.published", "");
            yew::platform::spawn_local(async move {
                match api.client.publish(&request).await {
                    Ok(response) => {
                        let task_id = request.task_id;
                        store.reduce(|s| s.cross_seed.set_task_id(task_id));
                        toasts.success(published);
                        outcome.set(Some(response));
                    }
                    Err(err) => toasts.error(err.to_string()),
                }
                publishing.set(false);
            });
        })
    };
    let on_reset = {
        let outcome = outcome.clone();
        Callback::from(move |_: MouseEvent| {
            store.reduce(|s| s.cross_seed.reset());
            outcome.set(None);
        })
    };

    let body = match workflow.stage {
        WorkflowStage::Edit => html! {
            <div class="stage-edit">
                {param_editor(&workflow, &on_field)}
                <label class="stack">
                    <span>{t("cross_seed.paste_label")}</span>
                    <textarea rows="6" value={(*draft).clone()} oninput={on_draft}></textarea>
                </label>
                <div class="actions">
                    <button class="ghost" onclick={on_load}>{t("cross_seed.load")}</button>
                    <button class="primary" onclick={on_preview} disabled={workflow.working_params.is_none()}>
                        {t("cross_seed.preview")}
                    </button>
                </div>
            </div>
        },
        WorkflowStage::Preview => html! {
            <div class="stage-preview">
                {param_table(&workflow)}
                <div class="actions">
                    <button class="ghost" onclick={on_back}>{t("cross_seed.back")}</button>
                    <button class="primary" onclick={on_publish} disabled={*publishing}>{t("cross_seed.publish")}</button>
                </div>
            </div>
        },
        WorkflowStage::Publish => html! {
            <div class="stage-publish">
                <p>{t("cross_seed.task_id")}{" "}<code>{workflow.task_id.clone().unwrap_or_default()}</code></p>
                {(*outcome).as_ref().map_or_else(Html::default, publish_result)}
                <div class="actions">
                    <button class="primary" onclick={on_reset}>{t("cross_seed.start_over")}</button>
                </div>
            </div>
        },
    };

    html! {
        <section class="cross-seed">
            <ol class="stepper">
                {for WorkflowStage::all().into_iter().map(|stage| html! {
                    <li class={classes!(
                        stage.as_str(),
                        (stage == workflow.stage).then_some("active"),
                        (stage.index() < workflow.stage.index()).then_some("done"),
                    )}>
                        {t(&format!("cross_seed.stage_{}", stage.as_str()))}
                    </li>
                })}
            </ol>
            {source_summary(&bundle, &workflow)}
            {body}
        </section>
    }
}

fn source_summary(bundle: &TranslationBundle, workflow: &CrossSeedState) -> Html {
    let Some(source) = workflow.source_info.as_ref() else {
        return html! { <p class="muted">{bundle.text("cross_seed.no_source", "")}</p> };
    };
    html! {
        <dl class="meta source">
            <dt>{bundle.text("cross_seed.source_site", "")}</dt>
            <dd>{source.display_name.clone()}</dd>
            <dt>{bundle.text("cross_seed.source_torrent", "")}</dt>
            <dd>{source.source_torrent_id.clone()}</dd>
        </dl>
    }
}

fn param_editor(workflow: &CrossSeedState, on_field: &Callback<(String, String)>) -> Html {
    let Some(params) = workflow.working_params.as_ref() else {
        return html! {};
    };
    html! {
        <div class="param-editor">
            {for params.iter().map(|(key, value)| {
                let field = key.clone();
                let onchange = on_field.reform(move |e: Event| {
                    let raw = e
                        .target_dyn_into::<web_sys::HtmlInputElement>()
                        .map(|input| input.value())
                        .unwrap_or_default();
                    (field.clone(), raw)
                });
                html! {
                    <label class="stack" key={key.clone()}>
                        <span>{key.clone()}</span>
                        <input value={display_value(value)} {onchange} />
                    </label>
                }
            })}
        </div>
    }
}

fn param_table(workflow: &CrossSeedState) -> Html {
    let Some(params) = workflow.working_params.as_ref() else {
        return html! {};
    };
    html! {
        <table class="param-table">
            <tbody>
                {for params.iter().map(|(key, value)| html! {
                    <tr key={key.clone()}>
                        <th>{key.clone()}</th>
                        <td><pre>{display_value(value)}</pre></td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}

fn publish_result(response: &PublishResponse) -> Html {
    html! {
        <div class="publish-result">
            {response.url.as_ref().map_or_else(Html::default, |url| html! {
                <a href={url.clone()} target="_blank" rel="noopener noreferrer">{url.clone()}</a>
            })}
            {response.logs.as_ref().map_or_else(Html::default, |logs| html! {
                <pre class="logs">{logs.clone()}</pre>
            })}
        </div>
    }
}
