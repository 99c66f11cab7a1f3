use crate::core::routes::Route;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PlaceholderProps {
    pub route: Route,
}

/// Stand-in body for pages served by the backend-driven views.
#[function_component(Placeholder)]
pub(crate) fn placeholder(props: &PlaceholderProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let title = bundle.text(props.route.label_key(), "");
    html! {
        <section class="placeholder">
            <h2>{title}</h2>
            <p class="muted">{bundle.text("placeholder.body", "")}</p>
        </section>
    }
}
