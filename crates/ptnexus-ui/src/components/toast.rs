use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use gloo::timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

/// How long a toast stays on screen.
const TOAST_TTL_MS: u32 = 4000;

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A queued notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Queue changes applied by the root component.
pub(crate) enum ToastAction {
    Push(ToastKind, String),
    Dismiss(u64),
}

/// Visible toasts plus the id counter.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ToastQueue {
    pub items: Vec<Toast>,
    next_id: u64,
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(kind, message) => {
                next.next_id += 1;
                next.items.push(Toast {
                    id: next.next_id,
                    message,
                    kind,
                });
            }
            ToastAction::Dismiss(id) => next.items.retain(|toast| toast.id != id),
        }
        Rc::new(next)
    }
}

/// Sink views use to raise toasts without owning the queue.
#[derive(Clone, PartialEq)]
pub(crate) struct ToastCtx {
    pub push: Callback<(ToastKind, String)>,
}

impl ToastCtx {
    pub(crate) fn error(&self, message: impl Into<String>) {
        self.push.emit((ToastKind::Error, message.into()));
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.push.emit((ToastKind::Success, message.into()));
    }
}

/// Toast sink from the nearest provider; a no-op sink when rendered standalone.
#[hook]
pub(crate) fn use_toasts() -> ToastCtx {
    use_context::<ToastCtx>().unwrap_or_else(|| ToastCtx {
        push: Callback::noop(),
    })
}

#[derive(Properties, PartialEq)]
pub(crate) struct ToastHostProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastHost)]
pub(crate) fn toast_host(props: &ToastHostProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let dismiss_label = bundle.text("toast.dismiss", "Dismiss");
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with_deps(
            move |list: &Vec<Toast>| {
                let handles: Vec<Timeout> = list
                    .iter()
                    .map(|toast| {
                        let on_dismiss = on_dismiss.clone();
                        let id = toast.id;
                        Timeout::new(TOAST_TTL_MS, move || on_dismiss.emit(id))
                    })
                    .collect();
                move || drop(handles)
            },
            props.toasts.clone(),
        );
    }

    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            {for props.toasts.iter().map(|toast| render_toast(toast, &props.on_dismiss, &dismiss_label))}
        </div>
    }
}

fn render_toast(toast: &Toast, on_dismiss: &Callback<u64>, dismiss_label: &str) -> Html {
    let id = toast.id;
    let on_close = on_dismiss.reform(move |_: MouseEvent| id);
    html! {
        <div class={classes!("toast", toast.kind.class())} role="status">
            <span>{toast.message.clone()}</span>
            <button class="ghost" aria-label={dismiss_label.to_string()} onclick={on_close}>{"✕"}</button>
        </div>
    }
}
