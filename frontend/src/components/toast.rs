use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

/// How long a toast stays up before dismissing itself.
const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastList {
    next_id: u32,
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(ToastKind, String),
    Dismiss(u32),
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(kind, message) => {
                next.toasts.push(Toast {
                    id: next.next_id,
                    kind,
                    message,
                });
                next.next_id = next.next_id.wrapping_add(1);
            }
            ToastAction::Dismiss(id) => next.toasts.retain(|toast| toast.id != id),
        }
        Rc::new(next)
    }
}

/// Handle for raising notifications from any component.
#[derive(Clone, PartialEq)]
pub struct Toaster {
    dispatcher: UseReducerDispatcher<ToastList>,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.dispatcher
            .dispatch(ToastAction::Push(ToastKind::Success, message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.dispatcher
            .dispatch(ToastAction::Push(ToastKind::Error, message.into()));
    }
}

#[hook]
pub fn use_toast() -> Toaster {
    use_context::<Toaster>().expect("use_toast must be called inside a ToastProvider")
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let list = use_reducer(ToastList::default);
    let toaster = Toaster {
        dispatcher: list.dispatcher(),
    };

    let on_dismiss = {
        let dispatcher = list.dispatcher();
        Callback::from(move |id: u32| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<Toaster> context={toaster}>
            { props.children.clone() }
            <div class="toast-viewport">
                { for list.toasts.iter().map(|toast| html! {
                    <ToastItem key={toast.id} toast={toast.clone()} on_dismiss={on_dismiss.clone()} />
                })}
            </div>
        </ContextProvider<Toaster>>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
    on_dismiss: Callback<u32>,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    let id = props.toast.id;

    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(id, move |id| {
            let id = *id;
            let timeout = Timeout::new(TOAST_DURATION_MS, move || on_dismiss.emit(id));
            move || drop(timeout)
        });
    }

    let close = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    html! {
        <div class={props.toast.kind.class()} role="status">
            <span class="toast-message">{ &props.toast.message }</span>
            <button class="toast-close" onclick={close}>{"x"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let list = Rc::new(ToastList::default());
        let list = list.reduce(ToastAction::Push(ToastKind::Success, "saved".to_string()));
        let list = list.reduce(ToastAction::Push(ToastKind::Error, "failed".to_string()));

        let ids: Vec<u32> = list.toasts.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(list.toasts[1].kind, ToastKind::Error);
    }

    #[test]
    fn test_dismiss_removes_only_that_toast() {
        let list = Rc::new(ToastList::default())
            .reduce(ToastAction::Push(ToastKind::Success, "one".to_string()))
            .reduce(ToastAction::Push(ToastKind::Success, "two".to_string()))
            .reduce(ToastAction::Dismiss(0));

        assert_eq!(list.toasts.len(), 1);
        assert_eq!(list.toasts[0].message, "two");
    }
}
