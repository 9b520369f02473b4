use std::rc::Rc;

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

const TOAST_TTL_MS: i32 = 4000;

pub fn after(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
        .is_err()
    {
        warn!("could not schedule timer");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "border-green-200 bg-green-50 text-green-800",
            ToastKind::Error => "border-red-200 bg-red-50 text-red-700",
            ToastKind::Info => "border-blue-200 bg-blue-50 text-blue-800",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastList {
    pub items: Vec<Toast>,
    next_id: u32,
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
                next.items.push(Toast {
                    id: next.next_id,
                    kind,
                    message,
                });
                next.next_id = next.next_id.wrapping_add(1);
            }
            ToastAction::Dismiss(id) => next.items.retain(|toast| toast.id != id),
        }
        Rc::new(next)
    }
}

#[derive(Clone, PartialEq)]
pub struct Toaster {
    list: UseReducerHandle<ToastList>,
}

impl Toaster {
    fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let list = self.list.clone();
        let id = list.next_id;
        list.dispatch(ToastAction::Push(kind, message.into()));
        after(TOAST_TTL_MS, move || list.dispatch(ToastAction::Dismiss(id)));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }
}

#[hook]
pub fn use_toast() -> Option<Toaster> {
    use_context::<Toaster>()
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let list = use_reducer(ToastList::default);
    let toaster = Toaster { list: list.clone() };

    html! {
        <ContextProvider<Toaster> context={toaster}>
            { for props.children.iter() }
            <div class="fixed top-4 right-4 z-[100] flex flex-col gap-2 w-80">
                { for list.items.iter().map(|toast| {
                    let list = list.clone();
                    let id = toast.id;
                    html! {
                        <div key={toast.id} class={classes!("rounded-xl", "border", "px-4", "py-3", "text-sm", "shadow-lg", "flex", "justify-between", "gap-3", toast.kind.class())}>
                            <span>{ toast.message.clone() }</span>
                            <button class="text-xs opacity-60 hover:opacity-100" onclick={Callback::from(move |_| list.dispatch(ToastAction::Dismiss(id)))}>{"✕"}</button>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<Toaster>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_dismiss_keep_ids_unique() {
        let list = Rc::new(ToastList::default());
        let list = list.reduce(ToastAction::Push(ToastKind::Success, "Guardado".into()));
        let list = list.reduce(ToastAction::Push(ToastKind::Error, "Falló".into()));
        assert_eq!(list.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![0, 1]);

        let list = list.reduce(ToastAction::Dismiss(0));
        let list = list.reduce(ToastAction::Push(ToastKind::Info, "Hola".into()));
        assert_eq!(list.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(list.items[0].kind, ToastKind::Error);
    }
}
