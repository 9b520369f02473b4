use std::future::Future;

use log::{error, warn};
use serde_json::{Map, Value};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_invalidate, use_query, QueryState};
use crate::components::form_fields::SelectOption;
use crate::components::icons::icon_plus;
use crate::components::toast::{use_toast, Toaster};
use crate::error::{AppError, AppResult};
use crate::features::categories::{list_categories, Category};
use crate::features::payment_methods::{list_payment_methods, PaymentMethod};
use crate::route::{use_navigator, Navigator, Route};
use crate::session::{clear_session, use_session, Session, SessionHandle};
use crate::storage::take_recommendation_action;

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod debts;
pub mod goals;
pub mod landing;
pub mod payment_methods;
pub mod profile;
pub mod reports;
pub mod subscribe;
pub mod transactions;

#[hook]
pub fn use_categories() -> QueryState<Vec<Category>> {
    let session = use_session();
    use_query(cache::CATEGORIES, session, |session| async move {
        list_categories(&ApiClient::new(session.as_ref())).await
    })
}

#[hook]
pub fn use_payment_methods() -> QueryState<Vec<PaymentMethod>> {
    let session = use_session();
    use_query(cache::PAYMENT_METHODS, session, |session| async move {
        list_payment_methods(&ApiClient::new(session.as_ref())).await
    })
}

pub async fn for_user<T, F, Fut>(session: Option<Session>, fetch: F) -> AppResult<T>
where
    F: FnOnce(ApiClient, u64) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let session = session.ok_or(AppError::Unauthenticated)?;
    fetch(ApiClient::new(Some(&session)), session.user_id).await
}

pub fn category_options(categories: &[Category]) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|c| SelectOption::new(c.id, format!("{} {}", c.icon_or("📦"), c.name)))
        .collect()
}

pub fn payment_method_options(methods: &[PaymentMethod]) -> Vec<SelectOption> {
    methods.iter().map(|m| SelectOption::new(m.id, m.name.clone())).collect()
}

pub fn load_prefill(data: Option<&str>, from_recommendation: bool) -> Option<Map<String, Value>> {
    if let Some(raw) = data {
        match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(map) => return Some(map),
            Err(e) => warn!("ignoring malformed prefill data: {}", e),
        }
    }
    if from_recommendation {
        take_recommendation_action()
    } else {
        None
    }
}

#[derive(Clone)]
pub struct SubmitFlow {
    key: &'static str,
    done: Route,
    toaster: Option<Toaster>,
    navigator: Option<Navigator>,
    invalidate: Callback<&'static str>,
    session: Option<SessionHandle>,
}

impl SubmitFlow {
    pub fn toast_error(&self, message: &str) {
        if let Some(toaster) = self.toaster.as_ref() {
            toaster.error(message);
        }
    }

    // A rejected token drops the session.
    pub fn run<T, Fut>(&self, submitting: UseStateHandle<bool>, success: &'static str, failure: &'static str, action: Fut)
    where
        T: 'static,
        Fut: Future<Output = AppResult<T>> + 'static,
    {
        let flow = self.clone();
        submitting.set(true);
        spawn_local(async move {
            let result = action.await;
            submitting.set(false);
            match result {
                Ok(_) => {
                    flow.invalidate.emit(flow.key);
                    if let Some(toaster) = flow.toaster.as_ref() {
                        toaster.success(success);
                    }
                    if let Some(navigator) = flow.navigator.as_ref() {
                        navigator.push(flow.done.clone());
                    }
                }
                Err(e) => {
                    error!("{} save failed: {}", flow.key, e);
                    flow.toast_error(&e.user_message(failure));
                    if e.is_unauthenticated() {
                        clear_session();
                        if let Some(session) = flow.session.as_ref() {
                            session.set(None);
                        }
                    }
                }
            }
        });
    }
}

#[hook]
pub fn use_submit_flow(key: &'static str, done: Route) -> SubmitFlow {
    SubmitFlow {
        key,
        done,
        toaster: use_toast(),
        navigator: use_navigator(),
        invalidate: use_invalidate(),
        session: use_context::<SessionHandle>(),
    }
}

#[hook]
pub fn use_delete<F, Fut>(key: &'static str, delete: F) -> Callback<u64>
where
    F: Fn(ApiClient, u64) -> Fut + 'static,
    Fut: Future<Output = AppResult<()>> + 'static,
{
    let session = use_session();
    let toaster = use_toast();
    let invalidate = use_invalidate();
    Callback::from(move |id: u64| {
        let pending = delete(ApiClient::new(session.as_ref()), id);
        let toaster = toaster.clone();
        let invalidate = invalidate.clone();
        spawn_local(async move {
            match pending.await {
                Ok(()) => {
                    invalidate.emit(key);
                    if let Some(toaster) = toaster.as_ref() {
                        toaster.success("Registro eliminado");
                    }
                }
                Err(e) => {
                    error!("could not delete {} {}: {}", key, id, e);
                    if let Some(toaster) = toaster.as_ref() {
                        toaster.error(e.user_message("No se pudo eliminar el registro"));
                    }
                }
            }
        });
    })
}

pub fn list_actions(navigator: Option<Navigator>, create: Route, label: &str) -> Html {
    let onclick = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(create.clone());
        }
    });
    html! {
        <button {onclick} class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A]">
            { icon_plus() }
            { label.to_string() }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct NotFoundProps {
    pub path: AttrValue,
}

#[function_component(NotFoundPage)]
pub fn not_found_page(props: &NotFoundProps) -> Html {
    let navigator = use_navigator();
    let home = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(Route::Landing);
        }
    });
    html! {
        <div class="min-h-screen flex flex-col items-center justify-center gap-4 bg-background text-center p-6">
            <h1 class="text-5xl font-black text-[#173E63]">{"404"}</h1>
            <p class="text-muted-foreground">{ format!("No encontramos la página {}", props.path) }</p>
            <button onclick={home} class="bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm">{"Volver al inicio"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_data_is_parsed_as_prefill() {
        let prefill = load_prefill(Some(r#"{"amount": 25, "description": "Café"}"#), false).unwrap();
        assert_eq!(prefill.get("amount"), Some(&Value::from(25)));
        assert!(load_prefill(Some("not json"), false).is_none());
        assert!(load_prefill(None, false).is_none());
    }

    #[test]
    fn options_show_icon_and_name() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"id": 3, "name": "Comida", "icon": "🍔"},
            {"id": 4, "name": "Hogar"}
        ]))
        .unwrap();
        let options = category_options(&categories);
        assert_eq!(options[0], SelectOption::new(3, "🍔 Comida"));
        assert_eq!(options[1].label, "📦 Hogar");
    }
}
