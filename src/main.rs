use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod api;
mod cache;
mod components;
mod config;
mod error;
mod features;
mod format;
mod forms;
mod logging;
mod menu;
mod pages;
mod period;
mod route;
mod session;
mod storage;

use crate::cache::{QueryCache, QueryRevisions};
use crate::components::layout::Layout;
use crate::components::toast::ToastProvider;
use crate::config::app_config;
use crate::pages::auth::{ForgotPasswordPage, LoginPage, RegisterPage, ResetPasswordPage};
use crate::pages::budgets::{BudgetFormPage, BudgetsPage};
use crate::pages::categories::{CategoriesPage, CategoryFormPage};
use crate::pages::dashboard::DashboardPage;
use crate::pages::debts::{DebtFormPage, DebtPaymentPage, DebtsPage};
use crate::pages::goals::{GoalFormPage, GoalsPage};
use crate::pages::landing::LandingPage;
use crate::pages::payment_methods::{PaymentMethodFormPage, PaymentMethodsPage};
use crate::pages::profile::ProfilePage;
use crate::pages::reports::{ReportCreatePage, ReportDetailPage, ReportsPage};
use crate::pages::subscribe::SubscribePage;
use crate::pages::transactions::{TransactionFormPage, TransactionsPage};
use crate::pages::NotFoundPage;
use crate::route::{current_location_route, Navigator, Resource, Route};
use crate::session::{load_session, SessionHandle};

fn list_page(resource: Resource) -> Html {
    match resource {
        Resource::Goals => html! { <GoalsPage /> },
        Resource::Budgets => html! { <BudgetsPage /> },
        Resource::Debts => html! { <DebtsPage /> },
        Resource::Transactions => html! { <TransactionsPage /> },
        Resource::Categories => html! { <CategoriesPage /> },
        Resource::PaymentMethods => html! { <PaymentMethodsPage /> },
    }
}

fn form_page(resource: Resource, id: Option<u64>, data: Option<String>) -> Html {
    match resource {
        Resource::Goals => html! { <GoalFormPage {id} {data} /> },
        Resource::Budgets => html! { <BudgetFormPage {id} {data} /> },
        Resource::Debts => html! { <DebtFormPage {id} {data} /> },
        Resource::Transactions => html! { <TransactionFormPage {id} {data} /> },
        Resource::Categories => html! { <CategoryFormPage {id} /> },
        Resource::PaymentMethods => html! { <PaymentMethodFormPage {id} /> },
    }
}

fn management_page(route: &Route) -> Html {
    match route.clone() {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::List(resource) => list_page(resource),
        Route::Create { resource, data } => form_page(resource, None, data),
        Route::Edit { resource, id } => form_page(resource, Some(id), None),
        Route::DebtPayment { id } => html! { <DebtPaymentPage {id} /> },
        Route::Reports => html! { <ReportsPage /> },
        Route::ReportCreate { period } => html! { <ReportCreatePage {period} /> },
        Route::ReportDetail { id } => html! { <ReportDetailPage {id} /> },
        Route::Profile => html! { <ProfilePage /> },
        other => html! { <NotFoundPage path={other.path()} /> },
    }
}

fn public_page(route: &Route) -> Html {
    match route.clone() {
        Route::Landing => html! { <LandingPage /> },
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::ForgotPassword => html! { <ForgotPasswordPage /> },
        Route::ResetPassword { token } => html! { <ResetPasswordPage {token} /> },
        Route::Subscribe { plan_id } => html! { <SubscribePage {plan_id} /> },
        other => html! { <NotFoundPage path={other.path()} /> },
    }
}

fn must_sign_in(route: &Route, signed_in: bool) -> bool {
    route.requires_session() && !signed_in
}

#[hook]
fn use_history_listener(route: UseStateHandle<Route>) {
    use_effect_with_deps(
        move |_| {
            let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                route.set(current_location_route());
            });
            let window = web_sys::window();
            if let Some(window) = window.as_ref() {
                if window
                    .add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
                    .is_err()
                {
                    log::warn!("could not listen for popstate");
                }
            }
            move || {
                if let Some(window) = window.as_ref() {
                    if window
                        .remove_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
                        .is_err()
                    {
                        log::warn!("could not remove popstate listener");
                    }
                }
            }
        },
        (),
    );
}

#[function_component(App)]
fn app() -> Html {
    let session: SessionHandle = use_state(load_session);
    let queries = use_reducer(QueryRevisions::default);
    let route = use_state(current_location_route);
    let navigator = Navigator::new(route.clone());
    use_history_listener(route.clone());

    let blocked = must_sign_in(&route, session.is_some());
    {
        let navigator = navigator.clone();
        use_effect_with_deps(
            move |blocked| {
                if *blocked {
                    log::info!("no session, redirecting to login");
                    navigator.replace(Route::Login);
                }
                || ()
            },
            blocked,
        );
    }

    let content = if blocked {
        html! {}
    } else if route.requires_session() {
        html! { <Layout>{ management_page(&route) }</Layout> }
    } else {
        public_page(&route)
    };

    html! {
        <ContextProvider<SessionHandle> context={session}>
            <ContextProvider<QueryCache> context={queries}>
                <ContextProvider<Navigator> context={navigator}>
                    <ToastProvider>
                        { content }
                    </ToastProvider>
                </ContextProvider<Navigator>>
            </ContextProvider<QueryCache>>
        </ContextProvider<SessionHandle>>
    }
}

fn main() {
    logging::init(app_config().log_level);
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn management_routes_need_a_session() {
        assert!(must_sign_in(&Route::Dashboard, false));
        assert!(must_sign_in(&Route::List(Resource::Debts), false));
        assert!(!must_sign_in(&Route::Dashboard, true));
        assert!(!must_sign_in(&Route::Login, false));
        assert!(!must_sign_in(&Route::Subscribe { plan_id: Some(2) }, false));
    }
}
