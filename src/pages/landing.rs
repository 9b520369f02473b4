use log::warn;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::icons::icon_check;
use crate::features::subscriptions::{fallback_plans, list_plans, Plan, PLUS_PLAN_ID};
use crate::route::{use_navigator, Route};
use crate::session::use_session;

#[hook]
pub fn use_plans() -> (Vec<Plan>, bool) {
    let plans = use_query(cache::PLANS, (), |_| async move { list_plans(&ApiClient::anonymous()).await });
    if let Some(error) = plans.error.as_ref() {
        warn!("plan catalogue unavailable: {}", error);
    }
    let list = plans.value();
    let loading = plans.loading && plans.data.is_none();
    if list.is_empty() && !loading {
        (fallback_plans(), false)
    } else {
        (list, loading)
    }
}

pub fn frequency_suffix(frequency: &str) -> &'static str {
    match frequency.to_lowercase().as_str() {
        "yearly" | "annual" | "anual" => "/año",
        "weekly" | "semanal" => "/semana",
        _ => "/mes",
    }
}

#[function_component(LandingPage)]
pub fn landing_page() -> Html {
    let navigator = use_navigator();
    let session = use_session();
    let (plans, loading) = use_plans();

    let go = |route: Route| {
        let navigator = navigator.clone();
        Callback::from(move |_| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(route.clone());
            }
        })
    };

    html! {
        <div class="min-h-screen bg-background">
            <header class="flex items-center justify-between px-8 py-5 border-b border-border bg-card">
                <span class="text-2xl font-black text-[#173E63]">{"Fopy"}</span>
                <nav class="flex items-center gap-3">
                    if session.is_some() {
                        <button onclick={go(Route::Dashboard)} class="bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm">{"Ir al panel"}</button>
                    } else {
                        <button onclick={go(Route::Login)} class="px-4 py-2 rounded-xl font-bold text-sm text-[#173E63]">{"Iniciar sesión"}</button>
                        <button onclick={go(Route::Register)} class="bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm">{"Crear cuenta"}</button>
                    }
                </nav>
            </header>

            <section class="max-w-4xl mx-auto text-center px-6 py-16">
                <h1 class="text-4xl md:text-5xl font-black text-foreground tracking-tight">{"Tus finanzas, bajo control"}</h1>
                <p class="mt-4 text-lg text-muted-foreground">
                    {"Registra gastos por voz, arma presupuestos, alcanza tus metas y recibe recomendaciones pensadas para ti."}
                </p>
            </section>

            <section class="max-w-5xl mx-auto px-6 pb-20">
                <h2 class="text-2xl font-bold text-center text-foreground mb-8">{"Elige tu plan"}</h2>
                if loading {
                    <p class="text-center text-muted-foreground">{"Cargando planes..."}</p>
                } else {
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                        { for plans.iter().map(|plan| {
                            let highlighted = plan.id == PLUS_PLAN_ID;
                            html! {
                                <div key={plan.id} class={classes!("bg-card", "rounded-2xl", "p-8", "shadow-sm", "border",
                                    if highlighted { "border-[#173E63] ring-2 ring-[#173E63]/20" } else { "border-border" })}>
                                    <h3 class="text-xl font-bold text-foreground">{ plan.name.clone() }</h3>
                                    if let Some(description) = plan.description.clone() {
                                        <p class="text-sm text-muted-foreground mt-1">{ description }</p>
                                    }
                                    <p class="mt-6">
                                        <span class="text-4xl font-black text-[#1D617A]">{ format!("${}", plan.price) }</span>
                                        <span class="text-muted-foreground">{ frequency_suffix(&plan.frequency) }</span>
                                    </p>
                                    <ul class="mt-6 space-y-2 text-sm">
                                        { for plan.features.iter().map(|feature| html! {
                                            <li class="flex items-center gap-2">{ icon_check() }{ feature.clone() }</li>
                                        }) }
                                    </ul>
                                    <button onclick={go(Route::Subscribe { plan_id: Some(plan.id) })}
                                        class="mt-8 w-full bg-[#173E63] text-white py-2 rounded-xl font-bold hover:bg-[#1D617A]">
                                        {"Suscribirme"}
                                    </button>
                                </div>
                            }
                        }) }
                    </div>
                }
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_follows_billing_frequency() {
        assert_eq!(frequency_suffix("monthly"), "/mes");
        assert_eq!(frequency_suffix("YEARLY"), "/año");
        assert_eq!(frequency_suffix(""), "/mes");
    }
}
