use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query, QueryState};
use crate::components::feedback::{Alert, AlertVariant};
use crate::components::icons::icon_sparkles;
use crate::error::AppError;
use crate::features::subscriptions::{get_subscription, has_lite_plan, has_premium_access, Subscription, PLUS_PLAN_ID};
use crate::format::format_date_str;
use crate::period::today;
use crate::route::{use_navigator, Route};
use crate::session::use_session;

#[hook]
pub fn use_subscription() -> QueryState<Option<Subscription>> {
    let session = use_session();
    use_query(cache::SUBSCRIPTION, session, |session| async move {
        let session = session.ok_or(AppError::Unauthenticated)?;
        get_subscription(&ApiClient::new(Some(&session)), session.user_id).await
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PremiumGate {
    Checking,
    Allowed,
    Denied,
}

#[hook]
pub fn use_premium_gate() -> PremiumGate {
    let subscription = use_subscription();
    let navigator = use_navigator();
    let current = subscription.data.clone().flatten();
    let gate = if subscription.loading && subscription.data.is_none() {
        PremiumGate::Checking
    } else if has_lite_plan(current.as_ref()) {
        PremiumGate::Denied
    } else {
        PremiumGate::Allowed
    };

    use_effect_with_deps(
        move |gate| {
            if *gate == PremiumGate::Denied {
                if let Some(navigator) = navigator {
                    navigator.replace(Route::Dashboard);
                }
            }
            || ()
        },
        gate,
    );

    gate
}

#[derive(Properties, PartialEq)]
pub struct PremiumFeatureAlertProps {
    #[prop_or(AttrValue::from("reportes"))]
    pub feature: AttrValue,
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn premium_message(feature: &str) -> String {
    let plural = feature == "reportes";
    format!(
        "{} {} {} solo para usuarios con plan Plus.",
        capitalize(feature),
        if plural { "están" } else { "está" },
        if plural { "disponibles" } else { "disponible" },
    )
}

#[function_component(PremiumFeatureAlert)]
pub fn premium_feature_alert(props: &PremiumFeatureAlertProps) -> Html {
    let navigator = use_navigator();
    let upgrade = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(Route::Subscribe {
                plan_id: Some(PLUS_PLAN_ID),
            });
        }
    });

    html! {
        <Alert variant={AlertVariant::Warning} title="Función Premium">
            <p>{ premium_message(&props.feature) }</p>
            <button onclick={upgrade} class="mt-2 px-3 py-1 text-xs font-bold rounded-lg border border-yellow-600 text-yellow-700 hover:bg-yellow-600 hover:text-white transition-colors">
                {"Actualizar a Plan Plus"}
            </button>
        </Alert>
    }
}

#[function_component(SubscriptionBadge)]
pub fn subscription_badge() -> Html {
    let subscription = use_subscription();
    let navigator = use_navigator();
    let Some(subscription) = subscription.data.clone().flatten() else {
        return html! {};
    };

    let day = today();
    let body = if subscription.is_demo() {
        let see_plans = Callback::from(move |_| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(Route::Landing);
            }
        });
        html! {
            <div class="space-y-3">
                <div class="flex justify-between text-xs font-medium">
                    <span class="text-slate-300">{"Prueba"}</span>
                    <span class="text-yellow-400">{ format!("{} días", subscription.days_remaining(day)) }</span>
                </div>
                <div class="h-1.5 w-full bg-yellow-500/10 rounded-full overflow-hidden">
                    <div class="h-full bg-yellow-500" style={format!("width: {}%", subscription.remaining_percent(day) as i32)}></div>
                </div>
                <button onclick={see_plans} class="w-full h-8 text-xs rounded-lg bg-yellow-600 hover:bg-yellow-700 text-white">{"Ver Planes"}</button>
            </div>
        }
    } else {
        html! { <p class="text-xs text-slate-300">{"Tu plan está activo y funcionando correctamente."}</p> }
    };

    html! {
        <div class="rounded-xl p-4 border border-white/10 bg-white/5 mt-4">
            <div class="flex items-center gap-2 mb-3 text-white">
                { icon_sparkles() }
                <span class="font-semibold text-sm truncate">{ subscription.plan_name().to_string() }</span>
            </div>
            { body }
        </div>
    }
}

#[function_component(SubscriptionStatus)]
pub fn subscription_status() -> Html {
    let subscription = use_subscription();
    let navigator = use_navigator();
    let current = subscription.data.clone().flatten();

    let Some(current) = current else {
        let see_plans = Callback::from(move |_| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(Route::Landing);
            }
        });
        return html! {
            <div class="bg-card rounded-[10px] p-6 border border-border">
                <h3 class="font-bold text-foreground text-lg mb-2">{"Suscripción"}</h3>
                <p class="text-sm text-muted-foreground">{"No tienes una suscripción activa."}</p>
                <button onclick={see_plans} class="mt-3 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm">{"Ver Planes"}</button>
            </div>
        };
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border space-y-2">
            <div class="flex items-center justify-between">
                <h3 class="font-bold text-foreground text-lg">{ current.plan_name().to_string() }</h3>
                <span class={classes!("px-3", "py-1", "rounded-full", "text-[10px]", "font-bold",
                    if has_premium_access(Some(&current)) { "bg-green-100 text-green-700" } else { "bg-secondary text-secondary-foreground" })}>
                    { current.status.clone() }
                </span>
            </div>
            if let Some(next) = current.next_payment_date.as_deref() {
                <p class="text-sm text-muted-foreground">{ format!("Próximo pago: {}", format_date_str(next)) }</p>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_agrees_with_feature() {
        assert_eq!(
            premium_message("reportes"),
            "Reportes están disponibles solo para usuarios con plan Plus."
        );
        assert_eq!(
            premium_message("esta función"),
            "Esta función está disponible solo para usuarios con plan Plus."
        );
    }
}
