use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_invalidate};
use crate::components::feedback::{loading_block, Alert, AlertVariant};
use crate::components::form_fields::TextField;
use crate::components::toast::use_toast;
use crate::features::subscriptions::{create_subscription, CardDetails, CreateSubscription, PLUS_PLAN_ID};
use crate::forms::{ActiveForm, FieldErrors, FormValues};
use crate::pages::landing::{frequency_suffix, use_plans};
use crate::route::{use_navigator, Route};
use crate::session::use_session;

fn card_from_form(values: &FormValues) -> CardDetails {
    CardDetails {
        number: values.text("card_number"),
        expiry: values.text("expiry"),
        cvc: values.text("cvc"),
        holder: values.text("holder"),
    }
}

#[derive(Properties, PartialEq)]
pub struct SubscribePageProps {
    #[prop_or_default]
    pub plan_id: Option<u32>,
}

#[function_component(SubscribePage)]
pub fn subscribe_page(props: &SubscribePageProps) -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let toaster = use_toast();
    let invalidate = use_invalidate();
    let (plans, loading) = use_plans();
    let values = use_state(FormValues::new);
    let failure = use_state(|| None::<&'static str>);
    let paying = use_state(|| false);

    if loading {
        return loading_block();
    }

    let plan_id = props.plan_id.unwrap_or(PLUS_PLAN_ID);
    let Some(plan) = plans.into_iter().find(|p| p.id == plan_id) else {
        let back = Callback::from(move |_| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(Route::Landing);
            }
        });
        return html! {
            <div class="min-h-screen flex flex-col items-center justify-center gap-4 bg-background p-6">
                <Alert variant={AlertVariant::Destructive} title="Plan no encontrado">
                    {"El plan que buscas no existe o ya no está disponible."}
                </Alert>
                <button onclick={back} class="bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm">{"Ver planes"}</button>
            </div>
        };
    };

    let onsubmit = {
        let values = values.clone();
        let failure = failure.clone();
        let paying = paying.clone();
        let frequency = plan.frequency.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(message) = card_from_form(&values).validate() {
                failure.set(Some(message));
                return;
            }
            failure.set(None);

            let Some(session) = session.clone() else {
                if let Some(toaster) = toaster.as_ref() {
                    toaster.info("Inicia sesión o crea una cuenta para completar tu suscripción");
                }
                if let Some(navigator) = navigator.as_ref() {
                    navigator.push(Route::Login);
                }
                return;
            };

            let body = CreateSubscription {
                user_id: session.user_id,
                plan_id,
                frequency: if frequency.is_empty() { "monthly".to_string() } else { frequency.clone() },
            };
            let client = ApiClient::new(Some(&session));
            let toaster = toaster.clone();
            let navigator = navigator.clone();
            let invalidate = invalidate.clone();
            let paying = paying.clone();
            paying.set(true);
            spawn_local(async move {
                let result = create_subscription(&client, &body).await;
                paying.set(false);
                match result {
                    Ok(_) => {
                        invalidate.emit(cache::SUBSCRIPTION);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.success("¡Suscripción activada!");
                        }
                        if let Some(navigator) = navigator.as_ref() {
                            navigator.push(Route::Dashboard);
                        }
                    }
                    Err(e) => {
                        error!("subscription to plan {} failed: {}", body.plan_id, e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error(e.user_message("No se pudo procesar el pago"));
                        }
                    }
                }
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background p-4">
            <div class="w-full max-w-4xl grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="bg-[#173E63] text-white rounded-2xl p-8">
                    <p class="text-xs uppercase tracking-widest opacity-70">{"Resumen"}</p>
                    <h1 class="text-3xl font-black mt-2">{ plan.name.clone() }</h1>
                    if let Some(description) = plan.description.clone() {
                        <p class="mt-2 opacity-80">{ description }</p>
                    }
                    <p class="mt-6 text-4xl font-black">
                        { format!("${}", plan.price) }
                        <span class="text-base font-normal opacity-70">{ frequency_suffix(&plan.frequency) }</span>
                    </p>
                    <ul class="mt-6 space-y-2 text-sm">
                        { for plan.features.iter().map(|feature| html! { <li>{ format!("✓ {}", feature) }</li> }) }
                    </ul>
                </div>
                <ContextProvider<ActiveForm> context={ActiveForm(values.clone())}>
                    <ContextProvider<FieldErrors> context={FieldErrors::default()}>
                        <form {onsubmit} class="bg-card border border-border rounded-2xl shadow-sm p-8 space-y-4">
                            <h2 class="text-xl font-bold text-foreground">{"Datos de pago"}</h2>
                            <TextField name="holder" label="Titular de la tarjeta" />
                            <TextField name="card_number" label="Número de tarjeta" placeholder="4242 4242 4242 4242" />
                            <div class="grid grid-cols-2 gap-4">
                                <TextField name="expiry" label="Expiración" placeholder="MM/YY" />
                                <TextField name="cvc" label="CVC" placeholder="123" />
                            </div>
                            if let Some(message) = *failure {
                                <div class="text-sm text-red-500">{ message }</div>
                            }
                            <button type="submit" disabled={*paying}
                                class="w-full bg-[#173E63] text-white py-2 rounded-xl font-bold hover:bg-[#1D617A] disabled:opacity-50">
                                { if *paying { "Procesando...".to_string() } else { format!("Pagar ${}", plan.price) } }
                            </button>
                        </form>
                    </ContextProvider<FieldErrors>>
                </ContextProvider<ActiveForm>>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_fields_map_to_details() {
        let values = FormValues::new()
            .with_text("card_number", "4242424242424242")
            .with_text("expiry", "10/29")
            .with_text("cvc", "321")
            .with_text("holder", "Luis Gómez");
        let card = card_from_form(&values);
        assert_eq!(card.expiry, "10/29");
        assert_eq!(card.validate(), Ok(()));
        assert!(card_from_form(&FormValues::new()).validate().is_err());
    }
}
