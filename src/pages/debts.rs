use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::entity_form::{ConfirmDelete, EntityForm};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::form_fields::{DateField, SelectField, TextAreaField, TextField};
use crate::components::icons::icon_pencil;
use crate::components::layout::page_shell;
use crate::features::dashboard::{capped_percent, progress_color};
use crate::features::debts::{
    create_debt, default_form, delete_debt, from_form, get_debt, list_debts, pay_debt, payment_form,
    payment_from_form, to_form, update_debt, Debt,
};
use crate::forms::{FieldErrors, FormValues};
use crate::format::{format_currency, format_date_str, format_percent};
use crate::pages::{
    category_options, for_user, list_actions, load_prefill, payment_method_options, use_categories,
    use_delete, use_payment_methods, use_submit_flow,
};
use crate::route::{use_navigator, Navigator, Resource, Route};
use crate::session::use_session;

#[function_component(DebtsPage)]
pub fn debts_page() -> Html {
    let session = use_session();
    let debts = use_query(cache::DEBTS, session, |session| {
        for_user(session, |client, user_id| async move { list_debts(&client, user_id).await })
    });
    let navigator = use_navigator();
    let on_delete = use_delete(cache::DEBTS, |client, id| async move { delete_debt(&client, id).await });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::Debts,
            data: None,
        },
        "Nueva deuda",
    );

    let list = debts.value();
    let body = if debts.loading && debts.data.is_none() {
        loading_block()
    } else if list.is_empty() {
        html! { <EmptyState message="No tienes deudas registradas." /> }
    } else {
        html! {
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for list.iter().map(|debt| debt_card(debt, navigator.clone(), on_delete.clone())) }
            </div>
        }
    };

    page_shell("Deudas", actions, body)
}

fn debt_card(debt: &Debt, navigator: Option<Navigator>, on_delete: Callback<u64>) -> Html {
    let id = debt.id;
    let paid = debt.paid_percent();
    let width = format!(
        "width: {}%",
        capped_percent(debt.original_amount - debt.pending_amount, debt.original_amount)
    );
    let edit = {
        let navigator = navigator.clone();
        Callback::from(move |_| {
            if let Some(n) = navigator.as_ref() {
                n.push(Route::Edit {
                    resource: Resource::Debts,
                    id,
                });
            }
        })
    };
    let pay = Callback::from(move |_| {
        if let Some(n) = navigator.as_ref() {
            n.push(Route::DebtPayment { id });
        }
    });

    html! {
        <div key={id} class="bg-card p-5 rounded-[10px] shadow-sm border border-border">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="font-bold text-foreground">{ debt.description.clone() }</h3>
                    if let Some(due) = debt.due_date.as_deref() {
                        <p class="text-xs text-muted-foreground">{ format!("Vence el {}", format_date_str(due)) }</p>
                    }
                </div>
                <div class="flex items-center gap-1">
                    <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar" onclick={edit}>
                        { icon_pencil() }
                    </button>
                    <ConfirmDelete on_confirm={Callback::from(move |_| on_delete.emit(id))} />
                </div>
            </div>
            <div class="mt-4 flex justify-between text-sm">
                <span>{ format!("Pendiente: {}", format_currency(debt.pending_amount)) }</span>
                <span class="text-muted-foreground">{ format_currency(debt.original_amount) }</span>
            </div>
            <div class="w-full h-2 bg-secondary rounded-full mt-2 overflow-hidden">
                <div class={classes!("h-full", "rounded-full", progress_color(paid, false))} style={width}></div>
            </div>
            <div class="mt-3 flex items-center justify-between">
                <span class="text-xs text-muted-foreground">
                    { format!("Pagado {}", format_percent(paid)) }
                    if let Some(rate) = debt.interest_rate {
                        { format!(" · Interés {}", format_percent(rate)) }
                    }
                </span>
                if debt.is_pending() {
                    <button onclick={pay} class="px-3 py-1.5 rounded-xl bg-[#173E63] text-white text-xs font-bold hover:bg-[#1D617A]">
                        {"Registrar pago"}
                    </button>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DebtFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
    #[prop_or_default]
    pub data: Option<String>,
}

#[function_component(DebtFormPage)]
pub fn debt_form_page(props: &DebtFormPageProps) -> Html {
    let session = use_session();
    let categories = use_categories();
    let values = use_state(default_form);
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let flow = use_submit_flow(cache::DEBTS, Route::List(Resource::Debts));

    {
        let values = values.clone();
        let session = session.clone();
        let flow = flow.clone();
        use_effect_with_deps(
            move |(id, data)| {
                match *id {
                    Some(id) => {
                        let client = ApiClient::new(session.as_ref());
                        spawn_local(async move {
                            match get_debt(&client, id).await {
                                Ok(debt) => values.set(to_form(&debt)),
                                Err(e) => {
                                    error!("could not load debt {}: {}", id, e);
                                    flow.toast_error("No se pudo cargar la deuda");
                                }
                            }
                        });
                    }
                    None => {
                        if let Some(prefill) = load_prefill(data.as_deref(), false) {
                            let mut next = (*values).clone();
                            next.apply_json(&prefill);
                            values.set(next);
                        }
                    }
                }
                || ()
            },
            (props.id, props.data.clone()),
        );
    }

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let id = props.id;
        Callback::from(move |_| {
            let user_id = session.as_ref().map(|s| s.user_id);
            let payload = match from_form(&values, user_id) {
                Ok(payload) => payload,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let client = ApiClient::new(session.as_ref());
            match id {
                Some(id) => flow.run(submitting.clone(), "Deuda actualizada", "Error al actualizar la deuda", async move {
                    update_debt(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Deuda creada", "Error al crear la deuda", async move {
                    create_debt(&client, &payload).await
                }),
            }
        })
    };

    let title = if props.id.is_some() { "Editar deuda" } else { "Nueva deuda" };
    html! {
        <EntityForm {title} back={Route::List(Resource::Debts)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting} voice={props.id.is_none()}>
            <TextField name="description" label="Descripción" placeholder="Ej. Préstamo del auto" />
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <TextField name="original_amount" label="Monto total" input_type="number" />
                <TextField name="pending_amount" label="Monto pendiente" input_type="number" />
            </div>
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <TextField name="interest_rate" label="Tasa de interés (%)" input_type="number" />
                <DateField name="due_date" label="Fecha de vencimiento" />
            </div>
            <SelectField name="category_id" label="Categoría" options={category_options(&categories.value())} />
        </EntityForm>
    }
}

#[derive(Properties, PartialEq)]
pub struct DebtPaymentPageProps {
    pub id: u64,
}

#[function_component(DebtPaymentPage)]
pub fn debt_payment_page(props: &DebtPaymentPageProps) -> Html {
    let session = use_session();
    let methods = use_payment_methods();
    let debt = use_state(|| None::<Debt>);
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let flow = use_submit_flow(cache::DEBTS, Route::List(Resource::Debts));

    {
        let debt = debt.clone();
        let values = values.clone();
        let session = session.clone();
        let flow = flow.clone();
        use_effect_with_deps(
            move |id| {
                let id = *id;
                let client = ApiClient::new(session.as_ref());
                spawn_local(async move {
                    match get_debt(&client, id).await {
                        Ok(loaded) => {
                            let mut form = payment_form(&loaded);
                            if let Some(prefill) = load_prefill(None, true) {
                                form.apply_json(&prefill);
                            }
                            values.set(form);
                            debt.set(Some(loaded));
                        }
                        Err(e) => {
                            error!("could not load debt {}: {}", id, e);
                            flow.toast_error("No se pudo cargar la deuda");
                        }
                    }
                });
                || ()
            },
            props.id,
        );
    }

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let id = props.id;
        Callback::from(move |_| {
            let Some(session) = session.as_ref() else {
                flow.toast_error("Debes iniciar sesión para registrar pagos");
                return;
            };
            let payment = match payment_from_form(&values, session.user_id) {
                Ok(payment) => payment,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let client = ApiClient::new(Some(session));
            flow.run(submitting.clone(), "Pago registrado", "Error al registrar el pago", async move {
                pay_debt(&client, id, &payment).await
            });
        })
    };

    let Some(loaded) = (*debt).clone() else {
        return loading_block();
    };

    html! {
        <EntityForm title={format!("Pagar: {}", loaded.description)} back={Route::List(Resource::Debts)}
            values={values.clone()} errors={(*errors).clone()} {on_submit} submitting={*submitting}
            submit_label="Registrar pago">
            <div class="grid grid-cols-2 gap-4 text-sm">
                <div class="bg-secondary rounded-xl p-3">
                    <p class="text-xs text-muted-foreground">{"Monto total"}</p>
                    <p class="font-bold">{ format_currency(loaded.original_amount) }</p>
                </div>
                <div class="bg-secondary rounded-xl p-3">
                    <p class="text-xs text-muted-foreground">{"Pendiente"}</p>
                    <p class="font-bold text-red-600">{ format_currency(loaded.pending_amount) }</p>
                </div>
            </div>
            <TextField name="amount" label="Monto del pago" input_type="number" />
            <SelectField name="payment_method_id" label="Método de pago" options={payment_method_options(&methods.value())} />
            <TextAreaField name="description" label="Nota" />
        </EntityForm>
    }
}
