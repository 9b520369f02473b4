use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::entity_form::{ConfirmDelete, EntityForm};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::form_fields::{DateField, PillSelector, SelectField, SelectOption, TextField};
use crate::components::icons::icon_pencil;
use crate::components::layout::page_shell;
use crate::features::transactions::{
    create_transaction, default_form, delete_transaction, from_form, get_transaction, list_transactions,
    to_form, update_transaction, DatePreset, TransactionType,
};
use crate::forms::{FieldErrors, FieldValue};
use crate::format::{format_currency, format_date_str};
use crate::pages::{
    category_options, for_user, list_actions, load_prefill, payment_method_options, use_categories,
    use_delete, use_payment_methods, use_submit_flow,
};
use crate::period::today;
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

#[function_component(TransactionsPage)]
pub fn transactions_page() -> Html {
    let session = use_session();
    let transactions = use_query(cache::TRANSACTIONS, session, |session| {
        for_user(session, |client, user_id| async move {
            list_transactions(&client, user_id).await
        })
    });
    let navigator = use_navigator();
    let on_delete = use_delete(cache::TRANSACTIONS, |client, id| async move {
        delete_transaction(&client, id).await
    });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::Transactions,
            data: None,
        },
        "Nueva transacción",
    );

    let mut list = transactions.value();
    list.sort_by(|a, b| b.day().cmp(&a.day()));

    let body = if transactions.loading && transactions.data.is_none() {
        loading_block()
    } else if list.is_empty() {
        html! { <EmptyState message="No hay transacciones registradas." /> }
    } else {
        html! {
            <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="bg-secondary text-left text-xs uppercase text-muted-foreground">
                        <tr>
                            <th class="px-4 py-3">{"Fecha"}</th>
                            <th class="px-4 py-3">{"Descripción"}</th>
                            <th class="px-4 py-3">{"Categoría"}</th>
                            <th class="px-4 py-3">{"Tipo"}</th>
                            <th class="px-4 py-3 text-right">{"Monto"}</th>
                            <th class="px-4 py-3"></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for list.iter().map(|transaction| {
                            let id = transaction.id;
                            let navigator = navigator.clone();
                            let on_delete = on_delete.clone();
                            let income = transaction.kind == TransactionType::Income;
                            html! {
                                <tr key={id} class="border-t border-border">
                                    <td class="px-4 py-3 whitespace-nowrap">
                                        { transaction.date.as_deref().map(format_date_str).unwrap_or_default() }
                                    </td>
                                    <td class="px-4 py-3">{ transaction.description.clone().unwrap_or_else(|| "-".to_string()) }</td>
                                    <td class="px-4 py-3 text-muted-foreground">
                                        { transaction.category.as_ref().map(|c| c.name.clone()).unwrap_or_default() }
                                    </td>
                                    <td class="px-4 py-3">
                                        <span class={classes!("px-2", "py-0.5", "rounded-full", "text-xs", "font-bold",
                                            if income { "bg-green-100 text-green-700" } else { "bg-red-100 text-red-700" })}>
                                            { transaction.kind.label() }
                                        </span>
                                    </td>
                                    <td class={classes!("px-4", "py-3", "text-right", "font-bold",
                                        if income { "text-green-600" } else { "text-red-600" })}>
                                        { format_currency(transaction.signed_amount()) }
                                    </td>
                                    <td class="px-4 py-3">
                                        <div class="flex justify-end items-center gap-1">
                                            <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar"
                                                onclick={Callback::from(move |_| if let Some(n) = navigator.as_ref() {
                                                    n.push(Route::Edit { resource: Resource::Transactions, id });
                                                })}>
                                                { icon_pencil() }
                                            </button>
                                            <ConfirmDelete on_confirm={Callback::from(move |_| on_delete.emit(id))} />
                                        </div>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>
        }
    };

    page_shell("Transacciones", actions, body)
}

fn type_options() -> Vec<SelectOption> {
    TransactionType::ALL
        .into_iter()
        .map(|kind| SelectOption::new(kind.tag(), kind.label()))
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct TransactionFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
    #[prop_or_default]
    pub data: Option<String>,
}

#[function_component(TransactionFormPage)]
pub fn transaction_form_page(props: &TransactionFormPageProps) -> Html {
    let session = use_session();
    let categories = use_categories();
    let methods = use_payment_methods();
    let values = use_state(|| default_form(today()));
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let custom_date = use_state(|| false);
    let flow = use_submit_flow(cache::TRANSACTIONS, Route::List(Resource::Transactions));

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
                            match get_transaction(&client, id).await {
                                Ok(transaction) => values.set(to_form(&transaction, today())),
                                Err(e) => {
                                    error!("could not load transaction {}: {}", id, e);
                                    flow.toast_error("No se pudo cargar la transacción");
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
                Some(id) => flow.run(submitting.clone(), "Transacción actualizada", "Error al actualizar la transacción", async move {
                    update_transaction(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Transacción creada", "Error al crear la transacción", async move {
                    create_transaction(&client, &payload).await
                }),
            }
        })
    };

    let today = today();
    let selected = if *custom_date {
        DatePreset::Custom
    } else {
        DatePreset::matching(values.date("date"), today)
    };
    let presets = html! {
        <div>
            <span class="block text-xs font-bold text-muted-foreground">{"Fecha"}</span>
            <div class="flex gap-2 mt-1">
                { for DatePreset::ALL.into_iter().map(|preset| {
                    let values = values.clone();
                    let custom_date = custom_date.clone();
                    let onclick = Callback::from(move |_| {
                        custom_date.set(preset == DatePreset::Custom);
                        if let Some(date) = preset.resolve(today) {
                            let mut next = (*values).clone();
                            next.set("date", FieldValue::Date(date));
                            values.set(next);
                        }
                    });
                    html! {
                        <button type="button" {onclick}
                            class={classes!("px-4", "py-1.5", "rounded-full", "text-xs", "font-bold",
                                if preset == selected { "bg-[#173E63] text-white" } else { "bg-card text-[#173E63] border border-border" })}>
                            { preset.label() }
                        </button>
                    }
                }) }
            </div>
        </div>
    };

    let title = if props.id.is_some() { "Editar transacción" } else { "Nueva transacción" };
    html! {
        <EntityForm {title} back={Route::List(Resource::Transactions)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting} voice={props.id.is_none()}>
            <PillSelector name="type" label="Tipo" options={type_options()} />
            <TextField name="amount" label="Monto" input_type="number" placeholder="0.00" />
            <TextField name="description" label="Descripción" placeholder="Ej. Supermercado" />
            { presets }
            if selected == DatePreset::Custom {
                <DateField name="date" label="Selecciona el día" />
            }
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <SelectField name="category_id" label="Categoría" options={category_options(&categories.value())} />
                <SelectField name="payment_method_id" label="Método de pago" options={payment_method_options(&methods.value())} />
            </div>
        </EntityForm>
    }
}
