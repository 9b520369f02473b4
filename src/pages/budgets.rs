use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::entity_form::{ConfirmDelete, EntityForm};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::form_fields::{DateField, SelectField, TextField};
use crate::components::icons::icon_pencil;
use crate::components::layout::page_shell;
use crate::features::budgets::{
    create_budget, default_form, delete_budget, from_form, get_budget, list_budgets, to_form,
    update_budget,
};
use crate::features::dashboard::{capped_percent, progress_color};
use crate::forms::FieldErrors;
use crate::format::{format_currency, format_date_str};
use crate::pages::{
    category_options, for_user, list_actions, load_prefill, use_categories, use_delete,
    use_submit_flow,
};
use crate::period::today;
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

#[function_component(BudgetsPage)]
pub fn budgets_page() -> Html {
    let session = use_session();
    let budgets = use_query(cache::BUDGETS, session, |session| {
        for_user(session, |client, user_id| async move { list_budgets(&client, user_id).await })
    });
    let navigator = use_navigator();
    let on_delete = use_delete(cache::BUDGETS, |client, id| async move {
        delete_budget(&client, id).await
    });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::Budgets,
            data: None,
        },
        "Nuevo presupuesto",
    );

    let list = budgets.value();
    let body = if budgets.loading && budgets.data.is_none() {
        loading_block()
    } else if list.is_empty() {
        html! { <EmptyState message="No tienes presupuestos registrados." /> }
    } else {
        html! {
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for list.iter().map(|budget| {
                    let id = budget.id;
                    let navigator = navigator.clone();
                    let on_delete = on_delete.clone();
                    let usage = budget.usage_percent();
                    let width = format!("width: {}%", capped_percent(budget.current_amount, budget.limit_amount));
                    html! {
                        <div key={id} class="bg-card p-5 rounded-[10px] shadow-sm border border-border">
                            <div class="flex items-start justify-between">
                                <div>
                                    <h3 class="font-bold text-foreground">{ budget.category_name().to_string() }</h3>
                                    <p class="text-xs text-muted-foreground">
                                        { budget.month.as_deref().map(format_date_str).unwrap_or_default() }
                                    </p>
                                </div>
                                <div class="flex items-center gap-1">
                                    <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar"
                                        onclick={Callback::from(move |_| if let Some(n) = navigator.as_ref() {
                                            n.push(Route::Edit { resource: Resource::Budgets, id });
                                        })}>
                                        { icon_pencil() }
                                    </button>
                                    <ConfirmDelete on_confirm={Callback::from(move |_| on_delete.emit(id))} />
                                </div>
                            </div>
                            <div class="mt-4 flex justify-between text-sm">
                                <span>{ format_currency(budget.current_amount) }</span>
                                <span class="text-muted-foreground">{ format!("de {}", format_currency(budget.limit_amount)) }</span>
                            </div>
                            <div class="w-full h-2 bg-secondary rounded-full mt-2 overflow-hidden">
                                <div class={classes!("h-full", "rounded-full", progress_color(usage, true))} style={width}></div>
                            </div>
                            <p class="text-xs text-muted-foreground mt-2">
                                { format!("Disponible: {}", format_currency(budget.remaining())) }
                            </p>
                        </div>
                    }
                }) }
            </div>
        }
    };

    page_shell("Presupuestos", actions, body)
}

#[derive(Properties, PartialEq)]
pub struct BudgetFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
    #[prop_or_default]
    pub data: Option<String>,
}

#[function_component(BudgetFormPage)]
pub fn budget_form_page(props: &BudgetFormPageProps) -> Html {
    let session = use_session();
    let categories = use_categories();
    let values = use_state(|| default_form(today()));
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let flow = use_submit_flow(cache::BUDGETS, Route::List(Resource::Budgets));

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
                            match get_budget(&client, id).await {
                                Ok(budget) => values.set(to_form(&budget, today())),
                                Err(e) => {
                                    error!("could not load budget {}: {}", id, e);
                                    flow.toast_error("No se pudo cargar el presupuesto");
                                }
                            }
                        });
                    }
                    None => {
                        if let Some(prefill) = load_prefill(data.as_deref(), true) {
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
                Some(id) => flow.run(submitting.clone(), "Presupuesto actualizado", "Error al actualizar el presupuesto", async move {
                    update_budget(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Presupuesto creado", "Error al crear el presupuesto", async move {
                    create_budget(&client, &payload).await
                }),
            }
        })
    };

    let title = if props.id.is_some() { "Editar presupuesto" } else { "Nuevo presupuesto" };
    html! {
        <EntityForm {title} back={Route::List(Resource::Budgets)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting} voice={props.id.is_none()}>
            <SelectField name="category_id" label="Categoría" options={category_options(&categories.value())} />
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <TextField name="limit_amount" label="Límite" input_type="number" />
                <TextField name="current_amount" label="Gastado hasta ahora" input_type="number" />
            </div>
            <DateField name="month" label="Mes" />
        </EntityForm>
    }
}
