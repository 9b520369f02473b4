use log::{debug, error};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::entity_form::{ConfirmDelete, EntityForm};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::form_fields::{DateField, SelectField, SelectOption, TextField};
use crate::components::icons::icon_pencil;
use crate::components::layout::page_shell;
use crate::features::dashboard::{capped_percent, progress_color};
use crate::features::goals::{
    apply_prefill, create_goal, default_form, delete_goal, from_form, get_goal, list_goals,
    prefill_categories, to_form, update_goal,
};
use crate::forms::FieldErrors;
use crate::format::{format_currency, format_date_str, format_percent};
use crate::pages::{
    category_options, for_user, list_actions, load_prefill, use_categories, use_delete,
    use_submit_flow,
};
use crate::period::{format_iso_date, today};
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

fn frequency_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new(1, "Mensual"),
        SelectOption::new(2, "Quincenal"),
        SelectOption::new(4, "Semanal"),
    ]
}

#[function_component(GoalsPage)]
pub fn goals_page() -> Html {
    let session = use_session();
    let goals = use_query(cache::GOALS, session, |session| {
        for_user(session, |client, user_id| async move { list_goals(&client, user_id).await })
    });
    let navigator = use_navigator();
    let on_delete = use_delete(cache::GOALS, |client, id| async move { delete_goal(&client, id).await });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::Goals,
            data: None,
        },
        "Nueva meta",
    );

    let list = goals.value();
    let body = if goals.loading && goals.data.is_none() {
        loading_block()
    } else if list.is_empty() {
        html! { <EmptyState message="Aún no has creado metas de ahorro." /> }
    } else {
        html! {
            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                { for list.iter().map(|goal| {
                    let id = goal.id;
                    let navigator = navigator.clone();
                    let on_delete = on_delete.clone();
                    let progress = goal.progress_percent();
                    let width = format!("width: {}%", capped_percent(goal.current_amount, goal.target_amount));
                    html! {
                        <div key={id} class="bg-card p-5 rounded-[10px] shadow-sm border border-border">
                            <div class="flex items-start justify-between">
                                <div>
                                    <h3 class="font-bold text-foreground">{ goal.name.clone() }</h3>
                                    if let Some(category) = goal.category.as_ref() {
                                        <span class="text-xs text-muted-foreground">{ category.name.clone() }</span>
                                    }
                                </div>
                                <div class="flex items-center gap-1">
                                    <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar"
                                        onclick={Callback::from(move |_| if let Some(n) = navigator.as_ref() {
                                            n.push(Route::Edit { resource: Resource::Goals, id });
                                        })}>
                                        { icon_pencil() }
                                    </button>
                                    <ConfirmDelete on_confirm={Callback::from(move |_| on_delete.emit(id))} />
                                </div>
                            </div>
                            <div class="mt-4 flex justify-between text-sm">
                                <span class="font-bold">{ format_currency(goal.current_amount) }</span>
                                <span class="text-muted-foreground">{ format_currency(goal.target_amount) }</span>
                            </div>
                            <div class="w-full h-2 bg-secondary rounded-full mt-2 overflow-hidden">
                                <div class={classes!("h-full", "rounded-full", progress_color(progress, false))} style={width}></div>
                            </div>
                            <div class="mt-2 flex justify-between text-xs text-muted-foreground">
                                <span>{ format_percent(progress) }</span>
                                if let Some(end) = goal.end_date.as_deref() {
                                    <span>{ format!("Hasta {}", format_date_str(end)) }</span>
                                }
                            </div>
                        </div>
                    }
                }) }
            </div>
        }
    };

    page_shell("Metas", actions, body)
}

#[derive(Properties, PartialEq)]
pub struct GoalFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
    #[prop_or_default]
    pub data: Option<String>,
}

#[function_component(GoalFormPage)]
pub fn goal_form_page(props: &GoalFormPageProps) -> Html {
    let session = use_session();
    let categories = use_categories();
    let values = use_state(|| default_form(today()));
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let prefilled = use_mut_ref(|| false);
    let flow = use_submit_flow(cache::GOALS, Route::List(Resource::Goals));

    {
        let values = values.clone();
        let session = session.clone();
        let flow = flow.clone();
        use_effect_with_deps(
            move |id| {
                if let Some(id) = *id {
                    let client = ApiClient::new(session.as_ref());
                    spawn_local(async move {
                        match get_goal(&client, id).await {
                            Ok(goal) => values.set(to_form(&goal, today())),
                            Err(e) => {
                                error!("could not load goal {}: {}", id, e);
                                flow.toast_error("No se pudo cargar la meta");
                            }
                        }
                    });
                }
                || ()
            },
            props.id,
        );
    }

    // Category names in the prefill resolve against the loaded list, if any.
    {
        let values = values.clone();
        use_effect_with_deps(
            move |(id, data, loaded, failed)| {
                if id.is_none() && !*prefilled.borrow() {
                    if let Some(categories) = prefill_categories(loaded.as_deref(), *failed) {
                        *prefilled.borrow_mut() = true;
                        if let Some(prefill) = load_prefill(data.as_deref(), true) {
                            let mut next = (*values).clone();
                            let applied = apply_prefill(&mut next, &prefill, categories);
                            debug!("prefilled {} goal fields", applied);
                            values.set(next);
                        }
                    }
                }
                || ()
            },
            (
                props.id,
                props.data.clone(),
                categories.data.clone(),
                categories.error.is_some(),
            ),
        );
    }

    let on_submit = {
        let values = values.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let id = props.id;
        Callback::from(move |_| {
            let user_id = session.as_ref().map(|s| s.user_id);
            let payload = match from_form(&values, user_id, today()) {
                Ok(payload) => payload,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let client = ApiClient::new(session.as_ref());
            match id {
                Some(id) => flow.run(submitting.clone(), "Meta actualizada", "Error al actualizar la meta", async move {
                    update_goal(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Meta creada", "Error al crear la meta", async move {
                    create_goal(&client, &payload).await
                }),
            }
        })
    };

    let min_end = AttrValue::from(format_iso_date(today()));
    let title = if props.id.is_some() { "Editar meta" } else { "Nueva meta" };
    html! {
        <EntityForm {title} back={Route::List(Resource::Goals)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting} voice={props.id.is_none()}>
            <TextField name="name" label="Nombre" placeholder="Ej. Fondo de emergencia" />
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <TextField name="current_amount" label="Cantidad actual" input_type="number" />
                <TextField name="target_amount" label="Cantidad objetivo" input_type="number" />
            </div>
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <DateField name="end_date" label="Fecha límite" min={min_end} />
                <SelectField name="category_id" label="Categoría" options={category_options(&categories.value())} />
            </div>
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                <SelectField name="contribution_frequency" label="Frecuencia de contribución" options={frequency_options()} />
                <TextField name="contribution_amount" label="Monto por contribución" input_type="number" />
            </div>
        </EntityForm>
    }
}
