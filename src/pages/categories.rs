use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache;
use crate::components::entity_form::{ConfirmDelete, EntityForm};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::form_fields::{TextAreaField, TextField};
use crate::components::icons::icon_pencil;
use crate::components::layout::page_shell;
use crate::features::categories::{
    create_category, delete_category, from_form, get_category, to_form, update_category,
};
use crate::forms::{FieldErrors, FormValues};
use crate::pages::{list_actions, use_categories, use_delete, use_submit_flow};
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

#[function_component(CategoriesPage)]
pub fn categories_page() -> Html {
    let categories = use_categories();
    let navigator = use_navigator();
    let on_delete = use_delete(cache::CATEGORIES, |client, id| async move {
        delete_category(&client, id).await
    });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::Categories,
            data: None,
        },
        "Nueva categoría",
    );

    let body = if categories.loading && categories.data.is_none() {
        loading_block()
    } else {
        let list = categories.value();
        if list.is_empty() {
            html! { <EmptyState message="Aún no tienes categorías." /> }
        } else {
            html! {
                <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
                    { for list.iter().map(|category| {
                        let id = category.id;
                        let navigator = navigator.clone();
                        let on_delete = on_delete.clone();
                        html! {
                            <div key={id} class="bg-card p-5 rounded-[10px] shadow-sm border border-border flex items-start justify-between gap-3">
                                <div class="flex items-start gap-3">
                                    <span class="text-2xl">{ category.icon_or("📦") }</span>
                                    <div>
                                        <h3 class="font-bold text-foreground">{ category.name.clone() }</h3>
                                        if let Some(description) = category.description.clone() {
                                            <p class="text-xs text-muted-foreground mt-1">{ description }</p>
                                        }
                                    </div>
                                </div>
                                <div class="flex items-center gap-1">
                                    <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar"
                                        onclick={Callback::from(move |_| if let Some(n) = navigator.as_ref() {
                                            n.push(Route::Edit { resource: Resource::Categories, id });
                                        })}>
                                        { icon_pencil() }
                                    </button>
                                    <ConfirmDelete on_confirm={Callback::from(move |_| on_delete.emit(id))} />
                                </div>
                            </div>
                        }
                    }) }
                </div>
            }
        }
    };

    page_shell("Categorías", actions, body)
}

#[derive(Properties, PartialEq)]
pub struct CategoryFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
}

#[function_component(CategoryFormPage)]
pub fn category_form_page(props: &CategoryFormPageProps) -> Html {
    let session = use_session();
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let flow = use_submit_flow(cache::CATEGORIES, Route::List(Resource::Categories));

    {
        let values = values.clone();
        let session = session.clone();
        let flow = flow.clone();
        use_effect_with_deps(
            move |id| {
                if let Some(id) = *id {
                    let client = ApiClient::new(session.as_ref());
                    spawn_local(async move {
                        match get_category(&client, id).await {
                            Ok(category) => values.set(to_form(&category)),
                            Err(e) => {
                                error!("could not load category {}: {}", id, e);
                                flow.toast_error("No se pudo cargar la categoría");
                            }
                        }
                    });
                }
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
            let payload = match from_form(&values) {
                Ok(payload) => payload,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            let client = ApiClient::new(session.as_ref());
            match id {
                Some(id) => flow.run(submitting.clone(), "Categoría actualizada", "Error al actualizar la categoría", async move {
                    update_category(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Categoría creada", "Error al crear la categoría", async move {
                    create_category(&client, &payload).await
                }),
            }
        })
    };

    let title = if props.id.is_some() { "Editar categoría" } else { "Nueva categoría" };
    html! {
        <EntityForm {title} back={Route::List(Resource::Categories)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting}>
            <TextField name="name" label="Nombre" placeholder="Ej. Alimentación" />
            <TextField name="icon" label="Ícono" placeholder="🍔" />
            <TextAreaField name="description" label="Descripción" />
        </EntityForm>
    }
}
