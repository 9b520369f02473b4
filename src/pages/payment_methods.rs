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
use crate::features::payment_methods::{
    create_payment_method, delete_payment_method, from_form, get_payment_method, to_form,
    update_payment_method,
};
use crate::forms::{FieldErrors, FormValues};
use crate::pages::{list_actions, use_delete, use_payment_methods, use_submit_flow};
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

#[function_component(PaymentMethodsPage)]
pub fn payment_methods_page() -> Html {
    let methods = use_payment_methods();
    let navigator = use_navigator();
    let on_delete = use_delete(cache::PAYMENT_METHODS, |client, id| async move {
        delete_payment_method(&client, id).await
    });

    let actions = list_actions(
        navigator.clone(),
        Route::Create {
            resource: Resource::PaymentMethods,
            data: None,
        },
        "Nuevo método",
    );

    let list = methods.value();
    let body = if methods.loading && methods.data.is_none() {
        loading_block()
    } else if list.is_empty() {
        html! { <EmptyState message="No has registrado métodos de pago." /> }
    } else {
        html! {
            <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                <table class="w-full text-sm">
                    <thead class="bg-secondary text-left text-xs uppercase text-muted-foreground">
                        <tr>
                            <th class="px-4 py-3">{"Nombre"}</th>
                            <th class="px-4 py-3">{"Descripción"}</th>
                            <th class="px-4 py-3 text-right">{"Acciones"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for list.iter().map(|method| {
                            let id = method.id;
                            let navigator = navigator.clone();
                            let on_delete = on_delete.clone();
                            html! {
                                <tr key={id} class="border-t border-border">
                                    <td class="px-4 py-3 font-bold">{ method.name.clone() }</td>
                                    <td class="px-4 py-3 text-muted-foreground">{ method.description.clone().unwrap_or_default() }</td>
                                    <td class="px-4 py-3">
                                        <div class="flex justify-end items-center gap-1">
                                            <button class="p-2 rounded-lg hover:bg-secondary" aria-label="Editar"
                                                onclick={Callback::from(move |_| if let Some(n) = navigator.as_ref() {
                                                    n.push(Route::Edit { resource: Resource::PaymentMethods, id });
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

    page_shell("Métodos de pago", actions, body)
}

#[derive(Properties, PartialEq)]
pub struct PaymentMethodFormPageProps {
    #[prop_or_default]
    pub id: Option<u64>,
}

#[function_component(PaymentMethodFormPage)]
pub fn payment_method_form_page(props: &PaymentMethodFormPageProps) -> Html {
    let session = use_session();
    let values = use_state(FormValues::new);
    let errors = use_state(FieldErrors::default);
    let submitting = use_state(|| false);
    let flow = use_submit_flow(cache::PAYMENT_METHODS, Route::List(Resource::PaymentMethods));

    {
        let values = values.clone();
        let session = session.clone();
        let flow = flow.clone();
        use_effect_with_deps(
            move |id| {
                if let Some(id) = *id {
                    let client = ApiClient::new(session.as_ref());
                    spawn_local(async move {
                        match get_payment_method(&client, id).await {
                            Ok(method) => values.set(to_form(&method)),
                            Err(e) => {
                                error!("could not load payment method {}: {}", id, e);
                                flow.toast_error("No se pudo cargar el método de pago");
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
                Some(id) => flow.run(submitting.clone(), "Método de pago actualizado", "Error al actualizar el método de pago", async move {
                    update_payment_method(&client, id, &payload).await
                }),
                None => flow.run(submitting.clone(), "Método de pago creado", "Error al crear el método de pago", async move {
                    create_payment_method(&client, &payload).await
                }),
            }
        })
    };

    let title = if props.id.is_some() { "Editar método de pago" } else { "Nuevo método de pago" };
    html! {
        <EntityForm {title} back={Route::List(Resource::PaymentMethods)} values={values.clone()} errors={(*errors).clone()}
            {on_submit} submitting={*submitting}>
            <TextField name="name" label="Nombre" placeholder="Ej. Tarjeta de crédito" />
            <TextAreaField name="description" label="Descripción" />
        </EntityForm>
    }
}
