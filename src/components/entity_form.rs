use yew::prelude::*;

use crate::components::feedback::Spinner;
use crate::components::icons::{icon_arrow_left, icon_save, icon_trash};
use crate::components::voice_input::{VoiceButtonVariant, VoiceInputButton};
use crate::forms::{ActiveForm, FieldErrors, FormValues};
use crate::route::{use_navigator, Route};

#[derive(Properties, PartialEq)]
pub struct EntityFormProps {
    pub title: AttrValue,
    pub back: Route,
    pub values: UseStateHandle<FormValues>,
    pub errors: FieldErrors,
    pub on_submit: Callback<()>,
    #[prop_or_default]
    pub submitting: bool,
    #[prop_or(AttrValue::from("Guardar"))]
    pub submit_label: AttrValue,
    #[prop_or_default]
    pub voice: bool,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(EntityForm)]
pub fn entity_form(props: &EntityFormProps) -> Html {
    let navigator = use_navigator();
    let on_back = {
        let back = props.back.clone();
        Callback::from(move |_| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(back.clone());
            }
        })
    };
    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <ContextProvider<ActiveForm> context={ActiveForm(props.values.clone())}>
            <ContextProvider<FieldErrors> context={props.errors.clone()}>
                <div class="p-6 max-w-3xl mx-auto">
                    <div class="flex items-center justify-between pb-4 border-b border-border">
                        <div class="flex items-center gap-3">
                            <button type="button" onclick={on_back} class="p-2 rounded-full hover:bg-secondary transition-colors" aria-label="Volver">
                                { icon_arrow_left() }
                            </button>
                            <h1 class="text-2xl font-bold text-foreground">{ props.title.clone() }</h1>
                        </div>
                        if props.voice {
                            <VoiceInputButton variant={VoiceButtonVariant::Inline} />
                        }
                    </div>
                    <form {onsubmit} class="mt-5 bg-card p-6 rounded-[10px] shadow-sm border border-border space-y-4">
                        { for props.children.iter() }
                        <div class="flex justify-end pt-2">
                            <button type="submit" disabled={props.submitting}
                                class="flex items-center gap-2 bg-[#173E63] text-white px-5 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A] disabled:opacity-50">
                                if props.submitting { <Spinner class="h-4 w-4 border-white border-t-transparent" /> } else { { icon_save() } }
                                { props.submit_label.clone() }
                            </button>
                        </div>
                    </form>
                </div>
            </ContextProvider<FieldErrors>>
        </ContextProvider<ActiveForm>>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmDeleteProps {
    pub on_confirm: Callback<()>,
    #[prop_or(AttrValue::from("¿Eliminar este registro?"))]
    pub message: AttrValue,
}

#[function_component(ConfirmDelete)]
pub fn confirm_delete(props: &ConfirmDeleteProps) -> Html {
    let asking = use_state(|| false);
    let ask = {
        let asking = asking.clone();
        Callback::from(move |_| asking.set(true))
    };
    let cancel = {
        let asking = asking.clone();
        Callback::from(move |_| asking.set(false))
    };
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        let asking = asking.clone();
        Callback::from(move |_| {
            asking.set(false);
            on_confirm.emit(());
        })
    };

    if *asking {
        html! {
            <span class="inline-flex items-center gap-2 text-xs">
                <span class="text-slate-500">{ props.message.clone() }</span>
                <button type="button" onclick={confirm} class="px-2 py-1 rounded-lg bg-red-600 text-white font-bold">{"Eliminar"}</button>
                <button type="button" onclick={cancel} class="px-2 py-1 rounded-lg border border-border">{"Cancelar"}</button>
            </span>
        }
    } else {
        html! {
            <button type="button" onclick={ask} class="p-2 rounded-lg text-red-600 hover:bg-red-50" aria-label="Eliminar">
                { icon_trash() }
            </button>
        }
    }
}
