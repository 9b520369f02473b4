use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::feedback::field_error;
use crate::forms::{use_active_form, FieldErrors, FieldValue};
use crate::period::parse_date_loose;

const INPUT_CLASS: &str =
    "w-full mt-1 px-3 py-2 rounded-xl border border-border bg-card text-sm focus:outline-none focus:ring-2 focus:ring-[#173E63]/30";
const LABEL_CLASS: &str = "block text-xs font-bold text-muted-foreground";

#[hook]
fn use_field(name: &AttrValue) -> (String, Option<String>, Callback<FieldValue>) {
    let form = use_active_form();
    let errors = use_context::<FieldErrors>();
    let value = form
        .as_ref()
        .map(|form| form.0.text(name))
        .unwrap_or_default();
    let error = errors.and_then(|errors| errors.get(name).map(str::to_string));
    let name = name.clone();
    let set = Callback::from(move |value: FieldValue| {
        if let Some(form) = form.as_ref() {
            form.set_field(&name, value);
        }
    });
    (value, error, set)
}

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub name: AttrValue,
    pub label: AttrValue,
    #[prop_or(AttrValue::from("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let (value, error, set) = use_field(&props.name);
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        set.emit(FieldValue::Text(input.value()));
    });
    let step = (props.input_type == "number").then_some("0.01");

    html! {
        <label class={LABEL_CLASS}>
            { props.label.clone() }
            <input class={INPUT_CLASS} type={props.input_type.clone()} name={props.name.clone()} {step}
                placeholder={props.placeholder.clone()} disabled={props.disabled} {value} {oninput} />
            { field_error(error.as_deref()) }
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextAreaFieldProps {
    pub name: AttrValue,
    pub label: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
}

#[function_component(TextAreaField)]
pub fn text_area_field(props: &TextAreaFieldProps) -> Html {
    let (value, error, set) = use_field(&props.name);
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        set.emit(FieldValue::Text(input.value()));
    });

    html! {
        <label class={LABEL_CLASS}>
            { props.label.clone() }
            <textarea class={INPUT_CLASS} rows="3" name={props.name.clone()} placeholder={props.placeholder.clone()} {value} {oninput} />
            { field_error(error.as_deref()) }
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct DateFieldProps {
    pub name: AttrValue,
    pub label: AttrValue,
    #[prop_or_default]
    pub min: Option<AttrValue>,
}

#[function_component(DateField)]
pub fn date_field(props: &DateFieldProps) -> Html {
    let (value, error, set) = use_field(&props.name);
    let onchange = Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let raw = input.value();
        set.emit(match parse_date_loose(&raw) {
            Some(date) => FieldValue::Date(date),
            None => FieldValue::Text(raw),
        });
    });

    html! {
        <label class={LABEL_CLASS}>
            { props.label.clone() }
            <input class={INPUT_CLASS} type="date" name={props.name.clone()} min={props.min.clone()} {value} {onchange} />
            { field_error(error.as_deref()) }
        </label>
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectFieldProps {
    pub name: AttrValue,
    pub label: AttrValue,
    pub options: Vec<SelectOption>,
    #[prop_or(AttrValue::from("Selecciona una opción"))]
    pub placeholder: AttrValue,
}

#[function_component(SelectField)]
pub fn select_field(props: &SelectFieldProps) -> Html {
    let (value, error, set) = use_field(&props.name);
    let onchange = Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        set.emit(FieldValue::Text(select.value()));
    });

    html! {
        <label class={LABEL_CLASS}>
            { props.label.clone() }
            <select class={INPUT_CLASS} name={props.name.clone()} {onchange}>
                <option value="" selected={value.is_empty()} disabled=true>{ props.placeholder.clone() }</option>
                { for props.options.iter().map(|option| html! {
                    <option value={option.value.clone()} selected={option.value == value}>{ option.label.clone() }</option>
                }) }
            </select>
            { field_error(error.as_deref()) }
        </label>
    }
}

#[function_component(PillSelector)]
pub fn pill_selector(props: &SelectFieldProps) -> Html {
    let (value, error, set) = use_field(&props.name);

    html! {
        <div>
            <span class={LABEL_CLASS}>{ props.label.clone() }</span>
            <div class="flex flex-wrap gap-2 mt-1">
                { for props.options.iter().map(|option| {
                    let active = option.value == value;
                    let set = set.clone();
                    let chosen = option.value.clone();
                    html! {
                        <button type="button"
                            class={classes!("px-4", "py-1.5", "rounded-full", "text-xs", "font-bold", "transition-colors",
                                if active { "bg-[#173E63] text-white" } else { "bg-card text-[#173E63] border border-border hover:bg-[#eef4f9]" })}
                            onclick={Callback::from(move |_| set.emit(FieldValue::Text(chosen.clone())))}>
                            { option.label.clone() }
                        </button>
                    }
                }) }
            </div>
            { field_error(error.as_deref()) }
        </div>
    }
}
