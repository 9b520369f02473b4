use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(Spinner)]
pub fn spinner(props: &SpinnerProps) -> Html {
    html! {
        <div class={classes!("animate-spin", "rounded-full", "border-2", "border-[#173E63]", "border-t-transparent", "h-6", "w-6", props.class.clone())}></div>
    }
}

pub fn loading_block() -> Html {
    html! {
        <div class="flex justify-center items-center min-h-[400px]">
            <Spinner class="h-8 w-8" />
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum AlertVariant {
    Info,
    Warning,
    Destructive,
}

#[derive(Properties, PartialEq)]
pub struct AlertProps {
    pub variant: AlertVariant,
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Alert)]
pub fn alert(props: &AlertProps) -> Html {
    let class = match props.variant {
        AlertVariant::Info => "border-blue-200 bg-blue-50 text-blue-800",
        AlertVariant::Warning => "border-yellow-500/50 bg-yellow-500/10 text-yellow-700",
        AlertVariant::Destructive => "border-red-200 bg-red-50 text-red-700",
    };
    html! {
        <div class={classes!("rounded-[10px]", "border", "p-4", class)} role="alert">
            <h5 class="font-bold text-sm mb-1">{ props.title.clone() }</h5>
            <div class="text-sm opacity-90">{ for props.children.iter() }</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="text-center py-8 text-muted-foreground bg-card/50 rounded-2xl border border-dashed">
            <p>{ props.message.clone() }</p>
            { for props.children.iter() }
        </div>
    }
}

pub fn field_error(message: Option<&str>) -> Html {
    match message {
        Some(message) => html! { <p class="text-xs text-red-500 mt-1">{ message.to_string() }</p> },
        None => html! {},
    }
}
