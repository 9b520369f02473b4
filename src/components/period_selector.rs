use web_sys::HtmlInputElement;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::icons::icon_calendar;
use crate::period::{parse_date_loose, today, CustomRangeDraft, PeriodKind, PeriodRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectorVariant {
    #[default]
    Default,
    Pill,
}

#[derive(Properties, PartialEq)]
pub struct PeriodSelectorProps {
    pub value: PeriodRange,
    pub on_change: Callback<PeriodRange>,
    #[prop_or_default]
    pub variant: SelectorVariant,
}

fn choose(kind: PeriodKind, picking_custom: &UseStateHandle<bool>, on_change: &Callback<PeriodRange>) {
    match PeriodRange::preset(kind, today()) {
        Some(range) => {
            picking_custom.set(false);
            on_change.emit(range);
        }
        None => picking_custom.set(true),
    }
}

fn date_value(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[function_component(PeriodSelector)]
pub fn period_selector(props: &PeriodSelectorProps) -> Html {
    let picking_custom = use_state(|| props.value.kind == PeriodKind::Custom);
    let draft = {
        let value = props.value.clone();
        use_state(move || CustomRangeDraft::from_period(&value))
    };

    let on_start = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.set_start(parse_date_loose(&input.value()));
            draft.set(next);
        })
    };

    let on_end = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            if next.set_end(parse_date_loose(&input.value())) {
                draft.set(next);
            } else {
                input.set_value(&date_value(next.end));
            }
        })
    };

    let on_apply = {
        let draft = draft.clone();
        let on_change = props.on_change.clone();
        let picking_custom = picking_custom.clone();
        Callback::from(move |_| {
            if let Some(range) = draft.apply() {
                picking_custom.set(false);
                on_change.emit(range);
            }
        })
    };

    let custom_pickers = html! {
        <div class="flex flex-wrap items-end gap-3 mt-3">
            <label class="text-xs font-bold text-muted-foreground">
                {"Desde"}
                <input type="date" class="block mt-1 px-3 py-2 rounded-xl border border-border bg-card text-sm"
                    value={date_value(draft.start)} onchange={on_start} />
            </label>
            <label class="text-xs font-bold text-muted-foreground">
                {"Hasta"}
                <input type="date" class="block mt-1 px-3 py-2 rounded-xl border border-border bg-card text-sm"
                    min={date_value(draft.start)} value={date_value(draft.end)} onchange={on_end} />
            </label>
            <button type="button" onclick={on_apply} disabled={!draft.can_apply()}
                class="px-4 py-2 rounded-xl bg-[#173E63] text-white text-sm font-bold disabled:opacity-50">
                {"Aplicar"}
            </button>
        </div>
    };

    match props.variant {
        SelectorVariant::Default => {
            let on_select = {
                let picking_custom = picking_custom.clone();
                let on_change = props.on_change.clone();
                Callback::from(move |e: Event| {
                    let select: HtmlSelectElement = e.target_unchecked_into();
                    if let Some(kind) = PeriodKind::from_tag(&select.value()) {
                        choose(kind, &picking_custom, &on_change);
                    }
                })
            };
            let selected = if *picking_custom { PeriodKind::Custom } else { props.value.kind };
            html! {
                <div>
                    <div class="flex items-center gap-2">
                        { icon_calendar() }
                        <select class="px-3 py-2 rounded-xl border border-border bg-card text-sm font-medium" onchange={on_select}>
                            { for PeriodKind::ALL.iter().map(|kind| html! {
                                <option value={kind.tag()} selected={*kind == selected}>{ kind.label() }</option>
                            }) }
                        </select>
                        <span class="text-xs text-muted-foreground">{ props.value.label.clone() }</span>
                    </div>
                    if *picking_custom { { custom_pickers } }
                </div>
            }
        }
        SelectorVariant::Pill => html! {
            <div>
                <div class="flex flex-wrap gap-2">
                    { for PeriodKind::ALL.iter().map(|kind| {
                        let kind = *kind;
                        let active = if *picking_custom { kind == PeriodKind::Custom } else { kind == props.value.kind };
                        let label = if kind == PeriodKind::Custom && props.value.kind == PeriodKind::Custom {
                            props.value.label.clone()
                        } else {
                            kind.label().to_string()
                        };
                        let picking_custom = picking_custom.clone();
                        let on_change = props.on_change.clone();
                        html! {
                            <button type="button"
                                class={classes!("px-4", "py-1.5", "rounded-full", "text-xs", "font-bold", "transition-colors",
                                    if active { "bg-[#173E63] text-white" } else { "bg-card text-[#173E63] border border-border hover:bg-[#eef4f9]" })}
                                onclick={Callback::from(move |_| choose(kind, &picking_custom, &on_change))}>
                                { label }
                            </button>
                        }
                    }) }
                </div>
                if *picking_custom { { custom_pickers } }
            </div>
        },
    }
}
