use log::error;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::cache::{self, use_query};
use crate::components::feedback::{loading_block, Alert, AlertVariant, EmptyState, Spinner};
use crate::components::icons::{icon_download, icon_plus};
use crate::components::layout::page_shell;
use crate::components::period_selector::PeriodSelector;
use crate::components::premium::{use_premium_gate, PremiumFeatureAlert, PremiumGate};
use crate::components::report_view::{payload_view, ReportViewer};
use crate::components::toast::use_toast;
use crate::config::app_config;
use crate::features::goals::list_goals;
use crate::features::report_preview::fetch_preview;
use crate::features::reports::{build_report_request, generate_report, get_report, ReportFormat, ReportType};
use crate::pages::{for_user, use_categories};
use crate::period::{today, PeriodRange};
use crate::route::{open_in_new_tab, use_navigator, Route};
use crate::session::use_session;

const SELECT_CLASS: &str =
    "w-full mt-1 px-3 py-2 rounded-xl border border-border bg-card text-sm focus:outline-none focus:ring-2 focus:ring-[#173E63]/30";

fn gated(gate: PremiumGate, title: &str) -> Option<Html> {
    match gate {
        PremiumGate::Allowed => None,
        PremiumGate::Checking | PremiumGate::Denied => Some(page_shell(
            title,
            html! {},
            html! { <PremiumFeatureAlert /> },
        )),
    }
}

#[function_component(ReportsPage)]
pub fn reports_page() -> Html {
    let gate = use_premium_gate();
    let navigator = use_navigator();
    if let Some(blocked) = gated(gate, "Reportes") {
        return blocked;
    }

    let create = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(Route::ReportCreate { period: None });
        }
    });

    // Reports are generated on demand; the backend keeps no listing.
    page_shell(
        "Reportes",
        html! {},
        html! {
            <EmptyState message="Tus Reportes">
                <p class="text-sm mt-1">{"Genera un reporte de tus finanzas para un período y descárgalo en el formato que prefieras."}</p>
                <button onclick={create} class="mt-4 inline-flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A]">
                    { icon_plus() }
                    {"Crear Reporte"}
                </button>
            </EmptyState>
        },
    )
}

fn mark_selected(options: Vec<(String, String)>, value: &str) -> Vec<(String, String, bool)> {
    options
        .into_iter()
        .map(|(option, text)| {
            let selected = option == value;
            (option, text, selected)
        })
        .collect()
}

fn select_box(label: &str, value: String, options: Vec<(String, String)>, onchange: Callback<String>) -> Html {
    let onchange = Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        onchange.emit(select.value());
    });
    html! {
        <label class="block text-xs font-bold text-muted-foreground">
            { label.to_string() }
            <select class={SELECT_CLASS} {onchange}>
                { for mark_selected(options, &value).into_iter().map(|(option, text, selected)| html! {
                    <option {selected} value={option}>{ text }</option>
                }) }
            </select>
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReportCreatePageProps {
    #[prop_or_default]
    pub period: Option<PeriodRange>,
}

#[function_component(ReportCreatePage)]
pub fn report_create_page(props: &ReportCreatePageProps) -> Html {
    let gate = use_premium_gate();
    let session = use_session();
    let navigator = use_navigator();
    let toaster = use_toast();
    let categories = use_categories();
    let goals = use_query(cache::GOALS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { list_goals(&client, user_id).await })
    });
    let kind = use_state(|| ReportType::Expense);
    let period = {
        let initial = props.period.clone();
        use_state(move || initial.unwrap_or_else(|| PeriodRange::current_month(today())))
    };
    let category = use_state(String::new);
    let goal = use_state(String::new);
    let generating = use_state(|| None::<ReportFormat>);

    if let Some(blocked) = gated(gate, "Crear Reporte") {
        return blocked;
    }

    let user_id = session.as_ref().map(|s| s.user_id).unwrap_or_default();
    let request_for = {
        let kind = kind.clone();
        let period = period.clone();
        let category = category.clone();
        let goal = goal.clone();
        move |format: ReportFormat| {
            build_report_request(
                (*kind).clone(),
                format,
                Some(category.as_str()),
                Some(goal.as_str()),
                &period,
                user_id,
            )
        }
    };

    let preview = fetch_preview(session.as_ref(), &kind, &request_for(ReportFormat::Json).filters);

    let download = |format: ReportFormat| {
        let request = request_for(format);
        let session = session.clone();
        let toaster = toaster.clone();
        let generating = generating.clone();
        Callback::from(move |_| {
            let client = ApiClient::new(session.as_ref());
            let request = request.clone();
            let toaster = toaster.clone();
            let generating = generating.clone();
            generating.set(Some(format));
            spawn_local(async move {
                let result = generate_report(&client, &request).await;
                generating.set(None);
                match result {
                    Ok(report) => {
                        open_in_new_tab(&app_config().report_artifact_url(&report.id));
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.success("Reporte generado");
                        }
                    }
                    Err(e) => {
                        error!("report generation failed: {}", e);
                        if let Some(toaster) = toaster.as_ref() {
                            toaster.error(e.user_message("Error al generar el reporte"));
                        }
                    }
                }
            });
        })
    };

    let cancel = Callback::from(move |_| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(Route::Reports);
        }
    });

    let type_options = ReportType::ALL
        .iter()
        .map(|k| (k.tag().to_string(), k.label().to_string()))
        .collect::<Vec<_>>();
    let on_kind = {
        let kind = kind.clone();
        Callback::from(move |tag: String| kind.set(ReportType::from(tag)))
    };
    let on_period = {
        let period = period.clone();
        Callback::from(move |next: PeriodRange| period.set(next))
    };

    let mut category_options = vec![("all".to_string(), "Todas las categorías".to_string())];
    category_options.extend(categories.value().iter().map(|c| (c.id.to_string(), c.name.clone())));
    let mut goal_options = vec![("all".to_string(), "Todas las metas".to_string())];
    goal_options.extend(goals.value().iter().map(|g| (g.id.to_string(), g.name.clone())));
    let on_category = {
        let category = category.clone();
        Callback::from(move |value: String| category.set(value))
    };
    let on_goal = {
        let goal = goal.clone();
        Callback::from(move |value: String| goal.set(value))
    };

    let preview_body = match preview {
        Ok(payload) => payload_view(&payload),
        Err(e) => html! {
            <Alert variant={AlertVariant::Info} title="Vista previa no disponible">
                { e.user_message("No se pudo generar la vista previa") }
            </Alert>
        },
    };

    let busy = generating.is_some();
    let download_button = |format: ReportFormat| {
        let working = *generating == Some(format);
        html! {
            <button onclick={download(format)} disabled={busy}
                class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A] disabled:opacity-50">
                if working { <Spinner class="h-4 w-4 border-white border-t-transparent" /> } else { { icon_download() } }
                { format!("Descargar {}", format.label()) }
            </button>
        }
    };

    let body = html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border space-y-4 h-fit">
                { select_box("Tipo de reporte", kind.tag().to_string(), type_options, on_kind) }
                <div>
                    <span class="block text-xs font-bold text-muted-foreground mb-1">{"Período"}</span>
                    <PeriodSelector value={(*period).clone()} on_change={on_period} />
                </div>
                if kind.is_goal_report() {
                    { select_box("Meta", (*goal).clone(), goal_options, on_goal) }
                } else {
                    { select_box("Categoría", (*category).clone(), category_options, on_category) }
                }
                <div class="flex flex-col gap-2 pt-2">
                    { download_button(ReportFormat::Pdf) }
                    { download_button(ReportFormat::Excel) }
                    { download_button(ReportFormat::Csv) }
                    <button onclick={cancel} class="px-4 py-2 rounded-xl border border-border font-bold text-sm">{"Cancelar"}</button>
                </div>
            </div>
            <div class="lg:col-span-2 bg-card p-6 rounded-[10px] shadow-sm border border-border">
                <h3 class="font-bold text-foreground text-lg mb-1">{ format!("Vista previa: {}", kind.label()) }</h3>
                <p class="text-xs text-muted-foreground mb-4">{ period.label.clone() }</p>
                { preview_body }
            </div>
        </div>
    };

    page_shell("Crear Reporte", html! {}, body)
}

#[derive(Properties, PartialEq)]
pub struct ReportDetailPageProps {
    pub id: String,
}

#[function_component(ReportDetailPage)]
pub fn report_detail_page(props: &ReportDetailPageProps) -> Html {
    let gate = use_premium_gate();
    let session = use_session();
    let report = use_query(cache::REPORTS, (session, props.id.clone()), |(session, id)| async move {
        get_report(&ApiClient::new(session.as_ref()), &id).await
    });

    if let Some(blocked) = gated(gate, "Reporte") {
        return blocked;
    }

    let body = match (report.data.as_ref(), report.error.as_ref()) {
        (Some(report), _) => html! { <ReportViewer report={report.clone()} /> },
        (None, Some(e)) => html! {
            <Alert variant={AlertVariant::Destructive} title="No se pudo cargar el reporte">
                { e.user_message("Intenta nuevamente más tarde.") }
            </Alert>
        },
        (None, None) => loading_block(),
    };

    let open = {
        let id = props.id.clone();
        Callback::from(move |_| open_in_new_tab(&app_config().report_artifact_url(&id)))
    };
    let actions = html! {
        <button onclick={open} class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A]">
            { icon_download() }
            {"Descargar"}
        </button>
    };

    page_shell("Reporte", actions, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_current_value_is_selected() {
        let options = vec![
            ("all".to_string(), "Todas las categorías".to_string()),
            ("3".to_string(), "Comida".to_string()),
        ];
        let marked = mark_selected(options, "3");
        assert_eq!(marked[0], ("all".to_string(), "Todas las categorías".to_string(), false));
        assert_eq!(marked[1], ("3".to_string(), "Comida".to_string(), true));
    }
}
