use yew::prelude::*;

use crate::components::feedback::EmptyState;
use crate::features::report_preview::{
    BudgetSummary, ComprehensiveSummary, ContributionSummary, DebtSummary, GoalCategorySummary,
    GoalStatusSummary, ReportPayload, SavingsComparison, SavingsSummary, TransactionSummary,
};
use crate::features::reports::Report;
use crate::format::{format_currency, format_date_str, format_percent};

fn metric(label: &str, value: String) -> Html {
    html! {
        <div class="bg-card p-4 rounded-[10px] border border-border">
            <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ label.to_string() }</p>
            <p class="text-xl font-bold text-[#1D617A] tracking-tight">{ value }</p>
        </div>
    }
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Html {
    if rows.is_empty() {
        return html! { <p class="text-sm text-muted-foreground">{"Sin registros"}</p> };
    }
    html! {
        <div class="overflow-x-auto rounded-[10px] border border-border">
            <table class="w-full text-sm">
                <thead class="bg-[#eef4f9] text-[#173E63]">
                    <tr>
                        { for headers.iter().map(|h| html! { <th class="text-left px-3 py-2 font-bold">{ *h }</th> }) }
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { for rows.into_iter().map(|row| html! {
                        <tr>{ for row.into_iter().map(|cell| html! { <td class="px-3 py-2">{ cell }</td> }) }</tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

fn section(title: &str, body: Html) -> Html {
    html! {
        <div class="space-y-3">
            <h3 class="font-bold text-foreground">{ title.to_string() }</h3>
            { body }
        </div>
    }
}

fn transactions_view(summary: &TransactionSummary, income: bool) -> Html {
    let (total_label, average_label) = if income {
        ("Total de ingresos", "Ingreso promedio")
    } else {
        ("Total de gastos", "Gasto promedio")
    };
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { metric(total_label, format_currency(summary.total)) }
                { metric("Transacciones", summary.total_transactions.to_string()) }
                { metric(average_label, format_currency(summary.average)) }
            </div>
            { section("Categorías principales", table(
                &["Categoría", "Total", "Transacciones", "%"],
                summary.top_categories.iter().map(|c| vec![
                    c.category_name.clone(),
                    format_currency(c.total_amount),
                    c.transaction_count.to_string(),
                    format_percent(c.percentage),
                ]).collect(),
            )) }
            { section("Tendencia mensual", table(
                &["Mes", "Total", "Transacciones"],
                summary.monthly_trends.iter().map(|m| vec![
                    m.month.clone(),
                    format_currency(m.total_amount),
                    m.transaction_count.to_string(),
                ]).collect(),
            )) }
        </div>
    }
}

fn budget_view(summary: &BudgetSummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                { metric("Presupuestos", summary.total_budgets.to_string()) }
                { metric("Presupuestado", format_currency(summary.total_budget_amount)) }
                { metric("Gastado", format_currency(summary.total_spent)) }
                { metric("Excedidos", summary.over_budget_count.to_string()) }
            </div>
            { table(
                &["Categoría", "Límite", "Actual", "Uso", "Estado"],
                summary.budgets.iter().map(|b| vec![
                    b.category_name.clone(),
                    format_currency(b.limit_amount),
                    format_currency(b.current_amount),
                    format_percent(b.utilization),
                    b.status.label().to_string(),
                ]).collect(),
            ) }
        </div>
    }
}

fn debt_view(summary: &DebtSummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                { metric("Deudas", summary.total_debts.to_string()) }
                { metric("Pendiente", format_currency(summary.total_pending_amount)) }
                { metric("Pagado", format_currency(summary.total_paid_amount)) }
                { metric("Vencidas", summary.overdue_count.to_string()) }
            </div>
            { table(
                &["Descripción", "Original", "Pendiente", "Interés", "Vence", "Estado"],
                summary.debts.iter().map(|d| vec![
                    d.description.clone(),
                    format_currency(d.original_amount),
                    format_currency(d.pending_amount),
                    format_percent(d.interest_rate),
                    d.due_date.as_deref().map(format_date_str).unwrap_or_else(|| "-".into()),
                    d.status.label().to_string(),
                ]).collect(),
            ) }
        </div>
    }
}

fn goal_status_view(summary: &GoalStatusSummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                { metric("Total", summary.total.to_string()) }
                { metric("Completadas", summary.completed.to_string()) }
                { metric("En progreso", summary.in_progress.to_string()) }
                { metric("Vencidas", summary.expired.to_string()) }
            </div>
            { table(
                &["Meta", "Objetivo", "Actual", "Progreso", "Estado"],
                summary.goals.iter().map(|g| vec![
                    g.name.clone(),
                    format_currency(g.target_amount),
                    format_currency(g.current_amount),
                    format_percent(g.progress),
                    g.status.clone(),
                ]).collect(),
            ) }
        </div>
    }
}

fn goal_category_view(summary: &GoalCategorySummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 gap-4">
                { metric("Categorías", summary.total_categories.to_string()) }
                { metric("Metas", summary.total_goals.to_string()) }
            </div>
            { table(
                &["Categoría", "Metas", "Total", "Completado", "Progreso"],
                summary.categories.iter().map(|c| vec![
                    c.name.clone(),
                    c.total_goals.to_string(),
                    format_currency(c.total_amount),
                    format_currency(c.completed_amount),
                    format_percent(c.progress),
                ]).collect(),
            ) }
        </div>
    }
}

fn contributions_view(summary: &ContributionSummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { metric("Meta", if summary.goal_name.is_empty() { "-".to_string() } else { summary.goal_name.clone() }) }
                { metric("Total aportado", format_currency(summary.total_contributions)) }
                { metric("Aporte promedio", format_currency(summary.average_contribution)) }
            </div>
            { table(
                &["Fecha", "Monto"],
                summary.contributions.iter().map(|c| vec![format_date_str(&c.date), format_currency(c.amount)]).collect(),
            ) }
        </div>
    }
}

fn savings_comparison_view(summary: &SavingsComparison) -> Html {
    section(
        if summary.goal_name.is_empty() { "Plan vs. real" } else { summary.goal_name.as_str() },
        table(
            &["Fecha", "Planeado", "Real", "Diferencia"],
            summary
                .deviations
                .iter()
                .map(|d| {
                    vec![
                        format_date_str(&d.date),
                        format_currency(d.planned_amount),
                        format_currency(d.actual_amount),
                        format_currency(d.difference),
                    ]
                })
                .collect(),
        ),
    )
}

fn savings_summary_view(summary: &SavingsSummary) -> Html {
    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                { metric("Metas", summary.total_goals.to_string()) }
                { metric("Objetivo total", format_currency(summary.total_target_amount)) }
                { metric("Ahorrado", format_currency(summary.total_current_amount)) }
                { metric("Progreso", format_percent(summary.overall_progress)) }
            </div>
            { section("Por categoría", table(
                &["Categoría", "Metas", "Total", "Progreso"],
                summary.category_breakdown.iter().map(|c| vec![
                    c.category_name.clone(),
                    c.total_goals.to_string(),
                    format_currency(c.total_amount),
                    format_percent(c.progress),
                ]).collect(),
            )) }
        </div>
    }
}

fn comprehensive_view(summary: &ComprehensiveSummary) -> Html {
    let finance = &summary.financial_summary;
    html! {
        <div class="space-y-6">
            <p class="text-sm text-muted-foreground">{ format!("Período: {}", summary.period.label) }</p>
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                { metric("Ingresos", format_currency(finance.total_income)) }
                { metric("Gastos", format_currency(finance.total_expenses)) }
                { metric("Balance neto", format_currency(finance.net_balance)) }
                { metric("Tasa de ahorro", format_percent(finance.savings_rate)) }
            </div>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { metric("Progreso de metas", format_percent(summary.goals.overall_progress)) }
                { metric("Gastado en presupuestos", format_currency(summary.budgets.total_spent)) }
                { metric("Deuda pendiente", format_currency(summary.debts.total_pending_amount)) }
            </div>
            { section("Balance por categoría", table(
                &["Categoría", "Ingresos", "Gastos", "Neto"],
                summary.category_breakdown.iter().map(|c| vec![
                    c.category_name.clone(),
                    format_currency(c.income),
                    format_currency(c.expenses),
                    format_currency(c.net_amount),
                ]).collect(),
            )) }
            { section("Tendencia mensual", table(
                &["Mes", "Ingresos", "Gastos", "Balance"],
                summary.monthly_trends.iter().map(|m| vec![
                    m.month.clone(),
                    format_currency(m.income),
                    format_currency(m.expenses),
                    format_currency(m.balance),
                ]).collect(),
            )) }
        </div>
    }
}

pub fn payload_view(payload: &ReportPayload) -> Html {
    match payload {
        ReportPayload::Expense(summary) => transactions_view(summary, false),
        ReportPayload::Income(summary) => transactions_view(summary, true),
        ReportPayload::Budget(summary) => budget_view(summary),
        ReportPayload::Debt(summary) => debt_view(summary),
        ReportPayload::GoalsByStatus(summary) => goal_status_view(summary),
        ReportPayload::GoalsByCategory(summary) => goal_category_view(summary),
        ReportPayload::Contributions(summary) => contributions_view(summary),
        ReportPayload::SavingsComparison(summary) => savings_comparison_view(summary),
        ReportPayload::SavingsSummary(summary) => savings_summary_view(summary),
        ReportPayload::Comprehensive(summary) => comprehensive_view(summary),
    }
}

fn raw_json(data: &serde_json::Value) -> Html {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    html! {
        <pre class="bg-slate-50 rounded-[10px] border border-border p-4 text-xs overflow-x-auto">{ pretty }</pre>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReportViewerProps {
    pub report: Report,
}

#[function_component(ReportViewer)]
pub fn report_viewer(props: &ReportViewerProps) -> Html {
    let report = &props.report;
    let Some(data) = report.data.as_ref().filter(|d| !d.is_null()) else {
        return html! { <EmptyState message="No hay datos disponibles para este reporte." /> };
    };

    let body = match ReportPayload::decode(&report.kind, data) {
        Some(payload) => payload_view(&payload),
        None => raw_json(data),
    };

    html! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3 text-xs text-muted-foreground">
                <span class="px-2 py-0.5 rounded-full bg-[#eef4f9] text-[#173E63] font-bold">{ report.kind.label().to_string() }</span>
                <span>{ format!("Formato: {}", report.format_label()) }</span>
                if !report.created_at.is_empty() {
                    <span>{ format!("Generado: {}", format_date_str(&report.created_at)) }</span>
                }
            </div>
            { body }
        </div>
    }
}
