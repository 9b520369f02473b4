use yew::prelude::*;

use crate::cache::{self, use_query};
use crate::components::feedback::{loading_block, EmptyState};
use crate::components::icons::{icon_credit_card, icon_file_text, icon_trending_up, icon_wallet};
use crate::components::layout::page_shell;
use crate::components::period_selector::{PeriodSelector, SelectorVariant};
use crate::components::recommendation_card::RecommendationCard;
use crate::components::voice_input::{VoiceButtonVariant, VoiceInputButton};
use crate::features::budgets::{self, list_budgets};
use crate::features::dashboard::{
    capped_percent, category_cards, pie_slices, progress_color, recent_trends, PieSlice, TrendPoint,
    PREVIEW_ITEMS,
};
use crate::features::debts::{self, list_debts};
use crate::features::goals::{self, list_goals};
use crate::features::recommendations::{list_recommendations, still_open};
use crate::features::transactions::{category_totals, monthly_trends, period_balance};
use crate::format::{format_currency, format_percent};
use crate::pages::for_user;
use crate::period::{today, PeriodRange};
use crate::route::{use_navigator, Resource, Route};
use crate::session::use_session;

const PIE_COLORS: [&str; 5] = ["#173E63", "#1D617A", "#3B9AB2", "#78B7C5", "#EBCC2A"];

#[derive(Clone, Copy, PartialEq)]
enum StatIcon {
    Income,
    Expense,
    Balance,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    amount: f64,
    icon: StatIcon,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    let negative = props.amount < 0.0;
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                <h3 class={classes!("text-2xl", "font-bold", "tracking-tight", if negative { "text-red-600" } else { "text-[#1D617A]" })}>
                    { format_currency(props.amount) }
                </h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Income => icon_trending_up(),
                        StatIcon::Expense => icon_credit_card(),
                        StatIcon::Balance => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

fn pie_gradient(slices: &[PieSlice]) -> String {
    let mut from = 0.0;
    let stops: Vec<String> = slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let to = from + slice.percentage;
            let stop = format!("{} {:.2}% {:.2}%", PIE_COLORS[i % PIE_COLORS.len()], from, to);
            from = to;
            stop
        })
        .collect();
    format!("background: conic-gradient({});", stops.join(", "))
}

fn trend_chart(points: &[TrendPoint]) -> Html {
    let peak = points
        .iter()
        .map(|p| p.income.max(p.expense))
        .fold(0.0_f64, f64::max);
    let bar = |value: f64| format!("height: {}%", capped_percent(value, peak));

    html! {
        <div class="flex items-end gap-4 h-48 pt-4">
            { for points.iter().map(|point| html! {
                <div class="flex-1 flex flex-col items-center gap-1 h-full">
                    <div class="flex items-end gap-1 flex-1 w-full justify-center">
                        <div class="w-3 bg-green-500 rounded-t" style={bar(point.income)} title={format_currency(point.income)}></div>
                        <div class="w-3 bg-red-500 rounded-t" style={bar(point.expense)} title={format_currency(point.expense)}></div>
                    </div>
                    <span class="text-[10px] text-muted-foreground uppercase">{ point.month.clone() }</span>
                </div>
            }) }
        </div>
    }
}

fn progress_row(label: String, detail: String, percent: f64, inverse: bool) -> Html {
    let width = format!("width: {}%", percent.clamp(0.0, 100.0));
    html! {
        <div class="flex flex-col gap-1 text-sm">
            <div class="flex items-center justify-between">
                <span class="text-foreground">{ label }</span>
                <span class="text-muted-foreground">{ format_percent(percent) }</span>
            </div>
            <div class="h-2 w-full bg-secondary rounded-full overflow-hidden">
                <div class={classes!("h-full", progress_color(percent, inverse))} style={width}></div>
            </div>
            <span class="text-xs text-muted-foreground">{ detail }</span>
        </div>
    }
}

fn panel(title: &str, more: Callback<MouseEvent>, body: Html) -> Html {
    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <div class="flex items-center justify-between mb-4">
                <h3 class="font-bold text-foreground text-lg">{ title.to_string() }</h3>
                <button onclick={more} class="text-xs font-bold text-[#1D617A] hover:underline">{"Ver todo"}</button>
            </div>
            <div class="space-y-3">{ body }</div>
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let period = use_state(|| PeriodRange::current_month(today()));
    let deps = (session.clone(), (*period).clone());

    let balance = use_query(cache::TRANSACTIONS, deps.clone(), |(session, period)| {
        for_user(session, |client, user_id| async move {
            period_balance(&client, user_id, &period).await
        })
    });
    let totals = use_query(cache::TRANSACTIONS, deps.clone(), |(session, period)| {
        for_user(session, |client, user_id| async move {
            category_totals(&client, user_id, &period).await
        })
    });
    let trends = use_query(cache::TRANSACTIONS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { monthly_trends(&client, user_id).await })
    });
    let budget_list = use_query(cache::BUDGETS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { list_budgets(&client, user_id).await })
    });
    let goal_list = use_query(cache::GOALS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { list_goals(&client, user_id).await })
    });
    let debt_list = use_query(cache::DEBTS, session.clone(), |session| {
        for_user(session, |client, user_id| async move { list_debts(&client, user_id).await })
    });
    let recommendations = use_query(cache::RECOMMENDATIONS, session, |session| {
        for_user(session, |client, user_id| async move {
            list_recommendations(&client, user_id).await
        })
    });

    let on_period = {
        let period = period.clone();
        Callback::from(move |next: PeriodRange| period.set(next))
    };
    let go = |route: Route| {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(route.clone());
            }
        })
    };

    let actions = html! {
        <div class="flex items-center gap-2">
            <PeriodSelector value={(*period).clone()} on_change={on_period} variant={SelectorVariant::Pill} />
            <button onclick={go(Route::ReportCreate { period: Some((*period).clone()) })}
                class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-xl font-bold text-sm hover:bg-[#1D617A]">
                { icon_file_text() }
                {"Generar reporte"}
            </button>
        </div>
    };

    let loading = [
        balance.loading,
        totals.loading,
        trends.loading,
        budget_list.loading,
        goal_list.loading,
        debt_list.loading,
        recommendations.loading,
    ]
    .iter()
    .any(|l| *l);
    if loading {
        return page_shell("Dashboard", actions, loading_block());
    }

    let balance = balance.value();
    let totals = totals.value();
    let cards = category_cards(&totals);
    let slices = pie_slices(&totals);
    let trend_points = recent_trends(&trends.value());
    let budget_list = budget_list.value();
    let goal_list = goal_list.value();
    let debt_list = debt_list.value();
    let period_budgets = budgets::in_period(&budget_list, &period);
    let period_goals = goals::relevant_in_period(&goal_list, &period);
    let period_debts = debts::relevant_in_period(&debt_list, &period);
    let open_recommendations = still_open(recommendations.value());

    let body = html! {
        <>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <StatCard title="Ingresos" amount={balance.income} icon={StatIcon::Income} />
                <StatCard title="Gastos" amount={balance.expense} icon={StatIcon::Expense} />
                <StatCard title="Balance" amount={balance.balance} icon={StatIcon::Balance} />
            </div>

            if !open_recommendations.is_empty() {
                <div class="space-y-3">
                    <h3 class="font-bold text-foreground text-lg">{"Recomendaciones"}</h3>
                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
                        { for open_recommendations.into_iter().map(|recommendation| html! {
                            <RecommendationCard key={recommendation.id} recommendation={recommendation.clone()} />
                        }) }
                    </div>
                </div>
            }

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="bg-card rounded-[10px] p-6 border border-border">
                    <h3 class="font-bold text-foreground text-lg mb-4">{"Gastos por categoría"}</h3>
                    if slices.is_empty() {
                        <EmptyState message="Sin movimientos en este período." />
                    } else {
                        <div class="flex items-center gap-6">
                            <div class="w-36 h-36 rounded-full shrink-0" style={pie_gradient(&slices)}></div>
                            <ul class="space-y-2 text-sm flex-1">
                                { for slices.iter().enumerate().map(|(i, slice)| html! {
                                    <li class="flex items-center justify-between gap-2">
                                        <span class="flex items-center gap-2">
                                            <span class="w-3 h-3 rounded-full" style={format!("background: {}", PIE_COLORS[i % PIE_COLORS.len()])}></span>
                                            { slice.name.clone() }
                                        </span>
                                        <span class="text-muted-foreground">{ format_percent(slice.percentage) }</span>
                                    </li>
                                }) }
                            </ul>
                        </div>
                    }
                </div>
                <div class="bg-card rounded-[10px] p-6 border border-border">
                    <h3 class="font-bold text-foreground text-lg">{"Tendencia mensual"}</h3>
                    if trend_points.is_empty() {
                        <EmptyState message="Aún no hay suficientes datos." />
                    } else {
                        { trend_chart(&trend_points) }
                    }
                </div>
            </div>

            if !cards.is_empty() {
                <div class="grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-4">
                    { for cards.iter().map(|card| html! {
                        <div class="bg-card p-4 rounded-[10px] border border-border">
                            <span class="text-2xl">{ card.icon.clone() }</span>
                            <p class="text-sm font-bold mt-2 truncate">{ card.name.clone() }</p>
                            <p class="text-xs text-muted-foreground">{ format!("{} movimientos", card.count) }</p>
                            <p class="text-sm font-bold text-[#1D617A] mt-1">{ format_currency(card.amount) }</p>
                        </div>
                    }) }
                </div>
            }

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                { panel("Presupuestos", go(Route::List(Resource::Budgets)), if period_budgets.is_empty() {
                    html! { <p class="text-sm text-muted-foreground">{"Sin presupuestos en este período."}</p> }
                } else {
                    html! { <>{ for period_budgets.iter().take(PREVIEW_ITEMS).map(|b| progress_row(
                        b.category_name().to_string(),
                        format!("{} de {}", format_currency(b.current_amount), format_currency(b.limit_amount)),
                        b.usage_percent(),
                        true,
                    )) }</> }
                }) }
                { panel("Metas", go(Route::List(Resource::Goals)), if period_goals.is_empty() {
                    html! { <p class="text-sm text-muted-foreground">{"Sin metas activas."}</p> }
                } else {
                    html! { <>{ for period_goals.iter().take(PREVIEW_ITEMS).map(|g| progress_row(
                        g.name.clone(),
                        format!("{} de {}", format_currency(g.current_amount), format_currency(g.target_amount)),
                        g.progress_percent(),
                        false,
                    )) }</> }
                }) }
                { panel("Deudas", go(Route::List(Resource::Debts)), if period_debts.is_empty() {
                    html! { <p class="text-sm text-muted-foreground">{"Sin deudas pendientes."}</p> }
                } else {
                    html! { <>{ for period_debts.iter().take(PREVIEW_ITEMS).map(|d| progress_row(
                        d.description.clone(),
                        format!("Pendiente: {}", format_currency(d.pending_amount)),
                        d.paid_percent(),
                        false,
                    )) }</> }
                }) }
            </div>

            <VoiceInputButton variant={VoiceButtonVariant::Floating} populate_form={false} />
        </>
    };

    page_shell("Dashboard", actions, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_stops_are_contiguous() {
        let slices = vec![
            PieSlice { name: "a".into(), value: 75.0, percentage: 75.0 },
            PieSlice { name: "b".into(), value: 25.0, percentage: 25.0 },
        ];
        assert_eq!(
            pie_gradient(&slices),
            "background: conic-gradient(#173E63 0.00% 75.00%, #1D617A 75.00% 100.00%);"
        );
    }
}
