use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::features::reports::{ReportFilters, ReportType};
use crate::format::format_slash_date;
use crate::period::{format_iso_date, parse_date_loose, today};
use crate::session::{require_user_id, Session};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    #[serde(default)]
    pub category_id: String,
    pub category_name: String,
    pub total_amount: f64,
    #[serde(default)]
    pub transaction_count: u32,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount {
    pub month: String,
    pub total_amount: f64,
    #[serde(default)]
    pub transaction_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    #[serde(alias = "totalExpenses", alias = "totalIncome")]
    pub total: f64,
    pub total_transactions: u32,
    #[serde(alias = "averageExpense", alias = "averageIncome")]
    pub average: f64,
    #[serde(default)]
    pub top_categories: Vec<CategoryShare>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyAmount>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Under,
    AtLimit,
    Over,
}

impl BudgetStatus {
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::Under => "Bajo Presupuesto",
            BudgetStatus::AtLimit => "En el Límite",
            BudgetStatus::Over => "Sobre Presupuesto",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub id: String,
    pub category_name: String,
    pub limit_amount: f64,
    pub current_amount: f64,
    pub utilization: f64,
    pub status: BudgetStatus,
    #[serde(default)]
    pub month: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budgets: u32,
    pub total_budget_amount: f64,
    pub total_spent: f64,
    #[serde(default)]
    pub average_utilization: f64,
    pub over_budget_count: u32,
    #[serde(default)]
    pub budgets: Vec<BudgetLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Active,
    Overdue,
    Paid,
}

impl DebtStatus {
    pub fn label(self) -> &'static str {
        match self {
            DebtStatus::Active => "Activa",
            DebtStatus::Overdue => "Vencida",
            DebtStatus::Paid => "Pagada",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtLine {
    pub id: String,
    pub description: String,
    pub original_amount: f64,
    pub pending_amount: f64,
    pub paid_amount: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: DebtStatus,
    #[serde(default)]
    pub days_overdue: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    pub total_debts: u32,
    pub total_original_amount: f64,
    pub total_pending_amount: f64,
    pub total_paid_amount: f64,
    #[serde(default)]
    pub average_interest_rate: f64,
    pub overdue_count: u32,
    #[serde(default)]
    pub debts: Vec<DebtLine>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalLine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStatusSummary {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub expired: u32,
    #[serde(default)]
    pub in_progress: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub goals: Vec<GoalLine>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub completed_amount: f64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub goals: Vec<GoalLine>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCategorySummary {
    #[serde(default)]
    pub total_categories: u32,
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub categories: Vec<GoalCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    #[serde(default)]
    pub goal_name: String,
    #[serde(default)]
    pub total_contributions: f64,
    #[serde(default)]
    pub average_contribution: f64,
    #[serde(default)]
    pub last_contribution_date: Option<String>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsDeviation {
    pub date: String,
    pub planned_amount: f64,
    pub actual_amount: f64,
    pub difference: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsComparison {
    #[serde(default)]
    pub goal_name: String,
    #[serde(default)]
    pub deviations: Vec<SavingsDeviation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub category_id: String,
    pub category_name: String,
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub progress: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub total_target_amount: f64,
    #[serde(default)]
    pub total_current_amount: f64,
    #[serde(default)]
    pub overall_progress: f64,
    #[serde(default)]
    pub completed_goals: u32,
    #[serde(default)]
    pub expired_goals: u32,
    #[serde(default)]
    pub in_progress_goals: u32,
    #[serde(default)]
    pub average_contribution: f64,
    #[serde(default)]
    pub last_contribution_date: Option<String>,
    #[serde(default)]
    pub category_breakdown: Vec<CategoryProgress>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPeriod {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    pub savings_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTotals {
    pub total_goals: u32,
    pub completed_goals: u32,
    pub in_progress_goals: u32,
    pub total_target_amount: f64,
    pub total_current_amount: f64,
    pub overall_progress: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    pub total_budgets: u32,
    pub total_budget_amount: f64,
    pub total_spent: f64,
    pub over_budget_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtTotals {
    pub total_debts: u32,
    pub total_pending_amount: f64,
    pub total_paid_amount: f64,
    pub overdue_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBalance {
    pub category_id: String,
    pub category_name: String,
    pub income: f64,
    pub expenses: f64,
    pub net_amount: f64,
    #[serde(default)]
    pub budget_limit: Option<f64>,
    #[serde(default)]
    pub budget_utilization: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBalance {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    #[serde(default)]
    pub goal_contributions: f64,
    #[serde(default)]
    pub debt_payments: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveSummary {
    pub period: PreviewPeriod,
    pub financial_summary: FinancialSummary,
    pub goals: GoalTotals,
    pub budgets: BudgetTotals,
    pub debts: DebtTotals,
    #[serde(default)]
    pub category_breakdown: Vec<CategoryBalance>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyBalance>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportPayload {
    Expense(TransactionSummary),
    Income(TransactionSummary),
    Budget(BudgetSummary),
    Debt(DebtSummary),
    GoalsByStatus(GoalStatusSummary),
    GoalsByCategory(GoalCategorySummary),
    Contributions(ContributionSummary),
    SavingsComparison(SavingsComparison),
    SavingsSummary(SavingsSummary),
    Comprehensive(ComprehensiveSummary),
}

impl ReportPayload {
    pub fn decode(kind: &ReportType, data: &serde_json::Value) -> Option<Self> {
        let data = data.clone();
        let decoded = match kind {
            ReportType::Expense => serde_json::from_value(data).map(ReportPayload::Expense),
            ReportType::Income => serde_json::from_value(data).map(ReportPayload::Income),
            ReportType::Budget => serde_json::from_value(data).map(ReportPayload::Budget),
            ReportType::Debt => serde_json::from_value(data).map(ReportPayload::Debt),
            ReportType::GoalsByStatus => serde_json::from_value(data).map(ReportPayload::GoalsByStatus),
            ReportType::GoalsByCategory => serde_json::from_value(data).map(ReportPayload::GoalsByCategory),
            ReportType::ContributionsByGoal => serde_json::from_value(data).map(ReportPayload::Contributions),
            ReportType::SavingsComparison => serde_json::from_value(data).map(ReportPayload::SavingsComparison),
            ReportType::SavingsSummary => serde_json::from_value(data).map(ReportPayload::SavingsSummary),
            ReportType::Comprehensive => serde_json::from_value(data).map(ReportPayload::Comprehensive),
            ReportType::Unknown(_) => return None,
        };
        match decoded {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!("report data for {} does not match its shape: {}", kind.tag(), e);
                None
            }
        }
    }
}

fn share(id: &str, name: &str, total: f64, count: u32, percentage: f64) -> CategoryShare {
    CategoryShare {
        category_id: id.to_string(),
        category_name: name.to_string(),
        total_amount: total,
        transaction_count: count,
        percentage,
    }
}

fn month(month: &str, total: f64, count: u32) -> MonthlyAmount {
    MonthlyAmount {
        month: month.to_string(),
        total_amount: total,
        transaction_count: count,
    }
}

fn sample_expenses() -> TransactionSummary {
    TransactionSummary {
        total: 2500.5,
        total_transactions: 45,
        average: 55.57,
        top_categories: vec![
            share("1", "Alimentación", 800.0, 15, 32.0),
            share("2", "Transporte", 400.5, 8, 16.0),
            share("3", "Entretenimiento", 300.0, 5, 12.0),
        ],
        monthly_trends: vec![month("2024-01", 1200.0, 20), month("2024-02", 1300.5, 25)],
    }
}

fn sample_income() -> TransactionSummary {
    TransactionSummary {
        total: 3500.0,
        total_transactions: 8,
        average: 437.5,
        top_categories: vec![
            share("1", "Salario", 3000.0, 1, 85.7),
            share("2", "Freelance", 500.0, 7, 14.3),
        ],
        monthly_trends: vec![month("2024-01", 3000.0, 1), month("2024-02", 500.0, 7)],
    }
}

fn sample_budgets() -> BudgetSummary {
    BudgetSummary {
        total_budgets: 5,
        total_budget_amount: 2000.0,
        total_spent: 1500.75,
        average_utilization: 75.0,
        over_budget_count: 1,
        budgets: vec![
            BudgetLine {
                id: "1".into(),
                category_name: "Alimentación".into(),
                limit_amount: 800.0,
                current_amount: 750.0,
                utilization: 93.75,
                status: BudgetStatus::Under,
                month: "2024-01".into(),
            },
            BudgetLine {
                id: "2".into(),
                category_name: "Transporte".into(),
                limit_amount: 300.0,
                current_amount: 320.0,
                utilization: 106.67,
                status: BudgetStatus::Over,
                month: "2024-01".into(),
            },
        ],
    }
}

fn sample_debts() -> DebtSummary {
    DebtSummary {
        total_debts: 3,
        total_original_amount: 5000.0,
        total_pending_amount: 2500.0,
        total_paid_amount: 2500.0,
        average_interest_rate: 12.5,
        overdue_count: 1,
        debts: vec![
            DebtLine {
                id: "1".into(),
                description: "Préstamo personal".into(),
                original_amount: 3000.0,
                pending_amount: 1500.0,
                paid_amount: 1500.0,
                interest_rate: 15.0,
                due_date: Some("2024-03-15".into()),
                status: DebtStatus::Active,
                days_overdue: None,
            },
            DebtLine {
                id: "2".into(),
                description: "Tarjeta de crédito".into(),
                original_amount: 2000.0,
                pending_amount: 1000.0,
                paid_amount: 1000.0,
                interest_rate: 10.0,
                due_date: Some("2024-01-15".into()),
                status: DebtStatus::Overdue,
                days_overdue: Some(15),
            },
        ],
    }
}

fn sample_savings(reference: NaiveDate) -> SavingsSummary {
    SavingsSummary {
        total_goals: 6,
        total_target_amount: 10000.0,
        total_current_amount: 6500.0,
        overall_progress: 65.0,
        completed_goals: 2,
        expired_goals: 1,
        in_progress_goals: 3,
        average_contribution: 500.0,
        last_contribution_date: Some(format_iso_date(reference)),
        category_breakdown: Vec::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn period_label(filters: &ReportFilters) -> String {
    let bound = |raw: &Option<String>, fallback: &str| {
        raw.as_deref()
            .and_then(parse_date_loose)
            .map(format_slash_date)
            .unwrap_or_else(|| fallback.to_string())
    };
    format!(
        "{} - {}",
        bound(&filters.start_date, "Inicio"),
        bound(&filters.end_date, "Fin")
    )
}

fn sample_comprehensive(filters: &ReportFilters, reference: NaiveDate) -> ComprehensiveSummary {
    let expenses = sample_expenses();
    let income = sample_income();
    let budgets = sample_budgets();
    let savings = sample_savings(reference);

    let net_balance = income.total - expenses.total;
    let savings_rate = if income.total > 0.0 {
        net_balance / income.total * 100.0
    } else {
        0.0
    };
    let today_param = format_iso_date(reference);

    ComprehensiveSummary {
        period: PreviewPeriod {
            start_date: Some(filters.start_date.clone().unwrap_or_else(|| today_param.clone())),
            end_date: Some(filters.end_date.clone().unwrap_or(today_param)),
            label: period_label(filters),
        },
        financial_summary: FinancialSummary {
            total_income: income.total,
            total_expenses: expenses.total,
            net_balance,
            savings_rate: round2(savings_rate),
        },
        goals: GoalTotals {
            total_goals: savings.total_goals,
            completed_goals: savings.completed_goals,
            in_progress_goals: savings.in_progress_goals,
            total_target_amount: savings.total_target_amount,
            total_current_amount: savings.total_current_amount,
            overall_progress: round2(savings.overall_progress),
        },
        budgets: BudgetTotals {
            total_budgets: budgets.total_budgets,
            total_budget_amount: budgets.total_budget_amount,
            total_spent: budgets.total_spent,
            over_budget_count: budgets.over_budget_count,
        },
        debts: DebtTotals {
            total_debts: 3,
            total_pending_amount: 2500.0,
            total_paid_amount: 2500.0,
            overdue_count: 1,
        },
        category_breakdown: vec![
            CategoryBalance {
                category_id: "1".into(),
                category_name: "Alimentación".into(),
                income: 0.0,
                expenses: 800.0,
                net_amount: -800.0,
                budget_limit: Some(800.0),
                budget_utilization: Some(93.75),
            },
            CategoryBalance {
                category_id: "2".into(),
                category_name: "Transporte".into(),
                income: 0.0,
                expenses: 400.5,
                net_amount: -400.5,
                budget_limit: Some(300.0),
                budget_utilization: Some(106.67),
            },
        ],
        monthly_trends: vec![
            MonthlyBalance {
                month: "2024-01".into(),
                income: 3000.0,
                expenses: 1200.0,
                balance: 1800.0,
                goal_contributions: 500.0,
                debt_payments: 200.0,
            },
            MonthlyBalance {
                month: "2024-02".into(),
                income: 500.0,
                expenses: 1300.5,
                balance: -800.5,
                goal_contributions: 300.0,
                debt_payments: 150.0,
            },
        ],
    }
}

// Fixed samples; no request is made.
pub fn fetch_preview(
    session: Option<&Session>,
    kind: &ReportType,
    filters: &ReportFilters,
) -> AppResult<ReportPayload> {
    preview_at(session, kind, filters, today())
}

fn preview_at(
    session: Option<&Session>,
    kind: &ReportType,
    filters: &ReportFilters,
    reference: NaiveDate,
) -> AppResult<ReportPayload> {
    require_user_id(session)?;
    debug!("building preview for {}", kind.tag());

    let payload = match kind {
        ReportType::Expense => ReportPayload::Expense(sample_expenses()),
        ReportType::Income => ReportPayload::Income(sample_income()),
        ReportType::Budget => ReportPayload::Budget(sample_budgets()),
        ReportType::Debt => ReportPayload::Debt(sample_debts()),
        ReportType::Comprehensive => ReportPayload::Comprehensive(sample_comprehensive(filters, reference)),
        ReportType::GoalsByStatus => ReportPayload::GoalsByStatus(GoalStatusSummary {
            completed: 2,
            expired: 1,
            in_progress: 3,
            total: 6,
            goals: Vec::new(),
        }),
        ReportType::GoalsByCategory => ReportPayload::GoalsByCategory(GoalCategorySummary::default()),
        ReportType::SavingsSummary => ReportPayload::SavingsSummary(sample_savings(reference)),
        ReportType::ContributionsByGoal => ReportPayload::Contributions(ContributionSummary::default()),
        ReportType::SavingsComparison => ReportPayload::SavingsComparison(SavingsComparison::default()),
        ReportType::Unknown(tag) => {
            return Err(AppError::unsupported(format!("Tipo de reporte no soportado: {}", tag)))
        }
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        Session {
            user_id: 5,
            access_token: "t".into(),
            name: String::new(),
            email: String::new(),
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    fn filters(start: Option<&str>, end: Option<&str>) -> ReportFilters {
        ReportFilters {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            user_id: "5".into(),
            ..ReportFilters::default()
        }
    }

    #[test]
    fn preview_requires_a_user() {
        let err = preview_at(None, &ReportType::Expense, &filters(None, None), reference()).unwrap_err();
        assert_eq!(err, AppError::Unauthenticated);
    }

    #[test]
    fn every_known_type_has_a_preview() {
        let s = session();
        for kind in ReportType::ALL {
            assert!(preview_at(Some(&s), &kind, &filters(None, None), reference()).is_ok());
        }
        let unknown = ReportType::Unknown("MONTHLY_TREND".into());
        assert!(matches!(
            preview_at(Some(&s), &unknown, &filters(None, None), reference()),
            Err(AppError::Unsupported { .. })
        ));
    }

    #[test]
    fn comprehensive_derives_balance_and_savings_rate() {
        let s = session();
        let payload = preview_at(
            Some(&s),
            &ReportType::Comprehensive,
            &filters(Some("2024-01-01"), Some("2024-01-31")),
            reference(),
        )
        .unwrap();
        let summary = match payload {
            ReportPayload::Comprehensive(summary) => summary,
            other => panic!("unexpected payload {:?}", other),
        };
        assert_eq!(summary.financial_summary.net_balance, 999.5);
        assert_eq!(summary.financial_summary.savings_rate, 28.56);
        assert_eq!(summary.period.label, "01/01/2024 - 31/01/2024");
        assert_eq!(summary.goals.total_goals, 6);
    }

    #[test]
    fn comprehensive_label_falls_back_when_bounds_missing() {
        let label = period_label(&filters(None, Some("2024-03-31")));
        assert_eq!(label, "Inicio - 31/03/2024");
        assert_eq!(period_label(&filters(None, None)), "Inicio - Fin");
    }

    #[test]
    fn decodes_stored_expense_and_income_payloads() {
        let expense = json!({
            "totalExpenses": 120.0,
            "totalTransactions": 3,
            "averageExpense": 40.0,
            "topCategories": [{"categoryName": "Hogar", "totalAmount": 120.0}]
        });
        match ReportPayload::decode(&ReportType::Expense, &expense) {
            Some(ReportPayload::Expense(summary)) => {
                assert_eq!(summary.total, 120.0);
                assert_eq!(summary.top_categories[0].category_name, "Hogar");
            }
            other => panic!("unexpected {:?}", other),
        }

        let income = json!({"totalIncome": 900.0, "totalTransactions": 2, "averageIncome": 450.0});
        assert!(matches!(
            ReportPayload::decode(&ReportType::Income, &income),
            Some(ReportPayload::Income(TransactionSummary { total, .. })) if total == 900.0
        ));
    }

    #[test]
    fn mismatched_or_unknown_payloads_do_not_decode() {
        assert_eq!(ReportPayload::decode(&ReportType::Budget, &json!({"foo": 1})), None);
        assert_eq!(
            ReportPayload::decode(&ReportType::Unknown("X".into()), &json!({})),
            None
        );
    }
}
