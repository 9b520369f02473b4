use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::period::PeriodRange;

// Unknown tags are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportType {
    GoalsByStatus,
    GoalsByCategory,
    ContributionsByGoal,
    SavingsComparison,
    SavingsSummary,
    Budget,
    Expense,
    Income,
    Debt,
    Comprehensive,
    Unknown(String),
}

impl ReportType {
    pub const ALL: [ReportType; 10] = [
        ReportType::GoalsByStatus,
        ReportType::GoalsByCategory,
        ReportType::ContributionsByGoal,
        ReportType::SavingsComparison,
        ReportType::SavingsSummary,
        ReportType::Budget,
        ReportType::Expense,
        ReportType::Income,
        ReportType::Debt,
        ReportType::Comprehensive,
    ];

    pub fn tag(&self) -> &str {
        match self {
            ReportType::GoalsByStatus => "GOALS_BY_STATUS",
            ReportType::GoalsByCategory => "GOALS_BY_CATEGORY",
            ReportType::ContributionsByGoal => "CONTRIBUTIONS_BY_GOAL",
            ReportType::SavingsComparison => "SAVINGS_COMPARISON",
            ReportType::SavingsSummary => "SAVINGS_SUMMARY",
            ReportType::Budget => "BUDGET",
            ReportType::Expense => "EXPENSE",
            ReportType::Income => "INCOME",
            ReportType::Debt => "DEBT",
            ReportType::Comprehensive => "COMPREHENSIVE",
            ReportType::Unknown(tag) => tag,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReportType::GoalsByStatus => "Metas por Estado",
            ReportType::GoalsByCategory => "Metas por Categoría",
            ReportType::ContributionsByGoal => "Contribuciones por Meta",
            ReportType::SavingsComparison => "Comparación de Ahorros",
            ReportType::SavingsSummary => "Resumen de Ahorros",
            ReportType::Budget => "Presupuestos",
            ReportType::Expense => "Gastos",
            ReportType::Income => "Ingresos",
            ReportType::Debt => "Deudas",
            ReportType::Comprehensive => "Reporte Completo",
            ReportType::Unknown(tag) => tag,
        }
    }

    pub fn is_goal_report(&self) -> bool {
        matches!(
            self,
            ReportType::GoalsByStatus
                | ReportType::GoalsByCategory
                | ReportType::ContributionsByGoal
                | ReportType::SavingsComparison
                | ReportType::SavingsSummary
        )
    }
}

impl From<String> for ReportType {
    fn from(tag: String) -> Self {
        ReportType::ALL
            .into_iter()
            .find(|known| known.tag() == tag)
            .unwrap_or(ReportType::Unknown(tag))
    }
}

impl From<ReportType> for String {
    fn from(kind: ReportType) -> Self {
        kind.tag().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportFormat {
    Json,
    Pdf,
    Excel,
    Csv,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Json,
        ReportFormat::Pdf,
        ReportFormat::Excel,
        ReportFormat::Csv,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ReportFormat::Json => "JSON",
            ReportFormat::Pdf => "PDF",
            ReportFormat::Excel => "EXCEL",
            ReportFormat::Csv => "CSV",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportFormat::Json => "JSON",
            ReportFormat::Pdf => "PDF",
            ReportFormat::Excel => "Excel",
            ReportFormat::Csv => "CSV",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.tag() == tag)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRequest {
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub format: ReportFormat,
    pub filters: ReportFilters,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub format: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub expires_at: String,
    #[serde(default)]
    pub needs_download: Option<bool>,
}

impl Report {
    pub fn format_label(&self) -> &str {
        ReportFormat::from_tag(&self.format)
            .map(ReportFormat::label)
            .unwrap_or(self.format.as_str())
    }
}

fn selected_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && *value != "none" && *value != "all")
        .map(str::to_string)
}

pub fn build_report_request(
    kind: ReportType,
    format: ReportFormat,
    category_id: Option<&str>,
    goal_id: Option<&str>,
    period: &PeriodRange,
    user_id: u64,
) -> ReportRequest {
    ReportRequest {
        kind,
        format,
        filters: ReportFilters {
            start_date: Some(period.start_param()),
            end_date: Some(period.end_param()),
            category_id: selected_filter(category_id),
            goal_id: selected_filter(goal_id),
            user_id: user_id.to_string(),
        },
    }
}

pub async fn generate_report(client: &ApiClient, request: &ReportRequest) -> AppResult<Report> {
    info!(
        "generating {} report as {}",
        request.kind.tag(),
        request.format.tag()
    );
    client.post("reports", request).await
}

pub async fn get_report(client: &ApiClient, id: &str) -> AppResult<Report> {
    client.get(&format!("reports/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use chrono::NaiveDate;
    use serde_json::json;

    fn january() -> PeriodRange {
        PeriodRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            PeriodKind::Custom,
            "01 ene - 31 ene 2024",
        )
        .unwrap()
    }

    #[test]
    fn expense_request_without_category_or_goal_has_only_dates_and_user() {
        let request = build_report_request(
            ReportType::Expense,
            ReportFormat::Pdf,
            None,
            None,
            &january(),
            42,
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body["filters"],
            json!({"startDate": "2024-01-01", "endDate": "2024-01-31", "userId": "42"})
        );
        assert_eq!(body["type"], "EXPENSE");
        assert_eq!(body["format"], "PDF");
    }

    #[test]
    fn sentinel_filter_values_are_dropped() {
        for sentinel in ["", "none", "all", "  "] {
            let request = build_report_request(
                ReportType::GoalsByCategory,
                ReportFormat::Csv,
                Some(sentinel),
                Some(sentinel),
                &january(),
                1,
            );
            assert_eq!(request.filters.category_id, None);
            assert_eq!(request.filters.goal_id, None);
        }

        let request = build_report_request(
            ReportType::ContributionsByGoal,
            ReportFormat::Excel,
            Some("3"),
            Some("9"),
            &january(),
            1,
        );
        assert_eq!(request.filters.category_id.as_deref(), Some("3"));
        assert_eq!(request.filters.goal_id.as_deref(), Some("9"));
    }

    #[test]
    fn unknown_report_types_are_preserved() {
        let report: Report = serde_json::from_value(json!({
            "id": "r1",
            "type": "MONTHLY_TREND",
            "format": "JSON",
            "createdAt": "2024-02-01T10:00:00Z",
            "expiresAt": "2024-02-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(report.kind, ReportType::Unknown("MONTHLY_TREND".into()));
        assert_eq!(report.data, None);
        assert_eq!(report.format_label(), "JSON");
    }

    #[test]
    fn known_tags_round_trip_with_labels() {
        for kind in ReportType::ALL {
            assert_eq!(ReportType::from(kind.tag().to_string()), kind);
        }
        assert_eq!(ReportType::Comprehensive.label(), "Reporte Completo");
        assert!(ReportType::SavingsSummary.is_goal_report());
        assert!(!ReportType::Debt.is_goal_report());
    }
}
