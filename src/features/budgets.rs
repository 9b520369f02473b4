use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::api::{with_query, ApiClient};
use crate::error::AppResult;
use crate::features::amount;
use crate::features::categories::CategoryRef;
use crate::forms::{FieldErrors, FormValues};
use crate::period::{format_iso_date, parse_date_loose, PeriodRange};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Budget {
    pub id: u64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(deserialize_with = "amount::required")]
    pub limit_amount: f64,
    #[serde(default, deserialize_with = "amount::required")]
    pub current_amount: f64,
    #[serde(default)]
    pub month: Option<String>,
}

impl Budget {
    pub fn month_date(&self) -> Option<NaiveDate> {
        self.month.as_deref().and_then(parse_date_loose)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id).or(self.category_id)
    }

    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("Sin categoría")
    }

    pub fn usage_percent(&self) -> f64 {
        if self.limit_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.limit_amount * 100.0
    }

    pub fn remaining(&self) -> f64 {
        self.limit_amount - self.current_amount
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetPayload {
    pub category_id: u64,
    pub current_amount: f64,
    pub limit_amount: f64,
    pub month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

pub fn default_form(today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_number("current_amount", Some(0.0))
        .with_date("month", Some(today))
}

pub fn to_form(budget: &Budget, today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_number("category_id", budget.category_id().map(|id| id as f64))
        .with_number("current_amount", Some(budget.current_amount))
        .with_number("limit_amount", Some(budget.limit_amount))
        .with_date("month", Some(budget.month_date().unwrap_or(today)))
}

pub fn from_form(values: &FormValues, user_id: Option<u64>) -> Result<BudgetPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let category_id = values.require_number("category_id", "Debe seleccionar una categoría", &mut errors);
    if matches!(category_id, Some(id) if id < 1.0) {
        errors.add("category_id", "Debe seleccionar una categoría");
    }

    let current = values.require_number(
        "current_amount",
        "La cantidad actual debe ser un número",
        &mut errors,
    );
    if matches!(current, Some(n) if n < 0.0) {
        errors.add("current_amount", "La cantidad actual debe ser mayor o igual a 0");
    }

    let limit = values.require_number("limit_amount", "El límite debe ser un número", &mut errors);
    if matches!(limit, Some(n) if n < 0.0) {
        errors.add("limit_amount", "El límite debe ser mayor que 0");
    }

    let month = values.require_date("month", "La fecha debe ser una fecha válida", &mut errors);

    if let (Some(current), Some(limit)) = (current, limit) {
        if current > limit {
            errors.add("current_amount", "La cantidad actual no puede ser mayor que el límite");
        }
    }

    errors.into_result(BudgetPayload {
        category_id: category_id.unwrap_or_default() as u64,
        current_amount: current.unwrap_or_default(),
        limit_amount: limit.unwrap_or_default(),
        month: month.map(format_iso_date).unwrap_or_default(),
        user_id,
    })
}

pub fn in_period<'a>(budgets: &'a [Budget], period: &PeriodRange) -> Vec<&'a Budget> {
    budgets
        .iter()
        .filter(|b| b.month_date().map(|m| period.contains(m)).unwrap_or(false))
        .collect()
}

pub async fn list_budgets(client: &ApiClient, user_id: u64) -> AppResult<Vec<Budget>> {
    client
        .get(&with_query("budgets", &[("userId", user_id.to_string())]))
        .await
}

pub async fn get_budget(client: &ApiClient, id: u64) -> AppResult<Budget> {
    client.get(&format!("budgets/{}", id)).await
}

pub async fn create_budget(client: &ApiClient, payload: &BudgetPayload) -> AppResult<Budget> {
    info!("creating budget for category {}", payload.category_id);
    client.post("budgets", payload).await
}

pub async fn update_budget(client: &ApiClient, id: u64, payload: &BudgetPayload) -> AppResult<Budget> {
    client.patch(&format!("budgets/{}", id), payload).await
}

pub async fn delete_budget(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("budgets/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn filled() -> FormValues {
        FormValues::new()
            .with_number("category_id", Some(2.0))
            .with_number("current_amount", Some(100.0))
            .with_number("limit_amount", Some(500.0))
            .with_date("month", Some(d(2024, 3, 1)))
    }

    #[test]
    fn valid_form_builds_payload() {
        let payload = from_form(&filled(), Some(9)).unwrap();
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "category_id": 2,
                "current_amount": 100.0,
                "limit_amount": 500.0,
                "month": "2024-03-01",
                "user_id": 9
            })
        );
    }

    #[test]
    fn current_above_limit_is_rejected_on_current_amount() {
        let values = filled().with_number("current_amount", Some(600.0));
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(
            errors.get("current_amount"),
            Some("La cantidad actual no puede ser mayor que el límite")
        );
        assert_eq!(errors.get("limit_amount"), None);
    }

    #[test]
    fn category_must_be_selected() {
        let values = filled().with_number("category_id", Some(0.0));
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(errors.get("category_id"), Some("Debe seleccionar una categoría"));

        let mut values = default_form(d(2024, 3, 5));
        values = values.with_number("limit_amount", Some(10.0));
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(errors.get("category_id"), Some("Debe seleccionar una categoría"));
        assert_eq!(errors.get("month"), None);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let values = filled().with_number("current_amount", Some(-1.0));
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(
            errors.get("current_amount"),
            Some("La cantidad actual debe ser mayor o igual a 0")
        );
    }

    #[test]
    fn period_filter_uses_budget_month() {
        let budgets: Vec<Budget> = serde_json::from_value(json!([
            {"id": 1, "limit_amount": "300.00", "current_amount": 10, "month": "2024-03-01T00:00:00.000Z"},
            {"id": 2, "limit_amount": 300, "month": "2024-01-01"},
            {"id": 3, "limit_amount": 300, "month": null}
        ]))
        .unwrap();
        let march = PeriodRange::preset(PeriodKind::CurrentMonth, d(2024, 3, 20)).unwrap();
        let ids: Vec<u64> = in_period(&budgets, &march).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(budgets[0].limit_amount, 300.0);
        assert_eq!(budgets[1].current_amount, 0.0);
    }

    #[test]
    fn usage_percent_handles_zero_limit() {
        let mut budget: Budget =
            serde_json::from_value(json!({"id": 1, "limit_amount": 200, "current_amount": 150})).unwrap();
        assert_eq!(budget.usage_percent(), 75.0);
        assert_eq!(budget.remaining(), 50.0);
        budget.limit_amount = 0.0;
        assert_eq!(budget.usage_percent(), 0.0);
        assert_eq!(to_form(&budget, d(2024, 1, 1)).date("month"), Some(d(2024, 1, 1)));
    }
}
