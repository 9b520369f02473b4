use chrono::{Duration, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};

use crate::api::{with_query, ApiClient};
use crate::error::AppResult;
use crate::features::amount;
use crate::features::categories::CategoryRef;
use crate::forms::{FieldErrors, FieldValue, FormValues};
use crate::period::{format_iso_date, parse_date_loose, PeriodRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Expense, TransactionType::Income];

    pub fn tag(self) -> &'static str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag().eq_ignore_ascii_case(tag.trim()))
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Expense => "Gasto",
            TransactionType::Income => "Ingreso",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "amount::required")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub payment_method_id: Option<u64>,
}

impl Transaction {
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date_loose)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id).or(self.category_id)
    }

    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Expense => -self.amount,
            TransactionType::Income => self.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: u64,
    pub payment_method_id: u64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    Custom,
}

impl DatePreset {
    pub const ALL: [DatePreset; 3] = [DatePreset::Today, DatePreset::Yesterday, DatePreset::Custom];

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Today => "Hoy",
            DatePreset::Yesterday => "Ayer",
            DatePreset::Custom => "Otro día",
        }
    }

    pub fn resolve(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DatePreset::Today => Some(today),
            DatePreset::Yesterday => Some(today - Duration::days(1)),
            DatePreset::Custom => None,
        }
    }

    pub fn matching(date: Option<NaiveDate>, today: NaiveDate) -> DatePreset {
        match date {
            Some(d) if d == today => DatePreset::Today,
            Some(d) if d == today - Duration::days(1) => DatePreset::Yesterday,
            _ => DatePreset::Custom,
        }
    }
}

pub fn default_form(today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_text("description", "")
        .with_text("type", TransactionType::Expense.tag())
        .with_date("date", Some(today))
}

pub fn to_form(transaction: &Transaction, today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_text("description", transaction.description.clone().unwrap_or_default())
        .with_number("amount", Some(transaction.amount))
        .with_text("type", transaction.kind.tag())
        .with_date("date", Some(transaction.day().unwrap_or(today)))
        .with_number("category_id", transaction.category_id().map(|id| id as f64))
        .with_number("payment_method_id", transaction.payment_method_id.map(|id| id as f64))
}

pub fn from_form(values: &FormValues, user_id: Option<u64>) -> Result<TransactionPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let amount = values.require_number("amount", "El monto debe ser un número", &mut errors);
    if matches!(amount, Some(n) if n <= 0.0) {
        errors.add("amount", "El monto debe ser mayor que 0");
    }

    let kind = match values.get("type") {
        Some(FieldValue::Text(tag)) => TransactionType::from_tag(tag),
        _ => None,
    };
    if kind.is_none() {
        errors.add("type", "Seleccione el tipo de transacción");
    }

    let category_id = values.require_number("category_id", "Debe seleccionar una categoría", &mut errors);
    let method_id = values.require_number("payment_method_id", "Debe seleccionar un método de pago", &mut errors);
    let date = values.require_date("date", "La fecha debe ser una fecha válida", &mut errors);

    errors.into_result(TransactionPayload {
        description: values.trimmed("description"),
        amount: amount.unwrap_or_default(),
        kind: kind.unwrap_or(TransactionType::Expense),
        category_id: category_id.unwrap_or_default() as u64,
        payment_method_id: method_id.unwrap_or_default() as u64,
        date: date.map(format_iso_date).unwrap_or_default(),
        user_id,
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    #[serde(deserialize_with = "id_as_string")]
    pub category: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(deserialize_with = "amount::required")]
    pub total: f64,
    #[serde(default)]
    pub count: Option<u32>,
}

impl CategoryTotal {
    pub fn display_name(&self) -> String {
        self.category_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Categoría {}", self.category))
    }
}

fn id_as_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PeriodBalance {
    #[serde(default, deserialize_with = "amount::required")]
    pub income: f64,
    #[serde(default, alias = "expenses", deserialize_with = "amount::required")]
    pub expense: f64,
    #[serde(default, deserialize_with = "amount::required")]
    pub balance: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(default, deserialize_with = "amount::required")]
    pub income: f64,
    #[serde(default, alias = "expenses", deserialize_with = "amount::required")]
    pub expense: f64,
}

fn period_query(user_id: u64, period: &PeriodRange) -> Vec<(&'static str, String)> {
    vec![
        ("userId", user_id.to_string()),
        ("startDate", period.start_param()),
        ("endDate", period.end_param()),
    ]
}

pub async fn list_transactions(client: &ApiClient, user_id: u64) -> AppResult<Vec<Transaction>> {
    client
        .get(&with_query("transactions", &[("userId", user_id.to_string())]))
        .await
}

pub async fn get_transaction(client: &ApiClient, id: u64) -> AppResult<Transaction> {
    client.get(&format!("transactions/{}", id)).await
}

pub async fn create_transaction(client: &ApiClient, payload: &TransactionPayload) -> AppResult<Transaction> {
    info!("creating {} transaction of {}", payload.kind.tag(), payload.amount);
    client.post("transactions", payload).await
}

pub async fn update_transaction(
    client: &ApiClient,
    id: u64,
    payload: &TransactionPayload,
) -> AppResult<Transaction> {
    client.patch(&format!("transactions/{}", id), payload).await
}

pub async fn delete_transaction(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("transactions/{}", id)).await
}

pub async fn category_totals(client: &ApiClient, user_id: u64, period: &PeriodRange) -> AppResult<Vec<CategoryTotal>> {
    client
        .get(&with_query("transactions/category-totals", &period_query(user_id, period)))
        .await
}

pub async fn period_balance(client: &ApiClient, user_id: u64, period: &PeriodRange) -> AppResult<PeriodBalance> {
    client
        .get(&with_query("transactions/balance", &period_query(user_id, period)))
        .await
}

pub async fn monthly_trends(client: &ApiClient, user_id: u64) -> AppResult<Vec<MonthlyTrend>> {
    client
        .get(&with_query("transactions/monthly-trends", &[("userId", user_id.to_string())]))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn filled() -> FormValues {
        default_form(d(2024, 3, 10))
            .with_number("amount", Some(45.5))
            .with_number("category_id", Some(2.0))
            .with_number("payment_method_id", Some(1.0))
    }

    #[test]
    fn valid_expense_payload() {
        let payload = from_form(&filled(), Some(4)).unwrap();
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "amount": 45.5,
                "type": "EXPENSE",
                "category_id": 2,
                "payment_method_id": 1,
                "date": "2024-03-10",
                "user_id": 4
            })
        );
    }

    #[test]
    fn rejects_zero_amount_and_unknown_type() {
        let values = filled()
            .with_number("amount", Some(0.0))
            .with_text("type", "TRANSFER");
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(errors.get("amount"), Some("El monto debe ser mayor que 0"));
        assert_eq!(errors.get("type"), Some("Seleccione el tipo de transacción"));
    }

    #[test]
    fn voice_type_is_case_insensitive() {
        let values = filled().with_text("type", "income");
        assert_eq!(from_form(&values, None).unwrap().kind, TransactionType::Income);
    }

    #[test]
    fn date_presets() {
        let today = d(2024, 3, 1);
        assert_eq!(DatePreset::Yesterday.resolve(today), Some(d(2024, 2, 29)));
        assert_eq!(DatePreset::Custom.resolve(today), None);
        assert_eq!(DatePreset::matching(Some(today), today), DatePreset::Today);
        assert_eq!(DatePreset::matching(Some(d(2024, 1, 1)), today), DatePreset::Custom);
        assert_eq!(DatePreset::ALL.map(|p| p.label()), ["Hoy", "Ayer", "Otro día"]);
    }

    #[test]
    fn decodes_report_endpoints() {
        let totals: Vec<CategoryTotal> = serde_json::from_value(json!([
            {"category": 3, "categoryName": "Comida", "total": "120.50", "count": 4},
            {"category": "9", "total": 10}
        ]))
        .unwrap();
        assert_eq!(totals[0].category, "3");
        assert_eq!(totals[0].total, 120.5);
        assert_eq!(totals[1].display_name(), "Categoría 9");

        let balance: PeriodBalance =
            serde_json::from_value(json!({"income": 1000, "expenses": 400, "balance": 600})).unwrap();
        assert_eq!(balance.expense, 400.0);

        let tx: Transaction =
            serde_json::from_value(json!({"id": 1, "amount": 5, "type": "EXPENSE"})).unwrap();
        assert_eq!(tx.signed_amount(), -5.0);
    }
}
