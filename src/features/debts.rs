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
pub struct Debt {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub description: String,
    #[serde(deserialize_with = "amount::required")]
    pub original_amount: f64,
    #[serde(default, deserialize_with = "amount::required")]
    pub pending_amount: f64,
    #[serde(default, deserialize_with = "amount::optional")]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Debt {
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_date_loose)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id).or(self.category_id)
    }

    pub fn is_pending(&self) -> bool {
        self.pending_amount > 0.0
    }

    pub fn paid_percent(&self) -> f64 {
        if self.original_amount <= 0.0 {
            return 0.0;
        }
        (self.original_amount - self.pending_amount) / self.original_amount * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DebtPayload {
    pub description: String,
    pub original_amount: f64,
    pub pending_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

pub fn default_form() -> FormValues {
    FormValues::new().with_text("description", "")
}

pub fn to_form(debt: &Debt) -> FormValues {
    FormValues::new()
        .with_text("description", debt.description.clone())
        .with_number("original_amount", Some(debt.original_amount))
        .with_number("pending_amount", Some(debt.pending_amount))
        .with_number("interest_rate", debt.interest_rate)
        .with_date("due_date", debt.due())
        .with_number("category_id", debt.category_id().map(|id| id as f64))
}

pub fn from_form(values: &FormValues, user_id: Option<u64>) -> Result<DebtPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let description = values.require_text("description", "La descripción es requerida", &mut errors);

    let original = values.require_number("original_amount", "El monto debe ser un número", &mut errors);
    if matches!(original, Some(n) if n <= 0.0) {
        errors.add("original_amount", "El monto total debe ser mayor que 0");
    }

    let pending = values
        .optional_number("pending_amount", "El monto pendiente debe ser un número", &mut errors)
        .or(original);
    if matches!(pending, Some(n) if n < 0.0) {
        errors.add("pending_amount", "El monto pendiente debe ser mayor o igual a 0");
    }
    if let (Some(original), Some(pending)) = (original, pending) {
        if pending > original {
            errors.add("pending_amount", "El monto pendiente no puede ser mayor que el monto total");
        }
    }

    let interest_rate = values.optional_number("interest_rate", "La tasa de interés debe ser un número", &mut errors);
    if matches!(interest_rate, Some(n) if n < 0.0) {
        errors.add("interest_rate", "La tasa de interés debe ser mayor o igual a 0");
    }

    let due_date = match values.trimmed("due_date") {
        Some(_) => values.require_date("due_date", "La fecha de vencimiento debe ser una fecha válida", &mut errors),
        None => None,
    };
    let category_id = values.optional_number("category_id", "La categoría debe ser un número", &mut errors);

    errors.into_result(DebtPayload {
        description: description.unwrap_or_default(),
        original_amount: original.unwrap_or_default(),
        pending_amount: pending.unwrap_or_default(),
        interest_rate,
        due_date: due_date.map(format_iso_date),
        category_id: category_id.map(|id| id as u64),
        user_id,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DebtPaymentPayload {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: u64,
}

pub fn payment_form(debt: &Debt) -> FormValues {
    FormValues::new()
        .with_number("amount", Some(debt.pending_amount))
        .with_text("payment_method_id", "")
        .with_text("description", "")
}

pub fn payment_from_form(values: &FormValues, user_id: u64) -> Result<DebtPaymentPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let amount = values.require_number("amount", "El monto del pago debe ser mayor que 0", &mut errors);
    if matches!(amount, Some(n) if n <= 0.0) {
        errors.add("amount", "El monto del pago debe ser mayor que 0");
    }
    let method = values.optional_number(
        "payment_method_id",
        "Seleccione un método de pago válido",
        &mut errors,
    );

    errors.into_result(DebtPaymentPayload {
        amount: amount.unwrap_or_default(),
        payment_method_id: method.map(|id| id as u64),
        description: values.trimmed("description"),
        user_id,
    })
}

pub fn relevant_in_period<'a>(debts: &'a [Debt], period: &PeriodRange) -> Vec<&'a Debt> {
    debts
        .iter()
        .filter(|debt| match debt.due() {
            Some(due) => debt.is_pending() || period.contains(due),
            None => debt.is_pending(),
        })
        .collect()
}

pub async fn list_debts(client: &ApiClient, user_id: u64) -> AppResult<Vec<Debt>> {
    client
        .get(&with_query("debts", &[("userId", user_id.to_string())]))
        .await
}

pub async fn get_debt(client: &ApiClient, id: u64) -> AppResult<Debt> {
    client.get(&format!("debts/{}", id)).await
}

pub async fn create_debt(client: &ApiClient, payload: &DebtPayload) -> AppResult<Debt> {
    info!("creating debt {}", payload.description);
    client.post("debts", payload).await
}

pub async fn update_debt(client: &ApiClient, id: u64, payload: &DebtPayload) -> AppResult<Debt> {
    client.patch(&format!("debts/{}", id), payload).await
}

pub async fn delete_debt(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("debts/{}", id)).await
}

pub async fn pay_debt(client: &ApiClient, id: u64, payment: &DebtPaymentPayload) -> AppResult<serde_json::Value> {
    info!("paying {} on debt {}", payment.amount, id);
    client.post(&format!("debts/{}/payments", id), payment).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn debt() -> Debt {
        serde_json::from_value(json!({
            "id": 7,
            "description": "Préstamo auto",
            "original_amount": "5000.00",
            "pending_amount": 1200,
            "due_date": "2024-04-10"
        }))
        .unwrap()
    }

    #[test]
    fn new_debt_defaults_pending_to_total() {
        let values = FormValues::new()
            .with_text("description", "Tarjeta")
            .with_number("original_amount", Some(800.0))
            .with_text("due_date", "");
        let payload = from_form(&values, Some(1)).unwrap();
        assert_eq!(payload.pending_amount, 800.0);
        assert_eq!(payload.due_date, None);
    }

    #[test]
    fn pending_cannot_exceed_total() {
        let values = to_form(&debt()).with_number("pending_amount", Some(6000.0));
        let errors = from_form(&values, None).unwrap_err();
        assert_eq!(
            errors.get("pending_amount"),
            Some("El monto pendiente no puede ser mayor que el monto total")
        );
    }

    #[test]
    fn description_and_positive_total_are_required() {
        let errors = from_form(&FormValues::new().with_number("original_amount", Some(0.0)), None).unwrap_err();
        assert!(errors.get("description").is_some());
        assert_eq!(errors.get("original_amount"), Some("El monto total debe ser mayor que 0"));
    }

    #[test]
    fn payment_defaults_to_pending_amount() {
        let values = payment_form(&debt());
        let payment = payment_from_form(&values, 2).unwrap();
        assert_eq!(
            serde_json::to_value(payment).unwrap(),
            json!({"amount": 1200.0, "user_id": 2})
        );

        let values = values.with_number("amount", Some(0.0));
        let errors = payment_from_form(&values, 2).unwrap_err();
        assert_eq!(errors.get("amount"), Some("El monto del pago debe ser mayor que 0"));
    }

    #[test]
    fn period_filter_keeps_pending_or_due() {
        let debts: Vec<Debt> = serde_json::from_value(json!([
            {"id": 1, "description": "a", "original_amount": 10, "pending_amount": 5},
            {"id": 2, "description": "b", "original_amount": 10, "pending_amount": 0, "due_date": "2024-03-20"},
            {"id": 3, "description": "c", "original_amount": 10, "pending_amount": 0, "due_date": "2024-05-20"},
            {"id": 4, "description": "d", "original_amount": 10, "pending_amount": 0}
        ]))
        .unwrap();
        let march = PeriodRange::preset(PeriodKind::CurrentMonth, d(2024, 3, 1)).unwrap();
        let ids: Vec<u64> = relevant_in_period(&debts, &march).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(debt().paid_percent(), 76.0);
    }
}
