use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{with_query, ApiClient};
use crate::error::AppResult;
use crate::features::amount;
use crate::features::categories::{find_by_name, Category, CategoryRef};
use crate::forms::{FieldErrors, FieldValue, FormValues};
use crate::period::{format_iso_date, parse_date_loose, PeriodRange};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "amount::required")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "amount::required")]
    pub current_amount: f64,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub contribution_frequency: Option<u32>,
    #[serde(default, deserialize_with = "amount::optional")]
    pub contribution_amount: Option<f64>,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Goal {
    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_date_loose)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id).or(self.category_id)
    }

    pub fn is_active(&self) -> bool {
        self.current_amount < self.target_amount
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoalPayload {
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub end_date: String,
    pub contribution_frequency: f64,
    pub category_id: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

pub fn default_form(today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_text("name", "")
        .with_number("current_amount", Some(0.0))
        .with_number("target_amount", Some(0.0))
        .with_date("end_date", Some(today))
        .with_number("contribution_frequency", Some(1.0))
}

pub fn to_form(goal: &Goal, today: NaiveDate) -> FormValues {
    FormValues::new()
        .with_text("name", goal.name.clone())
        .with_number("current_amount", Some(goal.current_amount))
        .with_number("target_amount", Some(goal.target_amount))
        .with_date("end_date", Some(goal.end().unwrap_or(today)))
        .with_number("category_id", goal.category_id().map(|id| id as f64))
        .with_number(
            "contribution_frequency",
            Some(goal.contribution_frequency.unwrap_or(1) as f64),
        )
        .with_number("contribution_amount", goal.contribution_amount)
}

pub fn prefill_categories(loaded: Option<&[Category]>, failed: bool) -> Option<&[Category]> {
    match loaded {
        Some(list) => Some(list),
        None if failed => Some(&[]),
        None => None,
    }
}

// A `category` name resolves against `categories`; `contribution_frecuency` is the backend spelling.
pub fn apply_prefill(values: &mut FormValues, data: &Map<String, Value>, categories: &[Category]) -> usize {
    let mut plain = data.clone();
    let category_name = plain.remove("category");
    let frequency = plain.remove("contribution_frecuency");
    let mut applied = values.apply_json(&plain);

    if let Some(name) = category_name.as_ref().and_then(|v| v.as_str()) {
        if !plain.get("category_id").map(|v| !v.is_null()).unwrap_or(false) {
            match find_by_name(categories, name) {
                Some(category) => {
                    values.set("category_id", FieldValue::Number(category.id as f64));
                    applied += 1;
                }
                None => debug!("no category named {} for goal prefill", name),
            }
        }
    }

    if let Some(frequency) = frequency.as_ref().and_then(|v| FieldValue::from_json("contribution_frequency", v)) {
        values.set("contribution_frequency", frequency);
        applied += 1;
    }

    applied
}

pub fn from_form(values: &FormValues, user_id: Option<u64>, today: NaiveDate) -> Result<GoalPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = values.require_text("name", "El nombre es requerido", &mut errors);

    let current = values.require_number(
        "current_amount",
        "La cantidad actual debe ser un número",
        &mut errors,
    );
    if matches!(current, Some(n) if n < 0.0) {
        errors.add("current_amount", "La cantidad actual debe ser mayor que 0");
    }

    let target = values.require_number(
        "target_amount",
        "La cantidad objetivo debe ser un número",
        &mut errors,
    );
    if matches!(target, Some(n) if n < 0.0) {
        errors.add("target_amount", "La cantidad objetivo debe ser mayor que 0");
    }

    let end_date = values.require_date("end_date", "La fecha de fin debe ser una fecha válida", &mut errors);
    if matches!(end_date, Some(end) if end <= today) {
        errors.add("end_date", "La fecha de fin debe ser mayor que la fecha actual");
    }

    let frequency = values.require_number(
        "contribution_frequency",
        "La frecuencia de contribución debe ser un número",
        &mut errors,
    );
    let category_id = values.require_number("category_id", "La categoría debe ser un número", &mut errors);
    let contribution_amount = values.optional_number(
        "contribution_amount",
        "La cantidad de contribución debe ser un número",
        &mut errors,
    );

    if let (Some(current), Some(target)) = (current, target) {
        if target <= current {
            errors.add("target_amount", "La cantidad objetivo debe ser mayor que la cantidad actual");
        }
    }

    errors.into_result(GoalPayload {
        name: name.unwrap_or_default(),
        current_amount: current.unwrap_or_default(),
        target_amount: target.unwrap_or_default(),
        end_date: end_date.map(format_iso_date).unwrap_or_default(),
        contribution_frequency: frequency.unwrap_or(1.0),
        category_id: category_id.unwrap_or_default(),
        contribution_amount,
        user_id,
    })
}

pub fn relevant_in_period<'a>(goals: &'a [Goal], period: &PeriodRange) -> Vec<&'a Goal> {
    goals
        .iter()
        .filter(|g| g.is_active() || g.end().map(|end| period.contains(end)).unwrap_or(false))
        .collect()
}

pub async fn list_goals(client: &ApiClient, user_id: u64) -> AppResult<Vec<Goal>> {
    client
        .get(&with_query("goals", &[("userId", user_id.to_string())]))
        .await
}

pub async fn get_goal(client: &ApiClient, id: u64) -> AppResult<Goal> {
    client.get(&format!("goals/{}", id)).await
}

pub async fn create_goal(client: &ApiClient, payload: &GoalPayload) -> AppResult<Goal> {
    info!("creating goal {}", payload.name);
    client.post("goals", payload).await
}

pub async fn update_goal(client: &ApiClient, id: u64, payload: &GoalPayload) -> AppResult<Goal> {
    client.patch(&format!("goals/{}", id), payload).await
}

pub async fn delete_goal(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("goals/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn categories() -> Vec<Category> {
        serde_json::from_value(json!([
            {"id": 4, "name": "Educación"},
            {"id": 5, "name": "Viajes"}
        ]))
        .unwrap()
    }

    fn filled() -> FormValues {
        FormValues::new()
            .with_text("name", "Fondo de emergencia")
            .with_number("current_amount", Some(100.0))
            .with_number("target_amount", Some(1000.0))
            .with_date("end_date", Some(d(2025, 1, 1)))
            .with_number("contribution_frequency", Some(1.0))
            .with_number("category_id", Some(4.0))
    }

    #[test]
    fn valid_goal_omits_missing_contribution() {
        let payload = from_form(&filled(), Some(3), d(2024, 6, 1)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["end_date"], "2025-01-01");
        assert_eq!(json["user_id"], 3);
        assert!(json.get("contribution_amount").is_none());
    }

    #[test]
    fn target_must_exceed_current() {
        let values = filled().with_number("target_amount", Some(100.0));
        let errors = from_form(&values, None, d(2024, 6, 1)).unwrap_err();
        assert_eq!(
            errors.get("target_amount"),
            Some("La cantidad objetivo debe ser mayor que la cantidad actual")
        );
    }

    #[test]
    fn end_date_must_be_in_the_future() {
        let errors = from_form(&filled(), None, d(2025, 1, 1)).unwrap_err();
        assert_eq!(
            errors.get("end_date"),
            Some("La fecha de fin debe ser mayor que la fecha actual")
        );

        let errors = from_form(&default_form(d(2024, 6, 1)), None, d(2024, 6, 1)).unwrap_err();
        assert_eq!(errors.get("name"), Some("El nombre es requerido"));
        assert!(errors.get("end_date").is_some());
    }

    #[test]
    fn prefill_resolves_category_name_and_frequency_spelling() {
        let data = json!({
            "name": "Curso de inglés",
            "target_amount": 800,
            "category": "educacion",
            "contribution_frecuency": 2,
            "end_date": "2025-03-31"
        });
        let mut values = default_form(d(2024, 6, 1));
        let applied = apply_prefill(&mut values, data.as_object().unwrap(), &categories());

        assert_eq!(applied, 5);
        assert_eq!(values.number("category_id"), Some(4.0));
        assert_eq!(values.number("contribution_frequency"), Some(2.0));
        assert_eq!(values.date("end_date"), Some(d(2025, 3, 31)));
        assert!(values.get("category").is_none());
    }

    #[test]
    fn failed_category_load_still_applies_plain_keys() {
        assert!(prefill_categories(None, false).is_none());
        let list = categories();
        assert_eq!(prefill_categories(Some(&list), true).map(|c| c.len()), Some(list.len()));

        let data = json!({"name": "Vacaciones", "target_amount": 1200, "category": "Viajes"});
        let mut values = FormValues::new();
        let none = prefill_categories(None, true).unwrap();
        let applied = apply_prefill(&mut values, data.as_object().unwrap(), none);
        assert_eq!(applied, 2);
        assert_eq!(values.text("name"), "Vacaciones");
        assert_eq!(values.number("target_amount"), Some(1200.0));
        assert_eq!(values.number("category_id"), None);
    }

    #[test]
    fn explicit_category_id_wins_over_name() {
        let data = json!({"category": "Viajes", "category_id": 4});
        let mut values = FormValues::new();
        apply_prefill(&mut values, data.as_object().unwrap(), &categories());
        assert_eq!(values.number("category_id"), Some(4.0));
    }

    #[test]
    fn dashboard_keeps_active_or_ending_goals() {
        let goals: Vec<Goal> = serde_json::from_value(json!([
            {"id": 1, "name": "a", "target_amount": 100, "current_amount": 20, "end_date": "2030-01-01"},
            {"id": 2, "name": "b", "target_amount": 100, "current_amount": 100, "end_date": "2024-03-15"},
            {"id": 3, "name": "c", "target_amount": 100, "current_amount": 100, "end_date": "2023-01-01"}
        ]))
        .unwrap();
        let march = PeriodRange::preset(PeriodKind::CurrentMonth, d(2024, 3, 1)).unwrap();
        let ids: Vec<u64> = relevant_in_period(&goals, &march).iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(goals[0].progress_percent(), 20.0);
    }
}
