use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use yew::prelude::*;

use crate::period::{format_iso_date, parse_date_loose};

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

pub fn is_date_key(key: &str) -> bool {
    key.contains("date") || key == "month"
}

impl FieldValue {
    pub fn from_json(key: &str, value: &Value) -> Option<FieldValue> {
        if is_date_key(key) {
            return match value {
                Value::Null => None,
                Value::String(raw) => Some(
                    parse_date_loose(raw)
                        .map(FieldValue::Date)
                        .unwrap_or_else(|| FieldValue::Text(raw.clone())),
                ),
                other => Some(FieldValue::Text(other.to_string())),
            };
        }

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            other => Some(FieldValue::Text(other.to_string())),
        }
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Date(d) => format_iso_date(*d),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_date_loose(s),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormValues {
    fields: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: FieldValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_text(self, key: &str, value: impl Into<String>) -> Self {
        self.with(key, FieldValue::Text(value.into()))
    }

    pub fn with_number(self, key: &str, value: Option<f64>) -> Self {
        match value {
            Some(n) => self.with(key, FieldValue::Number(n)),
            None => self,
        }
    }

    pub fn with_date(self, key: &str, value: Option<NaiveDate>) -> Self {
        match value {
            Some(d) => self.with(key, FieldValue::Date(d)),
            None => self,
        }
    }

    pub fn set(&mut self, key: &str, value: FieldValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).map(|v| v.display()).unwrap_or_default()
    }

    pub fn trimmed(&self, key: &str) -> Option<String> {
        Some(self.text(key).trim().to_string()).filter(|s| !s.is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_number())
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.get(key).and_then(|v| v.as_date())
    }

    pub fn require_text(&self, key: &str, message: &str, errors: &mut FieldErrors) -> Option<String> {
        let value = self.trimmed(key);
        if value.is_none() {
            errors.add(key, message);
        }
        value
    }

    pub fn require_number(&self, key: &str, message: &str, errors: &mut FieldErrors) -> Option<f64> {
        let value = self.number(key);
        if value.is_none() {
            errors.add(key, message);
        }
        value
    }

    pub fn require_date(&self, key: &str, message: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
        let value = self.date(key);
        if value.is_none() {
            errors.add(key, message);
        }
        value
    }

    pub fn optional_number(&self, key: &str, message: &str, errors: &mut FieldErrors) -> Option<f64> {
        if self.trimmed(key).is_none() {
            return None;
        }
        self.require_number(key, message, errors)
    }

    pub fn apply_json(&mut self, data: &Map<String, Value>) -> usize {
        let mut applied = 0;
        for (key, value) in data {
            if let Some(field) = FieldValue::from_json(key, value) {
                self.set(key, field);
                applied += 1;
            }
        }
        applied
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn add(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ActiveForm(pub UseStateHandle<FormValues>);

impl ActiveForm {
    pub fn set_field(&self, key: &str, value: FieldValue) {
        let mut next = (*self.0).clone();
        next.set(key, value);
        self.0.set(next);
    }
}

#[hook]
pub fn use_active_form() -> Option<ActiveForm> {
    use_context::<ActiveForm>()
}

pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
            'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn apply_json_sets_non_null_keys_and_coerces_dates() {
        let data = json!({
            "amount": 45.5,
            "description": "Cena",
            "end_date": "2025-06-30",
            "month": "2025-02-01T00:00:00Z",
            "category_id": null,
            "recurring": false
        });
        let mut values = FormValues::new();
        let applied = values.apply_json(data.as_object().unwrap());

        assert_eq!(applied, 5);
        assert_eq!(values.get("amount"), Some(&FieldValue::Number(45.5)));
        assert_eq!(values.get("description"), Some(&FieldValue::Text("Cena".into())));
        assert_eq!(values.get("end_date"), Some(&FieldValue::Date(d(2025, 6, 30))));
        assert_eq!(values.get("month"), Some(&FieldValue::Date(d(2025, 2, 1))));
        assert_eq!(values.get("recurring"), Some(&FieldValue::Bool(false)));
        assert!(values.get("category_id").is_none());
    }

    #[test]
    fn null_does_not_clear_existing_value() {
        let mut values = FormValues::new().with_number("category_id", Some(3.0));
        values.apply_json(json!({"category_id": null}).as_object().unwrap());
        assert_eq!(values.number("category_id"), Some(3.0));
    }

    #[test]
    fn text_fields_parse_as_numbers_and_dates() {
        let values = FormValues::new()
            .with_text("amount", " 12,5 ")
            .with_text("date", "2024-05-01");
        assert_eq!(values.number("amount"), Some(12.5));
        assert_eq!(values.date("date"), Some(d(2024, 5, 1)));
        assert_eq!(values.trimmed("missing"), None);
    }

    #[test]
    fn numbers_display_without_trailing_zeroes() {
        assert_eq!(FieldValue::Number(1500.0).display(), "1500");
        assert_eq!(FieldValue::Number(12.75).display(), "12.75");
        assert_eq!(FieldValue::Date(d(2024, 1, 9)).display(), "2024-01-09");
    }

    #[test]
    fn date_keys() {
        assert!(is_date_key("date"));
        assert!(is_date_key("end_date"));
        assert!(is_date_key("due_date"));
        assert!(is_date_key("month"));
        assert!(!is_date_key("months_left"));
        assert!(!is_date_key("amount"));
    }

    #[test]
    fn normalizes_accents_and_case() {
        assert_eq!(normalize_name(" Alimentación "), "alimentacion");
        assert_eq!(normalize_name("EDUCACIÓN"), "educacion");
        assert_eq!(normalize_name("Año Nuevo"), "ano nuevo");
    }

    #[test]
    fn required_and_optional_fields() {
        let values = FormValues::new()
            .with_text("name", "  ")
            .with_text("amount", "abc")
            .with_text("contribution_amount", "");
        let mut errors = FieldErrors::default();

        assert_eq!(values.require_text("name", "El nombre es requerido", &mut errors), None);
        assert_eq!(values.require_number("amount", "Debe ser un número", &mut errors), None);
        assert_eq!(values.optional_number("contribution_amount", "x", &mut errors), None);
        assert_eq!(values.require_date("date", "Fecha inválida", &mut errors), None);

        assert_eq!(errors.get("name"), Some("El nombre es requerido"));
        assert_eq!(errors.get("amount"), Some("Debe ser un número"));
        assert_eq!(errors.get("contribution_amount"), None);
        assert_eq!(errors.get("date"), Some("Fecha inválida"));
    }

    #[test]
    fn field_errors_keep_first_message_per_key() {
        let mut errors = FieldErrors::default();
        errors.add("name", "El nombre es requerido");
        errors.add("name", "otro");
        assert_eq!(errors.get("name"), Some("El nombre es requerido"));
        assert!(errors.clone().into_result(()).is_err());
        assert!(FieldErrors::default().into_result(1).is_ok());
    }
}
