use log::info;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::forms::{FieldErrors, FormValues};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PaymentMethod {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentMethodPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn to_form(method: &PaymentMethod) -> FormValues {
    FormValues::new()
        .with_text("name", method.name.clone())
        .with_text("description", method.description.clone().unwrap_or_default())
}

pub fn from_form(values: &FormValues) -> Result<PaymentMethodPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = values.require_text("name", "El nombre es requerido", &mut errors);
    errors.into_result(PaymentMethodPayload {
        name: name.unwrap_or_default(),
        description: values.trimmed("description"),
    })
}

pub async fn list_payment_methods(client: &ApiClient) -> AppResult<Vec<PaymentMethod>> {
    client.get("payment-methods").await
}

pub async fn get_payment_method(client: &ApiClient, id: u64) -> AppResult<PaymentMethod> {
    client.get(&format!("payment-methods/{}", id)).await
}

pub async fn create_payment_method(client: &ApiClient, payload: &PaymentMethodPayload) -> AppResult<PaymentMethod> {
    info!("creating payment method {}", payload.name);
    client.post("payment-methods", payload).await
}

pub async fn update_payment_method(
    client: &ApiClient,
    id: u64,
    payload: &PaymentMethodPayload,
) -> AppResult<PaymentMethod> {
    client.patch(&format!("payment-methods/{}", id), payload).await
}

pub async fn delete_payment_method(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("payment-methods/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_name() {
        assert!(from_form(&FormValues::new()).is_err());
        let payload = from_form(&FormValues::new().with_text("name", "Tarjeta débito")).unwrap();
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            serde_json::json!({"name": "Tarjeta débito"})
        );
    }
}
