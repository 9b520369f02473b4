use gloo_net::http::{Request, RequestBuilder, Response};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use web_sys::RequestCredentials;

use crate::config::app_config;
use crate::error::{AppError, AppResult};
use crate::session::Session;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(session: Option<&Session>) -> Self {
        Self {
            base_url: app_config().api_base_url,
            token: session.map(|s| s.access_token.clone()),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.credentials(RequestCredentials::Include);
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        info!("GET {}", endpoint);
        let response = self.authorize(Request::get(&self.url(endpoint))).send().await?;
        read_envelope(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> AppResult<T> {
        info!("POST {}", endpoint);
        let response = self
            .authorize(Request::post(&self.url(endpoint)))
            .json(body)?
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> AppResult<T> {
        info!("PATCH {}", endpoint);
        let response = self
            .authorize(Request::patch(&self.url(endpoint)))
            .json(body)?
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn patch_empty(&self, endpoint: &str) -> AppResult<()> {
        info!("PATCH {}", endpoint);
        let response = self.authorize(Request::patch(&self.url(endpoint))).send().await?;
        ensure_ok(response).await.map(|_| ())
    }

    pub async fn delete(&self, endpoint: &str) -> AppResult<()> {
        info!("DELETE {}", endpoint);
        let response = self.authorize(Request::delete(&self.url(endpoint))).send().await?;
        ensure_ok(response).await.map(|_| ())
    }

    // The voice endpoint answers without the envelope.
    pub async fn post_form<T: DeserializeOwned>(&self, endpoint: &str, form: web_sys::FormData) -> AppResult<T> {
        info!("POST (multipart) {}", endpoint);
        let response = self
            .authorize(Request::post(&self.url(endpoint)))
            .body(form)?
            .send()
            .await?;
        let response = ensure_ok(response).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn ensure_ok(response: Response) -> AppResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::http(status, error_message(&body, response_status_text(status))))
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let response = ensure_ok(response).await?;
    let text = response.text().await?;
    debug!("response body: {} bytes", text.len());
    let value: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text)?
    };
    decode_body(value)
}

fn response_status_text(status: u16) -> &'static str {
    match status {
        400 => "Solicitud inválida",
        401 => "No autorizado",
        403 => "Acceso denegado",
        404 => "Recurso no encontrado",
        500..=599 => "Error del servidor",
        _ => "Error inesperado",
    }
}

fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(|m| m.as_str())
                .or_else(|| json.pointer("/error/message").and_then(|m| m.as_str()))
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| fallback.to_string())
}

pub fn decode_body<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    let is_envelope = value
        .as_object()
        .map(|obj| obj.contains_key("success") && (obj.contains_key("data") || obj.contains_key("message")))
        .unwrap_or(false);

    if !is_envelope {
        return Ok(serde_json::from_value(value)?);
    }

    let success = value.get("success").and_then(|s| s.as_bool()).unwrap_or(true);
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
    if !success {
        return Err(AppError::api(message));
    }

    let data = value.get("data").cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

pub fn with_query(endpoint: &str, params: &[(&str, String)]) -> String {
    let query = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}?{}", endpoint, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Plan {
        id: u32,
        name: String,
    }

    #[test]
    fn unwraps_success_envelope() {
        let plans: Vec<Plan> = decode_body(json!({
            "success": true,
            "data": [{"id": 1, "name": "Lite"}]
        }))
        .unwrap();
        assert_eq!(plans, vec![Plan { id: 1, name: "Lite".into() }]);
    }

    #[test]
    fn failed_envelope_carries_server_message() {
        let err = decode_body::<Vec<Plan>>(json!({
            "success": false,
            "message": "Plan inexistente"
        }))
        .unwrap_err();
        assert_eq!(err, AppError::Api { message: "Plan inexistente".into() });
    }

    #[test]
    fn bare_bodies_decode_directly() {
        let plan: Plan = decode_body(json!({"id": 2, "name": "Plus"})).unwrap();
        assert_eq!(plan.name, "Plus");
    }

    #[test]
    fn query_skips_empty_values_and_encodes() {
        let url = with_query(
            "transactions/category-totals",
            &[
                ("userId", "4".to_string()),
                ("startDate", "2024-01-01".to_string()),
                ("label", "Mes actual".to_string()),
                ("categoryId", String::new()),
            ],
        );
        assert_eq!(
            url,
            "transactions/category-totals?userId=4&startDate=2024-01-01&label=Mes%20actual"
        );
        assert_eq!(with_query("plans", &[]), "plans");
    }

    #[test]
    fn error_message_reads_json_or_falls_back() {
        assert_eq!(error_message(r#"{"message":"Token vencido"}"#, "x"), "Token vencido");
        assert_eq!(error_message(r#"{"error":{"message":"Sin permiso"}}"#, "x"), "Sin permiso");
        assert_eq!(error_message("<html>", "No autorizado"), "No autorizado");
    }
}
