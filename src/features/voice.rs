use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::forms::FormValues;
use crate::route::{Resource, Route};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCommandResponse {
    pub success: bool,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub extracted_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceFormData {
    pub resource: Resource,
    pub schema: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceResult {
    pub transcription: String,
    pub form_data: Option<VoiceFormData>,
}

pub fn map_to_form_data(intent: &str, extracted: Option<&Map<String, Value>>) -> Option<VoiceFormData> {
    let schema = extracted.filter(|data| !data.is_empty())?;
    let resource = match intent {
        "CREATE_TRANSACTION" => Resource::Transactions,
        "CREATE_GOAL" => Resource::Goals,
        "CREATE_BUDGET" => Resource::Budgets,
        other => {
            debug!("voice intent {} has no form", other);
            return None;
        }
    };
    Some(VoiceFormData {
        resource,
        schema: schema.clone(),
    })
}

pub fn interpret(response: VoiceCommandResponse) -> AppResult<VoiceResult> {
    if !response.success {
        let message = if response.message.is_empty() {
            "Error al procesar el comando de voz".to_string()
        } else {
            response.message
        };
        return Err(AppError::api(message));
    }

    info!(
        "voice intent {} (confidence {:.2})",
        response.intent, response.confidence
    );
    let form_data = map_to_form_data(&response.intent, response.extracted_data.as_ref());
    Ok(VoiceResult {
        transcription: response.message,
        form_data,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub enum VoiceOutcome {
    Populated { applied: usize },
    Navigate(Route),
    Nothing,
}

pub fn resolve_outcome(result: &VoiceResult, populate: bool, form: Option<&mut FormValues>) -> VoiceOutcome {
    let Some(form_data) = &result.form_data else {
        return VoiceOutcome::Nothing;
    };

    match form {
        Some(values) if populate => VoiceOutcome::Populated {
            applied: values.apply_json(&form_data.schema),
        },
        _ => VoiceOutcome::Navigate(Route::Create {
            resource: form_data.resource,
            data: Some(Value::Object(form_data.schema.clone()).to_string()),
        }),
    }
}

pub async fn send_audio(client: &ApiClient, audio: &web_sys::Blob) -> AppResult<VoiceResult> {
    let form = web_sys::FormData::new()
        .map_err(|_| AppError::unsupported("FormData no disponible"))?;
    form.append_with_blob_and_filename("audio", audio, "audio.wav")
        .map_err(|_| AppError::unsupported("no se pudo adjuntar el audio"))?;

    let response: VoiceCommandResponse = client.post_form("voice-command", form).await?;
    interpret(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldValue;
    use chrono::NaiveDate;
    use serde_json::json;

    fn response(intent: &str, data: Value) -> VoiceCommandResponse {
        VoiceCommandResponse {
            success: true,
            intent: intent.to_string(),
            extracted_data: data.as_object().cloned(),
            confidence: 0.9,
            message: "gasté 25 en comida".to_string(),
        }
    }

    #[test]
    fn maps_intents_to_forms() {
        let data = json!({"amount": 25});
        let data = data.as_object();
        assert_eq!(
            map_to_form_data("CREATE_TRANSACTION", data).map(|f| f.resource),
            Some(Resource::Transactions)
        );
        assert_eq!(map_to_form_data("CREATE_GOAL", data).map(|f| f.resource), Some(Resource::Goals));
        assert_eq!(map_to_form_data("CREATE_BUDGET", data).map(|f| f.resource), Some(Resource::Budgets));
        assert_eq!(map_to_form_data("CREATE_DEBT", data), None);
        assert_eq!(map_to_form_data("CREATE_GOAL", json!({}).as_object()), None);
        assert_eq!(map_to_form_data("CREATE_GOAL", None), None);
    }

    #[test]
    fn failed_command_is_an_error_with_server_message() {
        let mut r = response("CREATE_GOAL", json!({}));
        r.success = false;
        r.message = "No entendí el comando".into();
        assert_eq!(
            interpret(r).unwrap_err(),
            AppError::Api {
                message: "No entendí el comando".into()
            }
        );
    }

    #[test]
    fn populate_mode_sets_every_non_null_key_with_dates_coerced() {
        let result = interpret(response(
            "CREATE_BUDGET",
            json!({"category_id": 4, "limit_amount": 600, "month": "2024-05-01", "note": null}),
        ))
        .unwrap();
        let mut form = FormValues::new();
        let outcome = resolve_outcome(&result, true, Some(&mut form));

        assert_eq!(outcome, VoiceOutcome::Populated { applied: 3 });
        assert_eq!(form.get("category_id"), Some(&FieldValue::Number(4.0)));
        assert_eq!(form.get("limit_amount"), Some(&FieldValue::Number(600.0)));
        assert_eq!(
            form.get("month"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()))
        );
        assert!(form.get("note").is_none());
    }

    #[test]
    fn populate_off_navigates_without_touching_the_form() {
        let result = interpret(response(
            "CREATE_TRANSACTION",
            json!({"amount": 25, "date": "2024-05-02"}),
        ))
        .unwrap();
        let mut form = FormValues::new().with_text("description", "previo");
        let before = form.clone();

        match resolve_outcome(&result, false, Some(&mut form)) {
            VoiceOutcome::Navigate(route) => {
                let path = route.path();
                assert!(path.starts_with("/management/transactions/create?data="));
                match route {
                    Route::Create { data: Some(data), .. } => {
                        let decoded: Value = serde_json::from_str(&data).unwrap();
                        assert_eq!(decoded, json!({"amount": 25, "date": "2024-05-02"}));
                    }
                    other => panic!("unexpected route {:?}", other),
                }
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(form, before);
    }

    #[test]
    fn without_a_mounted_form_populate_mode_navigates() {
        let result = interpret(response("CREATE_GOAL", json!({"name": "Viaje"}))).unwrap();
        assert!(matches!(
            resolve_outcome(&result, true, None),
            VoiceOutcome::Navigate(Route::Create {
                resource: Resource::Goals,
                ..
            })
        ));
    }

    #[test]
    fn commands_without_form_data_do_nothing() {
        let result = interpret(response("GREETING", json!({"x": 1}))).unwrap();
        assert_eq!(result.transcription, "gasté 25 en comida");
        assert_eq!(resolve_outcome(&result, true, Some(&mut FormValues::new())), VoiceOutcome::Nothing);
    }
}
