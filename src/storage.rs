use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub const SESSION_KEY: &str = "session";
pub const RECOMMENDATION_ACTION_KEY: &str = "recommendationAction";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub fn get_item(key: &str) -> Option<String> {
    local_storage().and_then(|storage| storage.get_item(key).ok().flatten())
}

pub fn set_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            warn!("could not write {} to local storage", key);
        }
    }
}

pub fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        if storage.remove_item(key).is_err() {
            warn!("could not remove {} from local storage", key);
        }
    }
}

pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = get_item(key)?;
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("ignoring malformed {} in local storage: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize>(key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        set_item(key, &raw);
    }
}

pub fn store_recommendation_action(prefilled: &Map<String, Value>) {
    save_json(RECOMMENDATION_ACTION_KEY, prefilled);
}

pub fn take_recommendation_action() -> Option<Map<String, Value>> {
    let raw = get_item(RECOMMENDATION_ACTION_KEY)?;
    let parsed = parse_recommendation_action(&raw);
    if parsed.is_some() {
        remove_item(RECOMMENDATION_ACTION_KEY);
        debug!("consumed recommendation prefill");
    }
    parsed
}

fn parse_recommendation_action(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            error!("recommendation prefill is not an object: {}", other);
            None
        }
        Err(e) => {
            error!("error parsing recommendation data: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_prefill() {
        let map = parse_recommendation_action(r#"{"name":"Viaje","target_amount":1500}"#).unwrap();
        assert_eq!(map.get("name"), Some(&Value::String("Viaje".into())));
        assert_eq!(map.get("target_amount").and_then(|v| v.as_f64()), Some(1500.0));
    }

    #[test]
    fn rejects_malformed_prefill() {
        assert!(parse_recommendation_action("{not json").is_none());
        assert!(parse_recommendation_action("[1,2,3]").is_none());
    }
}
