use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::error::{AppError, AppResult};
use crate::storage;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
    pub access_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

pub fn load_session() -> Option<Session> {
    storage::load_json::<Session>(storage::SESSION_KEY).filter(|s| !s.access_token.is_empty())
}

pub fn save_session(session: &Session) {
    storage::save_json(storage::SESSION_KEY, session);
}

pub fn clear_session() {
    storage::remove_item(storage::SESSION_KEY);
}

pub type SessionHandle = UseStateHandle<Option<Session>>;

#[hook]
pub fn use_session() -> Option<Session> {
    use_context::<SessionHandle>().and_then(|handle| (*handle).clone())
}

pub fn require_user_id(session: Option<&Session>) -> AppResult<u64> {
    session.map(|s| s.user_id).ok_or(AppError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_session_is_unauthenticated() {
        assert_eq!(require_user_id(None), Err(AppError::Unauthenticated));
        let session = Session {
            user_id: 7,
            access_token: "tok".into(),
            name: String::new(),
            email: String::new(),
        };
        assert_eq!(require_user_id(Some(&session)), Ok(7));
    }

    #[test]
    fn session_round_trips_through_storage_format() {
        let session: Session =
            serde_json::from_str(r#"{"user_id":3,"access_token":"abc"}"#).unwrap();
        assert_eq!(session.user_id, 3);
        assert_eq!(session.name, "");
    }
}
