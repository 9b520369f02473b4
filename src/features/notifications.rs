use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;

use crate::api::{with_query, ApiClient};
use crate::error::AppResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Goal,
    Debt,
    Suggestion,
    Warning,
    Congratulation,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

pub fn badge_text(total: usize) -> Option<String> {
    match total {
        0 => None,
        1..=99 => Some(total.to_string()),
        _ => Some("99+".to_string()),
    }
}

pub fn recommendations_headline(count: usize) -> String {
    if count == 1 {
        "1 nueva recomendación".to_string()
    } else {
        format!("{} nuevas recomendaciones", count)
    }
}

pub fn time_ago(created_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(stamp) = created_at.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) else {
        return "Fecha desconocida".to_string();
    };
    let seconds = (now - stamp.with_timezone(&Utc)).num_seconds().max(0);
    let plural = |n: i64, one: &str, many: &str| {
        if n == 1 {
            format!("hace 1 {}", one)
        } else {
            format!("hace {} {}", n, many)
        }
    };
    match seconds {
        0..=59 => "hace menos de un minuto".to_string(),
        60..=3_599 => plural(seconds / 60, "minuto", "minutos"),
        3_600..=86_399 => plural(seconds / 3_600, "hora", "horas"),
        86_400..=2_591_999 => plural(seconds / 86_400, "día", "días"),
        2_592_000..=31_535_999 => plural(seconds / 2_592_000, "mes", "meses"),
        _ => plural(seconds / 31_536_000, "año", "años"),
    }
}

pub async fn list_notifications(client: &ApiClient, user_id: u64) -> AppResult<Vec<Notification>> {
    client
        .get(&with_query("notifications", &[("userId", user_id.to_string())]))
        .await
}

pub async fn mark_as_read(client: &ApiClient, id: u64) -> AppResult<()> {
    info!("marking notification {} as read", id);
    client.patch_empty(&format!("notifications/{}/read", id)).await
}

pub async fn mark_all_as_read(client: &ApiClient) -> AppResult<()> {
    client.patch_empty("notifications/read-all").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn badge_caps_at_ninety_nine() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(7).as_deref(), Some("7"));
        assert_eq!(badge_text(99).as_deref(), Some("99"));
        assert_eq!(badge_text(100).as_deref(), Some("99+"));
    }

    #[test]
    fn unknown_types_and_unread() {
        let list: Vec<Notification> = serde_json::from_value(json!([
            {"id": 1, "type": "GOAL", "title": "Meta", "read": false},
            {"id": 2, "type": "BIRTHDAY", "title": "x", "read": true},
            {"id": 3, "type": "DEBT", "title": "Deuda"}
        ]))
        .unwrap();
        assert_eq!(list[1].kind, NotificationType::Other);
        assert_eq!(unread_count(&list), 2);
        assert_eq!(recommendations_headline(1), "1 nueva recomendación");
        assert_eq!(recommendations_headline(3), "3 nuevas recomendaciones");
    }

    #[test]
    fn relative_times() {
        let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(time_ago(Some("2024-03-10T11:59:30Z"), now), "hace menos de un minuto");
        assert_eq!(time_ago(Some("2024-03-10T11:55:00Z"), now), "hace 5 minutos");
        assert_eq!(time_ago(Some("2024-03-10T11:00:00Z"), now), "hace 1 hora");
        assert_eq!(time_ago(Some("2024-03-07T12:00:00Z"), now), "hace 3 días");
        assert_eq!(time_ago(Some("garbage"), now), "Fecha desconocida");
        assert_eq!(time_ago(None, now), "Fecha desconocida");
    }
}
