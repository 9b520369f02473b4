use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{with_query, ApiClient};
use crate::error::AppResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    SpendingAnalysis,
    GoalOptimization,
    BudgetSuggestion,
    DebtReminder,
    #[serde(other)]
    Other,
}

impl RecommendationType {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationType::SpendingAnalysis => "Análisis de Gastos",
            RecommendationType::GoalOptimization => "Optimización de Metas",
            RecommendationType::BudgetSuggestion => "Sugerencia de Presupuesto",
            RecommendationType::DebtReminder => "Recordatorio de Deuda",
            RecommendationType::Other => "Recomendación",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Priority::High => "bg-red-600 text-white",
            Priority::Medium => "bg-[#173E63] text-white",
            Priority::Low => "bg-secondary text-secondary-foreground",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationStatus {
    Pending,
    Viewed,
    Dismissed,
    Acted,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub prefilled_data: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub actionable: bool,
    #[serde(default)]
    pub actions: Vec<QuickAction>,
    pub status: RecommendationStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCall {
    View,
    Dismiss,
    Act,
}

impl StatusCall {
    pub fn endpoint(self, id: u64) -> String {
        let verb = match self {
            StatusCall::View => "view",
            StatusCall::Dismiss => "dismiss",
            StatusCall::Act => "act",
        };
        format!("recommendations/{}/{}", id, verb)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardEvent {
    Mounted,
    Dismiss,
    QuickAction(usize),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardEffect {
    pub status_call: Option<StatusCall>,
    pub store_prefill: Option<Map<String, Value>>,
    pub navigate_to: Option<String>,
}

pub fn card_effect(recommendation: &Recommendation, event: &CardEvent) -> CardEffect {
    match event {
        CardEvent::Mounted if recommendation.status == RecommendationStatus::Pending => CardEffect {
            status_call: Some(StatusCall::View),
            ..CardEffect::default()
        },
        CardEvent::Mounted => CardEffect::default(),
        CardEvent::Dismiss => CardEffect {
            status_call: Some(StatusCall::Dismiss),
            ..CardEffect::default()
        },
        CardEvent::QuickAction(index) => match recommendation.actions.get(*index) {
            Some(action) => CardEffect {
                status_call: Some(StatusCall::Act),
                store_prefill: action.prefilled_data.clone(),
                navigate_to: Some(action.path.clone()),
            },
            None => CardEffect::default(),
        },
    }
}

pub fn still_open(list: Vec<Recommendation>) -> Vec<Recommendation> {
    list.into_iter()
        .filter(|r| matches!(r.status, RecommendationStatus::Pending | RecommendationStatus::Viewed))
        .collect()
}

pub async fn list_recommendations(client: &ApiClient, user_id: u64) -> AppResult<Vec<Recommendation>> {
    let endpoint = with_query("recommendations", &[("userId", user_id.to_string())]);
    let list: Vec<Recommendation> = client.get(&endpoint).await?;
    debug!("{} recommendations for user {}", list.len(), user_id);
    Ok(list)
}

pub async fn update_status(client: &ApiClient, id: u64, call: StatusCall) -> AppResult<()> {
    info!("recommendation {} -> {:?}", id, call);
    client.patch_empty(&call.endpoint(id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recommendation(status: &str) -> Recommendation {
        serde_json::from_value(json!({
            "id": 11,
            "type": "GOAL_OPTIMIZATION",
            "priority": "HIGH",
            "title": "Crea una meta de ahorro",
            "description": "Tienes excedente este mes",
            "actionable": true,
            "actions": [
                {
                    "label": "Crear meta",
                    "path": "/management/goals/create",
                    "prefilledData": {"name": "Fondo de emergencia", "target_amount": 3000}
                },
                {"label": "Ver metas", "path": "/management/goals"}
            ],
            "status": status,
            "createdAt": "2024-02-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn dashboard_lists_only_open_recommendations() {
        let mut viewed = recommendation("VIEWED");
        viewed.id = 12;
        let open = still_open(vec![
            recommendation("PENDING"),
            recommendation("DISMISSED"),
            viewed,
            recommendation("ACTED"),
        ]);
        assert_eq!(open.iter().map(|r| r.id).collect::<Vec<_>>(), vec![11, 12]);
    }

    #[test]
    fn pending_card_marks_viewed_once_on_mount() {
        let effect = card_effect(&recommendation("PENDING"), &CardEvent::Mounted);
        assert_eq!(effect.status_call, Some(StatusCall::View));
        assert_eq!(effect.navigate_to, None);

        let effect = card_effect(&recommendation("VIEWED"), &CardEvent::Mounted);
        assert_eq!(effect, CardEffect::default());
    }

    #[test]
    fn dismiss_and_act_are_exclusive() {
        let rec = recommendation("VIEWED");
        let dismiss = card_effect(&rec, &CardEvent::Dismiss);
        assert_eq!(dismiss.status_call, Some(StatusCall::Dismiss));
        assert_eq!(dismiss.navigate_to, None);

        let act = card_effect(&rec, &CardEvent::QuickAction(0));
        assert_eq!(act.status_call, Some(StatusCall::Act));
        assert_eq!(act.navigate_to.as_deref(), Some("/management/goals/create"));
        assert_eq!(
            act.store_prefill.and_then(|m| m.get("name").cloned()),
            Some(json!("Fondo de emergencia"))
        );
    }

    #[test]
    fn action_without_prefill_only_navigates() {
        let act = card_effect(&recommendation("VIEWED"), &CardEvent::QuickAction(1));
        assert_eq!(act.store_prefill, None);
        assert_eq!(act.navigate_to.as_deref(), Some("/management/goals"));
        assert_eq!(
            card_effect(&recommendation("VIEWED"), &CardEvent::QuickAction(7)),
            CardEffect::default()
        );
    }

    #[test]
    fn status_endpoints() {
        assert_eq!(StatusCall::View.endpoint(3), "recommendations/3/view");
        assert_eq!(StatusCall::Dismiss.endpoint(3), "recommendations/3/dismiss");
        assert_eq!(StatusCall::Act.endpoint(3), "recommendations/3/act");
    }

    #[test]
    fn unknown_types_still_decode() {
        let rec: Recommendation = serde_json::from_value(json!({
            "id": 1, "type": "SAVINGS_TIP", "priority": "LOW", "title": "t",
            "description": "d", "status": "ACTED"
        }))
        .unwrap();
        assert_eq!(rec.kind, RecommendationType::Other);
        assert_eq!(rec.priority.label(), "Baja");
        assert!(rec.actions.is_empty());
    }
}
