use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::period::parse_date_loose;

pub const PLUS_PLAN_ID: u32 = 2;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Plan {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRef {
    pub name: String,
    #[serde(default)]
    pub duration_days: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub plan_id: Option<u32>,
    #[serde(default)]
    pub plan: Option<PlanRef>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub next_payment_date: Option<String>,
}

impl Subscription {
    pub fn plan_name(&self) -> &str {
        self.plan.as_ref().map(|p| p.name.as_str()).unwrap_or("Plan")
    }

    pub fn is_demo(&self) -> bool {
        self.plan_name().to_lowercase().contains("demo")
    }

    pub fn duration_days(&self) -> u32 {
        self.plan.as_ref().and_then(|p| p.duration_days).unwrap_or(15)
    }

    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        self.end_date
            .as_deref()
            .and_then(parse_date_loose)
            .map(|end| (end - today).num_days().max(0))
            .unwrap_or(0)
    }

    pub fn remaining_percent(&self, today: NaiveDate) -> f64 {
        let total = self.duration_days().max(1) as f64;
        (self.days_remaining(today) as f64 / total * 100.0).clamp(0.0, 100.0)
    }
}

pub fn fallback_plans() -> Vec<Plan> {
    vec![
        Plan {
            id: 1,
            name: "Basic".into(),
            description: Some("Para empezar a ordenar tus finanzas".into()),
            price: "9.99".into(),
            frequency: "monthly".into(),
            features: vec!["Metas, presupuestos y deudas".into(), "Transacciones ilimitadas".into()],
        },
        Plan {
            id: PLUS_PLAN_ID,
            name: "Plus".into(),
            description: Some("Todo lo de Basic, con reportes y recomendaciones".into()),
            price: "19.99".into(),
            frequency: "monthly".into(),
            features: vec![
                "Todo lo del plan Basic".into(),
                "Reportes en PDF, Excel y CSV".into(),
                "Recomendaciones personalizadas".into(),
            ],
        },
    ]
}

pub fn has_lite_plan(subscription: Option<&Subscription>) -> bool {
    subscription
        .and_then(|s| s.plan.as_ref())
        .map(|plan| plan.name.to_lowercase().contains("lite"))
        .unwrap_or(false)
}

pub fn has_premium_access(subscription: Option<&Subscription>) -> bool {
    subscription.is_some() && !has_lite_plan(subscription)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscription {
    pub user_id: u64,
    pub plan_id: u32,
    pub frequency: String,
}

pub async fn list_plans(client: &ApiClient) -> AppResult<Vec<Plan>> {
    client.get("plans").await
}

pub async fn get_subscription(client: &ApiClient, user_id: u64) -> AppResult<Option<Subscription>> {
    client.get(&format!("users/{}/subscription", user_id)).await
}

pub async fn create_subscription(client: &ApiClient, body: &CreateSubscription) -> AppResult<serde_json::Value> {
    info!("subscribing user {} to plan {}", body.user_id, body.plan_id);
    client.post("subscriptions", body).await
}

// Shape checks only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvc: String,
    pub holder: String,
}

impl CardDetails {
    pub fn validate(&self) -> Result<(), &'static str> {
        let digits: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() < 13 || digits.len() > 19 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err("Número de tarjeta inválido");
        }

        let expiry_ok = match self.expiry.trim().split_once('/') {
            Some((mm, yy)) => {
                mm.len() == 2
                    && yy.len() == 2
                    && yy.chars().all(|c| c.is_ascii_digit())
                    && matches!(mm.parse::<u32>(), Ok(1..=12))
            }
            None => false,
        };
        if !expiry_ok {
            return Err("La fecha de expiración debe tener formato MM/YY");
        }

        let cvc = self.cvc.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err("CVC inválido");
        }

        if self.holder.trim().is_empty() {
            return Err("El nombre del titular es requerido");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription(plan: &str) -> Subscription {
        serde_json::from_value(json!({
            "planId": 1,
            "plan": {"name": plan, "durationDays": 30},
            "status": "ACTIVE",
            "active": true
        }))
        .unwrap()
    }

    #[test]
    fn lite_detection_ignores_case() {
        assert!(has_lite_plan(Some(&subscription("Fopy LITE"))));
        assert!(has_lite_plan(Some(&subscription("lite"))));
        assert!(!has_lite_plan(Some(&subscription("Plus"))));
        assert!(!has_lite_plan(None));
    }

    #[test]
    fn premium_needs_a_non_lite_subscription() {
        assert!(has_premium_access(Some(&subscription("Plus"))));
        assert!(!has_premium_access(Some(&subscription("Lite"))));
        assert!(!has_premium_access(None));
    }

    #[test]
    fn demo_plans_and_defaults() {
        let demo = subscription("Demo 15 días");
        assert!(demo.is_demo());
        assert_eq!(demo.duration_days(), 30);

        let bare: Subscription = serde_json::from_value(json!({"status": "ACTIVE"})).unwrap();
        assert_eq!(bare.plan_name(), "Plan");
        assert_eq!(bare.duration_days(), 15);
    }

    #[test]
    fn trial_countdown() {
        let sub: Subscription = serde_json::from_value(json!({
            "plan": {"name": "Demo", "durationDays": 10},
            "endDate": "2024-03-15T00:00:00Z"
        }))
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(sub.days_remaining(today), 5);
        assert_eq!(sub.remaining_percent(today), 50.0);
        let later = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(sub.days_remaining(later), 0);
        assert_eq!(fallback_plans()[1].id, PLUS_PLAN_ID);
    }

    #[test]
    fn card_shape_checks() {
        let mut card = CardDetails {
            number: "4242 4242 4242 4242".into(),
            expiry: "09/27".into(),
            cvc: "123".into(),
            holder: "Ana Pérez".into(),
        };
        assert_eq!(card.validate(), Ok(()));

        card.expiry = "13/27".into();
        assert!(card.validate().is_err());
        card.expiry = "09/27".into();
        card.number = "4242".into();
        assert_eq!(card.validate(), Err("Número de tarjeta inválido"));
        card.number = "4242424242424242".into();
        card.holder = "  ".into();
        assert_eq!(card.validate(), Err("El nombre del titular es requerido"));
    }

    #[test]
    fn subscription_body_is_camel_case() {
        let body = CreateSubscription {
            user_id: 3,
            plan_id: PLUS_PLAN_ID,
            frequency: "monthly".into(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"userId": 3, "planId": 2, "frequency": "monthly"})
        );
    }
}
