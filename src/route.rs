use log::{debug, warn};
use yew::prelude::*;

use crate::period::{parse_date_loose, PeriodKind, PeriodRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Goals,
    Budgets,
    Debts,
    Transactions,
    Categories,
    PaymentMethods,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Goals,
        Resource::Budgets,
        Resource::Debts,
        Resource::Transactions,
        Resource::Categories,
        Resource::PaymentMethods,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            Resource::Goals => "goals",
            Resource::Budgets => "budgets",
            Resource::Debts => "debts",
            Resource::Transactions => "transactions",
            Resource::Categories => "categories",
            Resource::PaymentMethods => "payment-methods",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.segment() == segment)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Landing,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Subscribe { plan_id: Option<u32> },
    Dashboard,
    List(Resource),
    Create { resource: Resource, data: Option<String> },
    Edit { resource: Resource, id: u64 },
    DebtPayment { id: u64 },
    Reports,
    ReportCreate { period: Option<PeriodRange> },
    ReportDetail { id: String },
    Profile,
    NotFound(String),
}

fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |raw: &str| {
                urlencoding::decode(&raw.replace('+', " "))
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| raw.to_string())
            };
            (decode(key), decode(value))
        })
        .collect()
}

fn query_value(query: &[(String, String)], key: &str) -> Option<String> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

fn period_from_query(query: &[(String, String)]) -> Option<PeriodRange> {
    let start = parse_date_loose(&query_value(query, "startDate")?)?;
    let end = parse_date_loose(&query_value(query, "endDate")?)?;
    let kind = query_value(query, "type")
        .and_then(|raw| PeriodKind::from_tag(&raw))
        .unwrap_or(PeriodKind::Custom);
    let label = query_value(query, "label").unwrap_or_else(|| "Período personalizado".to_string());
    PeriodRange::new(start, end, kind, label).ok()
}

impl Route {
    pub fn parse(path: &str, search: &str) -> Route {
        let query = parse_query(search);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword {
                token: query_value(&query, "token"),
            },
            ["subscribe"] => Route::Subscribe {
                plan_id: query_value(&query, "planId").and_then(|id| id.parse().ok()),
            },
            ["management"] | ["management", "dashboard"] => Route::Dashboard,
            ["management", "profile"] => Route::Profile,
            ["management", "reports"] => Route::Reports,
            ["management", "reports", "create"] => Route::ReportCreate {
                period: period_from_query(&query),
            },
            ["management", "reports", id] => Route::ReportDetail { id: id.to_string() },
            ["management", "debts", id, "pay"] => match id.parse() {
                Ok(id) => Route::DebtPayment { id },
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["management", resource] => match Resource::from_segment(resource) {
                Some(resource) => Route::List(resource),
                None => Route::NotFound(path.to_string()),
            },
            ["management", resource, "create"] => match Resource::from_segment(resource) {
                Some(resource) => Route::Create {
                    resource,
                    data: query_value(&query, "data"),
                },
                None => Route::NotFound(path.to_string()),
            },
            ["management", resource, id, "edit"] => {
                match (Resource::from_segment(resource), id.parse()) {
                    (Some(resource), Ok(id)) => Route::Edit { resource, id },
                    _ => Route::NotFound(path.to_string()),
                }
            }
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn from_href(href: &str) -> Route {
        match href.split_once('?') {
            Some((path, search)) => Route::parse(path, search),
            None => Route::parse(href, ""),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword { token } => match token {
                Some(token) => format!("/reset-password?token={}", urlencoding::encode(token)),
                None => "/reset-password".to_string(),
            },
            Route::Subscribe { plan_id } => match plan_id {
                Some(id) => format!("/subscribe?planId={}", id),
                None => "/subscribe".to_string(),
            },
            Route::Dashboard => "/management".to_string(),
            Route::List(resource) => format!("/management/{}", resource.segment()),
            Route::Create { resource, data } => match data {
                Some(data) => format!(
                    "/management/{}/create?data={}",
                    resource.segment(),
                    urlencoding::encode(data)
                ),
                None => format!("/management/{}/create", resource.segment()),
            },
            Route::Edit { resource, id } => format!("/management/{}/{}/edit", resource.segment(), id),
            Route::DebtPayment { id } => format!("/management/debts/{}/pay", id),
            Route::Reports => "/management/reports".to_string(),
            Route::ReportCreate { period } => match period {
                Some(period) => format!(
                    "/management/reports/create?startDate={}&endDate={}&type={}&label={}",
                    period.start_date.format("%Y-%m-%d"),
                    period.end_date.format("%Y-%m-%d"),
                    period.kind.tag(),
                    urlencoding::encode(&period.label)
                ),
                None => "/management/reports/create".to_string(),
            },
            Route::ReportDetail { id } => format!("/management/reports/{}", id),
            Route::Profile => "/management/profile".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::List(_)
                | Route::Create { .. }
                | Route::Edit { .. }
                | Route::DebtPayment { .. }
                | Route::Reports
                | Route::ReportCreate { .. }
                | Route::ReportDetail { .. }
                | Route::Profile
        )
    }
}

#[derive(Clone, PartialEq)]
pub struct Navigator {
    route: UseStateHandle<Route>,
}

impl Navigator {
    pub fn new(route: UseStateHandle<Route>) -> Self {
        Self { route }
    }

    pub fn current(&self) -> Route {
        (*self.route).clone()
    }

    pub fn push(&self, route: Route) {
        let path = route.path();
        debug!("navigate to {}", path);
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                if history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path)).is_err() {
                    warn!("could not push {} onto history", path);
                }
            }
        }
        self.route.set(route);
    }

    pub fn replace(&self, route: Route) {
        let path = route.path();
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                if history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path)).is_err() {
                    warn!("could not replace history entry with {}", path);
                }
            }
        }
        self.route.set(route);
    }
}

pub fn current_location_route() -> Route {
    let location = web_sys::window().map(|w| w.location());
    match location {
        Some(location) => {
            let path = location.pathname().unwrap_or_else(|_| "/".to_string());
            let search = location.search().unwrap_or_default();
            Route::parse(&path, &search)
        }
        None => Route::Landing,
    }
}

pub fn open_in_new_tab(url: &str) {
    match web_sys::window() {
        Some(window) => {
            if window.open_with_url_and_target(url, "_blank").is_err() {
                warn!("browser blocked opening {}", url);
            }
        }
        None => warn!("no window to open {}", url),
    }
}

#[hook]
pub fn use_navigator() -> Option<Navigator> {
    use_context::<Navigator>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_management_routes() {
        assert_eq!(Route::parse("/management", ""), Route::Dashboard);
        assert_eq!(Route::parse("/management/goals", ""), Route::List(Resource::Goals));
        assert_eq!(
            Route::parse("/management/payment-methods/create", ""),
            Route::Create {
                resource: Resource::PaymentMethods,
                data: None
            }
        );
        assert_eq!(
            Route::parse("/management/budgets/12/edit", ""),
            Route::Edit {
                resource: Resource::Budgets,
                id: 12
            }
        );
        assert_eq!(Route::parse("/management/debts/3/pay", ""), Route::DebtPayment { id: 3 });
        assert_eq!(
            Route::parse("/management/reports/abc", ""),
            Route::ReportDetail { id: "abc".into() }
        );
        assert!(matches!(Route::parse("/management/unknown", ""), Route::NotFound(_)));
    }

    #[test]
    fn create_route_round_trips_encoded_data() {
        let route = Route::Create {
            resource: Resource::Transactions,
            data: Some(r#"{"amount":25,"description":"café"}"#.to_string()),
        };
        let href = route.path();
        assert!(href.starts_with("/management/transactions/create?data="));
        assert_eq!(Route::from_href(&href), route);
    }

    #[test]
    fn report_create_reads_period_from_query() {
        let route = Route::parse(
            "/management/reports/create",
            "?startDate=2024-02-01&endDate=2024-02-29&type=last-month&label=Mes%20anterior",
        );
        match route {
            Route::ReportCreate { period: Some(period) } => {
                assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
                assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
                assert_eq!(period.kind, PeriodKind::LastMonth);
                assert_eq!(period.label, "Mes anterior");
            }
            other => panic!("unexpected route {:?}", other),
        }
    }

    #[test]
    fn report_create_without_bounds_has_no_period() {
        assert_eq!(
            Route::parse("/management/reports/create", "?startDate=2024-02-01"),
            Route::ReportCreate { period: None }
        );
    }

    #[test]
    fn subscribe_reads_plan_id() {
        assert_eq!(Route::parse("/subscribe", "?planId=2"), Route::Subscribe { plan_id: Some(2) });
        assert_eq!(Route::parse("/subscribe", ""), Route::Subscribe { plan_id: None });
    }

    #[test]
    fn only_management_routes_need_a_session() {
        assert!(Route::Dashboard.requires_session());
        assert!(Route::Profile.requires_session());
        assert!(!Route::Login.requires_session());
        assert!(!Route::Subscribe { plan_id: None }.requires_session());
    }
}
