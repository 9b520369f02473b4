pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod debts;
pub mod goals;
pub mod notifications;
pub mod payment_methods;
pub mod recommendations;
pub mod report_preview;
pub mod reports;
pub mod subscriptions;
pub mod transactions;
pub mod users;
pub mod voice;

// Money arrives as a JSON number or a decimal string.
pub mod amount {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null,
    }

    fn parse(raw: Raw) -> Option<f64> {
        match raw {
            Raw::Number(n) => Some(n),
            Raw::Text(s) => s.trim().parse().ok(),
            Raw::Null => None,
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(parse(Raw::deserialize(deserializer)?).unwrap_or(0.0))
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(parse(Raw::deserialize(deserializer)?))
    }

    #[cfg(test)]
    mod tests {
        use serde::Deserialize;
        use serde_json::json;

        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "super::required")]
            total: f64,
            #[serde(default, deserialize_with = "super::optional")]
            rate: Option<f64>,
        }

        #[test]
        fn accepts_numbers_and_decimal_strings() {
            let row: Row = serde_json::from_value(json!({"total": "1500.50", "rate": 2})).unwrap();
            assert_eq!(row.total, 1500.5);
            assert_eq!(row.rate, Some(2.0));

            let row: Row = serde_json::from_value(json!({"total": null})).unwrap();
            assert_eq!(row.total, 0.0);
            assert_eq!(row.rate, None);
        }
    }
}
