use log::LevelFilter;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            Some(value) if value == "production" || value == "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: Environment,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("FOPY_API_URL"),
            option_env!("FOPY_ENV"),
            option_env!("FOPY_LOG_LEVEL"),
        )
    }

    fn from_values(api_url: Option<&str>, env: Option<&str>, log_level: Option<&str>) -> Self {
        let environment = Environment::parse(env);
        let api_base_url = api_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let default_level = match environment {
            Environment::Development => LevelFilter::Debug,
            Environment::Production => LevelFilter::Info,
        };
        let log_level = log_level
            .and_then(|raw| raw.trim().parse::<LevelFilter>().ok())
            .unwrap_or(default_level);

        Self {
            api_base_url,
            environment,
            log_level,
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url,
            endpoint.trim_start_matches('/')
        )
    }

    pub fn report_artifact_url(&self, report_id: &str) -> String {
        self.url(&format!("reports/{}", report_id))
    }
}

pub fn app_config() -> AppConfig {
    AppConfig::from_build_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_localhost_and_debug() {
        let config = AppConfig::from_values(None, None, None);
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn production_defaults_to_info() {
        let config = AppConfig::from_values(Some("https://api.fopy.app/"), Some("production"), None);
        assert_eq!(config.api_base_url, "https://api.fopy.app");
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn explicit_log_level_wins() {
        let config = AppConfig::from_values(None, Some("production"), Some("warn"));
        assert_eq!(config.log_level, LevelFilter::Warn);

        let config = AppConfig::from_values(None, None, Some("loud"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn joins_endpoints_without_double_slashes() {
        let config = AppConfig::from_values(Some("http://api.local/v1/"), None, None);
        assert_eq!(config.url("/budgets"), "http://api.local/v1/budgets");
        assert_eq!(config.url("goals"), "http://api.local/v1/goals");
        assert_eq!(
            config.report_artifact_url("abc-123"),
            "http://api.local/v1/reports/abc-123"
        );
    }
}
