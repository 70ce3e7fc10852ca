use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub json_logs: bool,
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn from_env(default_service_name: &str, default_service_version: &str) -> Self {
        let service_name =
            env::var("SERVICE_NAME").unwrap_or_else(|_| default_service_name.to_string());
        let service_version =
            env::var("SERVICE_VERSION").unwrap_or_else(|_| default_service_version.to_string());
        let environment = env::var("DEPLOYMENT_ENV").unwrap_or_else(|_| "dev".into());
        let json_logs = env::var("LOG_FORMAT")
            .map(|v| parse_json_logs(&v))
            .unwrap_or(true);
        let default_filter = env::var("LOG_LEVEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".into());

        Self {
            service_name,
            service_version,
            environment,
            json_logs,
            default_filter,
        }
    }
}

fn parse_json_logs(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "text" | "pretty" | "plain")
}
