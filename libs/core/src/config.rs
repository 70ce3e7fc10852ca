use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

/// Default Intercom REST API base.
pub const DEFAULT_BASE_URI: &str = "https://api.intercom.io";

pub const ENV_BOT_ADMIN_ID: &str = "INTERCOM_BOT_ADMIN_ID";
pub const ENV_APP_TOKEN: &str = "INTERCOM_APP_TOKEN";
pub const ENV_API_BASE: &str = "INTERCOM_API_BASE";
pub const ENV_PASS_THREAD_ACTION: &str = "INTERCOM_PASS_THREAD_ACTION";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required connector setting `{0}`")]
    Missing(&'static str),
    #[error("invalid base uri `{uri}`: {reason}")]
    InvalidBaseUri { uri: String, reason: String },
}

/// Partially specified connector settings, as read from a file or the environment.
///
/// Every field is optional here; [`ConnectorConfig::try_from`] merges them over the defaults
/// and rejects missing required values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSettings {
    #[serde(default)]
    pub bot_admin_id: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub handover_action_name: Option<String>,
}

impl ConnectorSettings {
    pub fn from_env() -> Self {
        Self {
            bot_admin_id: env::var(ENV_BOT_ADMIN_ID).ok(),
            api_token: env::var(ENV_APP_TOKEN).ok(),
            base_uri: env::var(ENV_API_BASE).ok(),
            handover_action_name: env::var(ENV_PASS_THREAD_ACTION).ok(),
        }
    }
}

/// Immutable connector configuration captured at construction time.
///
/// ```
/// use ic_core::ConnectorConfig;
///
/// let cfg = ConnectorConfig::new("bot-1", "token")
///     .unwrap()
///     .with_base_uri("http://localhost:9000/")
///     .unwrap();
/// assert_eq!(cfg.reply_url("123"), "http://localhost:9000/conversations/123/reply");
/// assert!(cfg.handover_action_name().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    bot_admin_id: String,
    api_token: String,
    base_uri: String,
    handover_action_name: Option<String>,
}

impl ConnectorConfig {
    pub fn new(
        bot_admin_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::try_from(ConnectorSettings {
            bot_admin_id: Some(bot_admin_id.into()),
            api_token: Some(api_token.into()),
            ..Default::default()
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::try_from(ConnectorSettings::from_env())
    }

    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_uri = normalize_base_uri(&uri.into())?;
        Ok(self)
    }

    pub fn with_handover_action(mut self, action: impl Into<String>) -> Self {
        self.handover_action_name = non_blank(Some(action.into()));
        self
    }

    pub fn bot_admin_id(&self) -> &str {
        &self.bot_admin_id
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn handover_action_name(&self) -> Option<&str> {
        self.handover_action_name.as_deref()
    }

    /// Reply endpoint for a conversation; the id is encoded as a single path segment.
    pub fn reply_url(&self, conversation_id: &str) -> String {
        format!(
            "{}/conversations/{}/reply",
            self.base_uri,
            urlencoding::encode(conversation_id)
        )
    }
}

impl TryFrom<ConnectorSettings> for ConnectorConfig {
    type Error = ConfigError;

    fn try_from(settings: ConnectorSettings) -> Result<Self, Self::Error> {
        let bot_admin_id =
            non_blank(settings.bot_admin_id).ok_or(ConfigError::Missing("botAdminId"))?;
        let api_token = non_blank(settings.api_token).ok_or(ConfigError::Missing("apiToken"))?;
        let base_uri = non_blank(settings.base_uri)
            .map(|uri| normalize_base_uri(&uri))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_BASE_URI.to_string());

        Ok(Self {
            bot_admin_id,
            api_token,
            base_uri,
            handover_action_name: non_blank(settings.handover_action_name),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_uri(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUri {
        uri: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectorSettings {
        ConnectorSettings {
            bot_admin_id: Some("bot".into()),
            api_token: Some("secret".into()),
            base_uri: None,
            handover_action_name: None,
        }
    }

    #[test]
    fn merges_over_defaults() {
        let cfg = ConnectorConfig::try_from(settings()).unwrap();
        assert_eq!(cfg.base_uri(), DEFAULT_BASE_URI);
        assert_eq!(cfg.bot_admin_id(), "bot");
        assert_eq!(cfg.api_token(), "secret");
        assert_eq!(
            cfg.reply_url("1"),
            "https://api.intercom.io/conversations/1/reply"
        );
    }

    #[test]
    fn missing_required_fields_fail_fast() {
        let mut s = settings();
        s.bot_admin_id = None;
        assert_eq!(
            ConnectorConfig::try_from(s).unwrap_err(),
            ConfigError::Missing("botAdminId")
        );

        let mut s = settings();
        s.api_token = Some("   ".into());
        assert_eq!(
            ConnectorConfig::try_from(s).unwrap_err(),
            ConfigError::Missing("apiToken")
        );
    }

    #[test]
    fn trims_trailing_slash_and_rejects_bad_scheme() {
        let mut s = settings();
        s.base_uri = Some("http://x.cz/".into());
        let cfg = ConnectorConfig::try_from(s).unwrap();
        assert_eq!(cfg.reply_url("1"), "http://x.cz/conversations/1/reply");

        let err = ConnectorConfig::new("bot", "t")
            .unwrap()
            .with_base_uri("ftp://x.cz")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUri { .. }));
    }

    #[test]
    fn blank_handover_action_is_unset() {
        let cfg = ConnectorConfig::new("bot", "t")
            .unwrap()
            .with_handover_action("  ");
        assert!(cfg.handover_action_name().is_none());
        let cfg = cfg.with_handover_action("/pass-thread");
        assert_eq!(cfg.handover_action_name(), Some("/pass-thread"));
    }

    #[test]
    fn encodes_conversation_id_segment() {
        let cfg = ConnectorConfig::new("bot", "t").unwrap();
        assert_eq!(
            cfg.reply_url("a/b"),
            "https://api.intercom.io/conversations/a%2Fb/reply"
        );
    }

    #[test]
    fn settings_decode_from_camel_case_json() {
        let s: ConnectorSettings = serde_json::from_value(serde_json::json!({
            "botAdminId": "b",
            "apiToken": "t",
            "handoverActionName": "/handover"
        }))
        .unwrap();
        let cfg = ConnectorConfig::try_from(s).unwrap();
        assert_eq!(cfg.handover_action_name(), Some("/handover"));
    }
}
