use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::ConfigRecord;

/// Identity and connection settings for one running bot.
///
/// `username`/`password` are the credentials of the bot's own REST API and
/// are stored and returned as given. Only the `Debug` output redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    pub name: String,
    pub status: String,
    #[validate(url)]
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl BotConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: status.into(),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl ConfigRecord for BotConfig {
    const KIND: &'static str = "bot config";

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("status", &self.status)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitstamp() -> BotConfig {
        BotConfig::new(
            "bitstamp-bot-1",
            "Bitstamp Bot",
            "Running",
            "https://hostname.one/api",
            "admin",
            "password",
        )
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(bitstamp()).unwrap();
        assert_eq!(json["id"], "bitstamp-bot-1");
        assert_eq!(json["name"], "Bitstamp Bot");
        assert_eq!(json["status"], "Running");
        assert_eq!(json["baseUrl"], "https://hostname.one/api");
        assert_eq!(json["username"], "admin");
        assert_eq!(json["password"], "password");
        assert!(json.get("base_url").is_none());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let body = r#"{"id":"b1","name":"B","status":"Running","baseUrl":"https://x.io","username":"u"}"#;
        assert!(serde_json::from_str::<BotConfig>(body).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(bitstamp().validate().is_ok());

        let mut empty_id = bitstamp();
        empty_id.id = String::new();
        assert!(empty_id.validate().is_err());

        let mut bad_url = bitstamp();
        bad_url.base_url = "not a url".to_string();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", bitstamp());
        assert!(rendered.contains("bitstamp-bot-1"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"password\""));
    }
}
