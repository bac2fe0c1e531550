// src/config.rs
//! Runtime configuration.
//!
//! Mail credentials and tuning knobs come from the process environment (a
//! `.env` file is honoured by `main`). The restaurant list is fixed in code.

use std::path::PathBuf;
use std::time::Duration;

use lettre::message::Mailbox;

use crate::error::ConfigError;
use crate::poll::PollingConfig;

pub const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_MAX_ATTEMPTS: &str = "MAX_ATTEMPTS";
pub const ENV_RETRY_INTERVAL_SECS: &str = "RETRY_INTERVAL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_OCR_LANGUAGES: &str = "OCR_LANGUAGES";
pub const ENV_TESSERACT_PATH: &str = "TESSERACT_PATH";
pub const ENV_OCR_TIMEOUT_SECS: &str = "OCR_TIMEOUT_SECS";

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OCR_LANGUAGES: &str = "kor+eng";
const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where on the channel page the menu image lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLocatorStrategy {
    /// Channel profile picture (`img.img_thumb`), original behind `fname=`.
    ProfileImage,
    /// Latest post's thumbnail (`div.wrap_fit_thumb` background image).
    PostThumbnail,
}

/// One polled restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantConfig {
    pub name: String,
    pub url: String,
    pub channel_id: String,
    /// Post title is a trustworthy date source.
    pub date_in_post: bool,
    pub image_locator: ImageLocatorStrategy,
}

impl RestaurantConfig {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        channel_id: impl Into<String>,
        date_in_post: bool,
        image_locator: ImageLocatorStrategy,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            channel_id: channel_id.into(),
            date_in_post,
            image_locator,
        }
    }
}

/// The polled restaurants, in notification order.
pub fn restaurants() -> Vec<RestaurantConfig> {
    vec![
        RestaurantConfig::new(
            "왕의밥상",
            "https://pf.kakao.com/_kSxlln/posts",
            "_kSxlln",
            true,
            ImageLocatorStrategy::PostThumbnail,
        ),
        RestaurantConfig::new(
            "착한한식뷔페",
            "https://pf.kakao.com/_xgPnnn/posts",
            "_xgPnnn",
            true,
            ImageLocatorStrategy::PostThumbnail,
        ),
        RestaurantConfig::new(
            "원테이블",
            "https://pf.kakao.com/_gVFMn",
            "_gVFMn",
            false,
            ImageLocatorStrategy::ProfileImage,
        ),
    ]
}

#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub from: Mailbox,
    pub to: Mailbox,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub languages: String,
    /// Explicit binary; `None` means search `PATH`.
    pub binary: Option<PathBuf>,
    /// Upper bound for one recognition run.
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            binary: None,
            timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mail: MailConfig,
    pub polling: PollingConfig,
    pub fetch: FetchConfig,
    pub ocr: OcrConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for every variable. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let sender = require(ENV_SENDER_EMAIL)?;
        let password = require(ENV_SENDER_PASSWORD)?;
        let recipient = require(ENV_RECIPIENT_EMAIL)?;

        let from: Mailbox = sender
            .parse()
            .map_err(|e| ConfigError::invalid(ENV_SENDER_EMAIL, e))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| ConfigError::invalid(ENV_RECIPIENT_EMAIL, e))?;

        let mail = MailConfig {
            smtp_host: get(ENV_SMTP_HOST).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            username: sender,
            password,
            from,
            to,
        };

        let defaults = PollingConfig::default();
        let max_attempts = parse_num::<u32>(ENV_MAX_ATTEMPTS, get(ENV_MAX_ATTEMPTS))?
            .unwrap_or(defaults.max_attempts);
        let retry_interval = parse_num::<u64>(ENV_RETRY_INTERVAL_SECS, get(ENV_RETRY_INTERVAL_SECS))?
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry_interval);
        let polling = PollingConfig::new(max_attempts, retry_interval);

        let fetch = FetchConfig {
            timeout: parse_num::<u64>(ENV_FETCH_TIMEOUT_SECS, get(ENV_FETCH_TIMEOUT_SECS))?
                .map(Duration::from_secs)
                .unwrap_or_else(|| FetchConfig::default().timeout),
            ..FetchConfig::default()
        };

        let ocr = OcrConfig {
            languages: get(ENV_OCR_LANGUAGES).unwrap_or_else(|| DEFAULT_OCR_LANGUAGES.to_string()),
            binary: get(ENV_TESSERACT_PATH).map(PathBuf::from),
            timeout: parse_num::<u64>(ENV_OCR_TIMEOUT_SECS, get(ENV_OCR_TIMEOUT_SECS))?
                .map(Duration::from_secs)
                .unwrap_or_else(|| OcrConfig::default().timeout),
        };

        Ok(Self {
            mail,
            polling,
            fetch,
            ocr,
        })
    }
}

fn parse_num<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|v| v.parse::<T>().map_err(|e| ConfigError::invalid(var, e)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const CREDS: [(&str, &str); 3] = [
        (ENV_SENDER_EMAIL, "bot@example.com"),
        (ENV_SENDER_PASSWORD, "app-password"),
        (ENV_RECIPIENT_EMAIL, "team@example.com"),
    ];

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let cfg = AppConfig::from_lookup(lookup(&CREDS)).unwrap();
        assert_eq!(cfg.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(cfg.polling.max_attempts, 6);
        assert_eq!(cfg.polling.retry_interval, Duration::from_secs(900));
        assert_eq!(cfg.fetch.timeout, Duration::from_secs(10));
        assert_eq!(cfg.ocr.languages, "kor+eng");
        assert!(cfg.ocr.binary.is_none());
        assert_eq!(cfg.ocr.timeout, Duration::from_secs(60));
    }

    #[test]
    fn each_missing_credential_is_reported() {
        for skip in 0..CREDS.len() {
            let pairs: Vec<_> = CREDS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| *p)
                .collect();
            let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(CREDS[skip].0));
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut pairs = CREDS.to_vec();
        pairs[1] = (ENV_SENDER_PASSWORD, "   ");
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_SENDER_PASSWORD));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs.push((ENV_MAX_ATTEMPTS, "six"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_MAX_ATTEMPTS, .. }));
    }

    #[test]
    fn password_is_not_in_debug_output() {
        let cfg = AppConfig::from_lookup(lookup(&CREDS)).unwrap();
        let dbg = format!("{:?}", cfg.mail);
        assert!(!dbg.contains("app-password"));
    }

    #[test]
    fn restaurant_list_uses_profile_image_only_for_image_dated_channel() {
        let list = restaurants();
        assert_eq!(list.len(), 3);
        for r in &list {
            let expected = if r.date_in_post {
                ImageLocatorStrategy::PostThumbnail
            } else {
                ImageLocatorStrategy::ProfileImage
            };
            assert_eq!(r.image_locator, expected, "{}", r.name);
        }
    }
}
