//! User settings.

use crate::errors::{Result, TubeflowError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Placeholder written in place of the API key on export.
pub const REDACTED: &str = "[REDACTED]";

/// Upper bound on topics per run.
pub const MAX_TOPIC_COUNT: u32 = 10;

/// Audience age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeBand {
    /// Ages 3 to 5.
    #[serde(rename = "3-5")]
    ThreeToFive,
    /// Ages 6 to 8.
    #[default]
    #[serde(rename = "6-8")]
    SixToEight,
    /// Ages 9 to 12.
    #[serde(rename = "9-12")]
    NineToTwelve,
}

impl AgeBand {
    /// Returns the band label, e.g. `6-8`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThreeToFive => "3-5",
            Self::SixToEight => "6-8",
            Self::NineToTwelve => "9-12",
        }
    }

    /// Returns the language guidance given to the model.
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::ThreeToFive => {
                "Use very simple words and basic concepts that a 3-5 year old would understand. Use fun analogies and short sentences."
            }
            Self::SixToEight => {
                "Use elementary school level language that a 6-8 year old would understand. Include some educational details but keep it simple."
            }
            Self::NineToTwelve => {
                "Use middle school level language that a 9-12 year old would understand. Include more detailed explanations but keep it engaging."
            }
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeBand {
    type Err = TubeflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "3-5" => Ok(Self::ThreeToFive),
            "6-8" => Ok(Self::SixToEight),
            "9-12" => Ok(Self::NineToTwelve),
            other => Err(TubeflowError::config(format!("unknown age band '{other}'"))),
        }
    }
}

/// Target length of the detailed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// 150-200 words.
    Short,
    /// 250-300 words.
    #[default]
    Medium,
    /// 350-400 words.
    Long,
}

impl SummaryLength {
    /// Returns the word-count band given to the model.
    #[must_use]
    pub fn word_band(&self) -> &'static str {
        match self {
            Self::Short => "150-200 words",
            Self::Medium => "250-300 words",
            Self::Long => "350-400 words",
        }
    }
}

impl FromStr for SummaryLength {
    type Err = TubeflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(TubeflowError::config(format!(
                "unknown summary length '{other}'"
            ))),
        }
    }
}

/// Settings shared by every run, stored as camelCase JSON.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Gemini API key. Empty means unset.
    #[serde(default)]
    pub gemini_api_key: String,
    /// Audience age band.
    #[serde(default)]
    pub default_age: AgeBand,
    /// Requested number of topics.
    #[serde(default = "default_max_topics")]
    pub max_topics: u32,
    /// Target length of the detailed summary.
    #[serde(default)]
    pub summary_length: SummaryLength,
    /// Whether callers should summarize new videos without being asked.
    #[serde(default = "default_auto_summarize")]
    pub auto_summarize: bool,
    /// Whole-run deadline in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_seconds: Option<f64>,
}

fn default_max_topics() -> u32 {
    5
}

fn default_auto_summarize() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            default_age: AgeBand::default(),
            max_topics: default_max_topics(),
            summary_length: SummaryLength::default(),
            auto_summarize: default_auto_summarize(),
            run_timeout_seconds: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.gemini_api_key.is_empty() {
            ""
        } else {
            REDACTED
        };
        f.debug_struct("Settings")
            .field("gemini_api_key", &key)
            .field("default_age", &self.default_age)
            .field("max_topics", &self.max_topics)
            .field("summary_length", &self.summary_length)
            .field("auto_summarize", &self.auto_summarize)
            .field("run_timeout_seconds", &self.run_timeout_seconds)
            .finish()
    }
}

impl Settings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_api_key = api_key.into();
        self
    }

    /// Sets the age band.
    #[must_use]
    pub fn with_age(mut self, age: AgeBand) -> Self {
        self.default_age = age;
        self
    }

    /// Sets the requested topic count.
    #[must_use]
    pub fn with_max_topics(mut self, max_topics: u32) -> Self {
        self.max_topics = max_topics;
        self
    }

    /// Sets the summary length.
    #[must_use]
    pub fn with_summary_length(mut self, length: SummaryLength) -> Self {
        self.summary_length = length;
        self
    }

    /// Sets the whole-run deadline.
    #[must_use]
    pub fn with_run_timeout(mut self, seconds: f64) -> Self {
        self.run_timeout_seconds = Some(seconds);
        self
    }

    /// Returns the topic count clamped to `1..=10`.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.max_topics.clamp(1, MAX_TOPIC_COUNT) as usize
    }

    /// Returns the configured API key, falling back to `GEMINI_API_KEY`.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        let configured = self.gemini_api_key.trim();
        if !configured.is_empty() && configured != REDACTED {
            return Some(configured.to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Loads settings from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read and a serialization
    /// error if it is not valid settings JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Writes settings to a JSON file, API key included.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Returns the settings as pretty JSON with the API key redacted.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn export_redacted(&self) -> Result<String> {
        let mut exported = self.clone();
        if !exported.gemini_api_key.is_empty() {
            exported.gemini_api_key = REDACTED.to_string();
        }
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    /// Merges known keys from exported settings JSON.
    ///
    /// The API key is never imported. Unknown keys and values of the wrong
    /// shape are skipped. Returns the keys that were applied.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the text is not a JSON object.
    pub fn import_json(&mut self, json: &str) -> Result<Vec<String>> {
        let Value::Object(imported) = serde_json::from_str::<Value>(json)? else {
            return Err(TubeflowError::Serialization(
                "settings import must be a JSON object".to_string(),
            ));
        };

        let mut applied = Vec::new();
        for (key, value) in imported {
            let ok = match key.as_str() {
                "defaultAge" => value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .map(|age| self.default_age = age)
                    .is_some(),
                "maxTopics" => value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .map(|n| self.max_topics = n)
                    .is_some(),
                "summaryLength" => value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .map(|length| self.summary_length = length)
                    .is_some(),
                "autoSummarize" => value
                    .as_bool()
                    .map(|flag| self.auto_summarize = flag)
                    .is_some(),
                "runTimeoutSeconds" => value
                    .as_f64()
                    .filter(|s| *s > 0.0)
                    .map(|s| self.run_timeout_seconds = Some(s))
                    .is_some(),
                "geminiApiKey" => {
                    debug!("Skipping API key on import");
                    continue;
                }
                _ => {
                    debug!(key = %key, "Skipping unknown settings key");
                    continue;
                }
            };
            if ok {
                applied.push(key);
            } else {
                warn!(key = %key, "Ignoring settings value of the wrong shape");
            }
        }
        Ok(applied)
    }
}
