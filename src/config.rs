use serde::{Deserialize, Serialize};

use crate::rules::{default_rules, Rule};

/// Engine configuration: thresholds, preprocessing toggles, reputation lists
/// and the rule set itself. Loaded from YAML or built from defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classification: ClassificationSettings,
    pub processing: ProcessingSettings,
    pub reputation: ReputationLists,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    /// Floor applied to every confidence value.
    pub min_confidence: f64,
    /// Advisory cutoff for downstream "is spam" decisions; not enforced
    /// inside `classify`.
    pub spam_threshold: f64,
    /// Hard cap on matches considered per email, counting the
    /// sender-reputation match.
    pub max_rules_per_email: usize,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        ClassificationSettings {
            min_confidence: 0.3,
            spam_threshold: 0.7,
            max_rules_per_email: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub max_body_length: usize,
    pub strip_html: bool,
    pub to_lowercase: bool,
    pub remove_extra_whitespace: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        ProcessingSettings {
            max_body_length: 5000,
            strip_html: true,
            to_lowercase: true,
            remove_extra_whitespace: true,
        }
    }
}

/// Plain ordered lists of strings, consulted by substring match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationLists {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub trusted_domains: Vec<String>,
}

impl Default for ReputationLists {
    fn default() -> Self {
        ReputationLists {
            blacklist: vec![
                "spam@example.com".to_string(),
                "noreply@suspicious-site.com".to_string(),
            ],
            whitelist: vec![
                "noreply@github.com".to_string(),
                "notifications@slack.com".to_string(),
                "calendar-notification@google.com".to_string(),
                "no-reply@linkedin.com".to_string(),
            ],
            trusted_domains: vec![
                "github.com".to_string(),
                "google.com".to_string(),
                "microsoft.com".to_string(),
                "apple.com".to_string(),
                "linkedin.com".to_string(),
                "slack.com".to_string(),
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            classification: ClassificationSettings::default(),
            processing: ProcessingSettings::default(),
            reputation: ReputationLists::default(),
            rules: default_rules(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
