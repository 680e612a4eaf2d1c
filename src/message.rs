use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rules::Field;

/// A single message as supplied by upstream producers (importers, fixtures,
/// live fetchers). Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,
}

impl Email {
    /// Build an Email from a loosely-shaped upstream record. Missing fields
    /// default to empty string / current timestamp / unread; the sender is
    /// reduced to the bare address when given as `"Name <addr@host>"`.
    pub fn from_record(record: &serde_json::Value) -> Self {
        let sender_raw = record
            .get("sender")
            .or_else(|| record.get("from"))
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let body = record
            .get("text")
            .or_else(|| record.get("body"))
            .or_else(|| record.get("html"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let raw_body = record
            .get("html")
            .or_else(|| record.get("text"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let is_read = record
            .get("isRead")
            .and_then(|v| v.as_bool())
            .unwrap_or_else(|| {
                record
                    .get("flags")
                    .and_then(|v| v.as_array())
                    .map(|flags| flags.iter().any(|f| f.as_str() == Some("\\Seen")))
                    .unwrap_or(false)
            });

        Email {
            id: record
                .get("id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(generate_id),
            sender: extract_address(sender_raw),
            subject: record
                .get("subject")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            body,
            timestamp: record
                .get("timestamp")
                .or_else(|| record.get("date"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            is_read,
            raw_body,
        }
    }
}

fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("msg-{nanos:x}")
}

/// Extract the bare address from formats like `"Name <email@host>"` or just
/// `email@host`.
pub fn extract_address(from: &str) -> String {
    if let (Some(start), Some(end)) = (from.find('<'), from.rfind('>')) {
        if start < end {
            return from[start + 1..end].trim().to_string();
        }
    }
    from.split_whitespace()
        .find(|token| token.contains('@'))
        .unwrap_or(from)
        .trim()
        .to_string()
}

/// Domain portion of an address: everything after the first `@`, or empty.
pub fn extract_domain(address: &str) -> &str {
    address.split_once('@').map(|(_, domain)| domain).unwrap_or("")
}

/// The closed set of classification targets. `ORDER` is both the evaluation
/// order and the argmax tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Spam,
    Work,
    Personal,
    Promotions,
    Social,
}

impl Category {
    pub const ORDER: [Category; 5] = [
        Category::Spam,
        Category::Work,
        Category::Personal,
        Category::Promotions,
        Category::Social,
    ];

    fn index(self) -> usize {
        match self {
            Category::Spam => 0,
            Category::Work => 1,
            Category::Personal => 2,
            Category::Promotions => 3,
            Category::Social => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Spam => "SPAM",
            Category::Work => "WORK",
            Category::Personal => "PERSONAL",
            Category::Promotions => "PROMOTIONS",
            Category::Social => "SOCIAL",
        };
        f.write_str(label)
    }
}

/// Per-category score accumulator with a fixed iteration order, so the
/// tie-break behavior does not depend on any map's iteration order.
#[derive(Debug, Default, Clone)]
pub struct CategoryScores([f64; 5]);

impl CategoryScores {
    pub fn add(&mut self, category: Category, weight: f64) {
        self.0[category.index()] += weight;
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Argmax with strict `>` against a running maximum of zero, iterating
    /// categories in `Category::ORDER`. All-zero scores yield PERSONAL.
    pub fn leader(&self) -> Category {
        let mut winner = Category::Personal;
        let mut max = 0.0;
        for category in Category::ORDER {
            let score = self.get(category);
            if score > max {
                max = score;
                winner = category;
            }
        }
        winner
    }
}

/// Record of one rule (or sender-reputation check) that fired during a
/// classification, with the literal text that satisfied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    pub rule_id: String,
    pub rule_name: String,
    pub weight: f64,
    pub matched_content: String,
    pub match_type: Field,
}

/// Pure output of one `classify` call; no persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
    pub matched_rules: Vec<MatchedRule>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,
}

impl ClassificationResult {
    /// Advisory spam verdict for downstream consumers; not consulted inside
    /// the engine itself.
    pub fn is_spam(&self, spam_threshold: f64) -> bool {
        self.category == Category::Spam && self.confidence >= spam_threshold
    }
}
