use serde::{Deserialize, Serialize};

use crate::message::Category;

/// Which normalized field a condition is tested against. `All` is the
/// space-joined concatenation of subject, body and sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Subject,
    Body,
    Sender,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Keyword,
    Regex,
    Domain,
    Sender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    Matches,
}

/// A condition value: either a single string or an ordered list of
/// alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    One(String),
    Many(Vec<String>),
}

impl ValueSpec {
    pub fn alternatives(&self) -> &[String] {
        match self {
            ValueSpec::One(value) => std::slice::from_ref(value),
            ValueSpec::Many(values) => values,
        }
    }
}

/// A single test against one message field. Matching is case-insensitive
/// unless `case_sensitive` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub field: Field,
    pub value: ValueSpec,
    pub operator: Operator,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// A named, weighted, prioritized unit associating one or more conditions
/// with a single target category. Conditions are tried in declared order and
/// the first match wins (OR semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub weight: f64,
    pub priority: i32,
    pub conditions: Vec<Condition>,
}

fn keyword(field: Field, values: &[&str]) -> Condition {
    Condition {
        kind: ConditionKind::Keyword,
        field,
        value: ValueSpec::Many(values.iter().map(|v| v.to_string()).collect()),
        operator: Operator::Contains,
        case_sensitive: false,
    }
}

fn regex(field: Field, pattern: &str) -> Condition {
    Condition {
        kind: ConditionKind::Regex,
        field,
        value: ValueSpec::One(pattern.to_string()),
        operator: Operator::Matches,
        case_sensitive: false,
    }
}

fn domain(values: &[&str]) -> Condition {
    Condition {
        kind: ConditionKind::Domain,
        field: Field::Sender,
        value: ValueSpec::Many(values.iter().map(|v| v.to_string()).collect()),
        operator: Operator::Contains,
        case_sensitive: false,
    }
}

fn sender(value: &str) -> Condition {
    Condition {
        kind: ConditionKind::Sender,
        field: Field::Sender,
        value: ValueSpec::One(value.to_string()),
        operator: Operator::Contains,
        case_sensitive: false,
    }
}

fn rule(
    id: &str,
    name: &str,
    category: Category,
    weight: f64,
    priority: i32,
    conditions: Vec<Condition>,
) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        category,
        weight,
        priority,
        conditions,
    }
}

/// The built-in rule set. Callers may replace it wholesale via the
/// configuration file.
pub fn default_rules() -> Vec<Rule> {
    vec![
        rule(
            "spam-suspicious-words",
            "Suspicious Words Detection",
            Category::Spam,
            0.8,
            1,
            vec![keyword(
                Field::Subject,
                &[
                    "urgent",
                    "act now",
                    "limited time",
                    "click here",
                    "!!!",
                    "free money",
                    "winner",
                    "won",
                    "claim now",
                    "cash prize",
                    "prize",
                    "congratulations",
                    "award",
                    "reward",
                    "lottery",
                    "lucky winner",
                ],
            )],
        ),
        rule(
            "spam-promotional-patterns",
            "Promotional Spam Patterns",
            Category::Spam,
            0.7,
            2,
            vec![regex(Field::Body, r"\d+%\s*(off|discount|sale)")],
        ),
        rule(
            "spam-suspicious-domains",
            "Suspicious Domain Detection",
            Category::Spam,
            0.9,
            1,
            vec![domain(&[
                "suspicious-site.com",
                "fake-bank.net",
                "scammer.org",
                "spamoffers.com",
            ])],
        ),
        rule(
            "work-meeting-invites",
            "Meeting Invitations",
            Category::Work,
            0.9,
            1,
            vec![keyword(
                Field::Subject,
                &[
                    "meeting",
                    "calendar",
                    "invitation",
                    "conference call",
                    "zoom",
                    "teams",
                ],
            )],
        ),
        rule(
            "work-project-updates",
            "Project Updates",
            Category::Work,
            0.8,
            2,
            vec![keyword(
                Field::Subject,
                &["project", "update", "status", "deadline", "milestone", "sprint"],
            )],
        ),
        rule(
            "work-github-notifications",
            "GitHub Notifications",
            Category::Work,
            0.85,
            1,
            vec![sender("github.com")],
        ),
        rule(
            "personal-family-friends",
            "Family and Friends",
            Category::Personal,
            0.9,
            1,
            vec![keyword(
                Field::Body,
                &["family", "birthday", "dinner", "weekend", "vacation", "personal"],
            )],
        ),
        rule(
            "personal-gmail-personal",
            "Personal Gmail Accounts",
            Category::Personal,
            0.7,
            3,
            vec![domain(&["gmail.com", "yahoo.com", "hotmail.com"])],
        ),
        rule(
            "promotions-sales",
            "Sales and Discounts",
            Category::Promotions,
            0.8,
            1,
            vec![keyword(
                Field::Subject,
                &["sale", "discount", "offer", "deal", "coupon", "promo"],
            )],
        ),
        rule(
            "promotions-newsletters",
            "Newsletter Promotions",
            Category::Promotions,
            0.6,
            2,
            vec![keyword(
                Field::Subject,
                &["newsletter", "weekly digest", "monthly update"],
            )],
        ),
        rule(
            "social-platforms",
            "Social Media Notifications",
            Category::Social,
            0.9,
            1,
            vec![domain(&[
                "facebook.com",
                "twitter.com",
                "linkedin.com",
                "instagram.com",
            ])],
        ),
        rule(
            "social-notifications",
            "Social Notifications",
            Category::Social,
            0.8,
            2,
            vec![keyword(
                Field::Subject,
                &[
                    "liked your",
                    "commented on",
                    "tagged you",
                    "friend request",
                    "follow",
                ],
            )],
        ),
        rule(
            "spam-high-risk-financial",
            "High-Risk Financial Keywords",
            Category::Spam,
            0.95,
            1,
            vec![keyword(
                Field::Body,
                &[
                    "urgent",
                    "immediate",
                    "expires today",
                    "act now",
                    "limited time",
                    "suspend",
                    "suspended",
                    "frozen",
                    "locked",
                    "restricted",
                    "verify immediately",
                    "confirm within",
                    "update required",
                    "wire transfer",
                    "bitcoin",
                    "cryptocurrency",
                    "investment opportunity",
                    "tax refund",
                    "stimulus",
                    "government grant",
                    "unclaimed funds",
                    "inheritance",
                    "beneficiary",
                    "lottery",
                    "sweepstakes",
                    "prize",
                ],
            )],
        ),
        rule(
            "spam-auth-security",
            "Authentication/Security Scams",
            Category::Spam,
            0.9,
            2,
            vec![keyword(
                Field::Body,
                &[
                    "account suspended",
                    "security alert",
                    "unauthorized access",
                    "click to verify",
                    "confirm identity",
                    "update payment",
                    "temporary suspension",
                    "reactivate",
                    "restore access",
                    "billing issue",
                    "payment failed",
                    "subscription expired",
                    "unusual activity",
                    "login attempt",
                    "security code",
                    "verify account",
                    "confirm details",
                    "update information",
                ],
            )],
        ),
        rule(
            "spam-classic",
            "Classic Spam Indicators",
            Category::Spam,
            0.85,
            3,
            vec![keyword(
                Field::Body,
                &[
                    "guaranteed",
                    "risk-free",
                    "no obligation",
                    "free trial",
                    "earn money",
                    "work from home",
                    "easy income",
                    "lose weight",
                    "miracle cure",
                    "anti-aging",
                    "don't delay",
                    "hurry",
                    "while supplies last",
                    "exclusive offer",
                    "special promotion",
                    "members only",
                    "congratulations",
                    "you've been selected",
                    "winner",
                ],
            )],
        ),
        rule(
            "spam-malicious-link",
            "Malicious Link Patterns",
            Category::Spam,
            0.9,
            4,
            vec![keyword(
                Field::Body,
                &[
                    "click here",
                    "download now",
                    "install update",
                    "view message",
                    "see attachment",
                    "open document",
                    "confirm here",
                    "validate",
                    "authenticate",
                    "dear customer",
                    "dear user",
                    "dear member",
                    "valued client",
                    "account holder",
                    "subscriber",
                ],
            )],
        ),
        rule(
            "spam-bec-executive",
            "Executive/BEC Keywords",
            Category::Spam,
            0.97,
            5,
            vec![keyword(
                Field::Body,
                &[
                    "CEO",
                    "president",
                    "urgent request",
                    "confidential",
                    "wire transfer",
                    "payment authorization",
                    "vendor change",
                    "new bank details",
                    "invoice payment",
                    "supplier information",
                    "please handle",
                    "need favor",
                    "quick request",
                    "change of bank",
                    "new account",
                    "payment redirect",
                ],
            )],
        ),
        rule(
            "spam-phishing-impersonation",
            "Phishing Service Impersonation",
            Category::Spam,
            0.95,
            6,
            vec![keyword(
                Field::Body,
                &[
                    "PayPal",
                    "Amazon",
                    "Microsoft",
                    "Google",
                    "IRS",
                    "Social Security",
                    "government agency",
                    "bank notification",
                    "credit card",
                    "loan approval",
                    "tax document",
                    "W-2",
                    "1099",
                    "social security",
                    "driver's license",
                    "passport",
                    "birth certificate",
                ],
            )],
        ),
        rule(
            "spam-regex-advanced",
            "Regex Advanced Patterns",
            Category::Spam,
            0.9,
            7,
            vec![
                regex(
                    Field::Body,
                    r"(\+1|1-)?\s*\(?[0-9]{3}\)?\s*-?\s*[0-9]{3}\s*-?\s*[0-9]{4}",
                ),
                regex(Field::Body, r"[vV][1Il][4aA@][gG][rR][4aA@]"),
                regex(Field::Body, r"[mM][0oO][nN][3eE][yY]"),
                regex(Field::Body, r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
            ],
        ),
        rule(
            "whitelist-legit-business",
            "Legitimate Business Terms",
            Category::Work,
            0.7,
            1,
            vec![keyword(
                Field::Body,
                &[
                    "meeting",
                    "conference",
                    "proposal",
                    "contract",
                    "invoice",
                    "receipt",
                    "order confirmation",
                    "newsletter",
                    "unsubscribe",
                    "privacy policy",
                ],
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_well_formed() {
        let rules = default_rules();
        assert!(!rules.is_empty());
        for rule in &rules {
            assert!(rule.weight > 0.0 && rule.weight <= 1.0, "rule {}", rule.id);
            assert!(!rule.conditions.is_empty(), "rule {}", rule.id);
            assert!(!rule.id.is_empty());
            assert!(!rule.name.is_empty());
        }
    }

    #[test]
    fn test_value_spec_alternatives() {
        let one = ValueSpec::One("github.com".to_string());
        assert_eq!(one.alternatives(), ["github.com".to_string()]);
        let many = ValueSpec::Many(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(many.alternatives().len(), 2);
    }

    #[test]
    fn test_condition_yaml_round_trip() {
        let yaml = r#"
type: keyword
field: subject
value:
  - urgent
  - act now
operator: contains
"#;
        let condition: Condition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(condition.kind, ConditionKind::Keyword);
        assert_eq!(condition.field, Field::Subject);
        assert_eq!(condition.operator, Operator::Contains);
        assert!(!condition.case_sensitive);
        assert_eq!(condition.value.alternatives().len(), 2);

        let single = r#"
type: regex
field: body
value: '\d+%\s*(off|discount|sale)'
operator: matches
"#;
        let condition: Condition = serde_yaml::from_str(single).unwrap();
        assert_eq!(condition.kind, ConditionKind::Regex);
        assert_eq!(condition.value.alternatives().len(), 1);
    }

    #[test]
    fn test_rule_yaml_round_trip() {
        let rules = default_rules();
        let yaml = serde_yaml::to_string(&rules).unwrap();
        let parsed: Vec<Rule> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, rules);
    }
}
