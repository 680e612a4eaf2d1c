use regex::Regex;
use std::sync::OnceLock;

use crate::config::ProcessingSettings;
use crate::message::Email;

/// Preprocessed message fields, ready for condition evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContent {
    pub subject: String,
    pub body: String,
    pub sender: String,
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn numeric_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(\d+);").unwrap())
}

/// Preprocess an email for classification. Pure function; never fails.
/// Each step is toggled by the processing settings. The sender is case-folded
/// with the other fields but never HTML-stripped or whitespace-collapsed.
pub fn normalize(email: &Email, options: &ProcessingSettings) -> NormalizedContent {
    let mut subject = email.subject.clone();
    let mut body = email.body.clone();
    let mut sender = email.sender.clone();

    if options.strip_html {
        subject = strip_markup(&subject);
        body = strip_markup(&body);
    }

    if options.to_lowercase {
        subject = subject.to_lowercase();
        body = body.to_lowercase();
        sender = sender.to_lowercase();
    }

    if options.remove_extra_whitespace {
        subject = collapse_whitespace(&subject);
        body = collapse_whitespace(&body);
    }

    if body.chars().count() > options.max_body_length {
        body = body.chars().take(options.max_body_length).collect();
        body.push_str("...");
    }

    NormalizedContent {
        subject,
        body,
        sender,
    }
}

/// Replace markup tags with a space and decode a fixed set of HTML entities.
pub fn strip_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let without_tags = tag_regex().replace_all(text, " ");

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");

    numeric_entity_regex()
        .replace_all(&decoded, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingSettings;

    fn email(subject: &str, body: &str, sender: &str) -> Email {
        Email {
            id: "t1".to_string(),
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            is_read: false,
            raw_body: None,
        }
    }

    #[test]
    fn test_strip_markup_tags_and_entities() {
        assert_eq!(
            strip_markup("<p>Hello &amp; welcome</p>"),
            " Hello & welcome "
        );
        assert_eq!(strip_markup("a&nbsp;b"), "a b");
        assert_eq!(strip_markup("&lt;tag&gt;"), "<tag>");
        assert_eq!(strip_markup("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(strip_markup("&#65;&#66;"), "AB");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_normalize_full_pipeline() {
        let email = email(
            "<b>Big   SALE</b>",
            "Buy&nbsp;NOW!\n\n  50% off",
            "Shop@Example.COM",
        );
        let content = normalize(&email, &ProcessingSettings::default());
        assert_eq!(content.subject, "big sale");
        assert_eq!(content.body, "buy now! 50% off");
        assert_eq!(content.sender, "shop@example.com");
    }

    #[test]
    fn test_normalize_toggles_off() {
        let options = ProcessingSettings {
            strip_html: false,
            to_lowercase: false,
            remove_extra_whitespace: false,
            max_body_length: 5000,
        };
        let email = email("<b>KEEP</b>", "Spaced   out", "User@Host.COM");
        let content = normalize(&email, &options);
        assert_eq!(content.subject, "<b>KEEP</b>");
        assert_eq!(content.body, "Spaced   out");
        assert_eq!(content.sender, "User@Host.COM");
    }

    #[test]
    fn test_body_truncation_appends_ellipsis() {
        let options = ProcessingSettings {
            max_body_length: 5,
            ..ProcessingSettings::default()
        };
        let email = email("s", "abcdefghij", "a@b.c");
        let content = normalize(&email, &options);
        assert_eq!(content.body, "abcde...");

        let short = email_body_exact();
        let content = normalize(&short, &options);
        assert_eq!(content.body, "abcde");
    }

    fn email_body_exact() -> Email {
        Email {
            id: "t2".to_string(),
            sender: "a@b.c".to_string(),
            subject: String::new(),
            body: "abcde".to_string(),
            timestamp: String::new(),
            is_read: false,
            raw_body: None,
        }
    }

    #[test]
    fn test_empty_fields_stay_empty() {
        let email = email("", "", "");
        let content = normalize(&email, &ProcessingSettings::default());
        assert_eq!(content.subject, "");
        assert_eq!(content.body, "");
        assert_eq!(content.sender, "");
    }
}
