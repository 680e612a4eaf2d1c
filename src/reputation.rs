use crate::config::ReputationLists;
use crate::message::{extract_domain, MatchedRule};
use crate::rules::Field;
use crate::spam::{self, SpamAssessment};

/// Weight attributed to a blacklisted sender; always scores against SPAM.
const BLACKLIST_WEIGHT: f64 = 0.9;
/// Weight attributed to an explicitly trusted sender address.
const WHITELIST_WEIGHT: f64 = 0.8;
/// Weight attributed to a sender from a trusted domain.
const TRUSTED_DOMAIN_WEIGHT: f64 = 0.6;

/// Outcome of a sender-reputation check. A blacklist hit pins its weight to
/// SPAM and carries a provisional spam assessment; whitelist and
/// trusted-domain hits contribute their weight to whichever category the
/// rule engine decides.
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationVerdict {
    pub matched: MatchedRule,
    pub pins_spam: bool,
    pub spam: Option<SpamAssessment>,
}

/// Consults block/allow lists and the trusted-domain list. Evaluation order
/// is blacklist, whitelist, trusted domain; the first hit wins.
#[derive(Debug, Clone)]
pub struct SenderReputation {
    lists: ReputationLists,
}

impl SenderReputation {
    pub fn new(lists: ReputationLists) -> Self {
        SenderReputation { lists }
    }

    pub fn check(&self, sender: &str) -> Option<ReputationVerdict> {
        if sender.is_empty() {
            return None;
        }

        if self
            .lists
            .blacklist
            .iter()
            .any(|blocked| sender.contains(blocked.as_str()))
        {
            log::debug!("sender {sender} matched blacklist");
            return Some(ReputationVerdict {
                matched: MatchedRule {
                    rule_id: "sender-blacklist".to_string(),
                    rule_name: "Sender Blacklist".to_string(),
                    weight: BLACKLIST_WEIGHT,
                    matched_content: sender.to_string(),
                    match_type: Field::Sender,
                },
                pins_spam: true,
                spam: Some(spam::PHISHING),
            });
        }

        if self
            .lists
            .whitelist
            .iter()
            .any(|trusted| sender.contains(trusted.as_str()))
        {
            log::debug!("sender {sender} matched whitelist");
            return Some(ReputationVerdict {
                matched: MatchedRule {
                    rule_id: "sender-whitelist".to_string(),
                    rule_name: "Trusted Sender".to_string(),
                    weight: WHITELIST_WEIGHT,
                    matched_content: sender.to_string(),
                    match_type: Field::Sender,
                },
                pins_spam: false,
                spam: None,
            });
        }

        let domain = extract_domain(sender);
        if let Some(trusted) = self
            .lists
            .trusted_domains
            .iter()
            .find(|trusted| domain.contains(trusted.as_str()))
        {
            log::debug!("sender domain {domain} matched trusted domain {trusted}");
            return Some(ReputationVerdict {
                matched: MatchedRule {
                    rule_id: "trusted-domain".to_string(),
                    rule_name: "Trusted Domain".to_string(),
                    weight: TRUSTED_DOMAIN_WEIGHT,
                    matched_content: domain.to_string(),
                    match_type: Field::Sender,
                },
                pins_spam: false,
                spam: None,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReputationLists;

    fn checker() -> SenderReputation {
        SenderReputation::new(ReputationLists::default())
    }

    #[test]
    fn test_blacklist_hit_pins_spam_with_phishing() {
        let verdict = checker().check("spam@example.com").unwrap();
        assert!(verdict.pins_spam);
        assert_eq!(verdict.matched.rule_id, "sender-blacklist");
        assert_eq!(verdict.matched.weight, 0.9);
        let spam = verdict.spam.unwrap();
        assert_eq!(spam.label, "Phishing");
        assert_eq!(spam.risk, 90);
    }

    #[test]
    fn test_blacklist_is_substring_match() {
        let verdict = checker().check("prefix spam@example.com suffix").unwrap();
        assert_eq!(verdict.matched.rule_id, "sender-blacklist");
    }

    #[test]
    fn test_whitelist_hit_does_not_pin_category() {
        let verdict = checker().check("noreply@github.com").unwrap();
        assert!(!verdict.pins_spam);
        assert!(verdict.spam.is_none());
        assert_eq!(verdict.matched.rule_id, "sender-whitelist");
        assert_eq!(verdict.matched.weight, 0.8);
    }

    #[test]
    fn test_trusted_domain_hit() {
        let verdict = checker().check("notifications@github.com").unwrap();
        assert_eq!(verdict.matched.rule_id, "trusted-domain");
        assert_eq!(verdict.matched.weight, 0.6);
        assert_eq!(verdict.matched.matched_content, "github.com");
    }

    #[test]
    fn test_blacklist_takes_precedence() {
        let lists = ReputationLists {
            blacklist: vec!["evil@github.com".to_string()],
            whitelist: vec!["evil@github.com".to_string()],
            trusted_domains: vec!["github.com".to_string()],
        };
        let verdict = SenderReputation::new(lists).check("evil@github.com").unwrap();
        assert_eq!(verdict.matched.rule_id, "sender-blacklist");
    }

    #[test]
    fn test_unknown_sender_contributes_nothing() {
        assert!(checker().check("stranger@nowhere.example").is_none());
        assert!(checker().check("").is_none());
    }
}
