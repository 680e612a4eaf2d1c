//! Spam subtype heuristics: which *kind* of spam a matched rule indicates,
//! and a 0-100 risk estimate, derived from the rule's identifier and name.

/// Secondary classification attached to SPAM results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpamAssessment {
    pub label: &'static str,
    pub risk: u8,
}

pub const PHISHING: SpamAssessment = SpamAssessment {
    label: "Phishing",
    risk: 90,
};

const SCAM: SpamAssessment = SpamAssessment {
    label: "Scam",
    risk: 80,
};

const MALWARE: SpamAssessment = SpamAssessment {
    label: "Malware",
    risk: 95,
};

const SUSPICIOUS: SpamAssessment = SpamAssessment {
    label: "Suspicious",
    risk: 70,
};

const ADVERTISING: SpamAssessment = SpamAssessment {
    label: "Advertising Spam",
    risk: 50,
};

const GENERAL: SpamAssessment = SpamAssessment {
    label: "General Spam",
    risk: 60,
};

/// Keyword families in lookup priority order. The first family with a needle
/// found in the rule id or lowercased rule name decides the assessment.
const FAMILIES: &[(&[&str], SpamAssessment)] = &[
    (&["phish"], PHISHING),
    (&["scam", "fraud"], SCAM),
    (&["malware", "virus"], MALWARE),
    (&["suspicious"], SUSPICIOUS),
    (&["promo"], ADVERTISING),
];

/// Assess a single SPAM-category rule.
pub fn assess_rule(rule_id: &str, rule_name: &str) -> SpamAssessment {
    let name = rule_name.to_lowercase();
    for (needles, assessment) in FAMILIES {
        if needles
            .iter()
            .any(|needle| rule_id.contains(needle) || name.contains(needle))
        {
            return *assessment;
        }
    }
    GENERAL
}

/// Keep the assessment with the strictly highest risk; the first one found
/// wins ties.
pub fn prefer(
    current: Option<SpamAssessment>,
    candidate: SpamAssessment,
) -> Option<SpamAssessment> {
    match current {
        Some(existing) if candidate.risk > existing.risk => Some(candidate),
        Some(existing) => Some(existing),
        None => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_lookup_by_id() {
        assert_eq!(assess_rule("spam-phishing-impersonation", "x").label, "Phishing");
        assert_eq!(assess_rule("spam-scam-offers", "x").risk, 80);
        assert_eq!(assess_rule("spam-malware-droppers", "x").risk, 95);
        assert_eq!(assess_rule("spam-suspicious-words", "x").label, "Suspicious");
        assert_eq!(assess_rule("spam-promotional-patterns", "x").risk, 50);
    }

    #[test]
    fn test_family_lookup_by_name() {
        assert_eq!(assess_rule("r1", "Fraud Alerts").label, "Scam");
        assert_eq!(assess_rule("r2", "Virus Attachments").label, "Malware");
        assert_eq!(assess_rule("r3", "Promo Blast").label, "Advertising Spam");
    }

    #[test]
    fn test_family_priority_order() {
        // "phish" is checked before "suspicious".
        let assessment = assess_rule("suspicious-phish", "x");
        assert_eq!(assessment.label, "Phishing");
    }

    #[test]
    fn test_general_fallback() {
        let assessment = assess_rule("spam-classic", "Classic Spam Indicators");
        assert_eq!(assessment.label, "General Spam");
        assert_eq!(assessment.risk, 60);
    }

    #[test]
    fn test_prefer_keeps_strictly_highest() {
        let first = assess_rule("spam-phishing", "x"); // 90
        let second = assess_rule("spam-malware", "x"); // 95
        let kept = prefer(prefer(None, first), second).unwrap();
        assert_eq!(kept.label, "Malware");

        // Equal risk: first found wins.
        let other_phish = assess_rule("r", "phishy"); // 90 again
        let kept = prefer(prefer(None, first), other_phish).unwrap();
        assert_eq!(kept, first);

        // Lower risk never replaces.
        let promo = assess_rule("spam-promo", "x"); // 50
        let kept = prefer(Some(first), promo).unwrap();
        assert_eq!(kept.risk, 90);
    }
}
