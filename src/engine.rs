use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::Config;
use crate::message::{
    extract_domain, Category, CategoryScores, ClassificationResult, Email, MatchedRule,
};
use crate::normalize::{normalize, NormalizedContent};
use crate::reputation::SenderReputation;
use crate::rules::{Condition, ConditionKind, Field, Operator, Rule};
use crate::spam::{self, SpamAssessment};

/// Number of top-weighted matches rendered into the explanation sentence.
const EXPLANATION_TOP_MATCHES: usize = 3;

/// The classification pipeline: normalizer, sender-reputation check, rule
/// evaluation, decision making and explanation rendering. Holds the rule set
/// pre-sorted by priority and all regex patterns pre-compiled; `classify`
/// itself is pure and takes only shared references, so one engine can serve
/// many threads.
pub struct ClassificationEngine {
    config: Config,
    rules: Vec<Rule>,
    reputation: SenderReputation,
    compiled_patterns: HashMap<String, Regex>,
}

impl ClassificationEngine {
    /// Build an engine from a configuration. Rule weights outside (0, 1] and
    /// rules without conditions are rejected. Invalid regex patterns are not
    /// errors: the offending condition is logged and disabled, and
    /// classification proceeds without it.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut rules = config.rules.clone();
        for rule in &rules {
            if rule.weight <= 0.0 || rule.weight > 1.0 {
                anyhow::bail!(
                    "rule '{}' has weight {} outside (0, 1]",
                    rule.id,
                    rule.weight
                );
            }
            if rule.conditions.is_empty() {
                anyhow::bail!("rule '{}' has no conditions", rule.id);
            }
        }

        // Stable sort: equal priorities keep declaration order.
        rules.sort_by_key(|rule| rule.priority);

        let mut engine = ClassificationEngine {
            reputation: SenderReputation::new(config.reputation.clone()),
            config,
            rules,
            compiled_patterns: HashMap::new(),
        };
        engine.compile_patterns();
        Ok(engine)
    }

    /// Pre-compile every regex condition, always in case-insensitive mode.
    /// A pattern that fails to compile stays out of the map and the
    /// condition never matches.
    fn compile_patterns(&mut self) {
        for rule in &self.rules {
            for condition in &rule.conditions {
                if condition.kind != ConditionKind::Regex {
                    continue;
                }
                for pattern in condition.value.alternatives() {
                    if self.compiled_patterns.contains_key(pattern) {
                        continue;
                    }
                    match RegexBuilder::new(pattern).case_insensitive(true).build() {
                        Ok(regex) => {
                            self.compiled_patterns.insert(pattern.clone(), regex);
                        }
                        Err(e) => {
                            log::warn!(
                                "invalid regex pattern '{pattern}' in rule '{}': {e} - condition disabled",
                                rule.id
                            );
                        }
                    }
                }
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn compiled_pattern_count(&self) -> usize {
        self.compiled_patterns.len()
    }

    /// Classify one email. Never fails for valid input; always terminates
    /// with a result.
    pub fn classify(&self, email: &Email) -> ClassificationResult {
        let content = normalize(email, &self.config.processing);
        let cap = self.config.classification.max_rules_per_email;

        let mut matched: Vec<MatchedRule> = Vec::new();
        let mut scores = CategoryScores::default();
        let mut spam_assessment: Option<SpamAssessment> = None;
        // Weight from whitelist/trusted-domain hits, credited to whichever
        // category wins.
        let mut deferred_weight = 0.0;

        if let Some(verdict) = self.reputation.check(&content.sender) {
            if verdict.pins_spam {
                scores.add(Category::Spam, verdict.matched.weight);
                spam_assessment = verdict.spam;
            } else {
                deferred_weight += verdict.matched.weight;
            }
            matched.push(verdict.matched);
        }

        for rule in &self.rules {
            if matched.len() >= cap {
                log::debug!(
                    "match cap {cap} reached for email {}; skipping remaining rules",
                    email.id
                );
                break;
            }
            if let Some(hit) = self.evaluate_rule(rule, &content) {
                scores.add(rule.category, hit.weight);
                if rule.category == Category::Spam {
                    let assessment = spam::assess_rule(&rule.id, &rule.name);
                    spam_assessment = spam::prefer(spam_assessment, assessment);
                }
                matched.push(hit);
            }
        }

        let category = scores.leader();
        if deferred_weight > 0.0 {
            scores.add(category, deferred_weight);
        }

        let confidence = self.calculate_confidence(&scores, category);
        let explanation = generate_explanation(&matched, category, confidence);

        let (spam_type, risk_score) = match (category, spam_assessment) {
            (Category::Spam, Some(assessment)) => {
                (Some(assessment.label.to_string()), Some(assessment.risk))
            }
            _ => (None, None),
        };

        ClassificationResult {
            category,
            confidence,
            matched_rules: matched,
            explanation,
            spam_type,
            risk_score,
        }
    }

    /// Try a rule's conditions in declared order; the first match wins and
    /// the rest are skipped (OR semantics).
    fn evaluate_rule(&self, rule: &Rule, content: &NormalizedContent) -> Option<MatchedRule> {
        for condition in &rule.conditions {
            if let Some(literal) = self.evaluate_condition(condition, content) {
                return Some(MatchedRule {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    weight: rule.weight,
                    matched_content: literal,
                    match_type: condition.field,
                });
            }
        }
        None
    }

    /// Test one condition against the normalized fields, returning the
    /// literal that satisfied it.
    fn evaluate_condition(
        &self,
        condition: &Condition,
        content: &NormalizedContent,
    ) -> Option<String> {
        let text = match condition.field {
            Field::Subject => content.subject.clone(),
            Field::Body => content.body.clone(),
            Field::Sender => content.sender.clone(),
            Field::All => format!("{} {} {}", content.subject, content.body, content.sender),
        };

        match condition.kind {
            ConditionKind::Keyword => match_alternatives(&text, condition),
            ConditionKind::Regex => self.match_regex(&text, condition),
            ConditionKind::Domain => match_domain(&content.sender, condition),
            ConditionKind::Sender => match_alternatives(&content.sender, condition),
        }
    }

    fn match_regex(&self, text: &str, condition: &Condition) -> Option<String> {
        for pattern in condition.value.alternatives() {
            // Patterns that failed to compile at load time are absent here
            // and simply never match.
            if let Some(regex) = self.compiled_patterns.get(pattern) {
                if let Some(found) = regex.find(text) {
                    return Some(found.as_str().to_string());
                }
            }
        }
        None
    }

    fn calculate_confidence(&self, scores: &CategoryScores, category: Category) -> f64 {
        let floor = self.config.classification.min_confidence;
        let total = scores.total();
        if total == 0.0 {
            return floor;
        }
        (scores.get(category) / total).min(1.0).max(floor)
    }
}

/// Apply `operator` to one haystack/needle pair. `Matches` is reserved for
/// regex conditions and never satisfies a literal comparison.
fn operator_applies(text: &str, needle: &str, operator: Operator) -> bool {
    match operator {
        Operator::Contains => text.contains(needle),
        Operator::Equals => text == needle,
        Operator::StartsWith => text.starts_with(needle),
        Operator::EndsWith => text.ends_with(needle),
        Operator::Matches => false,
    }
}

/// Test each alternative in declared order against the text; the first one
/// satisfying the operator is returned as declared. Comparison lower-cases an
/// independent copy of both sides unless the condition opts into case
/// sensitivity.
fn match_alternatives(text: &str, condition: &Condition) -> Option<String> {
    for alternative in condition.value.alternatives() {
        let hit = if condition.case_sensitive {
            operator_applies(text, alternative, condition.operator)
        } else {
            operator_applies(
                &text.to_lowercase(),
                &alternative.to_lowercase(),
                condition.operator,
            )
        };
        if hit {
            return Some(alternative.clone());
        }
    }
    None
}

/// Substring-match each candidate domain against the domain extracted from
/// the sender address.
fn match_domain(sender: &str, condition: &Condition) -> Option<String> {
    let domain = extract_domain(sender);
    for candidate in condition.value.alternatives() {
        let hit = if condition.case_sensitive {
            domain.contains(candidate.as_str())
        } else {
            domain.to_lowercase().contains(&candidate.to_lowercase())
        };
        if hit {
            return Some(candidate.clone());
        }
    }
    None
}

/// Render the top contributing matches into a single sentence.
fn generate_explanation(matched: &[MatchedRule], category: Category, confidence: f64) -> String {
    if matched.is_empty() {
        return format!(
            "Classified as {category} with default confidence ({:.1}%).",
            confidence * 100.0
        );
    }

    let mut by_weight: Vec<&MatchedRule> = matched.iter().collect();
    // Stable sort: equal weights keep evaluation order.
    by_weight.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

    let described = by_weight
        .iter()
        .take(EXPLANATION_TOP_MATCHES)
        .map(|hit| format!("\"{}\" (matched: \"{}\")", hit.rule_name, hit.matched_content))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Classified as {category} ({:.1}% confidence) based on rules: {described}.",
        confidence * 100.0
    )
}
