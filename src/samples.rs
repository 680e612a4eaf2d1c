//! Built-in sample corpus for the CLI demo mode and scenario tests.

use crate::message::Email;

fn sample(id: &str, sender: &str, subject: &str, body: &str, timestamp: &str) -> Email {
    Email {
        id: id.to_string(),
        sender: sender.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        timestamp: timestamp.to_string(),
        is_read: false,
        raw_body: None,
    }
}

pub fn sample_emails() -> Vec<Email> {
    vec![
        sample(
            "1",
            "notifications@github.com",
            "[Project] New pull request #123: Feature implementation",
            "A new pull request has been opened for review. The feature includes user \
             authentication and dashboard improvements. Please review and provide feedback.",
            "2024-05-01T09:30:00Z",
        ),
        sample(
            "2",
            "spam@suspicious-site.com",
            "URGENT!!! Act Now - Limited Time Offer - Free Money!!!",
            "Congratulations! You have won $1,000,000!!! Click here immediately to claim \
             your prize. This offer expires in 24 hours. Act now before it's too late!",
            "2024-05-01T08:00:00Z",
        ),
        sample(
            "3",
            "mom@gmail.com",
            "Family dinner this weekend",
            "Hi honey, we're planning a family dinner this Saturday at 6 PM. Can you make \
             it? Dad is making his famous lasagna. Let me know if you can come!",
            "2024-05-01T06:00:00Z",
        ),
        sample(
            "4",
            "noreply@amazon.com",
            "Amazon Prime Day Sale - 50% off Electronics!",
            "Don't miss our biggest sale of the year! Get up to 50% off on electronics, \
             30% off on home goods, and free shipping on all orders. Use coupon code PRIME50.",
            "2024-05-01T04:00:00Z",
        ),
        sample(
            "5",
            "notifications@linkedin.com",
            "John Smith liked your post",
            "John Smith and 5 others liked your recent post about \"The Future of AI in \
             Software Development\". Your post is gaining traction!",
            "2024-05-01T02:00:00Z",
        ),
        sample(
            "6",
            "sarah.johnson@company.com",
            "Weekly team meeting - Project status update",
            "Hi team, our weekly meeting is scheduled for tomorrow at 10 AM. We'll discuss \
             the current sprint progress, upcoming deadlines, and milestone reviews.",
            "2024-04-30T22:00:00Z",
        ),
        sample(
            "7",
            "newsletter@techcrunch.com",
            "TechCrunch Weekly Newsletter - Latest in Tech",
            "This week in tech: New AI breakthroughs, startup funding rounds, and the \
             latest in cryptocurrency. Plus exclusive interviews with top tech CEOs.",
            "2024-04-30T10:00:00Z",
        ),
        sample(
            "8",
            "fake-bank@scammer.org",
            "URGENT: Verify your account now or it will be closed!",
            "Your bank account has been flagged for suspicious activity. Click here \
             immediately to verify your identity or your account will be permanently \
             closed within 24 hours.",
            "2024-04-30T07:00:00Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::ClassificationEngine;
    use crate::message::Category;

    #[test]
    fn test_sample_corpus_classifies_plausibly() {
        let engine = ClassificationEngine::new(Config::default()).unwrap();
        let results: Vec<_> = sample_emails()
            .iter()
            .map(|email| (email.id.clone(), engine.classify(email)))
            .collect();

        let category_of = |id: &str| {
            results
                .iter()
                .find(|(i, _)| i == id)
                .map(|(_, r)| r.category)
                .unwrap()
        };

        assert_eq!(category_of("1"), Category::Work);
        assert_eq!(category_of("2"), Category::Spam);
        assert_eq!(category_of("3"), Category::Personal);
        assert_eq!(category_of("5"), Category::Social);
        assert_eq!(category_of("8"), Category::Spam);

        for (_, result) in &results {
            assert!(result.confidence >= 0.3 && result.confidence <= 1.0);
        }
    }

    #[test]
    fn test_spam_sample_carries_subtype_metadata() {
        let engine = ClassificationEngine::new(Config::default()).unwrap();
        // Sample 2 hits the suspicious-domain and suspicious-words rules, so
        // the result carries the Suspicious subtype.
        let result = engine.classify(&sample_emails()[1]);
        assert_eq!(result.category, Category::Spam);
        assert_eq!(result.spam_type.as_deref(), Some("Suspicious"));
        assert_eq!(result.risk_score, Some(70));
    }
}
