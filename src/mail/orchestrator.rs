use log::info;

use crate::domain::{Newsletter, RunTally, UnsubscribeOutcome};
use crate::gmail::GmailApi;
use crate::mail::resolver::UnsubscribeResolver;

/// Resolves unsubscribe links for aggregated newsletters. Nothing is
/// unsubscribed automatically: resolved links are only reported.
pub struct SubscriptionOrchestrator<'a> {
    resolver: UnsubscribeResolver<'a>,
}

impl<'a> SubscriptionOrchestrator<'a> {
    pub fn new(api: &'a dyn GmailApi, user_id: &'a str) -> Self {
        Self {
            resolver: UnsubscribeResolver::new(api, user_id),
        }
    }

    pub fn run_one(&self, newsletter: &Newsletter) -> UnsubscribeOutcome {
        self.resolver.resolve(&newsletter.exemplar_message_id)
    }

    /// Resolve every newsletter in order. Only [`UnsubscribeOutcome::Resolved`]
    /// counts as a success.
    pub fn run_all(&self, newsletters: &[Newsletter]) -> RunTally {
        let mut tally = RunTally::default();
        for (i, newsletter) in newsletters.iter().enumerate() {
            let outcome = self.run_one(newsletter);
            info!(
                "[{}/{}] {newsletter}: {outcome}",
                i + 1,
                newsletters.len()
            );
            tally.record(newsletter.clone(), outcome);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::scan;
    use crate::mail::testing::FakeGmail;

    #[test]
    fn end_to_end_promotions_run() {
        let mut gmail = FakeGmail::new(100);
        for i in 0..250 {
            let from = match i % 25 {
                0..=14 => "Big Shop <deals@bigshop.com>",
                15..=22 => "News Daily <daily@news.io>",
                _ => "Tiny Club <hello@tiny.club>",
            };
            gmail.push(&format!("m{i}"), from);
        }
        gmail.set_unsubscribe("m0", "<https://bigshop.com/u?x=1>, <mailto:u@bigshop.com>");
        gmail.set_unsubscribe("m15", "<http://news.io/stop>");
        gmail.set_unsubscribe("m23", "<mailto:leave@tiny.club>");

        let scan = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap();
        assert_eq!(scan.listed, 250);
        assert_eq!(gmail.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(scan.metadata.success.len(), 250);

        let counts: Vec<_> = scan.newsletters.iter().map(|n| n.count).collect();
        assert_eq!(counts, vec![150, 80, 20]);
        let exemplars: Vec<_> = scan
            .newsletters
            .iter()
            .map(|n| n.exemplar_message_id.as_str())
            .collect();
        assert_eq!(exemplars, vec!["m0", "m15", "m23"]);

        let tally = SubscriptionOrchestrator::new(&gmail, "me").run_all(&scan.newsletters);
        assert_eq!(tally.success, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(
            tally.results[0].1,
            UnsubscribeOutcome::Resolved(vec!["https://bigshop.com/u?x=1".to_string()])
        );
        assert_eq!(tally.results[2].1, UnsubscribeOutcome::MailtoOnly);
    }

    #[test]
    fn one_failure_does_not_stop_the_run() {
        let mut gmail = FakeGmail::new(100);
        gmail.push("a", "A <a@x.com>");
        gmail.push("b", "B <b@x.com>");
        gmail.push("c", "C <c@x.com>");
        gmail.set_unsubscribe("a", "<http://a.example/u>");
        gmail.fail_full("b");
        gmail.set_unsubscribe("c", "<http://c.example/u>");

        let scan = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap();
        let tally = SubscriptionOrchestrator::new(&gmail, "me").run_all(&scan.newsletters);

        assert_eq!(tally.success, 2);
        assert_eq!(tally.failed, 1);
        assert!(matches!(tally.results[1].1, UnsubscribeOutcome::Error(_)));
    }

    #[test]
    fn run_one_uses_exemplar() {
        let mut gmail = FakeGmail::new(10);
        gmail.push("first", "A <a@x.com>");
        gmail.push("second", "A <a@x.com>");
        gmail.set_unsubscribe("second", "<http://only-on-second.example>");

        let scan = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap();
        let orchestrator = SubscriptionOrchestrator::new(&gmail, "me");
        assert_eq!(
            orchestrator.run_one(&scan.newsletters[0]),
            UnsubscribeOutcome::NotFound
        );
    }

    #[test]
    fn failed_metadata_is_reported_not_fatal() {
        let mut gmail = FakeGmail::new(100);
        gmail.push("a", "A <a@x.com>");
        gmail.push("b", "A <a@x.com>");
        gmail.fail_metadata("a");

        let scan = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap();
        assert_eq!(scan.metadata.failed.len(), 1);
        assert_eq!(scan.newsletters[0].count, 1);
        assert_eq!(scan.newsletters[0].exemplar_message_id, "b");
    }
}
