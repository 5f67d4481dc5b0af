use std::fmt;

/// Messages from one sender address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newsletter {
    pub sender_email: String,
    pub display_name: String,
    pub count: usize,
    /// Id of the first message seen from this sender.
    pub exemplar_message_id: String,
}

impl fmt::Display for Newsletter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "<{}>", self.sender_email)
        } else {
            write!(f, "{} <{}>", self.display_name, self.sender_email)
        }
    }
}

/// How a sender can be unsubscribed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    /// HTTP links from `List-Unsubscribe`, in header order. Never empty.
    Resolved(Vec<String>),
    /// Only a `mailto:` address is offered.
    MailtoOnly,
    NotFound,
    Error(String),
}

impl UnsubscribeOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for UnsubscribeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(urls) => write!(f, "{} unsubscribe link(s)", urls.len()),
            Self::MailtoOnly => write!(f, "mailto unsubscribe only"),
            Self::NotFound => write!(f, "no unsubscribe instructions"),
            Self::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Outcome of resolving a list of newsletters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub success: usize,
    pub failed: usize,
    pub results: Vec<(Newsletter, UnsubscribeOutcome)>,
}

impl RunTally {
    pub fn record(&mut self, newsletter: Newsletter, outcome: UnsubscribeOutcome) {
        if outcome.is_resolved() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.results.push((newsletter, outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newsletter(name: &str) -> Newsletter {
        Newsletter {
            sender_email: "news@shop.com".to_string(),
            display_name: name.to_string(),
            count: 1,
            exemplar_message_id: "m1".to_string(),
        }
    }

    #[test]
    fn only_resolved_counts_as_success() {
        let mut tally = RunTally::default();
        tally.record(newsletter("a"), UnsubscribeOutcome::Resolved(vec!["http://x".into()]));
        tally.record(newsletter("b"), UnsubscribeOutcome::MailtoOnly);
        tally.record(newsletter("c"), UnsubscribeOutcome::NotFound);
        tally.record(newsletter("d"), UnsubscribeOutcome::Error("boom".into()));

        assert_eq!(tally.success, 1);
        assert_eq!(tally.failed, 3);
        assert_eq!(tally.results.len(), 4);
        assert_eq!(tally.results[1].0.display_name, "b");
    }

    #[test]
    fn display_omits_empty_name() {
        assert_eq!(newsletter("").to_string(), "<news@shop.com>");
        assert_eq!(newsletter("Shop").to_string(), "Shop <news@shop.com>");
    }
}
