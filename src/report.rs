//! Summary printed by the `analyze` command.

use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;

use crate::domain::{MessageMetadata, Newsletter};
use crate::mail::Scan;

#[derive(Debug, Clone, PartialEq)]
pub struct TopSender {
    pub newsletter: Newsletter,
    /// Percentage of fetched messages sent by this sender.
    pub share: f64,
}

/// A dated message: the epoch used for ordering plus the header as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedHeader {
    pub epoch: i64,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub listed: usize,
    pub fetched: usize,
    pub failed: usize,
    pub senders: usize,
    pub oldest: Option<DatedHeader>,
    pub newest: Option<DatedHeader>,
    pub labels: Vec<(String, usize)>,
    pub top: Vec<TopSender>,
}

impl Report {
    pub fn build(scan: &Scan, top: usize) -> Self {
        let fetched = scan.metadata.success.len();
        let (oldest, newest) = date_span(&scan.metadata.success);

        Self {
            listed: scan.listed,
            fetched,
            failed: scan.metadata.failed.len(),
            senders: scan.newsletters.len(),
            oldest,
            newest,
            labels: label_counts(&scan.metadata.success),
            top: scan
                .newsletters
                .iter()
                .take(top)
                .map(|n| TopSender {
                    newsletter: n.clone(),
                    share: if fetched == 0 {
                        0.0
                    } else {
                        n.count as f64 * 100.0 / fetched as f64
                    },
                })
                .collect(),
        }
    }
}

/// Oldest and newest parseable `Date` headers. Unparseable dates are ignored.
fn date_span(metadata: &[MessageMetadata]) -> (Option<DatedHeader>, Option<DatedHeader>) {
    let mut oldest: Option<DatedHeader> = None;
    let mut newest: Option<DatedHeader> = None;

    for raw in metadata.iter().filter_map(|m| m.fields.date.as_deref()) {
        let Some(epoch) = parse_date(raw) else {
            continue;
        };
        if oldest.as_ref().is_none_or(|o| epoch < o.epoch) {
            oldest = Some(DatedHeader {
                epoch,
                raw: raw.to_string(),
            });
        }
        if newest.as_ref().is_none_or(|n| epoch > n.epoch) {
            newest = Some(DatedHeader {
                epoch,
                raw: raw.to_string(),
            });
        }
    }
    (oldest, newest)
}

/// Epoch seconds of an RFC 2822 date. A trailing zone comment such as
/// ` (UTC)` is dropped first.
fn parse_date(raw: &str) -> Option<i64> {
    let raw = raw.split_at(raw.find(" (").unwrap_or(raw.len())).0;
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|d| d.timestamp())
}

/// Label frequencies, most common first, ties by name.
fn label_counts(metadata: &[MessageMetadata]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in metadata.iter().flat_map(|m| m.labels.iter()) {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(l, c)| (l.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Messages examined:  {}", self.listed)?;
        writeln!(f, "Metadata fetched:   {} ({} failed)", self.fetched, self.failed)?;
        writeln!(f, "Distinct senders:   {}", self.senders)?;
        if let (Some(oldest), Some(newest)) = (&self.oldest, &self.newest) {
            writeln!(f, "Oldest message:     {}", oldest.raw)?;
            writeln!(f, "Newest message:     {}", newest.raw)?;
        }

        if !self.labels.is_empty() {
            writeln!(f)?;
            writeln!(f, "Labels:")?;
            for (label, count) in &self.labels {
                writeln!(f, "  {label:<28} {count:>5}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Top senders:")?;
        if self.top.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (i, s) in self.top.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {:>5} {:>5.1}%  {}",
                i + 1,
                s.newsletter.count,
                s.share,
                s.newsletter
            )?;
        }
        Ok(())
    }
}
