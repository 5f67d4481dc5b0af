use std::collections::HashMap;

use crate::domain::{MessageMetadata, Newsletter};
use crate::headers::parse_sender;

/// Group metadata by sender address, most frequent sender first.
///
/// Records whose `From` is missing or not of the form `Name <address>` are
/// skipped. Addresses are compared as exact strings. Senders with equal
/// counts keep the order in which they first appeared.
pub fn aggregate(metadata: &[MessageMetadata]) -> Vec<Newsletter> {
    let mut by_email: HashMap<&str, usize> = HashMap::new();
    let mut newsletters: Vec<Newsletter> = Vec::new();

    for record in metadata {
        let Some(sender) = record.fields.from.as_deref().and_then(parse_sender) else {
            continue;
        };

        match by_email.get(sender.email) {
            Some(&i) => newsletters[i].count += 1,
            None => {
                by_email.insert(sender.email, newsletters.len());
                newsletters.push(Newsletter {
                    sender_email: sender.email.to_string(),
                    display_name: sender.display_name.to_string(),
                    count: 1,
                    exemplar_message_id: record.id.clone(),
                });
            }
        }
    }

    // stable: ties keep first-appearance order
    newsletters.sort_by(|a, b| b.count.cmp(&a.count));
    newsletters
}
