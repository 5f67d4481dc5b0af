//! In-memory Gmail used by the pipeline tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::domain::MessageRef;
use crate::gmail::{Error, GmailApi, Header, ListQuery, Message, MessageList, Payload, Result};

pub struct FakeGmail {
    page_size: usize,
    messages: Vec<Message>,
    unsubscribe: HashMap<String, String>,
    failing_metadata: HashSet<String>,
    failing_full: HashSet<String>,
    batch_sizes: RefCell<Vec<usize>>,
}

impl FakeGmail {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            messages: Vec::new(),
            unsubscribe: HashMap::new(),
            failing_metadata: HashSet::new(),
            failing_full: HashSet::new(),
            batch_sizes: RefCell::new(Vec::new()),
        }
    }

    /// Append a message to the listing.
    pub fn push(&mut self, id: &str, from: &str) {
        self.messages.push(Message {
            id: id.to_string(),
            thread_id: format!("t-{id}"),
            label_ids: vec!["CATEGORY_PROMOTIONS".to_string()],
            payload: Payload {
                headers: vec![
                    header("From", from),
                    header("Date", "Tue, 24 Dec 2019 22:13:09 +0000"),
                ],
            },
        });
    }

    /// Attach a `List-Unsubscribe` header, visible to full fetches only.
    pub fn set_unsubscribe(&mut self, id: &str, value: &str) {
        self.unsubscribe.insert(id.to_string(), value.to_string());
    }

    pub fn fail_metadata(&mut self, id: &str) {
        self.failing_metadata.insert(id.to_string());
    }

    pub fn fail_full(&mut self, id: &str) {
        self.failing_full.insert(id.to_string());
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.borrow().clone()
    }

    fn find(&self, id: &str) -> Result<Message> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                message: "Requested entity was not found.".to_string(),
            })
    }
}

fn header(name: &str, value: &str) -> Header {
    Header {
        name: name.to_string(),
        value: value.to_string(),
    }
}

impl GmailApi for FakeGmail {
    fn list_messages(&self, _user_id: &str, query: &ListQuery) -> Result<MessageList> {
        let offset: usize = query
            .page_token
            .as_deref()
            .map(|t| t.parse().unwrap())
            .unwrap_or(0);
        let end = (offset + self.page_size).min(self.messages.len());
        Ok(MessageList {
            messages: self.messages[offset..end]
                .iter()
                .map(|m| MessageRef {
                    id: m.id.clone(),
                    thread_id: m.thread_id.clone(),
                })
                .collect(),
            next_page_token: (end < self.messages.len()).then(|| end.to_string()),
            result_size_estimate: self.messages.len() as u32,
        })
    }

    fn batch_get_metadata(
        &self,
        _user_id: &str,
        ids: &[String],
        _headers: &[String],
    ) -> Vec<Result<Message>> {
        self.batch_sizes.borrow_mut().push(ids.len());
        ids.iter()
            .map(|id| {
                if self.failing_metadata.contains(id) {
                    Err(Error::Api {
                        status: 500,
                        message: "Backend Error".to_string(),
                    })
                } else {
                    self.find(id)
                }
            })
            .collect()
    }

    fn get_message_full(&self, _user_id: &str, id: &str) -> Result<Message> {
        if self.failing_full.contains(id) {
            return Err(Error::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        let mut message = self.find(id)?;
        if let Some(value) = self.unsubscribe.get(id) {
            message
                .payload
                .headers
                .push(header("List-Unsubscribe", value));
        }
        Ok(message)
    }
}
