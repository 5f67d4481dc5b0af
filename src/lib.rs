//! Find the senders filling a Gmail category and how to unsubscribe from them.
//!
//! The pipeline lists a label's messages (capped), fetches their metadata in
//! batches, groups them by sender and reads each sender's `List-Unsubscribe`
//! header. See [`mail`] for the stages and [`gmail`] for the API boundary.

pub mod auth;
pub mod config;
pub mod domain;
pub mod gmail;
pub mod headers;
pub mod mail;
pub mod report;
pub mod terminal;
