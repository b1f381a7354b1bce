//! Push delivery adapters.

mod dto;
mod webhook_sender;

pub use webhook_sender::{WebhookIdentity, WebhookPushSender};
