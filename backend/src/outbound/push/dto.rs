//! Wire format posted to push endpoints.

use serde::Serialize;

use crate::domain::{Notification, PushSubscription};

/// JSON body sent to a subscription endpoint. The browser keys travel with
/// the payload so a relay can encrypt it for the final hop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PushPayloadDto<'a> {
    pub title: &'a str,
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub keys: PushKeysDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct PushKeysDto<'a> {
    pub p256dh: &'a str,
    pub auth: &'a str,
}

impl<'a> PushPayloadDto<'a> {
    pub(super) fn new(subscription: &'a PushSubscription, notification: &'a Notification) -> Self {
        Self {
            title: &notification.title,
            body: &notification.body,
            url: notification.url.as_deref(),
            keys: PushKeysDto {
                p256dh: &subscription.p256dh,
                auth: &subscription.auth,
            },
        }
    }
}
