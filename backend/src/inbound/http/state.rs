//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Accounts, Bookings, Gallery, Invoicing, Maintenance, Messaging, Notifications, Promotions,
    Providers, Reports, Reviews, SocialFeed,
};

/// Dependency bundle for HTTP handlers, one field per driving port.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn Accounts>,
    pub providers: Arc<dyn Providers>,
    pub bookings: Arc<dyn Bookings>,
    pub promotions: Arc<dyn Promotions>,
    pub social: Arc<dyn SocialFeed>,
    pub messaging: Arc<dyn Messaging>,
    pub invoicing: Arc<dyn Invoicing>,
    pub reviews: Arc<dyn Reviews>,
    pub notifications: Arc<dyn Notifications>,
    pub gallery: Arc<dyn Gallery>,
    pub reports: Arc<dyn Reports>,
    pub maintenance: Arc<dyn Maintenance>,
}
