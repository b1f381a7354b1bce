//! Outbound adapters implementing the domain's driven ports.
//!
//! - `persistence`: PostgreSQL repositories on Diesel.
//! - `password`: bcrypt hashing.
//! - `push`: JSON webhook delivery over reqwest.
//! - `media`: local-directory object store.
//!
//! Adapters translate between domain types and infrastructure; they hold no
//! business rules.

pub mod media;
pub mod password;
pub mod persistence;
pub mod push;
