//! Edvora - Online course marketplace backend.
//!
//! Educators publish courses; students browse, purchase through a
//! hosted payment-processor checkout, track lecture progress, and rate
//! courses. Identity, payment collection, and media storage are
//! delegated to external providers; the core state this service owns is
//! the purchase lifecycle and its enrollment reconciliation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
