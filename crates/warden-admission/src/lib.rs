//! Request admission control for the dashboard's public surface.
//!
//! Composes three independently locked components into a single
//! admit-or-reject decision:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ADMISSION GATE                       │
//! ├──────────────────────────────────────────────────────────┤
//! │   inbound address                                        │
//! │        │                                                 │
//! │        ▼                                                 │
//! │   ┌─────────┐  banned   ┌──────────────────┐  over cap   │
//! │   │ BanStore│ ────────► │ SlidingWindow    │ ──────────► │
//! │   │         │  reject   │ Limiter          │  ban+reject │
//! │   └─────────┘           └──────────────────┘             │
//! │                                │ within cap              │
//! │                                ▼                         │
//! │                              admit                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`AllowList`] is a separate gate for network-restricted endpoints;
//! it is consulted independently of the ban/limit decision.
//!
//! Rejections are decision outcomes, not errors: callers receive a typed
//! [`Admission`] value and map it to a transport status themselves.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::AdmissionConfig;
pub use domain::allowlist::{parse_rules, AllowList};
pub use domain::bans::{BanEntry, BanStore};
pub use domain::limiter::SlidingWindowLimiter;
pub use error::AdmissionError;
pub use service::{Admission, AdmissionGate, RejectReason};
