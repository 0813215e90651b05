//! Core admission state machines: limiter, ban store, allow list.

pub mod allowlist;
pub mod bans;
pub mod limiter;
