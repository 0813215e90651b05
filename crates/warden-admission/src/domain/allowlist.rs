//! Network allow list for restricted endpoints.
//!
//! An empty rule set is default-open. A non-empty set admits an address
//! iff at least one rule contains it; rules are CIDR blocks, with bare IP
//! literals widened to host networks. The set is immutable and replaced
//! wholesale, so readers never observe a half-updated list.

use std::net::IpAddr;
use std::sync::Arc;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{AdmissionError, AdmissionResult};

/// Parse rule strings into networks.
///
/// Accepts CIDR notation (`192.168.1.0/24`) and bare literals
/// (`127.0.0.1`, widened to `/32`; v6 literals to `/128`). Any malformed
/// rule fails the whole batch so a partial set never goes live.
pub fn parse_rules(specs: &[String]) -> AdmissionResult<Vec<IpNet>> {
    specs
        .iter()
        .map(|spec| {
            if let Ok(net) = spec.parse::<IpNet>() {
                return Ok(net);
            }
            match spec.parse::<IpAddr>() {
                Ok(IpAddr::V4(v4)) => Ipv4Net::new(v4, 32)
                    .map(IpNet::V4)
                    .map_err(|e| AdmissionError::InvalidRule {
                        rule: spec.clone(),
                        reason: e.to_string(),
                    }),
                Ok(IpAddr::V6(v6)) => Ipv6Net::new(v6, 128)
                    .map(IpNet::V6)
                    .map_err(|e| AdmissionError::InvalidRule {
                        rule: spec.clone(),
                        reason: e.to_string(),
                    }),
                Err(e) => Err(AdmissionError::InvalidRule {
                    rule: spec.clone(),
                    reason: e.to_string(),
                }),
            }
        })
        .collect()
}

/// Static set of permitted networks, swapped atomically on update.
pub struct AllowList {
    rules: RwLock<Arc<Vec<IpNet>>>,
}

impl AllowList {
    pub fn new(rules: Vec<IpNet>) -> Self {
        Self {
            rules: RwLock::new(Arc::new(rules)),
        }
    }

    /// Whether `addr` passes the list. Empty list admits everything.
    pub fn is_allowed(&self, addr: IpAddr) -> bool {
        let rules = Arc::clone(&self.rules.read());
        rules.is_empty() || rules.iter().any(|net| net.contains(&addr))
    }

    /// Replace the whole rule set. The write lock is held only for the
    /// pointer swap; in-flight readers keep the set they already cloned.
    pub fn replace(&self, rules: Vec<IpNet>) {
        let count = rules.len();
        *self.rules.write() = Arc::new(rules);
        debug!(rules = count, "allow list replaced");
    }

    /// Current number of rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
