//! # Admission Flow Integration
//!
//! Exercises the composed gate across its components:
//!
//! 1. **Limiter → BanStore escalation**: the request that trips the window
//!    is banned on the spot, and later checks report the ban.
//! 2. **Per-key isolation**: one client's escalation never affects another.
//! 3. **Admin surface**: ban listing/clearing and allow-list replacement
//!    behave atomically under traffic.
//! 4. **Concurrent admission**: the window capacity holds exactly under
//!    parallel load on one key.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use warden_admission::{Admission, AdmissionConfig, AdmissionGate, RejectReason};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn gate_with_capacity(capacity: usize) -> AdmissionGate {
        AdmissionGate::new(&AdmissionConfig {
            capacity,
            ..Default::default()
        })
        .expect("valid test config")
    }

    // =========================================================================
    // ESCALATION FLOW
    // =========================================================================

    #[test]
    fn test_trip_then_ban_then_sticky_rejection() {
        let gate = gate_with_capacity(5);

        for _ in 0..5 {
            assert_eq!(gate.check("203.0.113.7"), Admission::Admitted);
        }

        assert_eq!(
            gate.check("203.0.113.7"),
            Admission::Rejected(RejectReason::RateLimited)
        );

        // Every check after escalation sees the ban, not the limiter.
        for _ in 0..10 {
            assert_eq!(
                gate.check("203.0.113.7"),
                Admission::Rejected(RejectReason::Banned)
            );
        }
    }

    #[test]
    fn test_escalation_is_per_key() {
        let gate = gate_with_capacity(2);

        let _ = gate.check("10.0.0.1");
        let _ = gate.check("10.0.0.1");
        let _ = gate.check("10.0.0.1"); // trips and bans

        assert_eq!(
            gate.check("10.0.0.1"),
            Admission::Rejected(RejectReason::Banned)
        );
        assert_eq!(gate.check("10.0.0.2"), Admission::Admitted);
    }

    // =========================================================================
    // ADMIN SURFACE
    // =========================================================================

    #[test]
    fn test_ban_listing_and_clearing_under_traffic() {
        let gate = gate_with_capacity(1);

        let _ = gate.check("a");
        let _ = gate.check("a"); // trips
        let _ = gate.check("b");
        let _ = gate.check("b"); // trips

        let mut banned: Vec<_> = gate.list_bans().into_iter().map(|b| b.key).collect();
        banned.sort();
        assert_eq!(banned, vec!["a", "b"]);

        gate.unban("a");
        assert_eq!(gate.list_bans().len(), 1);

        gate.clear_bans();
        assert!(gate.list_bans().is_empty());
    }

    #[test]
    fn test_allow_list_replacement_is_whole_set() {
        let gate = AdmissionGate::new(&AdmissionConfig {
            allow_rules: vec!["192.168.1.0/24".to_string()],
            ..Default::default()
        })
        .expect("valid test config");

        assert!(gate.check_allowed("192.168.1.42".parse().unwrap()));
        assert!(!gate.check_allowed("10.0.0.1".parse().unwrap()));

        gate.update_allow_list(&["10.0.0.0/8".to_string()])
            .expect("valid rules");

        assert!(gate.check_allowed("10.0.0.1".parse().unwrap()));
        assert!(!gate.check_allowed("192.168.1.42".parse().unwrap()));

        // Emptying the list reopens every address.
        gate.update_allow_list(&[]).expect("empty rules");
        assert!(gate.check_allowed("8.8.8.8".parse().unwrap()));
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[test]
    fn test_window_capacity_holds_under_parallel_load() {
        // All checks land within one window, so across every thread exactly
        // `capacity` admissions may succeed for the shared key; denied
        // attempts are never charged.
        let capacity = 64;
        let gate = Arc::new(gate_with_capacity(capacity));
        let admitted = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..32 {
                        if gate.check("shared-key").is_admitted() {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::Relaxed), capacity);
    }

    #[test]
    fn test_distinct_keys_do_not_contend_on_capacity() {
        let gate = Arc::new(gate_with_capacity(32));
        let admitted = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for t in 0..4 {
                let admitted = &admitted;
                let gate = Arc::clone(&gate);
                scope.spawn(move || {
                    let key = format!("client-{}", t);
                    for _ in 0..16 {
                        if gate.check(&key).is_admitted() {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        // Every key stays under its own capacity; nothing is denied.
        assert_eq!(admitted.load(Ordering::Relaxed), 4 * 16);
    }
}
