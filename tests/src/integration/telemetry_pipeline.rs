//! # Telemetry Pipeline Integration
//!
//! Drives the sampler end to end with a scripted probe:
//!
//! 1. **Sample → publish → archive**: every cycle lands one snapshot in the
//!    log and replaces the published value atomically.
//! 2. **Alert lifecycle across cycles**: breach → open alert, sustained
//!    breach → suppressed duplicate, recovery + resolve → fresh alert on
//!    the next breach.
//! 3. **Scheduled lifecycle**: start/stop idempotence under paused time.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use warden_telemetry::{
        AlertKind, AlertSink, MemoryAlertStore, MemorySnapshotLog, ProbeReadings, SnapshotSink,
        SystemProbe, TelemetryConfig, TelemetrySampler, Thresholds,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Probe that replays a script of readings, repeating the last one.
    struct ReplayProbe {
        script: Mutex<Vec<ProbeReadings>>,
    }

    impl ReplayProbe {
        fn new(script: Vec<ProbeReadings>) -> Self {
            // Stored reversed so pop() walks the script in order.
            let mut script = script;
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    impl SystemProbe for ReplayProbe {
        fn sample(&self) -> ProbeReadings {
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.pop().expect("non-empty script")
            } else {
                script.last().cloned().unwrap_or_default()
            }
        }
    }

    fn readings(cpu: f32, memory: f32, disk: f32) -> ProbeReadings {
        ProbeReadings {
            cpu_percent: Some(cpu),
            memory_percent: Some(memory),
            disk_percent: Some(disk),
            uptime_secs: Some(3600),
            load_avg: Some([1.0, 0.8, 0.6]),
            net_rx_bytes: Some(10_000),
            net_tx_bytes: Some(20_000),
        }
    }

    fn sampler(
        probe: ReplayProbe,
        interval: Duration,
    ) -> (TelemetrySampler, Arc<MemoryAlertStore>, Arc<MemorySnapshotLog>) {
        let alerts = Arc::new(MemoryAlertStore::new());
        let log = Arc::new(MemorySnapshotLog::new());
        let sampler = TelemetrySampler::new(
            TelemetryConfig {
                interval,
                thresholds: Thresholds {
                    cpu_percent: 80.0,
                    memory_percent: 80.0,
                    disk_percent: 90.0,
                },
                ..Default::default()
            },
            Arc::new(probe),
            Arc::clone(&alerts) as Arc<dyn AlertSink>,
            Arc::clone(&log) as Arc<dyn SnapshotSink>,
        )
        .expect("valid test config");
        (sampler, alerts, log)
    }

    // =========================================================================
    // SAMPLE → PUBLISH → ARCHIVE
    // =========================================================================

    #[tokio::test]
    async fn test_each_cycle_publishes_and_archives() {
        let (sampler, _, log) = sampler(
            ReplayProbe::new(vec![readings(10.0, 20.0, 30.0), readings(40.0, 50.0, 60.0)]),
            Duration::from_secs(30),
        );

        sampler.sample_once().await;
        let first = sampler.current_snapshot().expect("published");
        assert_eq!(first.cpu_percent, 10.0);
        assert_eq!(log.len(), 1);

        sampler.sample_once().await;
        let second = sampler.current_snapshot().expect("published");
        assert_eq!(second.cpu_percent, 40.0);
        assert_eq!(log.len(), 2);

        // The first reader's value is intact; publication replaced the
        // pointer, not the fields.
        assert_eq!(first.cpu_percent, 10.0);
        assert_eq!(log.latest().expect("archived").cpu_percent, 40.0);
    }

    // =========================================================================
    // ALERT LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_alert_lifecycle_across_cycles() {
        let (sampler, alerts, _) = sampler(
            ReplayProbe::new(vec![
                readings(95.0, 10.0, 10.0), // breach: opens cpu_high
                readings(96.0, 10.0, 10.0), // still breached: suppressed
                readings(20.0, 10.0, 10.0), // recovered
                readings(97.0, 10.0, 10.0), // breach again after resolve
            ]),
            Duration::from_secs(30),
        );

        sampler.sample_once().await;
        sampler.sample_once().await;

        let open = sampler.active_alerts().await.unwrap();
        assert_eq!(open.len(), 1, "sustained breach must not duplicate");
        assert_eq!(open[0].kind, AlertKind::CpuHigh);

        sampler.sample_once().await;
        // Recovery does not auto-resolve; the operator does.
        assert_eq!(sampler.active_alerts().await.unwrap().len(), 1);

        let resolved = sampler
            .resolve_alert(open[0].id)
            .await
            .unwrap()
            .expect("known id");
        assert!(resolved.resolved);

        sampler.sample_once().await;
        let reopened = sampler.active_alerts().await.unwrap();
        assert_eq!(reopened.len(), 1);
        assert_ne!(reopened[0].id, open[0].id);

        // History keeps both alerts.
        assert_eq!(alerts.all().len(), 2);
    }

    #[tokio::test]
    async fn test_simultaneous_breaches_open_one_alert_per_kind() {
        let (sampler, _, _) = sampler(
            ReplayProbe::new(vec![readings(95.0, 95.0, 95.0)]),
            Duration::from_secs(30),
        );

        sampler.sample_once().await;
        sampler.sample_once().await;

        let mut kinds: Vec<_> = sampler
            .active_alerts()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.kind)
            .collect();
        kinds.sort_by_key(|k| k.as_str());
        assert_eq!(
            kinds,
            vec![AlertKind::CpuHigh, AlertKind::DiskHigh, AlertKind::MemoryHigh]
        );
    }

    // =========================================================================
    // SCHEDULED LIFECYCLE
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_run_samples_on_interval() {
        let (sampler, _, log) = sampler(
            ReplayProbe::new(vec![readings(10.0, 10.0, 10.0)]),
            Duration::from_secs(30),
        );

        sampler.start();
        sampler.start(); // idempotent

        tokio::time::sleep(Duration::from_secs(61)).await;
        sampler.stop().await;
        sampler.stop().await; // idempotent

        // Ticks at 0s, 30s, 60s; a duplicate task would double this.
        assert_eq!(log.len(), 3);
        assert!(sampler.current_snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_quiesces_the_schedule() {
        let (sampler, _, log) = sampler(
            ReplayProbe::new(vec![readings(10.0, 10.0, 10.0)]),
            Duration::from_secs(30),
        );

        sampler.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        sampler.stop().await;

        let sampled = log.len();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(log.len(), sampled);
    }
}
