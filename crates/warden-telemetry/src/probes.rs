//! OS counter readers.
//!
//! Every metric source is independent: a counter the platform does not
//! expose (or a mount that does not exist) yields `None` for that field
//! and never aborts the sampling cycle. The sampler zeroes missing fields
//! when it assembles the snapshot.

use parking_lot::Mutex;
use sysinfo::{Disks, Networks, System};
use tracing::warn;

/// Per-field readings from one probe pass. `None` means the source was
/// unavailable, not that the value was zero.
#[derive(Debug, Clone, Default)]
pub struct ProbeReadings {
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f32>,
    pub disk_percent: Option<f32>,
    pub uptime_secs: Option<u64>,
    pub load_avg: Option<[f64; 3]>,
    pub net_rx_bytes: Option<u64>,
    pub net_tx_bytes: Option<u64>,
}

/// Source of OS-level counters. Injectable so the sampler can be driven by
/// a scripted probe in tests.
pub trait SystemProbe: Send + Sync {
    /// Read all counters once. Must not block on anything slower than the
    /// OS interfaces themselves and must tolerate per-field failure.
    fn sample(&self) -> ProbeReadings;
}

/// sysinfo-backed probe.
///
/// Keeps one `System` alive between samples so CPU utilization is computed
/// from the delta since the previous refresh rather than reading as zero
/// every time.
pub struct SysinfoProbe {
    system: Mutex<System>,
    disk_mount: String,
}

impl SysinfoProbe {
    /// Probe reading disk utilization for `disk_mount`.
    pub fn new(disk_mount: impl Into<String>) -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
            disk_mount: disk_mount.into(),
        }
    }

    fn disk_percent(&self) -> Option<f32> {
        let disks = Disks::new_with_refreshed_list();
        for disk in &disks {
            if disk.mount_point() == std::path::Path::new(&self.disk_mount) {
                let total = disk.total_space();
                if total == 0 {
                    return None;
                }
                let used = total.saturating_sub(disk.available_space());
                return Some((used as f64 / total as f64 * 100.0) as f32);
            }
        }
        warn!(mount = %self.disk_mount, "configured mount not found, disk metric omitted");
        None
    }

    fn network_totals() -> (Option<u64>, Option<u64>) {
        let networks = Networks::new_with_refreshed_list();
        let mut rx = 0u64;
        let mut tx = 0u64;
        let mut seen = false;
        for (_name, data) in &networks {
            seen = true;
            rx = rx.saturating_add(data.total_received());
            tx = tx.saturating_add(data.total_transmitted());
        }
        if seen {
            (Some(rx), Some(tx))
        } else {
            (None, None)
        }
    }
}

impl SystemProbe for SysinfoProbe {
    fn sample(&self) -> ProbeReadings {
        let (cpu_percent, memory_percent) = {
            let mut system = self.system.lock();
            system.refresh_cpu();
            system.refresh_memory();

            let cpu = system.global_cpu_info().cpu_usage();
            let total = system.total_memory();
            let memory = if total == 0 {
                None
            } else {
                Some((system.used_memory() as f64 / total as f64 * 100.0) as f32)
            };
            (Some(cpu), memory)
        };

        let (net_rx_bytes, net_tx_bytes) = Self::network_totals();
        let load = System::load_average();

        ProbeReadings {
            cpu_percent,
            memory_percent,
            disk_percent: self.disk_percent(),
            uptime_secs: Some(System::uptime()),
            load_avg: Some([load.one, load.five, load.fifteen]),
            net_rx_bytes,
            net_tx_bytes,
        }
    }
}
