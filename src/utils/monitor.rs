//! Process resource sampling around engine phases.
//!
//! Sampling needs `sysinfo`, which ships with the `cli` feature. Without it
//! the monitor is inert and every run reports no samples.

use serde::Serialize;
use std::time::Duration;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resource usage of the process at the end of one engine phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSample {
    pub phase: String,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub since_start: Duration,
}

#[cfg(feature = "cli")]
pub struct ResourceMonitor {
    system: System,
    pid: Option<Pid>,
    started: Instant,
    samples: Vec<ResourceSample>,
}

#[cfg(feature = "cli")]
impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Resource monitoring unavailable: {}", e))
                .ok()
        } else {
            None
        };

        let mut monitor = Self {
            system: System::new(),
            pid,
            started: Instant::now(),
            samples: Vec::new(),
        };
        // cpu usage is a delta, so the first refresh only primes it
        monitor.refresh();
        monitor
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    fn refresh(&mut self) {
        if let Some(pid) = self.pid {
            self.system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu().with_memory(),
            );
        }
    }

    /// Records usage at the end of `phase` and logs it.
    pub fn sample(&mut self, phase: &str) -> Option<&ResourceSample> {
        let pid = self.pid?;
        self.refresh();
        let process = self.system.process(pid)?;

        let sample = ResourceSample {
            phase: phase.to_string(),
            cpu_usage: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
            since_start: self.started.elapsed(),
        };
        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
            sample.phase,
            sample.cpu_usage,
            sample.memory_mb,
            sample.since_start
        );
        self.samples.push(sample);
        self.samples.last()
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.memory_mb).max()
    }

    /// Logs the run totals and hands back every sample taken.
    pub fn finish(self) -> Vec<ResourceSample> {
        if let Some(peak) = self.peak_memory_mb() {
            tracing::info!(
                "📊 Run used {:?} with peak memory {}MB over {} phases",
                self.started.elapsed(),
                peak,
                self.samples.len()
            );
        }
        self.samples
    }
}

#[cfg(not(feature = "cli"))]
pub struct ResourceMonitor;

#[cfg(not(feature = "cli"))]
impl ResourceMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn sample(&mut self, _phase: &str) -> Option<&ResourceSample> {
        None
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        None
    }

    pub fn finish(self) -> Vec<ResourceSample> {
        Vec::new()
    }
}
