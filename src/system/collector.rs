use sysinfo::{Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use tracing::debug;

use super::ledger::CpuLedger;
use super::process::{ProcessRead, ProcessSample, SkipReason, Skipped, partition_reads};
use super::snapshot::SystemSample;
use crate::rank::{self, Metric};

/// Where the loop pulls its numbers from each tick.
///
/// `sample_system` opens a tick: it refreshes every counter, so the CPU
/// figure covers the time since the previous call. The two top lists read
/// the process enumeration taken by the most recent `sample_system`, sorted
/// descending by their metric and capped at `limit`.
pub trait MetricsSource {
    fn sample_system(&mut self) -> SystemSample;
    fn sample_top_by_cpu(&mut self, limit: usize) -> Vec<ProcessSample>;
    fn sample_top_by_memory(&mut self, limit: usize) -> Vec<ProcessSample>;
}

pub struct Collector {
    sys: System,
    ledger: CpuLedger,
    processes: Vec<ProcessSample>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Takes a priming refresh. CPU figures become meaningful once one
    /// measurement window has passed after this.
    pub fn new() -> Self {
        let mut collector = Collector {
            sys: System::new(),
            ledger: CpuLedger::new(),
            processes: Vec::new(),
        };
        collector.refresh();
        collector
    }

    fn refresh(&mut self) {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        self.processes = self.enumerate();
    }

    fn enumerate(&mut self) -> Vec<ProcessSample> {
        let total_memory = self.sys.total_memory();
        let mut listed: Vec<_> = self.sys.processes().iter().collect();
        listed.sort_unstable_by_key(|(pid, _)| **pid);

        self.ledger.begin();
        let reads: Vec<ProcessRead> = listed
            .into_iter()
            .map(|(pid, process)| {
                read_process(pid.as_u32(), process, total_memory, &mut self.ledger)
            })
            .collect();
        self.ledger.finish();

        let (samples, skipped) = partition_reads(reads);
        for skip in &skipped {
            debug!(pid = skip.pid, reason = %skip.reason, "skipping process");
        }
        samples
    }

    fn top_by(&self, metric: Metric, limit: usize) -> Vec<ProcessSample> {
        rank::top(&self.processes, metric, limit).into_entries()
    }
}

impl MetricsSource for Collector {
    fn sample_system(&mut self) -> SystemSample {
        self.refresh();
        SystemSample::new(
            self.sys.global_cpu_usage(),
            self.sys.total_memory(),
            self.sys.used_memory(),
        )
    }

    fn sample_top_by_cpu(&mut self, limit: usize) -> Vec<ProcessSample> {
        self.top_by(Metric::Cpu, limit)
    }

    fn sample_top_by_memory(&mut self, limit: usize) -> Vec<ProcessSample> {
        self.top_by(Metric::Memory, limit)
    }
}

fn read_process(
    pid: u32,
    process: &Process,
    total_memory: u64,
    ledger: &mut CpuLedger,
) -> ProcessRead {
    if !process.exists() {
        return Err(Skipped {
            pid,
            reason: SkipReason::Exited,
        });
    }
    if matches!(
        process.status(),
        ProcessStatus::Zombie | ProcessStatus::Dead
    ) {
        return Err(Skipped {
            pid,
            reason: SkipReason::Defunct,
        });
    }

    let cpu_percent = ledger.observe(pid, process.cpu_usage());
    let mem_percent = if total_memory > 0 {
        (process.memory() as f64 / total_memory as f64 * 100.0) as f32
    } else {
        0.0
    };
    Ok(ProcessSample::new(
        pid,
        process.name().to_string_lossy(),
        cpu_percent,
        mem_percent,
    ))
}
