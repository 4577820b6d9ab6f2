use std::collections::HashMap;

/// Tracks which PIDs were present in earlier enumerations so the
/// since-last-sample CPU figure is only trusted from the second sighting on.
#[derive(Debug, Default)]
pub struct CpuLedger {
    last_seen: HashMap<u32, u64>,
    generation: u64,
}

impl CpuLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new enumeration.
    pub fn begin(&mut self) {
        self.generation += 1;
    }

    /// Records a sighting of `pid` and returns the CPU reading to report.
    /// A PID missing from the previous enumeration reads 0.0.
    pub fn observe(&mut self, pid: u32, raw_cpu: f32) -> f32 {
        let previous = self.last_seen.insert(pid, self.generation);
        match previous {
            Some(generation) if generation + 1 == self.generation => raw_cpu,
            _ => 0.0,
        }
    }

    /// Forgets PIDs that were not seen in the current enumeration.
    pub fn finish(&mut self) {
        let current = self.generation;
        self.last_seen.retain(|_, seen| *seen == current);
    }

    pub fn tracked(&self) -> usize {
        self.last_seen.len()
    }
}
