use crate::format::round2;

/// System-wide figures for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SystemSample {
    pub cpu_percent: f32,
    pub mem_total_bytes: u64,
    pub mem_used_bytes: u64,
}

impl SystemSample {
    /// Builds a sample, clamping CPU into [0, 100] and used memory to the total.
    pub fn new(cpu_percent: f32, mem_total_bytes: u64, mem_used_bytes: u64) -> Self {
        let cpu_percent = if cpu_percent.is_finite() {
            cpu_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        SystemSample {
            cpu_percent,
            mem_total_bytes,
            mem_used_bytes: mem_used_bytes.min(mem_total_bytes),
        }
    }

    pub fn mem_free_bytes(&self) -> u64 {
        self.mem_total_bytes - self.mem_used_bytes
    }

    /// Free memory as a percentage of total, rounded to two decimals.
    pub fn mem_free_percent(&self) -> f64 {
        if self.mem_total_bytes == 0 {
            return 0.0;
        }
        round2(self.mem_free_bytes() as f64 / self.mem_total_bytes as f64 * 100.0)
    }
}
