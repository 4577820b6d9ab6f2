//! Top-N selection. Pure: no I/O, deterministic for a given input.

use crate::system::process::ProcessSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
}

impl Metric {
    pub fn value(self, sample: &ProcessSample) -> f32 {
        match self {
            Metric::Cpu => sample.cpu_percent,
            Metric::Memory => sample.mem_percent,
        }
    }

    pub fn column_label(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU%",
            Metric::Memory => "MEM%",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Cpu => "Top CPU Processes",
            Metric::Memory => "Top Memory Processes",
        }
    }
}

/// Processes ordered descending by one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedList {
    metric: Metric,
    entries: Vec<ProcessSample>,
}

impl RankedList {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn entries(&self) -> &[ProcessSample] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ProcessSample> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable-sorts `samples` descending by `metric` and keeps the first `n`.
/// Equal values keep their input order.
pub fn top(samples: &[ProcessSample], metric: Metric, n: usize) -> RankedList {
    let mut entries = samples.to_vec();
    entries.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));
    entries.truncate(n);
    RankedList { metric, entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, cpu: f32, mem: f32) -> ProcessSample {
        ProcessSample::new(pid, format!("p{pid}"), cpu, mem)
    }

    fn pids(list: &RankedList) -> Vec<u32> {
        list.entries().iter().map(|p| p.pid).collect()
    }

    #[test]
    fn orders_by_requested_metric() {
        let samples = vec![
            sample(1, 5.0, 50.0),
            sample(2, 90.0, 1.0),
            sample(3, 50.0, 20.0),
        ];
        assert_eq!(pids(&top(&samples, Metric::Cpu, 10)), vec![2, 3, 1]);
        assert_eq!(pids(&top(&samples, Metric::Memory, 10)), vec![1, 3, 2]);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let samples = vec![sample(100, 10.0, 0.0), sample(200, 10.0, 0.0)];
        let ranked = top(&samples, Metric::Cpu, 20);
        assert_eq!(pids(&ranked), vec![100, 200]);
    }

    #[test]
    fn truncates_to_n() {
        let samples: Vec<_> = (0..30).map(|i| sample(i, i as f32, 0.0)).collect();
        let ranked = top(&samples, Metric::Cpu, 20);
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked.entries()[0].pid, 29);
        assert!(top(&samples, Metric::Cpu, 0).is_empty());
    }

    #[test]
    fn labels_per_metric() {
        assert_eq!(Metric::Cpu.column_label(), "CPU%");
        assert_eq!(Metric::Memory.column_label(), "MEM%");
        assert_eq!(top(&[], Metric::Memory, 3).metric(), Metric::Memory);
    }
}
