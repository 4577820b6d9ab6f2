use std::fmt;

/// One process as seen by a single enumeration.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
}

impl ProcessSample {
    pub fn new(pid: u32, name: impl Into<String>, cpu_percent: f32, mem_percent: f32) -> Self {
        ProcessSample {
            pid,
            name: name.into(),
            cpu_percent: non_negative(cpu_percent),
            mem_percent: non_negative(mem_percent).min(100.0),
        }
    }
}

/// Unavailable or nonsensical readings count as zero.
fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Gone between enumeration and the metric read.
    Exited,
    /// Zombie or dead; no longer holds resources worth ranking.
    Defunct,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Exited => f.write_str("process exited"),
            SkipReason::Defunct => f.write_str("process is defunct"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub pid: u32,
    pub reason: SkipReason,
}

/// Outcome of reading one process during enumeration.
pub type ProcessRead = Result<ProcessSample, Skipped>;

/// Keeps successful reads in enumeration order and returns the skips separately.
pub fn partition_reads(
    reads: impl IntoIterator<Item = ProcessRead>,
) -> (Vec<ProcessSample>, Vec<Skipped>) {
    let mut samples = Vec::new();
    let mut skipped = Vec::new();
    for read in reads {
        match read {
            Ok(sample) => samples.push(sample),
            Err(skip) => skipped.push(skip),
        }
    }
    (samples, skipped)
}
