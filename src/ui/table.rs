use thiserror::Error;

use crate::format::{clip, pad_right, sanitize};
use crate::rank::Metric;
use crate::system::process::ProcessSample;

const PID_WIDTH: usize = 5;
const NAME_WIDTH: usize = 15;
const METRIC_WIDTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("pid {pid}: metric value is not a finite number")]
    NonFiniteMetric { pid: u32 },
}

/// Lines ready to draw, plus the rows that could not be formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOutput {
    pub lines: Vec<String>,
    pub skipped: Vec<RowError>,
}

pub fn header(metric: Metric) -> String {
    format!(
        "{:>PID_WIDTH$} {} {:>METRIC_WIDTH$}",
        "PID",
        pad_right("Name", NAME_WIDTH),
        metric.column_label()
    )
}

pub fn format_row(sample: &ProcessSample, metric: Metric) -> Result<String, RowError> {
    let value = metric.value(sample);
    if !value.is_finite() {
        return Err(RowError::NonFiniteMetric { pid: sample.pid });
    }
    Ok(format!(
        "{:>PID_WIDTH$} {} {:>6.1}%",
        sample.pid,
        pad_right(&sanitize(&sample.name), NAME_WIDTH),
        value
    ))
}

/// Title, column header, then up to `max_rows - 2` process rows, each line
/// clipped to `max_width`. Rows past the budget are dropped. A row that
/// fails to format is left out and reported in `skipped`.
pub fn format_table(
    title: &str,
    rows: &[ProcessSample],
    metric: Metric,
    max_width: usize,
    max_rows: usize,
) -> TableOutput {
    let mut out = TableOutput::default();
    if max_rows == 0 {
        return out;
    }
    out.lines.push(clip(title, max_width));
    if max_rows == 1 {
        return out;
    }
    out.lines.push(clip(&header(metric), max_width));

    let budget = max_rows - 2;
    for sample in rows {
        if out.lines.len() - 2 >= budget {
            break;
        }
        match format_row(sample, metric) {
            Ok(line) => out.lines.push(clip(&line, max_width)),
            Err(err) => out.skipped.push(err),
        }
    }
    out
}
