pub mod gauge;
pub mod table;

use ratatui::Frame;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::style::Style;
use tracing::warn;

use crate::format::{format_gib, format_round2};
use crate::rank::RankedList;
use crate::system::snapshot::SystemSample;
use crate::terminal::TerminalSurface;
use gauge::{GaugeGlyphs, format_bar};
use table::{RowError, format_table};

pub const CPU_GAUGE_ROW: u16 = 1;
pub const MEMORY_GAUGE_ROW: u16 = 3;
pub const TABLE_ROW: u16 = 5;

/// Where everything goes for a grid of `rows` x `cols`. Recomputed on every
/// frame so a resize takes effect on the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub rows: u16,
    pub cols: u16,
    pub gauge_width: usize,
    pub left_col: u16,
    pub right_col: u16,
    pub table_width: usize,
    /// Lines per table, title and header included.
    pub table_rows: usize,
}

impl FrameLayout {
    pub fn new(rows: u16, cols: u16) -> Self {
        let half = cols / 2;
        FrameLayout {
            rows,
            cols,
            gauge_width: cols as usize,
            left_col: 0,
            right_col: half,
            table_width: half as usize,
            // leave the bottom line blank
            table_rows: rows.saturating_sub(TABLE_ROW + 1) as usize,
        }
    }

    /// Process rows each table can show.
    pub fn table_capacity(&self) -> usize {
        self.table_rows.saturating_sub(2)
    }
}

/// Everything one frame shows.
pub struct FrameData<'a> {
    pub system: &'a SystemSample,
    pub top_cpu: &'a RankedList,
    pub top_memory: &'a RankedList,
    pub glyphs: GaugeGlyphs,
}

pub fn cpu_label(system: &SystemSample) -> String {
    format!("CPU Usage: {:.1}%", system.cpu_percent)
}

pub fn memory_label(system: &SystemSample) -> String {
    format!(
        "Memory Free: {} ({}%) of {}",
        format_gib(system.mem_free_bytes()),
        format_round2(system.mem_free_percent()),
        format_gib(system.mem_total_bytes)
    )
}

/// Draws one frame into `frame` and returns the rows that had to be left out.
pub fn draw(frame: &mut Frame, data: &FrameData) -> Vec<RowError> {
    let area = frame.area();
    let layout = FrameLayout::new(area.height, area.width);
    let buf = frame.buffer_mut();

    let cpu = format_bar(
        &cpu_label(data.system),
        data.system.cpu_percent as f64,
        layout.gauge_width,
        data.glyphs,
    );
    put_line(buf, CPU_GAUGE_ROW, 0, &cpu, layout.gauge_width);

    let memory = format_bar(
        &memory_label(data.system),
        data.system.mem_free_percent(),
        layout.gauge_width,
        data.glyphs,
    );
    put_line(buf, MEMORY_GAUGE_ROW, 0, &memory, layout.gauge_width);

    let mut skipped = Vec::new();
    for (list, col) in [
        (data.top_cpu, layout.left_col),
        (data.top_memory, layout.right_col),
    ] {
        let metric = list.metric();
        let table = format_table(
            metric.title(),
            list.entries(),
            metric,
            layout.table_width,
            layout.table_rows,
        );
        for (offset, line) in table.lines.iter().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            put_line(
                buf,
                TABLE_ROW.saturating_add(offset),
                col,
                line,
                layout.table_width,
            );
        }
        skipped.extend(table.skipped);
    }
    skipped
}

/// Writes `text` at (row, col), dropping anything outside the grid.
fn put_line(buf: &mut Buffer, row: u16, col: u16, text: &str, max_width: usize) {
    let area = buf.area;
    if row >= area.height || col >= area.width {
        return;
    }
    let room = (area.width - col) as usize;
    buf.set_stringn(
        area.x + col,
        area.y + row,
        text,
        max_width.min(room),
        Style::default(),
    );
}

/// Draws a full frame on `surface`. The previous frame is wiped: ratatui
/// starts each draw from an empty buffer and flushes only the difference.
/// Skipped rows go to the log, never onto the screen.
pub fn render<B: Backend>(
    surface: &mut TerminalSurface<B>,
    data: &FrameData,
) -> color_eyre::Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut skipped = Vec::new();
    surface.terminal_mut().draw(|frame| {
        skipped = draw(frame, data);
    })?;
    for err in skipped {
        warn!(%err, "table row skipped");
    }
    Ok(())
}
