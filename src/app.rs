use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::Backend;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, info};

use crate::action::Action;
use crate::config::{Config, parse_key};
use crate::event::{Event, EventSource};
use crate::rank::{self, Metric};
use crate::system::collector::MetricsSource;
use crate::terminal::TerminalSurface;
use crate::ui::gauge::GaugeGlyphs;
use crate::ui::{self, FrameData, FrameLayout};

/// One tick. Also the system CPU measurement window.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How many processes the source hands over per metric.
pub const PROCESS_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

pub struct App {
    state: LoopState,
    quit_key: KeyCode,
    glyphs: GaugeGlyphs,
    ticks: u64,
    cleanups: u32,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            state: LoopState::Running,
            quit_key: parse_key(&config.keybinds.quit).unwrap_or(KeyCode::Char('q')),
            glyphs: config.gauge.glyphs(),
            ticks: 0,
            cleanups: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Times the surface teardown has run.
    pub fn cleanups(&self) -> u32 {
        self.cleanups
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if key.code == self.quit_key {
            return Action::Quit;
        }
        Action::None
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) => self.map_key(key),
            Event::Interrupt => Action::Quit,
        };
        self.dispatch(action);
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.request_stop(),
            Action::None => {}
        }
    }

    fn request_stop(&mut self) {
        if self.state == LoopState::Running {
            info!(ticks = self.ticks, "quit requested");
            self.state = LoopState::Stopping;
        }
    }

    /// The single non-blocking check for a quit request. Drains whatever
    /// input is pending; never waits.
    pub fn poll_events<E: EventSource>(&mut self, events: &mut E) {
        while let Some(event) = events.try_next() {
            self.handle_event(event);
        }
    }

    /// Sample, rank and render once.
    pub fn tick<M, B>(&mut self, source: &mut M, surface: &mut TerminalSurface<B>) -> Result<()>
    where
        M: MetricsSource,
        B: Backend,
        B::Error: Send + Sync + 'static,
    {
        let started = std::time::Instant::now();

        let system = source.sample_system();
        let size = surface.size()?;
        let capacity = FrameLayout::new(size.height, size.width).table_capacity();
        let top_cpu = rank::top(
            &source.sample_top_by_cpu(PROCESS_LIMIT),
            Metric::Cpu,
            capacity,
        );
        let top_memory = rank::top(
            &source.sample_top_by_memory(PROCESS_LIMIT),
            Metric::Memory,
            capacity,
        );

        ui::render(
            surface,
            &FrameData {
                system: &system,
                top_cpu: &top_cpu,
                top_memory: &top_memory,
                glyphs: self.glyphs,
            },
        )?;

        self.ticks += 1;
        debug!(
            tick = self.ticks,
            cpu = system.cpu_percent,
            rows = size.height,
            cols = size.width,
            elapsed_us = started.elapsed().as_micros() as u64,
            "frame rendered"
        );
        Ok(())
    }

    /// Runs ticks until a quit request arrives. The CPU counters need one
    /// full window after priming, so the first frame comes one interval in.
    pub async fn run<M, B, E>(
        &mut self,
        source: &mut M,
        surface: &mut TerminalSurface<B>,
        events: &mut E,
    ) -> Result<()>
    where
        M: MetricsSource,
        B: Backend,
        B::Error: Send + Sync + 'static,
        E: EventSource,
    {
        info!("monitor started");
        sleep(TICK_INTERVAL).await;
        self.poll_events(events);

        while self.state == LoopState::Running {
            let tick_start = Instant::now();
            self.tick(source, surface)?;
            sleep_until(tick_start + TICK_INTERVAL).await;
            self.poll_events(events);
        }
        Ok(())
    }

    /// Releases the surface and settles in `Stopped`. Reached from every
    /// exit path; later calls do nothing.
    pub fn shutdown<B: Backend>(&mut self, surface: &mut TerminalSurface<B>) -> Result<()> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }
        self.state = LoopState::Stopping;
        let released = surface.release();
        self.cleanups += 1;
        self.state = LoopState::Stopped;
        info!(ticks = self.ticks, "monitor stopped");
        released?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::system::process::ProcessSample;
    use crate::system::snapshot::SystemSample;

    const GIB: u64 = 1024 * 1024 * 1024;

    /// Replays fixed numbers and counts how often it was sampled.
    struct ScriptedSource {
        processes: Vec<ProcessSample>,
        samples: u32,
    }

    impl ScriptedSource {
        fn new() -> Self {
            ScriptedSource {
                processes: vec![
                    ProcessSample::new(100, "editor", 10.0, 4.0),
                    ProcessSample::new(200, "compiler", 10.0, 30.0),
                    ProcessSample::new(300, "shell", 1.0, 0.5),
                ],
                samples: 0,
            }
        }
    }

    impl MetricsSource for ScriptedSource {
        fn sample_system(&mut self) -> SystemSample {
            self.samples += 1;
            SystemSample::new(42.0, 16 * GIB, 4 * GIB)
        }

        fn sample_top_by_cpu(&mut self, limit: usize) -> Vec<ProcessSample> {
            rank::top(&self.processes, Metric::Cpu, limit).into_entries()
        }

        fn sample_top_by_memory(&mut self, limit: usize) -> Vec<ProcessSample> {
            rank::top(&self.processes, Metric::Memory, limit).into_entries()
        }
    }

    /// Hands out one batch of events per poll.
    struct ScriptedEvents {
        batches: VecDeque<Vec<Event>>,
        current: Option<VecDeque<Event>>,
        polls: u32,
    }

    impl ScriptedEvents {
        fn new(batches: Vec<Vec<Event>>) -> Self {
            ScriptedEvents {
                batches: batches.into(),
                current: None,
                polls: 0,
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn try_next(&mut self) -> Option<Event> {
            if self.current.is_none() {
                self.polls += 1;
                self.current = Some(self.batches.pop_front().unwrap_or_default().into());
            }
            let next = self.current.as_mut().and_then(|batch| batch.pop_front());
            if next.is_none() {
                self.current = None;
            }
            next
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn make_app() -> App {
        App::new(&Config::default())
    }

    #[test]
    fn default_keybinds_quit() {
        let app = make_app();
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(q), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(other), Action::None);
    }

    #[test]
    fn custom_quit_key() {
        let mut config = Config::default();
        config.keybinds.quit = "x".to_string();
        let app = App::new(&config);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            Action::Quit
        );
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Action::None
        );
    }

    #[test]
    fn unknown_quit_key_falls_back_to_q() {
        let mut config = Config::default();
        config.keybinds.quit = "F13".to_string();
        let app = App::new(&config);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Action::Quit
        );
    }

    #[test]
    fn interrupt_is_a_quit() {
        let mut app = make_app();
        app.handle_event(Event::Interrupt);
        assert_eq!(app.state(), LoopState::Stopping);
    }

    #[test]
    fn tick_draws_a_frame() {
        let mut app = make_app();
        let mut source = ScriptedSource::new();
        let mut surface = TerminalSurface::headless(TestBackend::new(80, 12)).unwrap();

        app.tick(&mut source, &mut surface).unwrap();

        assert_eq!(app.ticks(), 1);
        let buf = surface.backend().buffer();
        let row: String = (0..80u16)
            .map(|x| {
                buf.cell((x, ui::CPU_GAUGE_ROW))
                    .map(|c| c.symbol())
                    .unwrap_or(" ")
            })
            .collect();
        assert!(row.starts_with("CPU Usage: 42.0% ["));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_key_stops_before_next_sample() {
        let mut app = make_app();
        let mut source = ScriptedSource::new();
        let mut surface = TerminalSurface::headless(TestBackend::new(80, 20)).unwrap();
        // warm-up poll, then two quiet ticks, then 'q' during the third
        let mut events = ScriptedEvents::new(vec![
            vec![],
            vec![key(KeyCode::Char('z'))],
            vec![],
            vec![key(KeyCode::Char('q'))],
            vec![key(KeyCode::Char('q'))],
        ]);

        app.run(&mut source, &mut surface, &mut events)
            .await
            .unwrap();

        assert_eq!(app.state(), LoopState::Stopping);
        assert_eq!(source.samples, 3);
        assert_eq!(app.ticks(), 3);
        assert_eq!(events.polls, 4);
        assert_eq!(app.cleanups(), 0);

        app.shutdown(&mut surface).unwrap();
        assert_eq!(app.state(), LoopState::Stopped);
        assert!(surface.is_released());
        assert_eq!(app.cleanups(), 1);

        app.shutdown(&mut surface).unwrap();
        assert_eq!(app.cleanups(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_one_interval_apart() {
        let mut app = make_app();
        let mut source = ScriptedSource::new();
        let mut surface = TerminalSurface::headless(TestBackend::new(40, 10)).unwrap();
        let mut events = ScriptedEvents::new(vec![vec![], vec![], vec![Event::Interrupt]]);

        let started = Instant::now();
        app.run(&mut source, &mut surface, &mut events)
            .await
            .unwrap();

        assert_eq!(app.ticks(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= TICK_INTERVAL * 3);
        assert!(elapsed < TICK_INTERVAL * 3 + Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_during_warm_up_never_samples() {
        let mut app = make_app();
        let mut source = ScriptedSource::new();
        let mut surface = TerminalSurface::headless(TestBackend::new(40, 10)).unwrap();
        let mut events = ScriptedEvents::new(vec![vec![key(KeyCode::Char('q'))]]);

        app.run(&mut source, &mut surface, &mut events)
            .await
            .unwrap();
        app.shutdown(&mut surface).unwrap();

        assert_eq!(source.samples, 0);
        assert_eq!(app.state(), LoopState::Stopped);
        assert_eq!(app.cleanups(), 1);
    }

    #[test]
    fn shutdown_from_running_after_error_path() {
        let mut app = make_app();
        let mut surface = TerminalSurface::headless(TestBackend::new(10, 3)).unwrap();
        assert_eq!(app.state(), LoopState::Running);
        app.shutdown(&mut surface).unwrap();
        assert_eq!(app.state(), LoopState::Stopped);
        assert_eq!(app.cleanups(), 1);
    }
}
