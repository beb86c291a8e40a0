//! Main Application
//!
//! The App owns the display controller and the poll worker and drives both
//! from one event loop:
//! - terminal events (keys, mouse, resize) first
//! - a finished poll completes the running tick
//! - a due tick starts the next poll
//!
//! Polls run on the worker task, so a slow source never blocks input. At
//! most one poll is in flight and the next tick is only armed once the
//! current one completes.

use anyhow::bail;
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Margin, Rect};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use display_core::{
    Controller, DisplayConfig, Extent, PollOutcome, PollWorker, SchedulerPhase, Source,
};

use crate::surface::{CursorMove, TerminalSurface};
use crate::theme;
use crate::widgets::GlyphView;

/// Border kept around the display when not fullscreen (columns, rows)
const WINDOW_MARGIN: Margin = Margin {
    horizontal: 4,
    vertical: 2,
};

/// What woke the event loop
enum Step {
    Event(Option<std::io::Result<Event>>),
    Polled(Option<PollOutcome>),
    Due,
}

/// Main application state
pub struct App {
    controller: Controller<TerminalSurface>,
    worker: PollWorker,
    /// Terminal size
    size: Rect,
    fullscreen: bool,
    running: bool,
}

impl App {
    /// Create the app for a terminal of `size` cells
    ///
    /// Must be called inside a tokio runtime: the source moves onto a
    /// background poll task.
    pub fn new(config: &DisplayConfig, source: Box<dyn Source>, size: Rect) -> Self {
        let fullscreen = true;
        let surface = TerminalSurface::new(extent(display_area(size, fullscreen)));
        let controller = Controller::new(
            config.initial_state(),
            surface,
            config.controller_options(),
        );
        let worker = PollWorker::spawn(source, config.poll_timeout);

        Self {
            controller,
            worker,
            size,
            fullscreen,
            running: true,
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.draw(terminal)?;

        while self.running {
            let schedule = self.controller.schedule().clone();
            let in_flight = self.worker.in_flight();

            let step = tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => Step::Event(maybe_event),

                outcome = self.worker.next(), if in_flight => Step::Polled(outcome),

                () = schedule.wait(), if !in_flight => Step::Due,
            };

            match step {
                Step::Event(Some(Ok(event))) => self.handle_event(event),
                Step::Event(Some(Err(e))) => return Err(e.into()),
                Step::Event(None) => break,
                Step::Polled(Some(outcome)) => self.on_outcome(outcome)?,
                Step::Polled(None) => bail!("poll worker stopped"),
                Step::Due => self.on_timer()?,
            }

            self.draw(terminal)?;
        }

        info!(ticks = self.controller.ticks(), "Display closed");
        Ok(())
    }

    /// Wait for the next tick, poll and complete it
    ///
    /// Returns `Ok(false)` when nothing is armed.
    pub async fn run_next_tick(&mut self) -> anyhow::Result<bool> {
        if self.controller.phase() != SchedulerPhase::Scheduled {
            return Ok(false);
        }
        self.controller.schedule().wait().await;
        self.on_timer()?;
        match self.worker.next().await {
            Some(outcome) => self.on_outcome(outcome)?,
            None => bail!("poll worker stopped"),
        }
        Ok(true)
    }

    /// The armed tick is due
    pub fn on_timer(&mut self) -> anyhow::Result<()> {
        if self.controller.begin_tick() && !self.worker.request() {
            self.running = false;
            bail!("poll worker stopped");
        }
        Ok(())
    }

    /// The worker finished a poll
    ///
    /// A source failure stops the loop and is returned.
    pub fn on_outcome(&mut self, outcome: PollOutcome) -> anyhow::Result<()> {
        match outcome {
            PollOutcome::Ready(poll) => {
                self.controller.complete_tick(Some(poll));
            }
            PollOutcome::TimedOut => {
                self.controller.complete_tick(None);
            }
            PollOutcome::Failed(e) => {
                self.controller.abort_tick(&e);
                self.running = false;
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Dispatch one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            KeyCode::F(11) => {
                self.fullscreen = !self.fullscreen;
                self.resize_surface();
            }

            _ if self.controller.typing().is_editing() => self.handle_typing_key(key),
            _ => {}
        }
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::F(5) {
            self.controller.refresh();
            return;
        }

        let surface = self.controller.surface_mut();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => surface.insert(c),
            KeyCode::Enter => surface.insert('\n'),
            KeyCode::Backspace => surface.backspace(),
            KeyCode::Left => surface.move_cursor(CursorMove::Left),
            KeyCode::Right => surface.move_cursor(CursorMove::Right),
            KeyCode::Up => surface.move_cursor(CursorMove::Up),
            KeyCode::Down => surface.move_cursor(CursorMove::Down),
            KeyCode::Home => surface.move_cursor(CursorMove::Home),
            KeyCode::End => surface.move_cursor(CursorMove::End),
            _ => {}
        }
        self.controller.note_input();
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if matches!(mouse.kind, MouseEventKind::Down(_)) && self.controller.typing().is_editing() {
            self.controller.note_input();
        }
    }

    /// New geometry is picked up by the next layout pass
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = Rect::new(0, 0, width, height);
        self.resize_surface();
    }

    fn resize_surface(&mut self) {
        let area = display_area(self.size, self.fullscreen);
        debug!(width = area.width, height = area.height, fullscreen = self.fullscreen, "Display area changed");
        self.controller.surface_mut().resize(extent(area));
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    /// Render the display into `frame`
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let surface = self.controller.surface();
        let layout = surface.layout();

        frame
            .buffer_mut()
            .set_style(area, theme::style(layout.text_colour(), layout.background()));

        let mut view = GlyphView::new(layout);
        if self.controller.typing().is_editing() {
            view = view.caret(surface.cursor());
        }
        frame.render_widget(view, display_area(area, self.fullscreen));
    }

    /// Display controller
    pub fn controller(&self) -> &Controller<TerminalSurface> {
        &self.controller
    }

    /// False once a quit key or a failure stopped the loop
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the window margin is off
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

fn display_area(size: Rect, fullscreen: bool) -> Rect {
    if fullscreen {
        size
    } else {
        size.inner(WINDOW_MARGIN)
    }
}

fn extent(area: Rect) -> Extent {
    Extent::new(u32::from(area.width), u32::from(area.height))
}
