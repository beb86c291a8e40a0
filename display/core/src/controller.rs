//! Display Controller
//!
//! Owns the [`DisplayState`], the [`Surface`], the [`TickSchedule`] and the
//! [`TypingMode`], and runs the tick cycle:
//!
//! ```text
//!   Scheduled ──timer──▶ Running ──complete_tick──▶ Scheduled
//!                           │                          (or Idle when single-shot)
//!                           └── poll ─ merge ─ reset buffer ─ scroll ─ fit
//!                               ─ centre ─ colour ─ flush ─ re-arm
//! ```
//!
//! Typing mode parks the controller in `Suspended`: nothing is ever armed
//! and only an explicit [`Controller::refresh`] re-runs the layout pass.
//!
//! The poll itself can happen inline ([`Controller::run_tick`]) or on a
//! [`PollWorker`](crate::poller::PollWorker): call
//! [`Controller::begin_tick`] when the timer fires, hand the worker's result
//! to [`Controller::complete_tick`].

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::fit::{fit, FitLimits};
use crate::schedule::TickSchedule;
use crate::source::{Poll, Source, SourceError};
use crate::state::DisplayState;
use crate::surface::Surface;
use crate::typing::TypingMode;

/// Where the tick cycle currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// A tick is armed
    Scheduled,
    /// A tick started and has not completed
    Running,
    /// Typing mode; polling is off for good
    Suspended,
    /// Nothing armed (single-shot display, or the loop stopped on an error)
    Idle,
}

/// Construction options
#[derive(Clone, Copy, Debug, Default)]
pub struct ControllerOptions {
    /// Start in typing mode
    pub typing: bool,
    /// Bounds for the auto-fit search
    pub limits: FitLimits,
}

/// What one layout pass did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutReport {
    /// Font size in effect after the pass
    pub font_size: u16,
    /// Blank lines inserted above the content
    pub padding: usize,
}

/// What one tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Whether the poll replaced the content snapshot
    pub replaced: bool,
    /// Result of the layout pass
    pub layout: LayoutReport,
    /// Delay the next tick was armed with, if any
    pub next: Option<Duration>,
}

/// The explicit display instance
pub struct Controller<S: Surface> {
    state: DisplayState,
    surface: S,
    schedule: TickSchedule,
    typing: TypingMode,
    limits: FitLimits,
    running: bool,
    ticks: u64,
}

impl<S: Surface> Controller<S> {
    /// Create a controller and prepare the surface
    ///
    /// In normal mode the first tick is armed after `state.delay` (or
    /// immediately for a single-shot display) and text is drawn in the
    /// background colour until that tick renders. Typing mode forces wrap
    /// and auto-size on and arms nothing.
    pub fn new(mut state: DisplayState, mut surface: S, options: ControllerOptions) -> Self {
        let typing = TypingMode::new(options.typing);
        if typing.is_editing() {
            state.wrap = true;
            state.auto_size = true;
        }

        surface.apply_font(&state.font, state.size());
        surface.set_wrap(state.wrap);
        surface.set_align(state.align);
        surface.set_text(state.content.text());

        let mut schedule = TickSchedule::new();
        if typing.is_editing() {
            surface.set_colours(state.text_colour, state.background_colour);
            surface.set_caret_colour(state.text_colour);
        } else {
            surface.set_colours(state.background_colour, state.background_colour);
            surface.set_caret_colour(state.background_colour);
            schedule.arm(state.delay.unwrap_or(Duration::ZERO));
        }
        surface.flush();

        info!(
            typing = typing.is_editing(),
            wrap = state.wrap,
            auto_size = state.auto_size,
            font = %state.font,
            "Display controller ready"
        );

        Self {
            state,
            surface,
            schedule,
            typing,
            limits: options.limits,
            running: false,
            ticks: 0,
        }
    }

    /// Current phase of the tick cycle
    #[must_use]
    pub fn phase(&self) -> SchedulerPhase {
        if self.typing.is_editing() {
            SchedulerPhase::Suspended
        } else if self.running {
            SchedulerPhase::Running
        } else if self.schedule.is_armed() {
            SchedulerPhase::Scheduled
        } else {
            SchedulerPhase::Idle
        }
    }

    /// Display state
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// The surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, mutably (area changes, typing edits)
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The tick timer
    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    /// Typing-mode state
    pub fn typing(&self) -> TypingMode {
        self.typing
    }

    /// Completed ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The armed timer fired: enter `Running`
    ///
    /// Returns `false` (and does nothing) unless a tick was scheduled.
    pub fn begin_tick(&mut self) -> bool {
        if self.phase() != SchedulerPhase::Scheduled {
            return false;
        }
        self.schedule.disarm();
        self.running = true;
        trace!(tick = self.ticks + 1, "Tick started");
        true
    }

    /// Finish the running tick with the poll result
    ///
    /// `None` stands for a poll that produced nothing (timed out): the
    /// previous content is laid out again. Returns `None` if no tick was
    /// running.
    pub fn complete_tick(&mut self, poll: Option<Poll>) -> Option<TickReport> {
        if !self.running {
            debug!("complete_tick without a running tick; ignored");
            return None;
        }

        let replaced = match &poll {
            Some(poll) => self.state.merge(poll),
            None => false,
        };

        let text = self.state.content.text().to_string();
        let layout = self.layout(&text);

        self.running = false;
        self.ticks += 1;
        let next = self.state.delay.filter(|d| !d.is_zero());
        if let Some(delay) = next {
            self.schedule.arm(delay);
        }

        debug!(
            tick = self.ticks,
            replaced,
            font_size = layout.font_size,
            padding = layout.padding,
            next_ms = next.map(|d| d.as_millis() as u64),
            "Tick complete"
        );

        Some(TickReport {
            replaced,
            layout,
            next,
        })
    }

    /// Abandon the running tick after a source failure
    ///
    /// Nothing is re-armed: the loop stops and the phase becomes `Idle`.
    pub fn abort_tick(&mut self, error: &SourceError) {
        if self.running {
            warn!(error = %error, tick = self.ticks + 1, "Tick aborted by source failure");
        }
        self.running = false;
        self.schedule.disarm();
    }

    /// Poll `source` inline and complete the tick
    ///
    /// Starts a tick if one is scheduled (without waiting for its deadline).
    /// Returns `Ok(None)` when no tick was due. Source errors stop the loop
    /// and are returned unchanged.
    pub async fn run_tick<Src>(&mut self, source: &mut Src) -> Result<Option<TickReport>, SourceError>
    where
        Src: Source + ?Sized,
    {
        if !self.begin_tick() {
            return Ok(None);
        }
        match source.poll().await {
            Ok(poll) => Ok(self.complete_tick(Some(poll))),
            Err(e) => {
                self.abort_tick(&e);
                Err(e)
            }
        }
    }

    /// Re-fit the edited buffer in typing mode
    ///
    /// Hides the caret and runs the layout pass on the typed text (leading
    /// centring lines from a previous refresh are dropped first). No poll
    /// happens and nothing is armed. Returns `None` outside typing mode.
    pub fn refresh(&mut self) -> Option<LayoutReport> {
        if !self.typing.on_refresh() {
            return None;
        }

        let typed = self.surface.text();
        let text = typed.trim_start_matches('\n').to_string();
        self.surface.set_caret_colour(self.state.background_colour);
        let report = self.layout(&text);

        debug!(font_size = report.font_size, padding = report.padding, "Typing refresh");
        Some(report)
    }

    /// A key or pointer event arrived in typing mode
    ///
    /// Restores the caret colour if a refresh hid it.
    pub fn note_input(&mut self) {
        if self.typing.on_input() {
            self.surface.set_caret_colour(self.state.text_colour);
            self.surface.flush();
        }
    }

    /// Reset the buffer to `text`, fit, centre, colour and flush
    fn layout(&mut self, text: &str) -> LayoutReport {
        let state = &mut self.state;
        let surface = &mut self.surface;

        surface.apply_font(&state.font, state.size());
        surface.set_wrap(state.wrap);
        surface.set_align(state.align);
        surface.set_text(text);
        surface.flush();

        if state.wrap {
            surface.scroll_to_top();
        }
        if state.auto_size {
            fit(state, surface, self.limits);
        }

        surface.flush();
        let padding = centring_padding(surface, state);
        if padding > 0 {
            surface.prepend_blank_lines(padding);
        }

        surface.set_colours(state.text_colour, state.background_colour);
        surface.flush();

        LayoutReport {
            font_size: state.size(),
            padding,
        }
    }
}

/// Blank lines needed to centre the content vertically
///
/// Only computed when the end of the content is fully visible; partially
/// clipped content is left alone.
fn centring_padding<S: Surface + ?Sized>(surface: &S, state: &DisplayState) -> usize {
    let line_height = surface.metrics().line_height(&state.font, state.size());
    if line_height == 0 {
        return 0;
    }
    let Some(end) = surface.end_bbox() else {
        return 0;
    };
    if end.height < line_height {
        return 0;
    }

    let space = i64::from(surface.area().height) - end.bottom();
    if space <= 0 {
        return 0;
    }
    usize::try_from(space / i64::from(line_height) / 2).unwrap_or(0)
}
