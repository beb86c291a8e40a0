//! Integration tests for the tick cycle
//!
//! These drive a [`Controller`] over the in-memory [`LayoutSurface`] the way
//! the terminal front end does: timer fires, source is polled (inline or on
//! the background worker), the layout pass runs, the next tick is armed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::Instant;

use display_core::{
    Align, Colour, Controller, ControllerOptions, DisplayState, Extent, FitLimits, FnSource,
    LayoutSurface, MonospaceMetrics, Poll, PollOutcome, PollWorker, SchedulerPhase, Source,
    SourceError, StyleOverride, Surface,
};

type TestSurface = LayoutSurface<MonospaceMetrics>;

fn surface(width: u32, height: u32) -> TestSurface {
    LayoutSurface::new(MonospaceMetrics::new(1, 1), Extent::new(width, height))
}

fn controller(state: DisplayState, width: u32, height: u32) -> Controller<TestSurface> {
    Controller::new(state, surface(width, height), ControllerOptions::default())
}

/// Source that replays a script, then repeats its last entry
fn scripted(polls: Vec<Poll>) -> impl Source {
    let mut index = 0;
    FnSource::new("script", move || {
        let poll = polls
            .get(index)
            .or_else(|| polls.last())
            .cloned()
            .unwrap_or_default();
        index += 1;
        Ok(poll)
    })
}

/// Source that counts how often it was polled
fn counting(counter: Arc<AtomicUsize>) -> impl Source {
    FnSource::new("counter", move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Poll::text(format!("poll {n}")))
    })
}

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn test_identical_polls_render_identical_buffers() {
    let state = DisplayState {
        wrap: true,
        align: Align::Center,
        ..Default::default()
    };
    let mut c = controller(state, 40, 30);
    let mut source = scripted(vec![Poll::text("the same\ntext every time")]);

    c.run_tick(&mut source).await.unwrap();
    let first = (
        c.surface().text(),
        c.surface().size(),
        c.surface().text_colour(),
        c.surface().background(),
    );

    c.run_tick(&mut source).await.unwrap();
    let second = (
        c.surface().text(),
        c.surface().size(),
        c.surface().text_colour(),
        c.surface().background(),
    );

    assert_eq!(first, second);
}

// =============================================================================
// Override stickiness
// =============================================================================

#[tokio::test]
async fn test_override_persists_for_following_ticks() {
    let state = DisplayState {
        wrap: true,
        ..Default::default()
    };
    let mut c = controller(state, 80, 20);
    let mut source = scripted(vec![
        Poll::with_style(
            "one",
            StyleOverride::new()
                .with_wrap(false)
                .with_colour(Colour::rgb(0, 255, 255)),
        ),
        Poll::text("two"),
        Poll::text("three"),
        Poll::text("four"),
    ]);

    for expected in ["one", "two", "three", "four"] {
        c.run_tick(&mut source).await.unwrap();
        assert_eq!(c.state().content.text(), expected);
        assert!(!c.state().wrap);
        assert!(!c.surface().wrap());
        assert_eq!(c.surface().text_colour(), Colour::rgb(0, 255, 255));
    }
}

// =============================================================================
// Empty-poll guard
// =============================================================================

#[tokio::test]
async fn test_blank_polls_keep_previous_snapshot() {
    let mut c = controller(DisplayState::default(), 80, 20);
    let mut source = scripted(vec![
        Poll::text("  last good value \n"),
        Poll::text(""),
        Poll::text(" \t\n "),
    ]);

    for _ in 0..3 {
        c.run_tick(&mut source).await.unwrap();
        assert_eq!(c.state().content.text(), "last good value");
    }
}

// =============================================================================
// Typing-mode suspension
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_mode_never_polls() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut source = counting(counter.clone());
    let mut c = Controller::new(
        DisplayState::default(),
        surface(40, 20),
        ControllerOptions {
            typing: true,
            ..Default::default()
        },
    );

    assert_eq!(c.phase(), SchedulerPhase::Suspended);
    assert_eq!(c.run_tick(&mut source).await.unwrap(), None);

    // Nothing is armed, so waiting on the schedule never completes
    let waited = tokio::time::timeout(Duration::from_secs(3600), c.schedule().wait()).await;
    assert!(waited.is_err());

    // A refresh runs exactly one layout pass and still does not poll
    let text = "typed by hand";
    c.surface_mut().set_text(text);
    assert!(c.refresh().is_some());
    assert_eq!(c.surface().text().trim_start_matches('\n'), text);

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(c.phase(), SchedulerPhase::Suspended);
}

// =============================================================================
// End-to-end examples
// =============================================================================

#[tokio::test]
async fn test_single_line_is_centred_vertically() {
    // Area is 10 line heights tall at the chosen size
    let state = DisplayState {
        wrap: true,
        auto_size: false,
        font_size: 2,
        ..Default::default()
    };
    let mut c = controller(state, 1000, 20);
    let mut source = scripted(vec![Poll::text("Hello")]);

    let report = c.run_tick(&mut source).await.unwrap().unwrap();

    assert_eq!(report.layout.padding, 4);
    assert_eq!(c.surface().text(), "\n\n\n\nHello");
}

#[tokio::test]
async fn test_nowrap_fit_shrinks_to_widest_line() {
    // 96 units is 8 average characters at the starting size of 12
    let state = DisplayState {
        wrap: false,
        font_size: 12,
        ..Default::default()
    };
    let mut c = controller(state, 96, 1000);
    let mut source = scripted(vec![Poll::text("short\naverylongline")]);

    let report = c.run_tick(&mut source).await.unwrap().unwrap();

    assert_eq!(report.layout.font_size, 7);
    assert_eq!(c.state().font_size, 7);
}

#[tokio::test]
async fn test_fit_ceiling_bounds_growth() {
    let mut c = Controller::new(
        DisplayState::default(),
        surface(10_000, 10_000),
        ControllerOptions {
            typing: false,
            limits: FitLimits::new(40),
        },
    );
    let mut source = scripted(vec![Poll::text("x")]);

    let report = c.run_tick(&mut source).await.unwrap().unwrap();
    assert_eq!(report.layout.font_size, 40);
}

// =============================================================================
// Scheduling through the background worker
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_scheduler_rearms_after_each_tick() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut worker = PollWorker::spawn(counting(counter.clone()), None);
    let state = DisplayState {
        delay: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    let mut c = controller(state, 80, 20);
    let start = Instant::now();

    for n in 1..=3 {
        c.schedule().wait().await;
        assert!(c.begin_tick());
        assert!(worker.request());
        assert_eq!(c.phase(), SchedulerPhase::Running);

        match worker.next().await {
            Some(PollOutcome::Ready(poll)) => {
                c.complete_tick(Some(poll));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(c.state().content.text(), format!("poll {n}"));
        assert_eq!(c.phase(), SchedulerPhase::Scheduled);
    }

    assert_eq!(Instant::now() - start, Duration::from_millis(300));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_poll_keeps_content_and_rearms() {
    struct SlowAfterFirst {
        calls: usize,
    }

    #[async_trait::async_trait]
    impl Source for SlowAfterFirst {
        async fn poll(&mut self) -> Result<Poll, SourceError> {
            self.calls += 1;
            if self.calls > 1 {
                std::future::pending::<()>().await;
            }
            Ok(Poll::text("first"))
        }
    }

    let mut worker = PollWorker::spawn(SlowAfterFirst { calls: 0 }, Some(Duration::from_secs(1)));
    let mut c = controller(DisplayState::default(), 80, 20);

    for _ in 0..2 {
        c.schedule().wait().await;
        c.begin_tick();
        match worker.poll_once().await {
            Some(PollOutcome::Ready(poll)) => c.complete_tick(Some(poll)),
            Some(PollOutcome::TimedOut) => c.complete_tick(None),
            other => panic!("unexpected outcome: {other:?}"),
        };
    }

    assert_eq!(c.state().content.text(), "first");
    assert_eq!(c.phase(), SchedulerPhase::Scheduled);
}

#[tokio::test]
async fn test_source_error_stops_the_loop() {
    let mut c = controller(DisplayState::default(), 80, 20);
    let mut source = FnSource::new("broken", || {
        Err(SourceError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        )))
    });

    let err = c.run_tick(&mut source).await.unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
    assert_eq!(c.phase(), SchedulerPhase::Idle);
    assert!(!c.schedule().is_armed());
}
