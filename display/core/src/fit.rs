//! AutoFit Engine
//!
//! Finds the largest font size at which the content is fully visible.
//!
//! Visibility is treated as monotonically non-increasing in font size, so
//! the search is a hill-climb from the last size that was used: grow one
//! step at a time while the next size is still visible, or shrink one step
//! at a time until something fits. Ticks usually change the answer by a
//! step or two, which makes the linear walk cheaper than bisection.

use tracing::debug;

use crate::state::DisplayState;
use crate::surface::Surface;
use crate::visibility::visible;

/// Smallest font size the search will ever return
pub const MIN_FONT_SIZE: u16 = 1;

/// Default ceiling for growth
pub const DEFAULT_MAX_FONT_SIZE: u16 = 256;

/// Bounds for the search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitLimits {
    /// Growth stops here even if larger sizes would still be visible
    pub max_size: u16,
}

impl Default for FitLimits {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_FONT_SIZE,
        }
    }
}

impl FitLimits {
    /// Create limits with a growth ceiling
    #[must_use]
    pub fn new(max_size: u16) -> Self {
        Self {
            max_size: max_size.max(MIN_FONT_SIZE),
        }
    }
}

/// Hill-climb over `[MIN_FONT_SIZE, max_size]` starting at `start`
///
/// Returns the greatest size reachable from `start` for which `visible_at`
/// holds, or [`MIN_FONT_SIZE`] when nothing fits. Size 1 is terminal on the
/// way down regardless of its verdict.
pub fn climb(start: u16, max_size: u16, mut visible_at: impl FnMut(u16) -> bool) -> u16 {
    let ceiling = max_size.max(MIN_FONT_SIZE);
    let mut size = start.clamp(MIN_FONT_SIZE, ceiling);

    if visible_at(size) {
        while size < ceiling && visible_at(size + 1) {
            size += 1;
        }
    } else {
        while size > MIN_FONT_SIZE {
            size -= 1;
            if visible_at(size) {
                break;
            }
        }
    }

    size
}

/// Run the search against `surface` and store the result in `state`
///
/// The surface must hold the content to fit. Every candidate size is applied
/// and flushed before it is judged, and the chosen size is left applied.
///
/// Empty content is visible at every size, so a plain climb would always end
/// at `limits.max_size`. Instead the search is skipped and the current size
/// is kept (capped at the ceiling), so an empty typing buffer keeps a caret
/// the size of the text around it.
pub fn fit<S: Surface + ?Sized>(state: &mut DisplayState, surface: &mut S, limits: FitLimits) -> u16 {
    let font = state.font.clone();
    let wrap = state.wrap;
    let content = surface.text();

    if content.trim().is_empty() {
        let size = state.size().min(limits.max_size.max(MIN_FONT_SIZE));
        surface.apply_font(&font, size);
        surface.flush();
        state.font_size = size;
        return size;
    }

    let start = state.size();
    let mut evaluations = 0u32;
    let size = climb(start, limits.max_size, |candidate| {
        evaluations += 1;
        surface.apply_font(&font, candidate);
        surface.flush();
        visible(&*surface, &content, &font, candidate, wrap).is_visible()
    });

    surface.apply_font(&font, size);
    surface.flush();
    state.font_size = size;

    debug!(from = start, to = size, evaluations, wrap, "Auto-fit settled");
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontDescriptor, MonospaceMetrics};
    use crate::geometry::Extent;
    use crate::layout::LayoutSurface;
    use crate::surface::Surface;
    use proptest::prelude::*;

    #[test]
    fn test_climb_grows_to_threshold() {
        assert_eq!(climb(3, 100, |s| s <= 17), 17);
    }

    #[test]
    fn test_climb_shrinks_to_threshold() {
        assert_eq!(climb(40, 100, |s| s <= 17), 17);
    }

    #[test]
    fn test_climb_floor_is_terminal() {
        let mut seen = Vec::new();
        let size = climb(4, 100, |s| {
            seen.push(s);
            false
        });
        assert_eq!(size, 1);
        assert_eq!(seen, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_climb_ceiling_stops_growth() {
        assert_eq!(climb(5, 20, |_| true), 20);
    }

    #[test]
    fn test_climb_backs_off_exactly_one() {
        let mut seen = Vec::new();
        let size = climb(10, 100, |s| {
            seen.push(s);
            s <= 12
        });
        assert_eq!(size, 12);
        assert_eq!(seen, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_climb_clamps_start() {
        assert_eq!(climb(0, 100, |s| s <= 3), 3);
        assert_eq!(climb(500, 100, |s| s <= 3), 3);
    }

    fn surface_with(text: &str, area: Extent, wrap: bool) -> LayoutSurface<MonospaceMetrics> {
        let mut s = LayoutSurface::new(MonospaceMetrics::new(1, 1), area);
        s.set_wrap(wrap);
        s.set_text(text);
        s.flush();
        s
    }

    #[test]
    fn test_fit_nowrap_shrinks_to_widest_line() {
        // Area is 8 average glyphs wide at the starting size of 12
        let mut state = DisplayState {
            wrap: false,
            font_size: 12,
            ..Default::default()
        };
        let mut s = surface_with("short\naverylongline", Extent::new(96, 1000), false);

        let size = fit(&mut state, &mut s, FitLimits::default());

        // 13 glyphs * size <= 96
        assert_eq!(size, 7);
        assert_eq!(state.font_size, 7);
        assert_eq!(s.size(), 7);
    }

    #[test]
    fn test_fit_nowrap_floor_when_nothing_fits() {
        let mut state = DisplayState {
            wrap: false,
            font_size: 5,
            ..Default::default()
        };
        let mut s = surface_with("averylongline", Extent::new(4, 1000), false);
        assert_eq!(fit(&mut state, &mut s, FitLimits::default()), 1);
    }

    #[test]
    fn test_fit_wrap_single_line_limited_by_height() {
        let mut state = DisplayState {
            wrap: true,
            font_size: 1,
            ..Default::default()
        };
        // Wide enough that height is the binding constraint
        let mut s = surface_with("Hello", Extent::new(10_000, 30), true);
        assert_eq!(fit(&mut state, &mut s, FitLimits::default()), 30);
    }

    #[test]
    fn test_fit_empty_content_keeps_size() {
        let mut state = DisplayState {
            font_size: 9,
            ..Default::default()
        };
        let mut s = surface_with("", Extent::new(100, 100), false);
        assert_eq!(fit(&mut state, &mut s, FitLimits::default()), 9);

        // Still capped by the ceiling
        state.font_size = 200;
        let mut s = surface_with(" \n ", Extent::new(100, 100), true);
        assert_eq!(fit(&mut state, &mut s, FitLimits::new(50)), 50);
        assert_eq!(state.font_size, 50);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let run = || {
            let mut state = DisplayState {
                wrap: true,
                font_size: 12,
                ..Default::default()
            };
            let mut s = surface_with("the quick brown\nfox", Extent::new(80, 40), true);
            fit(&mut state, &mut s, FitLimits::default())
        };
        assert_eq!(run(), run());
    }

    fn line_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,8}", 1..5).prop_map(|words| words.join(" "))
    }

    fn content_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(line_strategy(), 1..4).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_visibility_is_monotonic(
            content in content_strategy(),
            width in 1u32..60,
            height in 1u32..60,
            advance in 1u32..3,
            line in 1u32..3,
            wrap in any::<bool>(),
        ) {
            let mut s = LayoutSurface::new(MonospaceMetrics::new(advance, line), Extent::new(width, height));
            s.set_wrap(wrap);
            s.set_text(&content);
            let font = FontDescriptor::default();

            let mut seen_invisible = false;
            for size in 1..=20u16 {
                s.apply_font(&font, size);
                s.flush();
                let v = visible(&s, &content, &font, size, wrap).is_visible();
                prop_assert!(!(seen_invisible && v), "visible again at size {}", size);
                seen_invisible |= !v;
            }
        }

        #[test]
        fn prop_climb_finds_maximal_visible_size(
            threshold in 0u16..300,
            start in 0u16..300,
            ceiling in 1u16..300,
        ) {
            let size = climb(start, ceiling, |s| s <= threshold);
            let expected = threshold.clamp(MIN_FONT_SIZE, ceiling);
            prop_assert_eq!(size, expected);
        }

        #[test]
        fn prop_fit_result_is_maximal(
            content in content_strategy(),
            width in 1u32..80,
            height in 1u32..80,
            start in 1u16..30,
            wrap in any::<bool>(),
        ) {
            let mut state = DisplayState { wrap, font_size: start, ..Default::default() };
            let mut s = surface_with(&content, Extent::new(width, height), wrap);
            let size = fit(&mut state, &mut s, FitLimits::new(64));
            let font = state.font.clone();

            let mut judge = |candidate: u16| {
                s.apply_font(&font, candidate);
                s.flush();
                visible(&s, &content, &font, candidate, wrap).is_visible()
            };

            if size > 1 {
                prop_assert!(judge(size));
            }
            if size < 64 {
                prop_assert!(!judge(size + 1));
            }
        }
    }
}
