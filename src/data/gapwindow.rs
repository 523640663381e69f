// src/data/gapwindow.rs

//! Implement [`GapWindow`], a sliding window of the most recent gaps between
//! log messages, and the classification of a new gap as normal or
//! aberrant.
//!
//! The window holds at most `W` gaps. The arithmetic mean and the
//! _population_ standard deviation (divisor `W`, not `W - 1`) of the window
//! define the band `[mean - k·σ, mean + k·σ]`. A new gap strictly outside
//! the band is aberrant.
//!
//! A new gap is classified against the window contents _before_ that gap is
//! pushed. Then the oldest gap is evicted (if the window is full), then the
//! new gap is appended.

use crate::common::{Count, Gap, WindowSz};

use std::collections::VecDeque;
use std::fmt;

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Why a gap was not given a normal or aberrant verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotEvaluated {
    /// The first log message has no prior datetime.
    FirstRecord,
    /// The window does not yet hold `W` gaps.
    WarmingUp,
    /// The gap is less than the user-passed minimum.
    BelowMinimum,
    /// The gap is more than the user-passed maximum.
    AboveMaximum,
}

/// Classification of a gap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GapVerdict {
    NotEvaluated(NotEvaluated),
    /// within `[mean - k·σ, mean + k·σ]`
    Normal,
    /// outside `[mean - k·σ, mean + k·σ]`
    Aberrant,
}

impl GapVerdict {
    #[inline(always)]
    pub const fn is_aberrant(&self) -> bool {
        matches!(*self, GapVerdict::Aberrant)
    }

    #[inline(always)]
    pub const fn is_evaluated(&self) -> bool {
        !matches!(*self, GapVerdict::NotEvaluated(_))
    }
}

impl fmt::Display for GapVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapVerdict::NotEvaluated(reason) => write!(f, "not evaluated ({:?})", reason),
            GapVerdict::Normal => write!(f, "normal"),
            GapVerdict::Aberrant => write!(f, "aberrant"),
        }
    }
}

/// Hard limits on which gaps are classified; gaps outside the limits are
/// not classified (but are still pushed into the window).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GapBounds {
    pub minimum: Option<Gap>,
    pub maximum: Option<Gap>,
}

impl GapBounds {
    /// Is `gap` outside the bounds?
    pub fn excludes(&self, gap: Gap) -> Option<NotEvaluated> {
        match (self.minimum, self.maximum) {
            (Some(minimum), _) if gap < minimum => Some(NotEvaluated::BelowMinimum),
            (_, Some(maximum)) if gap > maximum => Some(NotEvaluated::AboveMaximum),
            _ => None,
        }
    }
}

/// A bounded first-in first-out window of the `W` most recent gaps.
///
/// Running sums are kept in `i128` so the mean and standard deviation are
/// computed from exact integer sums.
pub struct GapWindow {
    gaps: VecDeque<Gap>,
    capacity: WindowSz,
    /// sum of `gaps`
    sum: i128,
    /// sum of the squares of `gaps`
    sum_sq: i128,
    /// count of all gaps ever pushed
    pushed: Count,
    /// has the window ever held `capacity` gaps?
    filled: bool,
}

impl fmt::Debug for GapWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GapWindow")
            .field("gaps", &self.gaps)
            .field("capacity", &self.capacity)
            .field("pushed", &self.pushed)
            .field("filled", &self.filled)
            .finish()
    }
}

impl GapWindow {
    /// Create a new `GapWindow` holding at most `capacity` gaps.
    ///
    /// Returns `None` if `capacity` is zero.
    pub fn new(capacity: WindowSz) -> Option<GapWindow> {
        defñ!("({})", capacity);
        if capacity == 0 {
            return None;
        }

        Some(GapWindow {
            gaps: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0,
            sum_sq: 0,
            pushed: 0,
            filled: false,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> WindowSz {
        self.capacity
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Does the window hold exactly `capacity` gaps?
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.gaps.len() == self.capacity
    }

    /// Has the window ever been full?
    #[inline(always)]
    pub fn has_filled(&self) -> bool {
        self.filled
    }

    /// Count of all gaps ever pushed.
    #[inline(always)]
    pub fn pushed(&self) -> Count {
        self.pushed
    }

    /// The gaps in the window, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Gap> {
        self.gaps.iter()
    }

    /// Arithmetic mean of the gaps in the window. `0.0` if empty.
    pub fn mean(&self) -> f64 {
        if self.gaps.is_empty() {
            return 0.0;
        }

        self.sum as f64 / self.gaps.len() as f64
    }

    /// Population standard deviation of the gaps in the window. `0.0` if
    /// empty.
    pub fn stddev(&self) -> f64 {
        if self.gaps.is_empty() {
            return 0.0;
        }
        let n = self.gaps.len() as i128;
        // n²·variance = n·Σx² - (Σx)²
        let n2_variance = n * self.sum_sq - self.sum * self.sum;
        debug_assert!(n2_variance >= 0, "negative variance {} for {:?}", n2_variance, self);

        (n2_variance.max(0) as f64 / (n * n) as f64).sqrt()
    }

    /// The band `(mean - k·σ, mean + k·σ)` of normal gaps.
    pub fn band(&self, within: f64) -> (f64, f64) {
        let mean = self.mean();
        let width = within * self.stddev();

        (mean - width, mean + width)
    }

    /// Classify `gap` against the current contents of the window.
    ///
    /// Classification only occurs when the window is full and `gap` is not
    /// excluded by `bounds`. `gap` is aberrant if it is strictly outside
    /// the band `[mean - within·σ, mean + within·σ]`.
    pub fn classify(
        &self,
        gap: Gap,
        within: f64,
        bounds: &GapBounds,
    ) -> GapVerdict {
        defn!("(gap {}, within {}, bounds {:?})", gap, within, bounds);
        if !self.is_full() {
            defx!("WarmingUp; len {} < capacity {}", self.len(), self.capacity);
            return GapVerdict::NotEvaluated(NotEvaluated::WarmingUp);
        }
        if let Some(reason) = bounds.excludes(gap) {
            defx!("{:?}", reason);
            return GapVerdict::NotEvaluated(reason);
        }
        let (low, high) = self.band(within);
        let gap_f = gap as f64;
        let verdict = if gap_f < low || gap_f > high {
            GapVerdict::Aberrant
        } else {
            GapVerdict::Normal
        };
        defx!("band [{}, {}]; return {:?}", low, high, verdict);

        verdict
    }

    /// Append `gap`, first evicting the oldest gap if the window is full.
    pub fn push(&mut self, gap: Gap) {
        defn!("({})", gap);
        if self.is_full() {
            if let Some(oldest) = self.gaps.pop_front() {
                defo!("evict {}", oldest);
                self.sum -= oldest as i128;
                self.sum_sq -= (oldest as i128) * (oldest as i128);
            }
        }
        self.gaps.push_back(gap);
        self.sum += gap as i128;
        self.sum_sq += (gap as i128) * (gap as i128);
        self.pushed += 1;
        if self.is_full() {
            self.filled = true;
        }
        debug_assert_le!(self.gaps.len(), self.capacity, "GapWindow overfilled");
        defx!("len {}, sum {}, sum_sq {}", self.gaps.len(), self.sum, self.sum_sq);
    }
}
