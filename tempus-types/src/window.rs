use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Upper boundary of a [`TimeWindow`].
///
/// A probe is marked by its tag, never by a special float value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEnd {
    /// Exclusive finite end.
    At(f64),
    /// No known end (`+∞`).
    Unbounded,
    /// Not a boundary at all: the window is a search key for a single date.
    Probe,
}

impl WindowEnd {
    /// Numeric view of the boundary: `+∞` when unbounded and NaN for probes.
    pub fn as_f64(self) -> f64 {
        match self {
            WindowEnd::At(end) => end,
            WindowEnd::Unbounded => f64::INFINITY,
            WindowEnd::Probe => f64::NAN,
        }
    }
}

/// A half-open interval `[start, end)` over the timestamp domain.
///
/// Besides closed and unbounded windows there is a third form, the probe,
/// which wraps a single date. Probes are never stored; they only exist to be
/// compared against stored windows.
///
/// # Ordering
///
/// Two stored windows order by `start`. A probe compares `Equal` to the stored
/// window containing its date, `Less` when the date precedes the window and
/// `Greater` when the date is at or past its end. As long as the stored
/// windows do not overlap, this lets a `BTreeMap<TimeWindow, _>` answer
/// containment queries with `get`, and floor/ceiling queries with `range`.
///
/// # Examples
///
/// ```
/// use tempus_types::window::TimeWindow;
///
/// let window = TimeWindow::closed(10.0, 20.0);
/// assert!(window.contains(10.0));
/// assert!(!window.contains(20.0));
///
/// let probe = TimeWindow::probe(15.0);
/// assert_eq!(probe.cmp(&window), std::cmp::Ordering::Equal);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: WindowEnd,
}

impl TimeWindow {
    /// Search key for `date`. Never inserted into a timeline.
    pub fn probe(date: f64) -> Self {
        Self {
            start: date,
            end: WindowEnd::Probe,
        }
    }

    /// Window starting at `start` with no known end.
    pub fn unbounded(start: f64) -> Self {
        Self {
            start,
            end: WindowEnd::Unbounded,
        }
    }

    /// Window `[start, end)`.
    ///
    /// An infinite `end` yields an unbounded window. `end` must not precede
    /// `start`; use [`TimeWindow::is_well_formed`] to check untrusted input.
    pub fn closed(start: f64, end: f64) -> Self {
        debug_assert!(
            end >= start || end.is_nan() || start.is_nan(),
            "window end {} precedes start {}",
            end,
            start
        );

        if end == f64::INFINITY {
            return Self::unbounded(start);
        }

        Self {
            start,
            end: WindowEnd::At(end),
        }
    }

    /// Inclusive start date.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Exclusive end date: `+∞` for unbounded windows, NaN for probes.
    pub fn end(&self) -> f64 {
        self.end.as_f64()
    }

    pub fn end_bound(&self) -> WindowEnd {
        self.end
    }

    /// True iff the end is finite.
    pub fn is_ended(&self) -> bool {
        matches!(self.end, WindowEnd::At(_))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.end, WindowEnd::Unbounded)
    }

    pub fn is_probe(&self) -> bool {
        matches!(self.end, WindowEnd::Probe)
    }

    /// True for a storable window with non-NaN bounds and `start <= end`.
    pub fn is_well_formed(&self) -> bool {
        match self.end {
            WindowEnd::At(end) => !self.start.is_nan() && !end.is_nan() && self.start <= end,
            WindowEnd::Unbounded => !self.start.is_nan(),
            WindowEnd::Probe => false,
        }
    }

    /// Copy of this window with a different start.
    pub fn with_start(&self, start: f64) -> Self {
        Self { start, ..*self }
    }

    /// Copy of this window with a different end. An infinite `end` reopens it.
    pub fn with_end(&self, end: f64) -> Self {
        Self::closed(self.start, end)
    }

    /// `date >= start` and, for an ended window, `date < end`.
    pub fn contains(&self, date: f64) -> bool {
        if date < self.start || date.is_nan() {
            return false;
        }

        match self.end {
            WindowEnd::At(end) => date < end,
            WindowEnd::Unbounded => true,
            WindowEnd::Probe => false,
        }
    }

    /// True iff `other` lies entirely within this window.
    pub fn contains_window(&self, other: &TimeWindow) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// True iff the two half-open ranges share at least one date.
    ///
    /// A probe overlaps a window exactly when that window contains its date.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        match (self.end, other.end) {
            (WindowEnd::Probe, _) => other.contains(self.start),
            (_, WindowEnd::Probe) => self.contains(other.start),
            (WindowEnd::Unbounded, WindowEnd::Unbounded) => true,
            (WindowEnd::Unbounded, WindowEnd::At(end)) => end > self.start,
            (WindowEnd::At(end), WindowEnd::Unbounded) => end > other.start,
            (WindowEnd::At(a_end), WindowEnd::At(b_end)) => {
                self.start < b_end && other.start < a_end
            }
        }
    }

    fn locate(date: f64, window: &TimeWindow) -> Ordering {
        if window.contains(date) {
            Ordering::Equal
        } else if date < window.start {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialEq for TimeWindow {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for TimeWindow {}

impl PartialOrd for TimeWindow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeWindow {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_probe(), other.is_probe()) {
            (true, false) => Self::locate(self.start, other),
            (false, true) => Self::locate(other.start, self).reverse(),
            _ => self.start.total_cmp(&other.start),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            WindowEnd::At(end) => write!(f, "[{};{}[", self.start, end),
            WindowEnd::Unbounded => write!(f, "[{};-[", self.start),
            WindowEnd::Probe => write!(f, "[{};?[", self.start),
        }
    }
}
