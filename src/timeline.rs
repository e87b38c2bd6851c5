//! Ordered, non-overlapping time windows with one value each.
//!
//! Windows are kept in a `BTreeMap` keyed by [`TimeWindow`]. Because a probe
//! compares equal to the stored window enclosing its date, the map's own
//! lookup and range primitives answer "which window covers `t`" in O(log n).

use crate::error::{Result, TempusError};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound::{Excluded, Included, Unbounded};
use tempus_types::window::TimeWindow;

/// A value stream over time.
///
/// Invariants maintained by the sequencing operations:
/// - stored windows never overlap;
/// - at most one window is unbounded and it is the one starting last.
///
/// [`Timeline::insert`] and the boundary setters trust the caller to keep
/// these invariants; [`Timeline::try_insert`] checks them.
///
/// # Examples
///
/// ```rust
/// use tempus::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.start_open(1.0, "draft")?;
/// timeline.start_open(5.0, "published")?;
///
/// assert_eq!(timeline.value_at(0.0), None);
/// assert_eq!(timeline.value_at(3.0), Some(&"draft"));
/// assert_eq!(timeline.value_at(5.0), Some(&"published"));
/// # Ok::<(), tempus::TempusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    mapping: BTreeMap<TimeWindow, T>,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            mapping: BTreeMap::new(),
        }
    }

    /// Number of stored windows.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Drop every window.
    pub fn clear(&mut self) {
        self.mapping.clear();
    }

    /// Windows and their values in ascending start order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.mapping.iter(),
        }
    }

    pub fn windows(&self) -> impl DoubleEndedIterator<Item = TimeWindow> + '_ {
        self.mapping.keys().copied()
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.mapping.values()
    }

    /// Value of the window containing `date`.
    pub fn value_at(&self, date: f64) -> Option<&T> {
        self.mapping.get(&TimeWindow::probe(date))
    }

    pub fn value_at_mut(&mut self, date: f64) -> Option<&mut T> {
        self.mapping.get_mut(&TimeWindow::probe(date))
    }

    /// Value stored under `window`.
    ///
    /// A stored window matches the entry with the same start; a probe matches
    /// the entry containing its date.
    pub fn value_at_window(&self, window: &TimeWindow) -> Option<&T> {
        self.mapping.get(window)
    }

    /// True if some window contains `date`.
    pub fn exists_at(&self, date: f64) -> bool {
        self.mapping.contains_key(&TimeWindow::probe(date))
    }

    /// The window containing `date`.
    pub fn window_at(&self, date: f64) -> Option<TimeWindow> {
        self.mapping
            .get_key_value(&TimeWindow::probe(date))
            .map(|(window, _)| *window)
    }

    /// The window containing `date`, or else the last window ending at or
    /// before it.
    pub fn floor(&self, date: f64) -> Option<TimeWindow> {
        self.mapping
            .range((Unbounded, Included(TimeWindow::probe(date))))
            .next_back()
            .map(|(window, _)| *window)
    }

    /// The window containing `date`, or else the first window starting after it.
    pub fn ceiling(&self, date: f64) -> Option<TimeWindow> {
        self.mapping
            .range((Included(TimeWindow::probe(date)), Unbounded))
            .next()
            .map(|(window, _)| *window)
    }

    /// First window whose start is strictly after `date`.
    pub fn next_after(&self, date: f64) -> Option<TimeWindow> {
        self.windows_after(date).next()
    }

    /// Windows starting strictly after `date`, oldest first.
    pub fn windows_after(&self, date: f64) -> impl DoubleEndedIterator<Item = TimeWindow> + '_ {
        self.mapping
            .range((Excluded(TimeWindow::probe(date)), Unbounded))
            .map(|(window, _)| *window)
    }

    pub fn first(&self) -> Option<(TimeWindow, &T)> {
        self.mapping
            .first_key_value()
            .map(|(window, value)| (*window, value))
    }

    pub fn last(&self) -> Option<(TimeWindow, &T)> {
        self.mapping
            .last_key_value()
            .map(|(window, value)| (*window, value))
    }

    /// Insert the closed window `[start, end)`.
    ///
    /// The window must not overlap any stored window; this is not checked.
    /// An existing window with the same start is replaced.
    pub fn insert(&mut self, start: f64, end: f64, value: T) -> TimeWindow {
        let window = TimeWindow::closed(start, end);
        self.put(window, value);
        window
    }

    /// Checked form of [`Timeline::insert`].
    pub fn try_insert(&mut self, start: f64, end: f64, value: T) -> Result<TimeWindow> {
        if start.is_nan() || start == f64::INFINITY || end.is_nan() || end < start {
            return Err(TempusError::InvalidTimeWindow(format!(
                "cannot insert window with start {} and end {}",
                start, end
            )));
        }

        let overlapping = self
            .window_at(start)
            .or_else(|| self.next_after(start).filter(|next| next.start() < end));

        if let Some(existing) = overlapping {
            return Err(TempusError::InvalidTimeWindow(format!(
                "window [{};{}[ overlaps stored window {}",
                start, end, existing
            )));
        }

        Ok(self.insert(start, end, value))
    }

    /// Open a new unbounded window at `start`.
    ///
    /// An open last window is closed at `start` first. If the last window is
    /// already closed, `start` must not precede its end.
    pub fn start_open(&mut self, start: f64, value: T) -> Result<TimeWindow> {
        if start.is_nan() || start == f64::INFINITY {
            return Err(TempusError::InvalidTimeWindow(format!(
                "cannot start a time window at {}",
                start
            )));
        }

        if let Some(last) = self.last_window() {
            if start < last.start() {
                return Err(TempusError::InvalidTimeWindow(format!(
                    "new time window at {} starts before the last window {}",
                    start, last
                )));
            }

            if !last.is_ended() {
                if start == last.start() {
                    // Reopening at the same date replaces the current window.
                    self.mapping.remove(&last);
                } else {
                    self.end_open(start)?;
                }
            } else if start < last.end() {
                return Err(TempusError::InvalidTimeWindow(format!(
                    "new time window at {} starts before the end of the last window {}",
                    start, last
                )));
            }
        }

        let window = TimeWindow::unbounded(start);
        self.put(window, value);
        Ok(window)
    }

    /// Close the last window at `end`.
    pub fn end_open(&mut self, end: f64) -> Result<TimeWindow> {
        let Some(last) = self.last_window() else {
            return Err(TempusError::InvalidTimeWindow(
                "cannot end the last time window of an empty timeline".to_string(),
            ));
        };

        if last.is_ended() {
            return Err(TempusError::InvalidTimeWindow(format!(
                "last time window {} is already ended",
                last
            )));
        }

        // An end at +∞ would leave the window open.
        if end.is_nan() || end == f64::INFINITY || end < last.start() {
            return Err(TempusError::InvalidTimeWindow(format!(
                "cannot end time window {} at {}",
                last, end
            )));
        }

        self.set_end(&last, end).ok_or_else(|| {
            TempusError::InvalidTimeWindow(format!("time window {} is not stored", last))
        })
    }

    /// Remove the exact stored window and return its value.
    pub fn remove(&mut self, window: &TimeWindow) -> Option<T> {
        if !self.is_stored(window) {
            return None;
        }
        self.mapping.remove(window)
    }

    /// Move the end of a stored window, keeping its value.
    ///
    /// Returns the re-keyed window, or `None` when `window` is not stored.
    /// The new end must not reach into the next window.
    pub fn set_end(&mut self, window: &TimeWindow, end: f64) -> Option<TimeWindow> {
        self.retarget(window, window.with_end(end))
    }

    /// Move the start of a stored window, keeping its value.
    ///
    /// Returns the re-keyed window, or `None` when `window` is not stored.
    /// The new start must not reach into the previous window.
    pub fn set_start(&mut self, window: &TimeWindow, start: f64) -> Option<TimeWindow> {
        self.retarget(window, window.with_start(start))
    }

    /// Keep only the windows for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&TimeWindow, &mut T) -> bool,
    {
        self.mapping.retain(|window, value| f(window, value));
    }

    /// Drop the oldest windows until at most `capacity` remain. Returns the
    /// number of windows dropped.
    pub fn truncate_history(&mut self, capacity: usize) -> usize {
        let mut dropped = 0;
        while self.mapping.len() > capacity {
            self.mapping.pop_first();
            dropped += 1;
        }
        dropped
    }

    /// Walk the windows with the option of removing the one just visited.
    ///
    /// ```rust
    /// use tempus::Timeline;
    ///
    /// let mut timeline = Timeline::new();
    /// timeline.insert(0.0, 10.0, 1);
    /// timeline.insert(10.0, 20.0, 2);
    /// timeline.insert(20.0, 30.0, 3);
    ///
    /// let mut cursor = timeline.cursor();
    /// while let Some((_, value)) = cursor.next() {
    ///     if *value == 2 {
    ///         cursor.remove_current();
    ///     }
    /// }
    ///
    /// assert_eq!(timeline.values().copied().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            timeline: self,
            position: None,
            removable: false,
        }
    }

    fn last_window(&self) -> Option<TimeWindow> {
        self.mapping.last_key_value().map(|(window, _)| *window)
    }

    fn is_stored(&self, window: &TimeWindow) -> bool {
        matches!(self.mapping.get_key_value(window), Some((stored, _)) if stored == window)
    }

    fn put(&mut self, window: TimeWindow, value: T) {
        // Same-start keys compare equal; drop the old key so the new bounds win.
        self.mapping.remove(&window);
        self.mapping.insert(window, value);
    }

    fn retarget(&mut self, window: &TimeWindow, moved: TimeWindow) -> Option<TimeWindow> {
        if !self.is_stored(window) {
            return None;
        }

        let value = self.mapping.remove(window)?;
        log::debug!("re-keying time window {} as {}", window, moved);
        self.put(moved, value);
        Some(moved)
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Timeline<T> {
    type Item = (TimeWindow, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the windows of a [`Timeline`].
pub struct Iter<'a, T> {
    inner: btree_map::Iter<'a, TimeWindow, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (TimeWindow, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(window, value)| (*window, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(window, value)| (*window, value))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Forward walk over a [`Timeline`] that may delete the window it just
/// yielded without losing its place.
pub struct Cursor<'a, T> {
    timeline: &'a mut Timeline<T>,
    position: Option<TimeWindow>,
    removable: bool,
}

impl<T> Cursor<'_, T> {
    /// Advance to the next window.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(TimeWindow, &mut T)> {
        let lower = match self.position {
            Some(position) => Excluded(position),
            None => Unbounded,
        };

        let (window, value) = self
            .timeline
            .mapping
            .range_mut((lower, Unbounded))
            .next()?;

        self.position = Some(*window);
        self.removable = true;
        Some((*window, value))
    }

    /// Remove the window returned by the last call to [`Cursor::next`].
    pub fn remove_current(&mut self) -> Option<T> {
        if !self.removable {
            return None;
        }
        self.removable = false;

        let position = self.position?;
        self.timeline.remove(&position)
    }
}
