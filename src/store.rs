//! Attribute store: one timeline of values per attribute name.
//!
//! Writes may land anywhere in history, not only after the last window. A
//! write at `date` cuts whatever window covered `date` and fills the gap up to
//! the next recorded change, so later history is never disturbed.

use crate::builder::StoreBuilder;
use crate::config::Config;
use crate::error::{Result, TempusError};
use crate::timeline::Timeline;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tempus_types::stats::StoreStats;
use tempus_types::value::Value;
use tempus_types::window::TimeWindow;

/// Date-indexed attribute values for one element. Not synchronised; see `SyncStore`.
///
/// # Examples
///
/// ```rust
/// use tempus::{Tempus, Value};
///
/// let mut attrs = Tempus::new();
/// attrs.set_at("weight", 1.0, 13.37)?;
/// attrs.set_at("weight", 3.0, 4.2)?;
///
/// assert_eq!(attrs.value_at("weight", 0.0), None);
/// assert_eq!(attrs.value_at("weight", 2.0), Some(&Value::Number(13.37)));
/// assert_eq!(attrs.value_at("weight", 3.0), Some(&Value::Number(4.2)));
/// # Ok::<(), tempus::TempusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AttributeStore<V = Value> {
    attributes: FxHashMap<String, Timeline<V>>,
    config: Config,
}

impl<V> AttributeStore<V> {
    /// Empty store with default configuration.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Empty store with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    pub fn builder() -> StoreBuilder<V> {
        StoreBuilder::new()
    }

    pub(crate) fn from_config(config: Config) -> Self {
        let mut attributes = FxHashMap::default();
        attributes.reserve(config.key_capacity);
        Self { attributes, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of attribute names ever written.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Every attribute name ever written, covered or not.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.keys().map(String::as_str)
    }

    pub fn timeline(&self, key: &str) -> Option<&Timeline<V>> {
        self.attributes.get(key)
    }

    /// All windows recorded for `key`, oldest first.
    pub fn history(&self, key: &str) -> Vec<(TimeWindow, &V)> {
        self.attributes
            .get(key)
            .map(|timeline| timeline.iter().collect())
            .unwrap_or_default()
    }

    /// True if `key` holds a value at `date`.
    pub fn has_at(&self, key: &str, date: f64) -> bool {
        self.lookup(key)
            .is_some_and(|timeline| timeline.exists_at(date))
    }

    /// Value of `key` at `date`.
    pub fn value_at(&self, key: &str, date: f64) -> Option<&V> {
        self.lookup(key)?.value_at(date)
    }

    /// Make `value` the value of `key` from `date` until the next recorded
    /// change of `key` (or forever if there is none).
    ///
    /// A window covering `date` is cut at `date` and keeps its value before
    /// that. Returns the window now holding `value`.
    ///
    /// NaN and `+∞` dates are rejected. With a history capacity, so is a write
    /// that would fall outside the retained windows; the store is left
    /// unchanged in both cases.
    pub fn set_at(&mut self, key: &str, date: f64, value: impl Into<V>) -> Result<TimeWindow> {
        if date.is_nan() || date == f64::INFINITY {
            log::warn!("Rejecting write of attribute '{}' at date {}", key, date);
            return Err(TempusError::InvalidTimeWindow(format!(
                "cannot set attribute '{}' at {}",
                key, date
            )));
        }

        let history_capacity = self.config.history_capacity;
        if let Some(capacity) = history_capacity {
            // The new window ranks after every window starting later than it.
            let newer = self
                .attributes
                .get(key)
                .map_or(0, |timeline| timeline.windows_after(date).take(capacity).count());
            if newer >= capacity {
                log::warn!(
                    "Rejecting write of attribute '{}' at {}: older than the {} retained window(s)",
                    key,
                    date,
                    capacity
                );
                return Err(TempusError::OutsideHistory(format!(
                    "attribute '{}' keeps {} window(s) after {}",
                    key, capacity, date
                )));
            }
        }

        let timeline = self.attributes.entry(key.to_owned()).or_default();

        cut_at(timeline, date);

        let window = match timeline.next_after(date) {
            Some(next) => timeline.insert(date, next.start(), value.into()),
            None => timeline.start_open(date, value.into())?,
        };

        if let Some(capacity) = history_capacity {
            let dropped = timeline.truncate_history(capacity);
            if dropped > 0 {
                log::debug!(
                    "Dropped {} old window(s) of attribute '{}' beyond history capacity {}",
                    dropped,
                    key,
                    capacity
                );
            }
        }

        Ok(window)
    }

    /// End the value of `key` at `date`, leaving a gap up to the next change.
    ///
    /// Returns false if `key` is unknown or holds no value at `date`.
    pub fn remove_at(&mut self, key: &str, date: f64) -> bool {
        self.attributes
            .get_mut(key)
            .is_some_and(|timeline| cut_at(timeline, date))
    }

    /// [`remove_at`](Self::remove_at) for every attribute. Returns the number
    /// of attributes that held a value at `date`.
    pub fn clear_at(&mut self, date: f64) -> usize {
        self.attributes
            .values_mut()
            .map(|timeline| cut_at(timeline, date))
            .filter(|&cut| cut)
            .count()
    }

    /// Number of attributes holding a value at `date`.
    pub fn count_at(&self, date: f64) -> usize {
        self.attributes
            .values()
            .filter(|timeline| timeline.exists_at(date))
            .count()
    }

    /// Names of the attributes holding a value at `date`, in no fixed order.
    pub fn keys_at(&self, date: f64) -> impl Iterator<Item = &str> + '_ {
        self.attributes
            .iter()
            .filter(move |(_, timeline)| timeline.exists_at(date))
            .map(|(key, _)| key.as_str())
    }

    /// Like [`keys_at`](Self::keys_at), but each yielded key may be removed
    /// at `date` through [`KeyCursor::remove_current`].
    ///
    /// ```rust
    /// use tempus::Tempus;
    ///
    /// let mut attrs = Tempus::new();
    /// attrs.set_at("color", 0.0, "red")?;
    /// attrs.set_at("size", 0.0, 3.0)?;
    ///
    /// let mut keys = attrs.keys_at_mut(5.0);
    /// while let Some(key) = keys.next() {
    ///     if key == "color" {
    ///         keys.remove_current();
    ///     }
    /// }
    ///
    /// assert!(attrs.has_at("color", 4.0));
    /// assert!(!attrs.has_at("color", 5.0));
    /// assert!(attrs.has_at("size", 5.0));
    /// # Ok::<(), tempus::TempusError>(())
    /// ```
    pub fn keys_at_mut(&mut self, date: f64) -> KeyCursor<'_, V> {
        let keys: SmallVec<[String; 8]> = self.keys_at(date).map(str::to_owned).collect();
        KeyCursor {
            store: self,
            date,
            keys: keys.into_iter(),
            current: None,
        }
    }

    /// Remove at `date` every covered attribute for which `pred` holds.
    /// Returns the number of attributes removed.
    pub fn remove_keys_at<F>(&mut self, date: f64, mut pred: F) -> usize
    where
        F: FnMut(&str, &V) -> bool,
    {
        let mut removed = 0;
        for (key, timeline) in self.attributes.iter_mut() {
            let matches = timeline
                .value_at(date)
                .is_some_and(|value| pred(key.as_str(), value));

            if matches && cut_at(timeline, date) {
                removed += 1;
            }
        }
        removed
    }

    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::new();
        for timeline in self.attributes.values() {
            let open = timeline.windows().filter(|w| w.is_unbounded()).count();
            stats.record_timeline(timeline.len(), open);
        }
        stats
    }

    fn lookup(&self, key: &str) -> Option<&Timeline<V>> {
        let timeline = self.attributes.get(key);
        if timeline.is_none() && self.config.report_unknown_keys {
            log::info!("no timeline for attribute \"{}\"", key);
        }
        timeline
    }
}

impl AttributeStore<Value> {
    /// Mark `key` as present from `date` on, without a payload.
    pub fn set_flag_at(&mut self, key: &str, date: f64) -> Result<TimeWindow> {
        self.set_at(key, date, Value::Flag(true))
    }

    /// Write several payloads at once; see [`Value::combine`].
    pub fn set_many_at(&mut self, key: &str, date: f64, values: Vec<Value>) -> Result<TimeWindow> {
        self.set_at(key, date, Value::combine(values))
    }
}

impl<V> Default for AttributeStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut the window covering `date` so that nothing holds at `date` any more.
fn cut_at<V>(timeline: &mut Timeline<V>, date: f64) -> bool {
    let Some(covering) = timeline.floor(date).filter(|w| w.contains(date)) else {
        return false;
    };

    if covering.start() == date {
        timeline.remove(&covering).is_some()
    } else if date == f64::INFINITY {
        // Only an unbounded window covers +∞, and it cannot end there.
        false
    } else {
        timeline.set_end(&covering, date).is_some()
    }
}

/// Keys covering a fixed date, snapshotted up front so the store can be
/// edited while walking them.
pub struct KeyCursor<'a, V> {
    store: &'a mut AttributeStore<V>,
    date: f64,
    keys: smallvec::IntoIter<[String; 8]>,
    current: Option<String>,
}

impl<V> KeyCursor<'_, V> {
    pub fn date(&self) -> f64 {
        self.date
    }

    /// End the last yielded key at the cursor's date.
    pub fn remove_current(&mut self) -> bool {
        match self.current.take() {
            Some(key) => self.store.remove_at(&key, self.date),
            None => false,
        }
    }
}

impl<V> Iterator for KeyCursor<'_, V> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let key = self.keys.next()?;
        self.current = Some(key.clone());
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(store: &AttributeStore, key: &str, date: f64) -> Option<f64> {
        store.value_at(key, date).and_then(Value::as_number)
    }

    #[test]
    fn test_set_attribute_at() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("test", 1.0, 13.37).unwrap();

        assert_eq!(number(&store, "test", 0.0), None);
        assert_eq!(number(&store, "test", 1.0), Some(13.37));
        assert_eq!(number(&store, "test", 2.0), Some(13.37));

        store.set_at("test", 3.0, 4.2).unwrap();

        assert_eq!(number(&store, "test", 0.0), None);
        assert_eq!(number(&store, "test", 1.0), Some(13.37));
        assert_eq!(number(&store, "test", 2.0), Some(13.37));
        assert_eq!(number(&store, "test", 3.0), Some(4.2));
        assert_eq!(number(&store, "test", 4.0), Some(4.2));

        let windows: Vec<TimeWindow> = store
            .history("test")
            .into_iter()
            .map(|(window, _)| window)
            .collect();
        assert_eq!(
            windows,
            vec![TimeWindow::closed(1.0, 3.0), TimeWindow::unbounded(3.0)]
        );
    }

    #[test]
    fn test_remove_attribute_at() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("test", 1.0, 13.37).unwrap();
        store.set_at("test", 20.0, 4.2).unwrap();
        assert!(store.remove_at("test", 10.0));

        for i in 1..10 {
            assert_eq!(number(&store, "test", i as f64), Some(13.37));
        }
        for i in 10..20 {
            assert_eq!(number(&store, "test", i as f64), None);
        }
        for i in 20..30 {
            assert_eq!(number(&store, "test", i as f64), Some(4.2));
        }
    }

    #[test]
    fn test_remove_uncovered_is_noop() {
        let mut store = AttributeStore::<Value>::new();
        assert!(!store.remove_at("missing", 1.0));

        store.set_at("test", 5.0, 1.0).unwrap();
        assert!(!store.remove_at("test", 4.0));
        assert_eq!(store.history("test").len(), 1);
    }

    #[test]
    fn test_remove_at_window_start_drops_window() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("test", 5.0, 1.0).unwrap();
        assert!(store.remove_at("test", 5.0));
        assert!(store.history("test").is_empty());
        assert!(store.contains_key("test"));
    }

    #[test]
    fn test_clear_attributes_at() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("test", 1.0, 13.37).unwrap();
        store.set_at("test", 20.0, 4.2).unwrap();
        assert_eq!(store.clear_at(10.0), 1);

        for i in 1..10 {
            assert_eq!(number(&store, "test", i as f64), Some(13.37));
        }
        for i in 10..20 {
            assert!(!store.has_at("test", i as f64));
        }
        for i in 20..30 {
            assert_eq!(number(&store, "test", i as f64), Some(4.2));
        }
    }

    #[test]
    fn test_attributes_count_at() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("test", 1.0, 13.37).unwrap();
        store.set_at("test", 20.0, 4.2).unwrap();
        store.set_at("tset", 5.0, 12.34).unwrap();
        store.clear_at(10.0);

        assert_eq!(store.count_at(0.0), 0);
        assert_eq!(store.count_at(1.0), 1);
        assert_eq!(store.count_at(5.0), 2);
        assert_eq!(store.count_at(10.0), 0);
        assert_eq!(store.count_at(20.0), 1);
    }

    #[test]
    fn test_set_inside_earlier_window_fills_to_next_change() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("x", 0.0, 1.0).unwrap();
        store.remove_at("x", 10.0);
        store.set_at("x", 20.0, 2.0).unwrap();

        let window = store.set_at("x", 5.0, 3.0).unwrap();
        assert_eq!(window, TimeWindow::closed(5.0, 20.0));

        assert_eq!(number(&store, "x", 4.0), Some(1.0));
        assert_eq!(number(&store, "x", 5.0), Some(3.0));
        assert_eq!(number(&store, "x", 15.0), Some(3.0));
        assert_eq!(number(&store, "x", 20.0), Some(2.0));
    }

    #[test]
    fn test_set_in_gap_before_next_window() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("x", 10.0, 1.0).unwrap();

        let window = store.set_at("x", 2.0, 0.5).unwrap();
        assert_eq!(window, TimeWindow::closed(2.0, 10.0));
        assert_eq!(number(&store, "x", 9.0), Some(0.5));
        assert_eq!(number(&store, "x", 10.0), Some(1.0));
    }

    #[test]
    fn test_set_at_same_start_replaces() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("x", 1.0, 1.0).unwrap();
        store.set_at("x", 5.0, 2.0).unwrap();
        store.set_at("x", 1.0, 3.0).unwrap();

        assert_eq!(number(&store, "x", 1.0), Some(3.0));
        assert_eq!(number(&store, "x", 4.0), Some(3.0));
        assert_eq!(number(&store, "x", 5.0), Some(2.0));
        assert_eq!(store.history("x").len(), 2);
    }

    #[test]
    fn test_set_at_nan_rejected() {
        let mut store = AttributeStore::<Value>::new();
        assert!(matches!(
            store.set_at("x", f64::NAN, 1.0),
            Err(TempusError::InvalidTimeWindow(_))
        ));
        assert!(!store.contains_key("x"));
    }

    #[test]
    fn test_flag_and_many() {
        let mut store = AttributeStore::<Value>::new();
        store.set_flag_at("visible", 0.0).unwrap();
        store
            .set_many_at("xy", 0.0, vec![Value::from(1.0), Value::from(2.0)])
            .unwrap();
        store.set_many_at("label", 0.0, vec![Value::from("a")]).unwrap();

        assert_eq!(store.value_at("visible", 3.0), Some(&Value::Flag(true)));
        assert_eq!(
            store.value_at("xy", 3.0),
            Some(&Value::Composite(vec![Value::Number(1.0), Value::Number(2.0)]))
        );
        assert_eq!(store.value_at("label", 3.0), Some(&Value::from("a")));
    }

    #[test]
    fn test_keys_at() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("a", 0.0, 1.0).unwrap();
        store.set_at("b", 5.0, 1.0).unwrap();
        store.set_at("c", 0.0, 1.0).unwrap();
        store.remove_at("c", 3.0);

        let mut keys: Vec<&str> = store.keys_at(4.0).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a"]);

        let mut keys: Vec<&str> = store.keys_at(6.0).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(store.keys().count(), 3);
    }

    #[test]
    fn test_key_cursor_remove_current() {
        let mut store = AttributeStore::<Value>::new();
        for key in ["a", "b", "c", "d"] {
            store.set_at(key, 0.0, 1.0).unwrap();
        }

        let mut visited = Vec::new();
        let mut cursor = store.keys_at_mut(2.0);
        assert!(!cursor.remove_current());
        while let Some(key) = cursor.next() {
            if key == "b" || key == "d" {
                assert!(cursor.remove_current());
            }
            visited.push(key);
        }
        visited.sort();

        assert_eq!(visited, vec!["a", "b", "c", "d"]);
        assert_eq!(store.count_at(2.0), 2);
        assert_eq!(store.count_at(1.0), 4);
    }

    #[test]
    fn test_remove_keys_at_predicate() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("n1", 0.0, 1.0).unwrap();
        store.set_at("n2", 0.0, 2.0).unwrap();
        store.set_at("t", 0.0, "x").unwrap();

        let removed = store.remove_keys_at(1.0, |_, value| value.as_number().is_some());
        assert_eq!(removed, 2);
        assert_eq!(store.count_at(1.0), 1);
        assert!(store.has_at("t", 1.0));
    }

    #[test]
    fn test_generic_payload() {
        let mut store: AttributeStore<u32> = AttributeStore::new();
        store.set_at("hits", 0.0, 1u32).unwrap();
        store.set_at("hits", 1.0, 2u32).unwrap();

        assert_eq!(store.value_at("hits", 0.5), Some(&1));
        assert_eq!(store.value_at("hits", 9.0), Some(&2));
    }

    #[test]
    fn test_history_capacity() {
        let config = Config::default().with_history_capacity(2);
        let mut store = AttributeStore::<Value>::with_config(config).unwrap();

        for i in 0..5 {
            store.set_at("x", i as f64, i as f64).unwrap();
        }

        assert_eq!(store.history("x").len(), 2);
        assert!(!store.has_at("x", 2.5));
        assert_eq!(number(&store, "x", 3.0), Some(3.0));
        assert_eq!(number(&store, "x", 100.0), Some(4.0));
    }

    #[test]
    fn test_history_capacity_rejects_write_before_retained_windows() {
        let config = Config::default().with_history_capacity(2);
        let mut store = AttributeStore::<Value>::with_config(config).unwrap();
        store.set_at("x", 10.0, 1.0).unwrap();
        store.set_at("x", 20.0, 2.0).unwrap();

        assert!(matches!(
            store.set_at("x", 0.0, 3.0),
            Err(TempusError::OutsideHistory(_))
        ));
        assert!(matches!(
            store.set_at("x", 5.0, 3.0),
            Err(TempusError::OutsideHistory(_))
        ));
        assert_eq!(store.value_at("x", 0.0), None);
        assert_eq!(number(&store, "x", 15.0), Some(1.0));
        assert_eq!(store.history("x").len(), 2);

        // Inside the retained range the oldest window is the one dropped.
        let window = store.set_at("x", 15.0, 4.0).unwrap();
        assert_eq!(window, TimeWindow::closed(15.0, 20.0));
        assert_eq!(number(&store, "x", 15.0), Some(4.0));
        assert_eq!(number(&store, "x", 25.0), Some(2.0));
        assert!(!store.has_at("x", 12.0));
        assert_eq!(store.history("x").len(), 2);

        // Replacing the window that starts at the same date is allowed.
        store.set_at("x", 15.0, 5.0).unwrap();
        assert_eq!(number(&store, "x", 16.0), Some(5.0));
    }

    #[test]
    fn test_stats() {
        let mut store = AttributeStore::<Value>::new();
        store.set_at("a", 0.0, 1.0).unwrap();
        store.set_at("a", 1.0, 2.0).unwrap();
        store.set_at("b", 0.0, 1.0).unwrap();
        store.remove_at("b", 0.0);

        let stats = store.stats();
        assert_eq!(stats.key_count, 2);
        assert_eq!(stats.window_count, 2);
        assert_eq!(stats.open_window_count, 1);
        assert_eq!(stats.empty_timelines, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            history_capacity: Some(0),
            ..Config::default()
        };
        assert!(AttributeStore::<Value>::with_config(config).is_err());
    }
}
