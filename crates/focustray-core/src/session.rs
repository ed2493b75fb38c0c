//! Completed-session log.
//!
//! One timestamp per completed work period. Counting is bucketed into
//! "session days" that start at 05:00 local time rather than midnight, so a
//! work period finished at 2 AM still credits the previous day.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, Local, TimeZone, Timelike, Utc};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::storage::ListStore;

/// Store key for the serialized timestamp list.
pub const COMPLETIONS_KEY: &str = "completion_timestamps";

/// Hour at which one accounting day rolls over into the next.
const DAY_START_HOUR: u32 = 5;

/// Start of the session day containing `now`: the most recent 05:00 at or
/// before `now`, in `now`'s own timezone.
///
/// Returns `None` when that instant does not exist on the local calendar
/// (a DST gap); callers treat that as an empty window.
pub fn session_day_start<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let date = if now.hour() < DAY_START_HOUR {
        now.date_naive().checked_sub_days(Days::new(1))?
    } else {
        now.date_naive()
    };
    let start = date.and_hms_opt(DAY_START_HOUR, 0, 0)?;
    now.timezone().from_local_datetime(&start).single()
}

/// Ordered log of work-period completion instants.
///
/// Persisted as one opaque JSON array under [`COMPLETIONS_KEY`]. Saves run on
/// a background thread, fire and forget; the load-time cleanup happens before
/// any completion can be recorded, so the writer never races it.
pub struct SessionLog {
    entries: Vec<DateTime<Utc>>,
    store: Arc<dyn ListStore>,
}

impl SessionLog {
    /// Load the persisted log, then drop entries from before the current
    /// session day. Missing or malformed payloads yield an empty log.
    pub fn load(store: Arc<dyn ListStore>) -> Self {
        Self::load_at(store, Local::now())
    }

    pub fn load_at<Tz: TimeZone>(store: Arc<dyn ListStore>, now: DateTime<Tz>) -> Self {
        let entries = match store.get(COMPLETIONS_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<DateTime<Utc>>>(&payload) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "malformed completion log, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read completion log, starting empty");
                Vec::new()
            }
        };
        let mut log = Self { entries, store };
        log.drop_before_day_start(now);
        log
    }

    fn drop_before_day_start<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        let Some(day_start) = session_day_start(&now) else {
            return;
        };
        let before = self.entries.len();
        self.entries
            .retain(|t| t.with_timezone(&now.timezone()) >= day_start);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!(dropped, "dropped completions from previous session days");
        }
    }

    /// Append a completion and persist the whole list in the background.
    /// Persistence failures are logged, never surfaced.
    pub fn record_completion(&mut self, at: DateTime<Utc>) {
        self.entries.push(at);
        let payload = match serde_json::to_string(&self.entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize completion log");
                return;
            }
        };
        let store = Arc::clone(&self.store);
        std::thread::spawn(move || {
            if let Err(e) = store.set(COMPLETIONS_KEY, &payload) {
                warn!(error = %e, "failed to persist completion log");
            }
        });
    }

    /// Write the current list synchronously.
    ///
    /// # Errors
    /// Returns an error if serialization or the store write fails.
    pub fn flush(&self) -> Result<(), CoreError> {
        let payload = serde_json::to_string(&self.entries)?;
        self.store.set(COMPLETIONS_KEY, &payload)?;
        Ok(())
    }

    /// Completions inside the session day containing `now`.
    pub fn count_for_day_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> usize {
        let Some(day_start) = session_day_start(&now) else {
            return 0;
        };
        let day_end = day_start.clone() + Duration::hours(24);
        self.entries
            .iter()
            .map(|t| t.with_timezone(&now.timezone()))
            .filter(|t| *t >= day_start && *t < day_end)
            .count()
    }

    /// Completions inside the current local session day.
    pub fn count_for_today(&self) -> usize {
        self.count_for_day_at(Local::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DateTime<Utc>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryListStore;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn at(tz: &FixedOffset, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        tz.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn empty_log() -> SessionLog {
        SessionLog::load_at(Arc::new(MemoryListStore::new()), at(&tz(), 2026, 3, 10, 12, 0))
    }

    #[test]
    fn day_starts_at_five_local() {
        let tz = tz();
        let start = session_day_start(&at(&tz, 2026, 3, 10, 12, 0)).unwrap();
        assert_eq!(start, at(&tz, 2026, 3, 10, 5, 0));
    }

    #[test]
    fn before_five_belongs_to_previous_day() {
        let tz = tz();
        let start = session_day_start(&at(&tz, 2026, 3, 10, 4, 59)).unwrap();
        assert_eq!(start, at(&tz, 2026, 3, 9, 5, 0));
    }

    #[test]
    fn count_excludes_next_window_at_0459() {
        let tz = tz();
        let mut log = empty_log();
        log.record_completion(at(&tz, 2026, 3, 10, 5, 0).with_timezone(&Utc));

        // 04:59 on the 10th is still the window that started on the 9th.
        assert_eq!(log.count_for_day_at(at(&tz, 2026, 3, 10, 4, 59)), 0);
        // 05:01 on the 10th starts the window that holds the completion.
        assert_eq!(log.count_for_day_at(at(&tz, 2026, 3, 10, 5, 1)), 1);
    }

    #[test]
    fn count_covers_late_night_work() {
        let tz = tz();
        let mut log = empty_log();
        log.record_completion(at(&tz, 2026, 3, 10, 23, 30).with_timezone(&Utc));
        log.record_completion(at(&tz, 2026, 3, 11, 2, 0).with_timezone(&Utc));

        // Both credit the window anchored at the 10th's 05:00.
        assert_eq!(log.count_for_day_at(at(&tz, 2026, 3, 11, 3, 0)), 2);
        assert_eq!(log.count_for_day_at(at(&tz, 2026, 3, 11, 8, 0)), 0);
    }

    #[test]
    fn load_drops_entries_before_day_start() {
        let tz = tz();
        let store = Arc::new(MemoryListStore::new());
        let entries = vec![
            at(&tz, 2026, 3, 9, 4, 0).with_timezone(&Utc),
            at(&tz, 2026, 3, 9, 6, 0).with_timezone(&Utc),
            at(&tz, 2026, 3, 10, 3, 0).with_timezone(&Utc),
        ];
        store
            .set(COMPLETIONS_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        // At 08:00 the boundary is today's 05:00; every sample precedes it.
        let log = SessionLog::load_at(Arc::clone(&store) as Arc<dyn ListStore>, at(&tz, 2026, 3, 10, 8, 0));
        assert!(log.is_empty());

        // At 03:00 the boundary is yesterday's 05:00; two samples survive.
        let log = SessionLog::load_at(store, at(&tz, 2026, 3, 10, 3, 0));
        assert_eq!(
            log.entries(),
            &[
                at(&tz, 2026, 3, 9, 6, 0).with_timezone(&Utc),
                at(&tz, 2026, 3, 10, 3, 0).with_timezone(&Utc),
            ]
        );
    }

    #[test]
    fn load_treats_malformed_payload_as_empty() {
        let store = Arc::new(MemoryListStore::new());
        store.set(COMPLETIONS_KEY, "not json at all").unwrap();
        let log = SessionLog::load_at(store, at(&tz(), 2026, 3, 10, 12, 0));
        assert!(log.is_empty());
    }

    #[test]
    fn flush_roundtrips_through_store() {
        let tz = tz();
        let store = Arc::new(MemoryListStore::new());
        let mut log =
            SessionLog::load_at(Arc::clone(&store) as Arc<dyn ListStore>, at(&tz, 2026, 3, 10, 12, 0));
        log.record_completion(at(&tz, 2026, 3, 10, 12, 30).with_timezone(&Utc));
        log.flush().unwrap();

        let reloaded = SessionLog::load_at(store, at(&tz, 2026, 3, 10, 13, 0));
        assert_eq!(reloaded.len(), 1);
    }
}
