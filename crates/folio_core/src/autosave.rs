//! Debounced autosave for admin drafts.
//!
//! Callers pass the current `Instant` in, so the timer has no threads and no
//! hidden clock.
//!
//! # Invariants
//! - Every edit re-arms the timer; a save fires once per quiet period.
//! - Seeding a draft from loaded content never schedules a save.

use std::time::{Duration, Instant};

/// Default quiet period before an autosave fires.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Debounce timer.
#[derive(Debug, Clone)]
pub struct AutoSave {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    /// Records an edit at `now`, restarting the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Clears any pending save and reports whether one was pending.
    pub fn flush(&mut self) -> bool {
        self.pending_since.take().is_some()
    }

    /// Drops a pending save without firing it.
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

/// Save indicator shown next to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

/// Local working copy of one document section with its autosave timer.
#[derive(Debug, Clone)]
pub struct Draft<T> {
    value: T,
    timer: AutoSave,
    status: SaveStatus,
}

impl<T: Clone> Draft<T> {
    /// Seeds the draft from loaded content without scheduling a save.
    pub fn new(value: T, delay: Duration) -> Self {
        Self {
            value,
            timer: AutoSave::new(delay),
            status: SaveStatus::Idle,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    /// Whether an edit is waiting for its quiet period.
    pub fn has_pending_save(&self) -> bool {
        self.timer.is_pending()
    }

    /// Replaces the draft with freshly loaded content, dropping any pending
    /// save.
    pub fn reseed(&mut self, value: T) {
        self.value = value;
        self.timer.cancel();
        self.status = SaveStatus::Idle;
    }

    /// Edits the draft and re-arms the timer.
    pub fn edit<R>(&mut self, now: Instant, change: impl FnOnce(&mut T) -> R) -> R {
        let result = change(&mut self.value);
        self.timer.touch(now);
        result
    }

    /// Snapshot to save when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.timer.poll(now) {
            self.status = SaveStatus::Saving;
            Some(self.value.clone())
        } else {
            None
        }
    }

    /// Snapshot to save right away, pending or not.
    pub fn force(&mut self) -> T {
        self.timer.flush();
        self.status = SaveStatus::Saving;
        self.value.clone()
    }

    /// Records the result of the save started by `poll` or `force`.
    pub fn finish(&mut self, result: Result<(), String>) {
        self.status = match result {
            Ok(()) => SaveStatus::Saved,
            Err(message) => SaveStatus::Failed(message),
        };
    }

    /// Returns the indicator to idle after a success or failure was shown.
    pub fn acknowledge(&mut self) {
        self.status = SaveStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoSave, Draft, SaveStatus};
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut timer = AutoSave::new(DELAY);
        timer.touch(start);

        assert!(!timer.poll(start + Duration::from_millis(999)));
        assert!(timer.poll(start + DELAY));
        assert!(!timer.poll(start + DELAY * 3));
    }

    #[test]
    fn each_edit_restarts_the_timer() {
        let start = Instant::now();
        let mut timer = AutoSave::new(DELAY);
        timer.touch(start);
        timer.touch(start + Duration::from_millis(800));

        assert!(!timer.poll(start + Duration::from_millis(1500)));
        assert!(timer.poll(start + Duration::from_millis(1800)));
    }

    #[test]
    fn seeded_draft_never_saves_without_edit() {
        let start = Instant::now();
        let mut draft = Draft::new(vec![1, 2], DELAY);
        assert!(draft.poll(start + DELAY * 10).is_none());
        assert_eq!(draft.status(), &SaveStatus::Idle);
    }

    #[test]
    fn edited_draft_yields_snapshot_and_tracks_status() {
        let start = Instant::now();
        let mut draft = Draft::new(vec![1], DELAY);
        draft.edit(start, |items| items.push(2));

        let snapshot = draft.poll(start + DELAY).unwrap();
        assert_eq!(snapshot, vec![1, 2]);
        assert_eq!(draft.status(), &SaveStatus::Saving);

        draft.finish(Err("offline".to_string()));
        assert_eq!(draft.status(), &SaveStatus::Failed("offline".to_string()));
        draft.acknowledge();
        assert_eq!(draft.status(), &SaveStatus::Idle);
    }

    #[test]
    fn reseed_drops_pending_edit() {
        let start = Instant::now();
        let mut draft = Draft::new(1_u32, DELAY);
        draft.edit(start, |value| *value = 2);
        assert!(draft.has_pending_save());

        draft.reseed(7);
        assert!(!draft.has_pending_save());
        assert_eq!(*draft.value(), 7);
        assert!(draft.poll(start + DELAY * 2).is_none());
    }

    #[test]
    fn force_saves_immediately_and_clears_pending() {
        let start = Instant::now();
        let mut draft = Draft::new(String::from("a"), DELAY);
        draft.edit(start, |text| text.push('b'));
        assert_eq!(draft.force(), "ab");
        assert!(draft.poll(start + DELAY).is_none());
    }
}
