use std::time::{Duration, Instant};

/// Linear undo/redo history over whole-document snapshots.
///
/// Invariants: there is always at least one snapshot, and
/// `cursor < snapshots.len()`. Committing after an undo drops the redo branch.
#[derive(Debug, Clone)]
pub struct HistoryController {
    snapshots: Vec<String>,
    cursor: usize,
}

impl HistoryController {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            snapshots: vec![initial.into()],
            cursor: 0,
        }
    }

    /// Record `text` as the newest snapshot. Returns false when it equals the
    /// snapshot under the cursor and nothing changed.
    pub fn commit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.snapshots[self.cursor] == text {
            return false;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(text);
        self.cursor = self.snapshots.len() - 1;
        tracing::debug!(len = self.snapshots.len(), "history snapshot committed");
        true
    }

    pub fn undo(&mut self) -> &str {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn redo(&mut self) -> &str {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn current(&self) -> &str {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }

    /// Drop all history and start over from `text`.
    pub fn reset(&mut self, text: impl Into<String>) {
        self.snapshots.clear();
        self.snapshots.push(text.into());
        self.cursor = 0;
    }
}

/// Coalesces bursts of edits into one history commit.
///
/// Holds at most one pending text. Every `schedule` replaces it and pushes the
/// deadline out again; the host calls `poll` from its timer tick.
#[derive(Debug, Clone)]
pub struct CommitDebouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl CommitDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.window));
    }

    /// Take the pending text once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(snapshots: &[&str]) -> HistoryController {
        let mut history = HistoryController::new(snapshots[0]);
        for s in &snapshots[1..] {
            assert!(history.commit(*s));
        }
        history
    }

    #[test]
    fn test_new_history_has_one_snapshot() {
        let history = HistoryController::new("");
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current(), "");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_duplicate_commit_is_noop() {
        let mut history = HistoryController::new("a");
        assert!(history.commit("b"));
        assert!(!history.commit("b"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let snapshots = ["s0", "s1", "s2", "s3"];
        let mut history = history_of(&snapshots);
        let n = snapshots.len() - 1;

        for i in (0..n).rev() {
            assert_eq!(history.undo(), snapshots[i]);
        }
        for i in 1..=n {
            assert_eq!(history.redo(), snapshots[i]);
        }
        assert_eq!(history.current(), "s3");
    }

    #[test]
    fn test_undo_and_redo_clamp() {
        let mut history = history_of(&["s0", "s1"]);
        assert_eq!(history.redo(), "s1");
        assert_eq!(history.cursor(), 1);
        history.undo();
        assert_eq!(history.undo(), "s0");
        assert_eq!(history.undo(), "s0");
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_commit_after_undo_drops_redo_branch() {
        let mut history = history_of(&["s0", "s1", "s2"]);
        assert_eq!(history.undo(), "s1");
        assert!(history.commit("s3"));
        assert_eq!(history.snapshots(), ["s0", "s1", "s3"]);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), "s3");
    }

    #[test]
    fn test_commit_equal_to_cursor_not_tail() {
        // Equality is checked against the cursor, not the last snapshot
        let mut history = history_of(&["s0", "s1"]);
        history.undo();
        assert!(!history.commit("s0"));
        assert_eq!(history.len(), 2);
        assert!(history.can_redo());
    }

    #[test]
    fn test_reset() {
        let mut history = history_of(&["s0", "s1", "s2"]);
        history.reset("fresh");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), "fresh");
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = CommitDebouncer::new(Duration::from_millis(1000));
        debouncer.schedule("a", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(1000)).as_deref(),
            Some("a")
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debouncer_last_write_wins_and_reschedules() {
        let start = Instant::now();
        let mut debouncer = CommitDebouncer::new(Duration::from_millis(1000));
        debouncer.schedule("a", start);
        debouncer.schedule("ab", start + Duration::from_millis(600));
        // The first deadline has passed but the second edit pushed it out
        assert_eq!(debouncer.poll(start + Duration::from_millis(1200)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(1600)).as_deref(),
            Some("ab")
        );
    }

    #[test]
    fn test_debouncer_flush_and_cancel() {
        let now = Instant::now();
        let mut debouncer = CommitDebouncer::new(Duration::from_secs(1));
        debouncer.schedule("x", now);
        assert_eq!(debouncer.flush().as_deref(), Some("x"));
        assert_eq!(debouncer.flush(), None);

        debouncer.schedule("y", now);
        debouncer.cancel();
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(now + Duration::from_secs(5)), None);
    }
}
