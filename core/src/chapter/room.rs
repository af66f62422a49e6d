use std::collections::VecDeque;

/// Hard cap on the attempt history of a single room. Once a room has this
/// many recorded attempts, the oldest attempt is evicted for every new one.
pub const MAX_ATTEMPTS: usize = 100;

/// Rolling attempt record for one room, plus its golden-run death counters.
///
/// `attempts` is the authoritative state; the fixed-window rates that end up
/// in the stats file are derived from it on serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomStats {
    pub name: String,
    pub attempts: VecDeque<bool>,
    pub golden_deaths: u32,
    pub golden_deaths_session: u32,
    /// Deaths in this room since the current run began. Not persisted.
    pub deaths_in_current_run: u32,
}

impl RoomStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append an attempt outcome, evicting the oldest entry at the cap.
    pub fn add_attempt(&mut self, success: bool) {
        if self.attempts.len() >= MAX_ATTEMPTS {
            self.attempts.pop_front();
        }
        self.attempts.push_back(success);
    }

    /// Drop the most recent attempt. No-op on an empty history.
    pub fn remove_last_attempt(&mut self) {
        self.attempts.pop_back();
    }

    /// Drop the trailing streak of failed attempts, if any.
    pub fn remove_last_death_streak(&mut self) {
        while self.last_attempt() == Some(false) {
            self.attempts.pop_back();
        }
    }

    pub fn is_unplayed(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn last_attempt(&self) -> Option<bool> {
        self.attempts.back().copied()
    }

    /// Success rate over at most the last `n` attempts.
    ///
    /// An unplayed room (or `n == 0`) reports 0, not an error: callers rely
    /// on this for the "0% success" display of rooms without data.
    pub fn average_success_over(&self, n: usize) -> f32 {
        let considered = self.attempts_over(n);
        if considered == 0 {
            return 0.0;
        }
        self.successes_over(n) as f32 / considered as f32
    }

    /// Count of successes within the last `n` attempts.
    pub fn successes_over(&self, n: usize) -> u32 {
        self.attempts
            .iter()
            .rev()
            .take(n)
            .filter(|&&success| success)
            .count() as u32
    }

    /// How many attempts the last-`n` window actually covers.
    pub fn attempts_over(&self, n: usize) -> u32 {
        self.attempts.len().min(n) as u32
    }

    /// Consecutive successes ending at the most recent attempt.
    pub fn success_streak(&self) -> u32 {
        self.attempts
            .iter()
            .rev()
            .take_while(|&&success| success)
            .count() as u32
    }

    // Fixed windows emitted into the serialized snapshot.
    pub fn last_five_rate(&self) -> f32 {
        self.average_success_over(5)
    }

    pub fn last_ten_rate(&self) -> f32 {
        self.average_success_over(10)
    }

    pub fn last_twenty_rate(&self) -> f32 {
        self.average_success_over(20)
    }

    pub fn max_rate(&self) -> f32 {
        self.average_success_over(MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with(attempts: &[bool]) -> RoomStats {
        let mut room = RoomStats::new("a-01");
        for &success in attempts {
            room.add_attempt(success);
        }
        room
    }

    #[test]
    fn empty_history_reports_zero_for_any_window() {
        let room = RoomStats::new("a-01");
        for n in [0, 1, 5, MAX_ATTEMPTS, MAX_ATTEMPTS * 2] {
            assert_eq!(room.average_success_over(n), 0.0);
            assert_eq!(room.successes_over(n), 0);
            assert_eq!(room.attempts_over(n), 0);
        }
        assert!(room.is_unplayed());
        assert_eq!(room.success_streak(), 0);
    }

    #[test]
    fn windowed_rates() {
        let room = room_with(&[true, false, true, true]);
        assert_eq!(room.average_success_over(4), 0.75);
        assert_eq!(room.average_success_over(2), 1.0);
        assert_eq!(room.success_streak(), 2);
        assert_eq!(room.successes_over(3), 2);
        assert_eq!(room.attempts_over(10), 4);
    }

    #[test]
    fn streak_breaks_on_most_recent_failure() {
        let room = room_with(&[true, true, false]);
        assert_eq!(room.success_streak(), 0);
    }

    #[test]
    fn cap_keeps_most_recent_attempts_in_order() {
        let mut room = RoomStats::new("a-01");
        // 150 attempts; the first 50 fail, the rest succeed, with one final
        // failure so ordering at the tail is observable.
        for i in 0..149 {
            room.add_attempt(i >= 50);
        }
        room.add_attempt(false);

        assert_eq!(room.attempts.len(), MAX_ATTEMPTS);
        assert_eq!(room.last_attempt(), Some(false));
        // All survivors except the final failure are successes 50..149.
        assert_eq!(room.successes_over(MAX_ATTEMPTS), 99);
    }

    #[test]
    fn remove_last_attempt_is_noop_when_empty() {
        let mut room = RoomStats::new("a-01");
        room.remove_last_attempt();
        assert!(room.is_unplayed());

        room.add_attempt(true);
        room.remove_last_attempt();
        assert!(room.is_unplayed());
    }

    #[test]
    fn remove_last_death_streak_pops_trailing_failures_only() {
        let mut room = room_with(&[true, false, false, false]);
        room.remove_last_death_streak();
        assert_eq!(room.attempts, VecDeque::from(vec![true]));

        // Nothing to strip when the last attempt succeeded.
        room.remove_last_death_streak();
        assert_eq!(room.attempts.len(), 1);
    }
}
