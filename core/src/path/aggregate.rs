use crate::chapter::ChapterStats;

use super::PathInfo;

/// Rolled-up numbers for one checkpoint or for the whole chapter.
///
/// Rooms the player never entered contribute zero successes and zero
/// attempts, so their windowed rate enters the products and sums as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateStats {
    pub successes: u32,
    pub attempts: u32,
    pub room_count: u32,
    /// Sum of per-room windowed success rates, for the arithmetic mean.
    pub rate_sum: f64,
    pub golden_deaths: u32,
    pub golden_deaths_session: u32,
    /// Product of per-room windowed success rates.
    pub golden_chance: f64,
}

impl AggregateStats {
    fn add_room(&mut self, rate: f64, successes: u32, attempts: u32, gold: u32, session: u32) {
        self.successes += successes;
        self.attempts += attempts;
        self.room_count += 1;
        self.rate_sum += rate;
        self.golden_deaths += gold;
        self.golden_deaths_session += session;
        self.golden_chance *= rate;
    }

    /// Mean of the per-room windowed rates.
    pub fn success_rate(&self) -> f64 {
        if self.room_count == 0 {
            return 0.0;
        }
        self.rate_sum / f64::from(self.room_count)
    }

    fn fresh() -> Self {
        Self {
            golden_chance: 1.0,
            ..Self::default()
        }
    }
}

/// Per-render aggregation over a path: one entry per checkpoint plus a
/// chapter-wide rollup, and the current room's position if it is on the path.
#[derive(Debug, Clone, Default)]
pub struct PathAggregates {
    pub checkpoints: Vec<AggregateStats>,
    pub chapter: AggregateStats,
    /// Index of the checkpoint holding the current room, if any.
    pub current_checkpoint: Option<usize>,
    /// 1-based chapter room number of the current room, if on the path.
    pub current_room_number: Option<u32>,
}

impl PathAggregates {
    pub fn compute(path: &PathInfo, stats: &ChapterStats, window: usize) -> Self {
        let mut chapter = AggregateStats::fresh();
        let mut checkpoints = Vec::with_capacity(path.checkpoints.len());
        let current = stats.current_room().map(|r| r.name.as_str());
        let mut current_checkpoint = None;
        let mut current_room_number = None;

        for (cp_index, cp) in path.checkpoints.iter().enumerate() {
            let mut agg = AggregateStats::fresh();
            for room in &cp.rooms {
                if current == Some(room.name.as_str()) {
                    current_checkpoint = Some(cp_index);
                    current_room_number = Some(room.number_in_chapter);
                }
                let (rate, successes, attempts, gold, session) = match stats.room(&room.name) {
                    Some(stats) => (
                        f64::from(stats.average_success_over(window)),
                        stats.successes_over(window),
                        stats.attempts_over(window),
                        stats.golden_deaths,
                        stats.golden_deaths_session,
                    ),
                    None => (0.0, 0, 0, 0, 0),
                };
                agg.add_room(rate, successes, attempts, gold, session);
                chapter.add_room(rate, successes, attempts, gold, session);
            }
            checkpoints.push(agg);
        }

        Self {
            checkpoints,
            chapter,
            current_checkpoint,
            current_room_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{CheckpointInfo, RoomInfo};

    fn path_of(segments: &[(&str, &[&str])]) -> PathInfo {
        let checkpoints = segments
            .iter()
            .map(|(name, rooms)| {
                let mut cp = CheckpointInfo::new((*name).to_string(), (*name).to_string());
                cp.rooms = rooms
                    .iter()
                    .map(|r| RoomInfo {
                        name: (*r).to_string(),
                        number_in_checkpoint: 0,
                        number_in_chapter: 0,
                    })
                    .collect();
                cp
            })
            .collect();
        PathInfo::from_checkpoints(checkpoints)
    }

    #[test]
    fn unplayed_rooms_zero_out_the_golden_chance() {
        let path = path_of(&[("Start", &["a", "b"])]);
        let mut stats = ChapterStats::new("key");
        stats.set_current_room("a");
        stats.add_attempt(true);

        let agg = PathAggregates::compute(&path, &stats, 20);
        assert_eq!(agg.chapter.room_count, 2);
        assert_eq!(agg.chapter.golden_chance, 0.0);
        assert_eq!(agg.chapter.success_rate(), 0.5);
    }

    #[test]
    fn current_room_position_is_located() {
        let path = path_of(&[("Start", &["a"]), ("Mid", &["b", "c"])]);
        let mut stats = ChapterStats::new("key");
        stats.set_current_room("c");

        let agg = PathAggregates::compute(&path, &stats, 20);
        assert_eq!(agg.current_checkpoint, Some(1));
        assert_eq!(agg.current_room_number, Some(3));
        assert_eq!(agg.checkpoints.len(), 2);
    }

    #[test]
    fn checkpoint_rollups_multiply_their_own_rooms_only() {
        let path = path_of(&[("Start", &["a"]), ("Mid", &["b"])]);
        let mut stats = ChapterStats::new("key");
        stats.set_current_room("a");
        stats.add_attempt(true);
        stats.add_attempt(true);
        stats.set_current_room("b");
        stats.add_attempt(true);
        stats.add_attempt(false);

        let agg = PathAggregates::compute(&path, &stats, 20);
        assert_eq!(agg.checkpoints[0].golden_chance, 1.0);
        assert_eq!(agg.checkpoints[1].golden_chance, 0.5);
        assert_eq!(agg.chapter.golden_chance, 0.5);
        assert_eq!(agg.chapter.attempts, 4);
        assert_eq!(agg.chapter.successes, 3);
    }
}
