use super::*;
use crate::chapter::ChapterStats;
use crate::path::{CheckpointInfo, PathAggregates, PathInfo, RoomInfo};

fn make_path(segments: &[(&str, &[&str])]) -> PathInfo {
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

fn settings() -> StatSettings {
    StatSettings {
        attempt_window: 20,
        list_format: crate::config::ListFormat::Plain,
        room_name_format: crate::config::RoomNameFormat::RoomName,
    }
}

struct Fixture {
    path: Option<PathInfo>,
    stats: ChapterStats,
    golden_runs: Vec<String>,
    aggregates: Option<PathAggregates>,
}

impl Fixture {
    fn new(path: Option<PathInfo>, stats: ChapterStats) -> Self {
        let aggregates = path
            .as_ref()
            .map(|p| PathAggregates::compute(p, &stats, 20));
        Self {
            path,
            stats,
            golden_runs: Vec::new(),
            aggregates,
        }
    }

    fn recompute(&mut self) {
        self.aggregates = self
            .path
            .as_ref()
            .map(|p| PathAggregates::compute(p, &self.stats, 20));
    }

    fn ctx(&self) -> StatContext<'_> {
        StatContext {
            path: self.path.as_ref(),
            aggregates: self.aggregates.as_ref(),
            stats: &self.stats,
            golden_runs: &self.golden_runs,
            settings: settings(),
        }
    }

    fn render(&self, template: &str) -> String {
        StatManager::new().render(&self.ctx(), template)
    }
}

fn played(stats: &mut ChapterStats, room: &str, outcomes: &[bool]) {
    stats.set_current_room(room);
    for &outcome in outcomes {
        stats.add_attempt(outcome);
    }
}

#[test]
fn missing_path_renders_markers_regardless_of_history() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, true, true]);
    let fx = Fixture::new(None, stats);

    assert_eq!(fx.render("{room:successRate}"), "-%");
    assert_eq!(fx.render("{room:currentStreak}"), "-");
    assert_eq!(fx.render("{chapter:averageRunDistance}"), "-");
    assert_eq!(fx.render("{chapter:lastRunDistance#2}"), "-");
    assert_eq!(fx.render("{list:roomNames}"), "-");
}

#[test]
fn rendering_is_idempotent() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, false, true, true]);
    let fx = Fixture::new(Some(make_path(&[("Start", &["a", "b"])])), stats);

    let template = "SR {room:successRate} CP {checkpoint:successRate} streak {room:currentStreak}";
    let once = fx.render(template);
    let twice = fx.render(&once);
    assert_eq!(once, twice);
}

#[test]
fn provider_order_does_not_change_the_output() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, false, true]);
    stats.add_golden_death();
    played(&mut stats, "b", &[true]);
    stats.set_current_room("a");
    let fx = Fixture::new(Some(make_path(&[("Start", &["a", "b"])])), stats);

    let template = "{room:successRate} {room:chokeRate} {room:currentStreak} \
                    {chapter:roomCount} {list:roomNames} {run:currentPbStatus}";
    let forward = StatManager::new();
    let mut reversed = StatManager::new();
    reversed.providers.reverse();

    assert_eq!(
        forward.render(&fx.ctx(), template),
        reversed.render(&fx.ctx(), template)
    );
}

#[test]
fn success_rate_tokens() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, false, true, true]);
    let fx = Fixture::new(Some(make_path(&[("Start", &["a", "b"])])), stats);

    assert_eq!(fx.render("{room:successRate}"), "75.00%");
    assert_eq!(fx.render("{room:successes}/{room:failures}/{room:attempts}"), "3/1/4");
    // Unplayed room b contributes a 0 rate to the chapter mean.
    assert_eq!(fx.render("{chapter:successRate}"), "37.50%");
    assert_eq!(fx.render("{checkpoint:successRate}"), "37.50%");
}

#[test]
fn choke_rate_of_the_current_room() {
    let mut stats = ChapterStats::new("ch1");
    for (room, deaths) in [("a", 1), ("b", 1), ("c", 2)] {
        stats.set_current_room(room);
        for _ in 0..deaths {
            stats.add_golden_death();
        }
    }
    stats.set_current_room("b");
    let fx = Fixture::new(Some(make_path(&[("Start", &["a", "b", "c"])])), stats);

    // 1 death in b, 2 after it.
    assert_eq!(fx.render("{room:chokeRate}"), "33.33%");
    // The single checkpoint absorbs every death.
    assert_eq!(fx.render("{checkpoint:chokeRate}"), "100.00%");
}

#[test]
fn choke_rate_with_no_deaths_is_undefined() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true]);
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"])])), stats);
    assert_eq!(fx.render("{room:chokeRate}"), "-%");
}

#[test]
fn choke_rate_off_the_path_is_unknown_not_missing() {
    let mut stats = ChapterStats::new("ch1");
    stats.set_current_room("a");
    stats.add_golden_death();
    stats.set_current_room("secret");
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"])])), stats);

    // A death exists, so the rates would compute; the room just has no
    // position. The dash stays reserved for the zero-denominator case.
    assert_eq!(fx.render("{room:chokeRate}"), "?%");
    assert_eq!(fx.render("{room:chokeRateSession}"), "?%");
    assert_eq!(fx.render("{checkpoint:chokeRate}"), "?%");
    assert_eq!(fx.render("{checkpoint:chokeRateSession}"), "?%");
}

#[test]
fn choke_rate_list_reconstructs_total_deaths() {
    // a:2 b:1 c:1 deaths; each room's rate times the runs that reached it
    // must sum back to 4.
    let mut stats = ChapterStats::new("ch1");
    for (room, deaths) in [("a", 2), ("b", 1), ("c", 1)] {
        stats.set_current_room(room);
        for _ in 0..deaths {
            stats.add_golden_death();
        }
    }
    let fx = Fixture::new(Some(make_path(&[("Start", &["a", "b", "c"])])), stats);
    assert_eq!(fx.render("{list:chokeRates}"), "50.00%, 50.00%, 100.00%");
}

#[test]
fn pb_rank_counts_runs_that_died_earlier() {
    let rooms: Vec<String> = (1..=10).map(|i| format!("r{i}")).collect();
    let room_refs: Vec<&str> = rooms.iter().map(String::as_str).collect();
    let mut stats = ChapterStats::new("ch1");
    for room in &rooms {
        stats.set_current_room(room);
    }

    // First golden run dies in r7: nothing died before it, so it was a PB.
    stats.set_current_room("r7");
    stats.add_golden_death();
    stats.mod_state.holding_golden = true;
    stats.set_current_room("r8");
    let mut fx = Fixture::new(Some(make_path(&[("Start", &room_refs)])), stats);
    fx.recompute();
    assert_eq!(fx.render("{run:currentPbStatus}"), "PB");

    // A later run dying in r3 ranks second from r4.
    fx.stats.set_current_room("r3");
    fx.stats.add_golden_death();
    fx.stats.set_current_room("r4");
    fx.recompute();
    assert_eq!(fx.render("{run:currentPbStatus}"), "2");
    assert_eq!(fx.render("{run:currentPbStatusPercent}"), "50.00%");
    assert_eq!(fx.render("{run:topXPercent}"), "50.00%");
}

#[test]
fn pb_tokens_are_dashed_without_the_golden() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true]);
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"])])), stats);
    assert_eq!(fx.render("{run:currentPbStatus}"), "-");
    assert_eq!(fx.render("{run:currentPbStatusPercent}"), "-%");
}

#[test]
fn off_path_room_gets_question_markers_but_lists_still_compute() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, true]);
    stats.set_current_room("secret");
    let mut fx = Fixture::new(Some(make_path(&[("Start", &["a"])])), stats);
    fx.recompute();

    assert_eq!(fx.render("{room:currentStreak}"), "?");
    assert_eq!(fx.render("{checkpoint:successRate}"), "?%");
    assert_eq!(fx.render("{list:roomStreaks}"), "2");
}

#[test]
fn run_distance_reads_history_backward() {
    let mut stats = ChapterStats::new("ch1");
    for room in ["r1", "r2", "r3", "r4", "r5"] {
        stats.set_current_room(room);
    }
    let mut fx = Fixture::new(
        Some(make_path(&[("Start", &["r1", "r2", "r3", "r4", "r5"])])),
        stats,
    );
    // Oldest first: runs died in r3, then r5, then r2.
    for room in ["r3", "r5", "r2"] {
        fx.stats.set_current_room(room);
        if let Some(name) = fx.stats.add_golden_death() {
            fx.golden_runs.push(name);
        }
    }
    fx.recompute();

    assert_eq!(fx.render("{chapter:lastRunDistance#1}"), "2");
    assert_eq!(fx.render("{chapter:lastRunDistance#2}"), "5");
    assert_eq!(fx.render("{chapter:lastRunDistance#4}"), "-");
    assert_eq!(fx.render("{chapter:averageRunDistanceSession#2}"), "3.50");
    // More runs requested than exist: mean over all of them.
    assert_eq!(fx.render("{chapter:averageRunDistanceSession#10}"), "3.33");
    assert_eq!(fx.render("{chapter:averageRunDistance}"), "3.33");
}

#[test]
fn run_count_arguments_are_validated() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true]);
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"])])), stats);
    assert_eq!(
        fx.render("{chapter:lastRunDistance#abc}"),
        "<Invalid run count value: abc>"
    );
    assert_eq!(
        fx.render("{chapter:averageRunDistanceSession#0}"),
        "<Run count value must be 1 or greater: 0>"
    );
}

#[test]
fn color_buckets_count_rooms_by_rate() {
    let mut stats = ChapterStats::new("ch1");
    // 19/20 lands just under 0.95 in f32 and must still count light green.
    let mut nineteen = vec![true; 19];
    nineteen.push(false);
    played(&mut stats, "lg", &nineteen);
    played(&mut stats, "g", &[true, true, true, true, false]);
    played(&mut stats, "y", &[true, false]);
    played(&mut stats, "r", &[false, false, true, false]);
    stats.set_current_room("lg");
    let mut fx = Fixture::new(Some(make_path(&[("Start", &["lg", "g", "y", "r"])])), stats);
    fx.recompute();

    assert_eq!(
        fx.render("{chapter:color-lightGreen}/{chapter:color-green}/{chapter:color-yellow}/{chapter:color-red}"),
        "1/1/1/1"
    );
    assert_eq!(fx.render("{chapter:listColor-red}"), "r");
    assert_eq!(fx.render("{checkpoint:color-red}"), "1");
}

#[test]
fn streak_of_checkpoint_is_its_weakest_room() {
    let mut stats = ChapterStats::new("ch1");
    played(&mut stats, "a", &[true, true, true]);
    played(&mut stats, "b", &[true, true]);
    stats.set_current_room("a");
    let mut fx = Fixture::new(Some(make_path(&[("Start", &["a", "b"])])), stats);
    fx.recompute();

    assert_eq!(fx.render("{room:currentStreak}"), "3");
    assert_eq!(fx.render("{checkpoint:currentStreak}"), "2");
    assert_eq!(fx.render("{list:roomStreaks}"), "3, 2");
}

#[test]
fn progress_tokens_report_position() {
    let mut stats = ChapterStats::new("ch1");
    stats.set_current_room("b");
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"]), ("Mid", &["b", "c"])])), stats);

    assert_eq!(
        fx.render("{room:numberInChapter}/{chapter:roomCount} cp {chapter:checkpointCount}"),
        "2/3 cp 2"
    );
    assert_eq!(fx.render("{checkpoint:roomCount}"), "2");
    assert_eq!(fx.render("{room:name}"), "b");
}

#[test]
fn checkpoint_deaths_list_follows_the_current_run() {
    let mut stats = ChapterStats::new("ch1");
    for room in ["a", "b", "c"] {
        stats.set_current_room(room);
    }
    stats.set_current_room("b");
    if let Some(room) = stats.current_room_mut() {
        room.deaths_in_current_run = 2;
    }
    let fx = Fixture::new(Some(make_path(&[("Start", &["a"]), ("Mid", &["b", "c"])])), stats);
    assert_eq!(fx.render("Current run: {list:checkpointDeaths}"), "Current run: 0/2");
}

#[test]
fn live_formats_round_trip_with_newline_escapes() {
    let mut manager = StatManager::new();
    manager.load_formats("progress;Room {room:numberInChapter}\\nof {chapter:roomCount}\n");
    assert_eq!(manager.formats.len(), 1);
    assert_eq!(
        manager.formats[0].template,
        "Room {room:numberInChapter}\nof {chapter:roomCount}"
    );
    assert_eq!(
        manager.serialize_formats(),
        "progress;Room {room:numberInChapter}\\nof {chapter:roomCount}\n"
    );
}

#[test]
fn malformed_format_lines_are_skipped() {
    let mut manager = StatManager::new();
    let default_count = manager.formats.len();
    manager.load_formats("no separator here\n;empty name\n");
    assert_eq!(manager.formats.len(), default_count);
}
