use std::io::Write;

use splittrack_core::chapter::MAX_ATTEMPTS;
use splittrack_core::{ExitMode, Tracker, TrackerEvent};

pub fn enter_chapter(
    tracker: &mut Tracker,
    chapter: &str,
    room: &str,
    chapter_name: Option<&str>,
    campaign_name: Option<&str>,
) {
    tracker.handle(TrackerEvent::ChapterEntered {
        chapter_key: chapter.to_string(),
        chapter_name: chapter_name.unwrap_or(chapter).to_string(),
        campaign_name: campaign_name.unwrap_or("").to_string(),
        starting_room: room.to_string(),
    });
    println!("entered chapter {chapter} in room {room}");
}

pub fn enter_room(tracker: &mut Tracker, room: &str, respawn: bool, golden: bool) {
    tracker.handle(TrackerEvent::RoomEntered {
        room: room.to_string(),
        is_respawn: respawn,
        holding_golden: golden,
    });
}

pub fn room_done(tracker: &mut Tracker, reset_on_death: bool) {
    tracker.handle(TrackerEvent::RoomCompleted { reset_on_death });
}

pub fn die(tracker: &mut Tracker, golden: bool) {
    tracker.handle(TrackerEvent::PlayerDied {
        holding_golden: golden,
    });
}

pub fn complete(tracker: &mut Tracker) {
    tracker.handle(TrackerEvent::ChapterCompleted);
    println!("chapter completed");
}

pub fn checkpoint(tracker: &mut Tracker, name: Option<&str>, marker: Option<(i32, i32)>) {
    tracker.handle(TrackerEvent::CheckpointReached {
        marker,
        name: name.map(str::to_string),
    });
}

pub fn exit_run(tracker: &mut Tracker, restart: bool, golden_restart: bool) {
    let mode = if golden_restart {
        ExitMode::GoldenRestart
    } else if restart {
        ExitMode::Restart
    } else {
        ExitMode::Other
    };
    tracker.handle(TrackerEvent::RunExited { mode });
}

pub fn record(tracker: &mut Tracker) {
    tracker.start_recording();
    if tracker.is_recording() {
        println!("recording path");
    }
}

pub fn stop_record(tracker: &mut Tracker) {
    tracker.stop_recording();
    println!("recording stopped");
}

pub fn render(tracker: &Tracker, template: &str) {
    match tracker.render_template(template) {
        Some(text) => println!("{text}"),
        None => println!("no chapter open"),
    }
}

pub fn summary(tracker: &Tracker) {
    tracker.write_summary();
    println!("summary written");
}

pub fn show_path(tracker: &Tracker) {
    let Some(path) = tracker.path() else {
        println!("no path for the current chapter");
        return;
    };
    for checkpoint in &path.checkpoints {
        println!("{} ({})", checkpoint.name, checkpoint.abbreviation);
        for room in &checkpoint.rooms {
            println!(
                "  {}-{}: {}",
                checkpoint.abbreviation, room.number_in_checkpoint, room.name
            );
        }
    }
}

pub fn show_stats(tracker: &Tracker) {
    let Some(context) = tracker.context() else {
        println!("no chapter open");
        return;
    };
    let mut rooms: Vec<_> = context.stats.rooms.values().collect();
    rooms.sort_by(|a, b| a.name.cmp(&b.name));
    for room in rooms {
        println!(
            "{}: {}/{} ({:.2}%), golden deaths {} ({} this session)",
            room.name,
            room.successes_over(MAX_ATTEMPTS),
            room.attempts_over(MAX_ATTEMPTS),
            f64::from(room.average_success_over(MAX_ATTEMPTS)) * 100.0,
            room.golden_deaths,
            room.golden_deaths_session,
        );
    }
}

pub fn show_config(tracker: &Tracker) {
    println!("{:#?}", tracker.config());
}

pub fn toggle_pause(tracker: &mut Tracker) {
    let config = tracker.config_mut();
    config.pause_death_tracking = !config.pause_death_tracking;
    let paused = tracker.config().pause_death_tracking;
    println!("death tracking {}", if paused { "paused" } else { "active" });
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}
