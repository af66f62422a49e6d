//! Chapter stats file and the session-state file.
//!
//! The stats file opens with the current room's record, duplicated from the
//! main list so consumers that only care about the live room can read a
//! single line. The session-state file is write-only output for external
//! consumers and is never parsed back.

use super::error::CodecError;
use super::room_line;
use crate::chapter::ChapterStats;

pub fn serialize(stats: &ChapterStats) -> String {
    let mut out = String::new();
    let Some(current) = stats.current_room() else {
        // A chapter without a current room has never been entered; rooms are
        // only created after the pointer is set.
        return out;
    };
    out.push_str(&room_line::serialize(current));
    out.push('\n');

    let mut names: Vec<&String> = stats.rooms.keys().collect();
    names.sort();
    for name in names {
        if let Some(room) = stats.rooms.get(name) {
            out.push_str(&room_line::serialize(room));
            out.push('\n');
        }
    }
    out
}

/// Any line that matches no layout fails the whole file; the loader decides
/// what to do with that (log and start fresh).
pub fn parse(chapter_key: &str, text: &str) -> Result<ChapterStats, CodecError> {
    let mut stats = ChapterStats::new(chapter_key);
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let Some((index, current_line)) = lines.next() else {
        return Ok(stats);
    };
    let current = room_line::parse(index + 1, current_line)?;
    let current_name = current.name.clone();
    stats.rooms.insert(current.name.clone(), current);
    stats.current_room = Some(current_name);

    for (index, line) in lines {
        let room = room_line::parse(index + 1, line)?;
        stats.rooms.insert(room.name.clone(), room);
    }
    Ok(stats)
}

/// `stats/modState.txt`: the current room's record, then one line of session
/// flags for external consumers.
pub fn serialize_session(stats: &ChapterStats) -> String {
    let room_record = stats
        .current_room()
        .map(room_line::serialize)
        .unwrap_or_default();
    let state = &stats.mod_state;
    format!(
        "{}\n{};{};{};{};{}\n",
        room_record,
        stats.chapter_key,
        state.death_tracking_paused,
        state.recording_path,
        state.tracker_version.as_deref().unwrap_or("-"),
        state.holding_golden,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChapterStats {
        let mut stats = ChapterStats::new("city");
        stats.set_current_room("b");
        stats.add_attempt(true);
        stats.set_current_room("a");
        stats.add_attempt(false);
        stats.add_attempt(true);
        stats
    }

    #[test]
    fn current_room_leads_and_is_duplicated() {
        let text = serialize(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("a;"));
        assert_eq!(lines[0], lines[1]);
        assert!(lines[2].starts_with("b;"));
    }

    #[test]
    fn round_trip_restores_current_room_and_attempts() {
        let restored = parse("city", &serialize(&sample())).unwrap();
        assert_eq!(restored.current_room.as_deref(), Some("a"));
        assert_eq!(restored.rooms.len(), 2);
        assert_eq!(restored.room("a").unwrap().attempts, [false, true]);
        assert_eq!(restored.room("b").unwrap().attempts, [true]);
    }

    #[test]
    fn empty_file_is_a_fresh_chapter() {
        let stats = parse("city", "").unwrap();
        assert!(stats.current_room.is_none());
        assert!(stats.rooms.is_empty());
    }

    #[test]
    fn one_bad_line_fails_the_file() {
        let mut text = serialize(&sample());
        text.push_str("not a room record\n");
        assert!(parse("city", &text).is_err());
    }

    #[test]
    fn session_state_carries_the_flags() {
        let mut stats = sample();
        stats.mod_state.death_tracking_paused = true;
        stats.mod_state.holding_golden = true;
        let text = serialize_session(&stats);
        let flags = text.lines().nth(1).unwrap();
        assert_eq!(flags, "city;true;false;-;true");

        // The version slot holds the tracker's own version once it is set.
        stats.mod_state.tracker_version = Some("1.2.3".to_string());
        let text = serialize_session(&stats);
        assert_eq!(text.lines().nth(1).unwrap(), "city;true;false;1.2.3;true");
    }
}
