//! One-room record lines for the stats and session-state files.
//!
//! Serialization always emits the current 8-field layout. Parsing walks an
//! ordered list of layout functions, newest first, so files written by every
//! earlier release still load. The three rate columns are display snapshots;
//! only the attempt list is authoritative.

use memchr::memchr_iter;

use super::error::CodecError;
use crate::chapter::RoomStats;

type LayoutFn = fn(&[&str]) -> Option<RoomStats>;

/// Newest first; the first layout that accepts the fields wins.
const LAYOUTS: &[LayoutFn] = &[parse_eight_field, parse_seven_field, parse_six_field];

/// `name;gb;gbSession;r5;r10;r20;max;a1,a2,...`
pub fn serialize(room: &RoomStats) -> String {
    let attempts: Vec<&str> = room
        .attempts
        .iter()
        .map(|&ok| if ok { "true" } else { "false" })
        .collect();
    format!(
        "{};{};{};{};{};{};{};{}",
        room.name,
        room.golden_deaths,
        room.golden_deaths_session,
        room.last_five_rate(),
        room.last_ten_rate(),
        room.last_twenty_rate(),
        room.max_rate(),
        attempts.join(",")
    )
}

pub fn parse(line_number: usize, line: &str) -> Result<RoomStats, CodecError> {
    let fields = split_fields(line);
    LAYOUTS
        .iter()
        .find_map(|layout| layout(&fields))
        .ok_or_else(|| CodecError::UnknownRoomLayout {
            line_number,
            line: line.to_string(),
        })
}

fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(8);
    let mut start = 0;
    for sep in memchr_iter(b';', bytes) {
        fields.push(&line[start..sep]);
        start = sep + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Current layout, with the per-session golden-death column.
fn parse_eight_field(fields: &[&str]) -> Option<RoomStats> {
    if fields.len() != 8 {
        return None;
    }
    let mut room = RoomStats::new(fields[0]);
    room.golden_deaths = fields[1].parse().ok()?;
    room.golden_deaths_session = fields[2].parse().ok()?;
    parse_rates(&fields[3..7])?;
    push_attempts(&mut room, fields[7])?;
    Some(room)
}

/// Pre-session layout: golden deaths but no session column.
fn parse_seven_field(fields: &[&str]) -> Option<RoomStats> {
    if fields.len() != 7 {
        return None;
    }
    let mut room = RoomStats::new(fields[0]);
    room.golden_deaths = fields[1].parse().ok()?;
    parse_rates(&fields[2..6])?;
    push_attempts(&mut room, fields[6])?;
    Some(room)
}

/// Legacy layout without golden-death tracking.
fn parse_six_field(fields: &[&str]) -> Option<RoomStats> {
    if fields.len() != 6 {
        return None;
    }
    let mut room = RoomStats::new(fields[0]);
    parse_rates(&fields[1..5])?;
    push_attempts(&mut room, fields[5])?;
    Some(room)
}

/// The rate columns are discarded, but a non-numeric value means the fields
/// are not where this layout expects them.
fn parse_rates(fields: &[&str]) -> Option<()> {
    for field in fields {
        field.parse::<f32>().ok()?;
    }
    Some(())
}

fn push_attempts(room: &mut RoomStats, csv: &str) -> Option<()> {
    for entry in csv.split(',').filter(|e| !e.is_empty()) {
        let outcome = if entry.eq_ignore_ascii_case("true") {
            true
        } else if entry.eq_ignore_ascii_case("false") {
            false
        } else {
            return None;
        };
        room.add_attempt(outcome);
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_record_parses_back() {
        let mut room = RoomStats::new("a-01");
        room.golden_deaths = 3;
        room.golden_deaths_session = 1;
        room.add_attempt(true);
        room.add_attempt(false);
        room.add_attempt(true);

        let parsed = parse(1, &serialize(&room)).unwrap();
        assert_eq!(parsed.name, "a-01");
        assert_eq!(parsed.golden_deaths, 3);
        assert_eq!(parsed.golden_deaths_session, 1);
        assert_eq!(parsed.attempts, [true, false, true]);
    }

    #[test]
    fn seven_field_layout_has_no_session_column() {
        let parsed = parse(1, "b-02;4;0.5;0.5;0.5;0.5;true,false").unwrap();
        assert_eq!(parsed.golden_deaths, 4);
        assert_eq!(parsed.golden_deaths_session, 0);
        assert_eq!(parsed.attempts, [true, false]);
    }

    #[test]
    fn six_field_legacy_layout_has_no_golden_columns() {
        let parsed = parse(1, "c-03;1;1;1;1;True,TRUE,false").unwrap();
        assert_eq!(parsed.golden_deaths, 0);
        assert_eq!(parsed.attempts, [true, true, false]);
    }

    #[test]
    fn empty_attempt_list_round_trips() {
        let room = RoomStats::new("fresh");
        let parsed = parse(1, &serialize(&room)).unwrap();
        assert!(parsed.attempts.is_empty());
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let err = parse(7, "only;two").unwrap_err();
        assert!(matches!(err, CodecError::UnknownRoomLayout { line_number: 7, .. }));
    }
}
