//! Path definition file: one checkpoint per line,
//! `Name;Abbreviation;RoomCount;id1,id2,...`.

use super::error::CodecError;
use crate::path::{CheckpointInfo, PathInfo, RoomInfo};

pub fn serialize(path: &PathInfo) -> String {
    let mut out = String::new();
    for cp in &path.checkpoints {
        let rooms: Vec<&str> = cp.rooms.iter().map(|r| r.name.as_str()).collect();
        out.push_str(&format!(
            "{};{};{};{}\n",
            cp.name,
            cp.abbreviation,
            cp.rooms.len(),
            rooms.join(",")
        ));
    }
    out
}

pub fn parse(text: &str) -> Result<PathInfo, CodecError> {
    let mut checkpoints = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        checkpoints.push(parse_checkpoint(index + 1, line)?);
    }
    Ok(PathInfo::from_checkpoints(checkpoints))
}

fn parse_checkpoint(line_number: usize, line: &str) -> Result<CheckpointInfo, CodecError> {
    let mut fields = line.splitn(4, ';');
    let (name, abbreviation, declared, rooms) = match (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) {
        (Some(name), Some(abbr), Some(count), Some(rooms)) => (name, abbr, count, rooms),
        _ => return Err(CodecError::InvalidCheckpointLine { line_number }),
    };
    let declared: usize = declared
        .parse()
        .map_err(|_| CodecError::InvalidCheckpointLine { line_number })?;

    let mut cp = CheckpointInfo::new(name, abbreviation);
    cp.rooms = rooms
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| RoomInfo {
            name: id.to_string(),
            number_in_checkpoint: 0,
            number_in_chapter: 0,
        })
        .collect();

    if cp.rooms.len() != declared {
        return Err(CodecError::RoomCountMismatch {
            line_number,
            declared,
            actual: cp.rooms.len(),
        });
    }
    Ok(cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_structure_and_numbering() {
        let text = "Start;ST;2;a,b\nEvent Horizon;EH;1;c\n";
        let path = parse(text).unwrap();
        assert_eq!(path.checkpoints.len(), 2);
        assert_eq!(path.checkpoints[1].name, "Event Horizon");
        assert_eq!(path.find_room("c").unwrap().number_in_chapter, 3);
        assert_eq!(serialize(&path), text);
    }

    #[test]
    fn declared_count_must_match() {
        let err = parse("Start;ST;3;a,b").unwrap_err();
        assert!(matches!(
            err,
            CodecError::RoomCountMismatch { declared: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = parse("Start;ST").unwrap_err();
        assert!(matches!(err, CodecError::InvalidCheckpointLine { line_number: 1 }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let path = parse("\nStart;ST;1;a\n\n").unwrap();
        assert_eq!(path.room_count(), 1);
    }
}
