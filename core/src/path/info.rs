use crate::config::RoomNameFormat;

/// One room's position on the recorded path. Both indices are 1-based and
/// assigned when the [`PathInfo`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub name: String,
    pub number_in_checkpoint: u32,
    pub number_in_chapter: u32,
}

/// A named, ordered group of consecutive rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointInfo {
    pub name: String,
    pub abbreviation: String,
    pub rooms: Vec<RoomInfo>,
}

impl CheckpointInfo {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            rooms: Vec::new(),
        }
    }

    /// Display name of `room` in this checkpoint, e.g. `EH-3` for the third
    /// room of "Event Horizon".
    pub fn formatted_room_name(&self, room: &RoomInfo, format: RoomNameFormat) -> String {
        match format {
            RoomNameFormat::AbbreviationAndNumber => {
                format!("{}-{}", self.abbreviation, room.number_in_checkpoint)
            }
            RoomNameFormat::NameAndNumber => {
                format!("{}-{}", self.name, room.number_in_checkpoint)
            }
            RoomNameFormat::RoomName => room.name.clone(),
        }
    }
}

/// Immutable-per-load structural description of a chapter: ordered
/// checkpoints, each an ordered list of rooms. Room names are unique across
/// the whole path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInfo {
    pub checkpoints: Vec<CheckpointInfo>,
}

impl PathInfo {
    /// Build a path from checkpoints, assigning the 1-based room numbering.
    /// Both the recorder and the file parser construct paths through here so
    /// indices are always consistent with room order.
    pub fn from_checkpoints(mut checkpoints: Vec<CheckpointInfo>) -> Self {
        let mut number_in_chapter = 0;
        for checkpoint in &mut checkpoints {
            for (i, room) in checkpoint.rooms.iter_mut().enumerate() {
                number_in_chapter += 1;
                room.number_in_checkpoint = (i + 1) as u32;
                room.number_in_chapter = number_in_chapter;
            }
        }
        Self { checkpoints }
    }

    pub fn room_count(&self) -> usize {
        self.checkpoints.iter().map(|cp| cp.rooms.len()).sum()
    }

    /// Walk all rooms in path order.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomInfo> {
        self.checkpoints.iter().flat_map(|cp| cp.rooms.iter())
    }

    pub fn find_room(&self, name: &str) -> Option<&RoomInfo> {
        self.rooms().find(|room| room.name == name)
    }

    /// Index of the checkpoint containing `name`, if the room is on the path.
    pub fn checkpoint_index_of(&self, name: &str) -> Option<usize> {
        self.checkpoints
            .iter()
            .position(|cp| cp.rooms.iter().any(|room| room.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(name: &str, abbr: &str, rooms: &[&str]) -> CheckpointInfo {
        let mut cp = CheckpointInfo::new(name, abbr);
        cp.rooms = rooms
            .iter()
            .map(|r| RoomInfo {
                name: r.to_string(),
                number_in_checkpoint: 0,
                number_in_chapter: 0,
            })
            .collect();
        cp
    }

    #[test]
    fn numbering_is_assigned_across_checkpoints() {
        let path = PathInfo::from_checkpoints(vec![
            checkpoint("Start", "ST", &["a", "b"]),
            checkpoint("Mid", "MI", &["c"]),
        ]);

        let c = path.find_room("c").unwrap();
        assert_eq!(c.number_in_checkpoint, 1);
        assert_eq!(c.number_in_chapter, 3);
        assert_eq!(path.room_count(), 3);
        assert_eq!(path.checkpoint_index_of("c"), Some(1));
        assert_eq!(path.checkpoint_index_of("z"), None);
    }

    #[test]
    fn formatted_room_names() {
        let path = PathInfo::from_checkpoints(vec![checkpoint("Event Horizon", "EH", &["f-07"])]);
        let cp = &path.checkpoints[0];
        let room = &cp.rooms[0];
        assert_eq!(
            cp.formatted_room_name(room, RoomNameFormat::AbbreviationAndNumber),
            "EH-1"
        );
        assert_eq!(
            cp.formatted_room_name(room, RoomNameFormat::NameAndNumber),
            "Event Horizon-1"
        );
        assert_eq!(cp.formatted_room_name(room, RoomNameFormat::RoomName), "f-07");
    }
}
