use hashbrown::HashSet;

use super::{CheckpointInfo, PathInfo, RoomInfo};

/// Name given to the first checkpoint when the host supplies none.
pub const DEFAULT_CHECKPOINT_NAME: &str = "Start";

/// State machine that observes a live traversal and incrementally builds a
/// [`PathInfo`].
///
/// Precondition: `add_checkpoint` must be called before the first `add_room`.
/// The tracker guarantees this by seeding every recorder with a checkpoint
/// (the default name if nothing better is known) followed by the room the
/// player is standing in.
#[derive(Debug, Default)]
pub struct PathRecorder {
    /// Rooms seen anywhere during this recording; a room is only ever added
    /// to the first segment it appears in.
    visited: HashSet<String>,
    segments: Vec<Vec<String>>,
    names: Vec<String>,
    abbreviations: Vec<String>,
    /// Physical checkpoint markers already activated, so re-triggering the
    /// same marker on a retry does not fragment the path.
    activated_markers: HashSet<(i32, i32)>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a room to the current segment, unless it was already recorded.
    pub fn add_room(&mut self, name: &str) {
        debug_assert!(
            !self.segments.is_empty(),
            "add_checkpoint must precede the first add_room"
        );
        if self.visited.contains(name) {
            return;
        }
        self.visited.insert(name.to_string());
        if let Some(segment) = self.segments.last_mut() {
            segment.push(name.to_string());
        }
    }

    /// Start a new checkpoint segment.
    ///
    /// The room that triggered the checkpoint belongs to the new segment, so
    /// the last room of the current segment moves over. A `marker` that was
    /// already activated makes the whole call a no-op.
    pub fn add_checkpoint(&mut self, marker: Option<(i32, i32)>, name: Option<&str>) {
        if let Some(marker) = marker {
            if self.activated_markers.contains(&marker) {
                return;
            }
            self.activated_markers.insert(marker);
        }

        let carried = self.segments.last_mut().and_then(|segment| segment.pop());
        self.segments.push(carried.into_iter().collect());

        match name {
            Some(name) => {
                self.names.push(name.to_string());
                self.abbreviations.push(abbreviate(name));
            }
            None => {
                let synthesized = format!("CP{}", self.segments.len());
                self.names.push(synthesized.clone());
                self.abbreviations.push(synthesized);
            }
        }
    }

    /// Number of checkpoint segments recorded so far.
    pub fn checkpoint_count(&self) -> usize {
        self.segments.len()
    }

    /// Convert the recording into a path definition, assigning room indices.
    ///
    /// A recording with a single checkpoint gets the generic "Room"/"R"
    /// label: whatever name it carried only described where recording began.
    pub fn into_path_info(self) -> PathInfo {
        let single = self.segments.len() == 1;
        let checkpoints = self
            .segments
            .into_iter()
            .zip(self.names.into_iter().zip(self.abbreviations))
            .map(|(rooms, (name, abbreviation))| {
                let (name, abbreviation) = if single {
                    ("Room".to_string(), "R".to_string())
                } else {
                    (name, abbreviation)
                };
                let mut cp = CheckpointInfo::new(name, abbreviation);
                cp.rooms = rooms
                    .into_iter()
                    .map(|name| RoomInfo {
                        name,
                        number_in_checkpoint: 0,
                        number_in_chapter: 0,
                    })
                    .collect();
                cp
            })
            .collect();
        PathInfo::from_checkpoints(checkpoints)
    }
}

/// Derive a checkpoint abbreviation: single-word names take their first two
/// letters, multi-word names their initials, uppercased either way.
fn abbreviate(name: &str) -> String {
    let words: Vec<&str> = name.split(' ').filter(|w| !w.is_empty()).collect();
    match words.as_slice() {
        [] => String::new(),
        [word] => word.chars().take(2).collect::<String>().to_uppercase(),
        words => words
            .iter()
            .filter_map(|word| word.chars().next())
            .collect::<String>()
            .to_uppercase(),
    }
}
