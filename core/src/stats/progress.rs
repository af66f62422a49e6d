use super::{MISSING_PATH, NOT_ON_PATH, Stat, StatContext, mark_all};

const CHAPTER_ROOM_COUNT: &str = "{chapter:roomCount}";
const CHAPTER_CHECKPOINT_COUNT: &str = "{chapter:checkpointCount}";
const CHECKPOINT_ROOM_COUNT: &str = "{checkpoint:roomCount}";
const ROOM_NAME: &str = "{room:name}";
const ROOM_NUMBER_IN_CHAPTER: &str = "{room:numberInChapter}";

const TOKENS: &[&str] = &[
    CHAPTER_ROOM_COUNT,
    CHAPTER_CHECKPOINT_COUNT,
    CHECKPOINT_ROOM_COUNT,
    ROOM_NAME,
    ROOM_NUMBER_IN_CHAPTER,
];

/// Where the player is: room and checkpoint counts, current room position.
pub struct ProgressStat;

impl Stat for ProgressStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(path) = ctx.path else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH);
        };

        let mut out = template
            .replace(CHAPTER_ROOM_COUNT, &path.room_count().to_string())
            .replace(
                CHAPTER_CHECKPOINT_COUNT,
                &path.checkpoints.len().to_string(),
            );

        match ctx.current_room_on_path() {
            Some((cp, room)) => out
                .replace(CHECKPOINT_ROOM_COUNT, &cp.rooms.len().to_string())
                .replace(ROOM_NAME, &ctx.formatted_room_name(cp, room))
                .replace(
                    ROOM_NUMBER_IN_CHAPTER,
                    &room.number_in_chapter.to_string(),
                ),
            None => {
                for token in &[CHECKPOINT_ROOM_COUNT, ROOM_NAME, ROOM_NUMBER_IN_CHAPTER] {
                    out = out.replace(token, NOT_ON_PATH);
                }
                out
            }
        }
    }
}
