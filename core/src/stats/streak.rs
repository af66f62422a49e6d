use super::{MISSING_PATH, NOT_ON_PATH, Stat, StatContext, mark_all};

const ROOM_STREAK: &str = "{room:currentStreak}";
const CHECKPOINT_STREAK: &str = "{checkpoint:currentStreak}";
const LIST_ROOM_STREAKS: &str = "{list:roomStreaks}";

const TOKENS: &[&str] = &[ROOM_STREAK, CHECKPOINT_STREAK, LIST_ROOM_STREAKS];

/// Consecutive deathless clears: per room, and the weakest room of the
/// current checkpoint.
pub struct StreakStat;

impl Stat for StreakStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(path) = ctx.path else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH);
        };

        let streak_of = |name: &str| ctx.stats.room(name).map_or(0, |r| r.success_streak());

        let streaks: Vec<String> = path
            .rooms()
            .map(|room| streak_of(&room.name).to_string())
            .collect();
        let list = ctx.join_list(&streaks);

        let position = ctx.current_room_on_path();
        let mut out = template.replace(LIST_ROOM_STREAKS, &list);
        match position {
            Some((cp, room)) => {
                // The checkpoint can only be as consistent as its weakest
                // room.
                let cp_streak = cp
                    .rooms
                    .iter()
                    .map(|r| streak_of(&r.name))
                    .min()
                    .unwrap_or(0);
                out = out.replace(ROOM_STREAK, &streak_of(&room.name).to_string());
                out.replace(CHECKPOINT_STREAK, &cp_streak.to_string())
            }
            None => {
                out = out.replace(ROOM_STREAK, NOT_ON_PATH);
                out.replace(CHECKPOINT_STREAK, NOT_ON_PATH)
            }
        }
    }
}
