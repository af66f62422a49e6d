use super::{
    MISSING_PATH, MISSING_PATH_PERCENT, NOT_ON_PATH_PERCENT, Stat, StatContext, format_percent,
    mark_all,
};

const ROOM_SUCCESS_RATE: &str = "{room:successRate}";
const CHECKPOINT_SUCCESS_RATE: &str = "{checkpoint:successRate}";
const CHAPTER_SUCCESS_RATE: &str = "{chapter:successRate}";
const ROOM_SUCCESSES: &str = "{room:successes}";
const ROOM_FAILURES: &str = "{room:failures}";
const ROOM_ATTEMPTS: &str = "{room:attempts}";

const TOKENS: &[&str] = &[
    ROOM_SUCCESS_RATE,
    CHECKPOINT_SUCCESS_RATE,
    CHAPTER_SUCCESS_RATE,
    ROOM_SUCCESSES,
    ROOM_FAILURES,
    ROOM_ATTEMPTS,
];

/// Windowed success rates for the current room, its checkpoint, and the
/// whole chapter.
pub struct SuccessRateStat;

impl Stat for SuccessRateStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(aggregates) = ctx.aggregates else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH_PERCENT);
        };

        let window = ctx.settings.attempt_window;
        let (rate, successes, attempts) = match ctx.stats.current_room() {
            Some(room) => (
                f64::from(room.average_success_over(window)),
                room.successes_over(window),
                room.attempts_over(window),
            ),
            None => (0.0, 0, 0),
        };

        let mut out = template.replace(ROOM_SUCCESS_RATE, &format_percent(rate));
        out = out.replace(ROOM_SUCCESSES, &successes.to_string());
        out = out.replace(ROOM_FAILURES, &(attempts - successes).to_string());
        out = out.replace(ROOM_ATTEMPTS, &attempts.to_string());

        out = out.replace(
            CHAPTER_SUCCESS_RATE,
            &format_percent(aggregates.chapter.success_rate()),
        );

        let checkpoint_rate = aggregates
            .current_checkpoint
            .and_then(|i| aggregates.checkpoints.get(i))
            .map(|agg| format_percent(agg.success_rate()));
        out.replace(
            CHECKPOINT_SUCCESS_RATE,
            checkpoint_rate.as_deref().unwrap_or(NOT_ON_PATH_PERCENT),
        )
    }
}
