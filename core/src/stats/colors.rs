use super::{MISSING_PATH, NOT_ON_PATH, Stat, StatContext, mark_all};

const CHAPTER_LIGHT_GREEN: &str = "{chapter:color-lightGreen}";
const CHAPTER_GREEN: &str = "{chapter:color-green}";
const CHAPTER_YELLOW: &str = "{chapter:color-yellow}";
const CHAPTER_RED: &str = "{chapter:color-red}";
const CHECKPOINT_LIGHT_GREEN: &str = "{checkpoint:color-lightGreen}";
const CHECKPOINT_GREEN: &str = "{checkpoint:color-green}";
const CHECKPOINT_YELLOW: &str = "{checkpoint:color-yellow}";
const CHECKPOINT_RED: &str = "{checkpoint:color-red}";
const CHAPTER_LIST_RED: &str = "{chapter:listColor-red}";
const CHECKPOINT_LIST_RED: &str = "{checkpoint:listColor-red}";

const TOKENS: &[&str] = &[
    CHAPTER_LIGHT_GREEN,
    CHAPTER_GREEN,
    CHAPTER_YELLOW,
    CHAPTER_RED,
    CHECKPOINT_LIGHT_GREEN,
    CHECKPOINT_GREEN,
    CHECKPOINT_YELLOW,
    CHECKPOINT_RED,
    CHAPTER_LIST_RED,
    CHECKPOINT_LIST_RED,
];

/// Buckets rooms by windowed success rate: light green >= 95%, green >= 80%,
/// yellow >= 50%, red below. The 0.949999 bound absorbs float error on
/// ratios like 19/20.
#[derive(Default)]
struct Buckets {
    counts: [u32; 4],
    red_rooms: Vec<String>,
}

impl Buckets {
    fn add(&mut self, rate: f32, room_name: String) {
        if rate >= 0.949999 {
            self.counts[0] += 1;
        } else if rate >= 0.8 {
            self.counts[1] += 1;
        } else if rate >= 0.5 {
            self.counts[2] += 1;
        } else {
            self.counts[3] += 1;
            self.red_rooms.push(room_name);
        }
    }
}

pub struct SuccessRateColorsStat;

impl Stat for SuccessRateColorsStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(path) = ctx.path else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH);
        };

        let window = ctx.settings.attempt_window;
        let current = ctx.stats.current_room.as_deref();

        let mut chapter = Buckets::default();
        let mut current_cp: Option<Buckets> = None;
        for cp in &path.checkpoints {
            let mut cp_buckets = Buckets::default();
            let mut holds_current = false;
            for room in &cp.rooms {
                let rate = ctx
                    .stats
                    .room(&room.name)
                    .map_or(0.0, |r| r.average_success_over(window));
                let display = ctx.formatted_room_name(cp, room);
                chapter.add(rate, display.clone());
                cp_buckets.add(rate, display);
                if current == Some(room.name.as_str()) {
                    holds_current = true;
                }
            }
            if holds_current {
                current_cp = Some(cp_buckets);
            }
        }

        let mut out = template
            .replace(CHAPTER_LIGHT_GREEN, &chapter.counts[0].to_string())
            .replace(CHAPTER_GREEN, &chapter.counts[1].to_string())
            .replace(CHAPTER_YELLOW, &chapter.counts[2].to_string())
            .replace(CHAPTER_RED, &chapter.counts[3].to_string())
            .replace(CHAPTER_LIST_RED, &chapter.red_rooms.join(", "));

        match current_cp {
            Some(buckets) => out
                .replace(CHECKPOINT_LIGHT_GREEN, &buckets.counts[0].to_string())
                .replace(CHECKPOINT_GREEN, &buckets.counts[1].to_string())
                .replace(CHECKPOINT_YELLOW, &buckets.counts[2].to_string())
                .replace(CHECKPOINT_RED, &buckets.counts[3].to_string())
                .replace(CHECKPOINT_LIST_RED, &buckets.red_rooms.join(", ")),
            None => {
                for token in &[
                    CHECKPOINT_LIGHT_GREEN,
                    CHECKPOINT_GREEN,
                    CHECKPOINT_YELLOW,
                    CHECKPOINT_RED,
                    CHECKPOINT_LIST_RED,
                ] {
                    out = out.replace(token, NOT_ON_PATH);
                }
                out
            }
        }
    }
}
