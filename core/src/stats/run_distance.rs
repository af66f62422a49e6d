use super::{
    MISSING_PATH, Stat, StatContext, format_double, mark_all, param_args,
};

const AVERAGE_RUN_DISTANCE: &str = "{chapter:averageRunDistance}";
const AVERAGE_RUN_DISTANCE_SESSION: &str = "{chapter:averageRunDistanceSession}";
const AVERAGE_SESSION_OVER_PREFIX: &str = "{chapter:averageRunDistanceSession#";
const LAST_RUN_PREFIX: &str = "{chapter:lastRunDistance#";

const TOKENS: &[&str] = &[AVERAGE_RUN_DISTANCE, AVERAGE_RUN_DISTANCE_SESSION];

/// How far golden runs tend to get, measured in chapter room numbers.
/// `#N` forms read the golden-run history backward: `lastRunDistance#1` is
/// the most recent run's room number, `averageRunDistanceSession#N` the mean
/// over the last N runs.
pub struct RunDistanceStat;

impl Stat for RunDistanceStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn applies_to(&self, template: &str) -> bool {
        TOKENS.iter().any(|t| template.contains(t))
            || template.contains(AVERAGE_SESSION_OVER_PREFIX)
            || template.contains(LAST_RUN_PREFIX)
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(path) = ctx.path else {
            let mut out = mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH);
            for arg in param_args(&out, AVERAGE_SESSION_OVER_PREFIX) {
                out = out.replace(
                    &format!("{AVERAGE_SESSION_OVER_PREFIX}{arg}}}"),
                    MISSING_PATH,
                );
            }
            for arg in param_args(&out, LAST_RUN_PREFIX) {
                out = out.replace(&format!("{LAST_RUN_PREFIX}{arg}}}"), MISSING_PATH);
            }
            return out;
        };

        // Weighted means over the per-room golden-death counters.
        let mut total = (0u32, 0u32);
        let mut distance_sum = (0u64, 0u64);
        for room in path.rooms() {
            let Some(stats) = ctx.stats.room(&room.name) else {
                continue;
            };
            total.0 += stats.golden_deaths;
            total.1 += stats.golden_deaths_session;
            distance_sum.0 += u64::from(room.number_in_chapter) * u64::from(stats.golden_deaths);
            distance_sum.1 +=
                u64::from(room.number_in_chapter) * u64::from(stats.golden_deaths_session);
        }
        let average = weighted_mean(distance_sum.0, total.0);
        let average_session = weighted_mean(distance_sum.1, total.1);

        let mut out = template.to_string();
        out = self.render_parameterized(ctx, &out);
        out = out.replace(AVERAGE_RUN_DISTANCE, &format_double(average));
        out.replace(AVERAGE_RUN_DISTANCE_SESSION, &format_double(average_session))
    }
}

fn weighted_mean(sum: u64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / f64::from(count)
}

impl RunDistanceStat {
    fn render_parameterized(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let average_args = param_args(template, AVERAGE_SESSION_OVER_PREFIX);
        let last_args = param_args(template, LAST_RUN_PREFIX);
        if average_args.is_empty() && last_args.is_empty() {
            return template.to_string();
        }

        // Walk the history newest-first, recording the running average and
        // per-run distances at each requested depth. Runs whose room is not
        // on the path are skipped.
        let mut distance_at: Vec<u32> = Vec::new();
        for room_name in ctx.golden_runs.iter().rev() {
            let Some(info) = ctx.path.and_then(|p| p.find_room(room_name)) else {
                continue;
            };
            distance_at.push(info.number_in_chapter);
        }
        let total: u64 = distance_at.iter().map(|&d| u64::from(d)).sum();
        let overall_mean = weighted_mean(total, distance_at.len() as u32);

        let mut out = template.to_string();
        for arg in average_args {
            let token = format!("{AVERAGE_SESSION_OVER_PREFIX}{arg}}}");
            let text = match parse_run_count(&arg) {
                Ok(n) => {
                    if distance_at.is_empty() {
                        MISSING_PATH.to_string()
                    } else if n <= distance_at.len() {
                        let sum: u64 = distance_at[..n].iter().map(|&d| u64::from(d)).sum();
                        format_double(weighted_mean(sum, n as u32))
                    } else {
                        // Fewer runs than requested: fall back to the mean
                        // over everything we have.
                        format_double(overall_mean)
                    }
                }
                Err(note) => note,
            };
            out = out.replace(&token, &text);
        }

        for arg in last_args {
            let token = format!("{LAST_RUN_PREFIX}{arg}}}");
            let text = match parse_run_count(&arg) {
                Ok(n) => match distance_at.get(n - 1) {
                    Some(distance) => distance.to_string(),
                    None => MISSING_PATH.to_string(),
                },
                Err(note) => note,
            };
            out = out.replace(&token, &text);
        }
        out
    }
}

fn parse_run_count(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err(format!("<Run count value must be 1 or greater: {arg}>")),
        Err(_) => Err(format!("<Invalid run count value: {arg}>")),
    }
}
