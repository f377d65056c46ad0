//! Short natural-language summary of a forecast, e.g.
//! "Clear tonight, rain tomorrow, cooling down".

use crate::{
    model::{HourlySample, LocalTime, WeatherSnapshot},
    wmo::{self, WeatherBucket},
};

pub const FALLBACK_STATEMENT: &str = "Conditions expected to remain steady";

const LOOKAHEAD_SAMPLES: usize = 18;
const EVENING_START: u32 = 17;
const AFTERNOON_START: u32 = 12;
const EARLY_MORNING_END: u32 = 6;

/// Tomorrow-vs-today max difference for the evening "warming up" clause.
const EVENING_TREND_DELTA: f64 = 3.0;
/// Threshold for daytime trend clauses.
const DAYTIME_TREND_DELTA: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
struct Window {
    start: u32,
    end: u32,
}

const AFTERNOON: Window = Window { start: 12, end: 17 };
const EVENING: Window = Window { start: 17, end: 22 };

const AFTER_MORNING: [(Window, &str); 2] =
    [(AFTERNOON, "this afternoon"), (EVENING, "this evening")];
const AFTER_AFTERNOON: [(Window, &str); 1] = [(EVENING, "this evening")];

/// Summarize `snapshot` in a single capitalized phrase.
///
/// Never fails: missing or inconsistent arrays only remove the clauses that
/// depend on them.
pub fn generate(snapshot: &WeatherSnapshot) -> String {
    let Some(now) = snapshot.current.local_time() else {
        tracing::debug!(time = %snapshot.current.time, "unparseable current time");
        return FALLBACK_STATEMENT.to_string();
    };

    let upcoming = upcoming_samples(snapshot, now);
    let days = DayIndex::locate(snapshot, now);
    let current_bucket = WeatherBucket::classify(snapshot.current.weather_code);

    let mut segments: Vec<String> = Vec::with_capacity(4);

    if now.hour >= EVENING_START {
        if let Some(phrase) = wmo::tonight_phrase(snapshot.current.weather_code) {
            segments.push(format!("{phrase} tonight"));
        }
        if let Some(bucket) = days.tomorrow_bucket(snapshot) {
            segments.push(format!("{bucket} tomorrow"));
        }
        if let Some(delta) = days.max_delta(snapshot) {
            let trend = if delta >= EVENING_TREND_DELTA {
                "warming up"
            } else if delta <= -EVENING_TREND_DELTA {
                "cooling down"
            } else {
                "similar temperatures"
            };
            segments.push(trend.to_string());
        }
    } else {
        let (label, later): (&str, &[(Window, &str)]) = if now.hour < AFTERNOON_START {
            ("this morning", &AFTER_MORNING)
        } else {
            ("this afternoon", &AFTER_AFTERNOON)
        };

        if let Some(bucket) = current_bucket {
            segments.push(format!("{bucket} {label}"));
        }
        for (window, window_label) in later {
            if window.start <= now.hour {
                continue;
            }
            if let Some(bucket) = window_mode(&upcoming, *window) {
                segments.push(format!("{bucket} {window_label}"));
            }
        }

        if now.hour >= AFTERNOON_START && segments.len() < 2 {
            if let Some(bucket) = days.tomorrow_bucket(snapshot) {
                segments.push(format!("{bucket} tomorrow"));
            }
        }

        if segments.len() < 3 {
            if let Some(clause) = daytime_trend(snapshot, now, &upcoming, &days, &segments) {
                segments.push(clause);
            }
        }

        if segments.len() < 2 && !mentions_tomorrow(&segments) {
            if let Some(bucket) = days.tomorrow_bucket(snapshot) {
                segments.push(format!("{bucket} tomorrow"));
            }
        }
    }

    if segments.is_empty() {
        return FALLBACK_STATEMENT.to_string();
    }

    capitalize_first(&segments.join(", "))
}

/// Same-day samples strictly after `now`, at most [`LOOKAHEAD_SAMPLES`].
fn upcoming_samples(snapshot: &WeatherSnapshot, now: LocalTime) -> Vec<HourlySample> {
    if let Err(err) = snapshot.validate_hourly() {
        tracing::warn!(%err, "ignoring hourly forecast");
        return Vec::new();
    }

    snapshot
        .hourly_samples()
        .filter(|s| s.time.date == now.date && s.time > now)
        .take(LOOKAHEAD_SAMPLES)
        .collect()
}

/// Most frequent bucket among samples inside `window`. Ties go to the bucket
/// seen first in chronological order.
fn window_mode(samples: &[HourlySample], window: Window) -> Option<WeatherBucket> {
    let mut counts: Vec<(WeatherBucket, usize)> = Vec::new();

    for sample in samples {
        if sample.time.hour < window.start || sample.time.hour >= window.end {
            continue;
        }
        let Some(bucket) = WeatherBucket::classify(sample.weather_code) else {
            continue;
        };
        match counts.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, n)) => *n += 1,
            None => counts.push((bucket, 1)),
        }
    }

    // `counts` is in first-seen order, so a strict `>` keeps the earliest on ties.
    let mut best: Option<(WeatherBucket, usize)> = None;
    for (bucket, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((bucket, n));
        }
    }
    best.map(|(bucket, _)| bucket)
}

fn daytime_trend(
    snapshot: &WeatherSnapshot,
    now: LocalTime,
    upcoming: &[HourlySample],
    days: &DayIndex,
    segments: &[String],
) -> Option<String> {
    if let Some(delta) = days.max_delta(snapshot) {
        if delta >= DAYTIME_TREND_DELTA {
            return Some("warmer tomorrow".to_string());
        }
        if delta <= -DAYTIME_TREND_DELTA {
            return Some("cooler tomorrow".to_string());
        }
    }

    if now.hour < EARLY_MORNING_END {
        if let Some(last) = upcoming.last() {
            let delta = last.temperature - snapshot.current.temperature_2m;
            if delta >= DAYTIME_TREND_DELTA {
                return Some("warming up later".to_string());
            }
            if delta <= -DAYTIME_TREND_DELTA {
                return Some("cooling down later".to_string());
            }
        }
    }

    if mentions_tomorrow(segments) {
        return None;
    }
    days.tomorrow_bucket(snapshot)
        .filter(WeatherBucket::is_precipitation)
        .map(|bucket| format!("{bucket} tomorrow"))
}

fn mentions_tomorrow(segments: &[String]) -> bool {
    segments.iter().any(|s| s.ends_with("tomorrow"))
}

/// Positions of today and tomorrow in the daily arrays.
struct DayIndex {
    today: usize,
    tomorrow: usize,
}

impl DayIndex {
    fn locate(snapshot: &WeatherSnapshot, now: LocalTime) -> Self {
        let today = snapshot.daily.index_of(now.date).unwrap_or(0);
        Self { today, tomorrow: today + 1 }
    }

    fn tomorrow_bucket(&self, snapshot: &WeatherSnapshot) -> Option<WeatherBucket> {
        snapshot
            .daily
            .weather_code_at(self.tomorrow)
            .and_then(WeatherBucket::classify)
    }

    /// Tomorrow's max minus today's max.
    fn max_delta(&self, snapshot: &WeatherSnapshot) -> Option<f64> {
        let today = snapshot.daily.max_at(self.today)?;
        let tomorrow = snapshot.daily.max_at(self.tomorrow)?;
        Some(tomorrow - today)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
