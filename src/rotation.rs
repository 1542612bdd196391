/// Rotation selector module
///
/// Pure, deterministic mapping from (day of year, run index) to the content
/// type each scheduled run should post. Everything here is a function of its
/// arguments only, so the schedule is reproducible in tests and auditable
/// after the fact. The caller injects the date; nothing reads the clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Content categories, in canonical rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Info,
    Question,
    Poll,
    Cricket,
}

/// Canonical ordering used by the daily rotation.
pub const CONTENT_TYPES: [ContentType; 4] = [
    ContentType::Info,
    ContentType::Question,
    ContentType::Poll,
    ContentType::Cricket,
];

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Info => "info",
            ContentType::Question => "question",
            ContentType::Poll => "poll",
            ContentType::Cricket => "cricket",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six permutations of three elements, lexicographic by position.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Which content type is held out of runs 1-3 on this day.
/// Cycles through all four types across the year.
pub fn held_out_type(day_of_year: u32) -> ContentType {
    CONTENT_TYPES[(day_of_year % 4) as usize]
}

/// Content type for a scheduled run.
///
/// Runs 1-3 draw from the three types not held out today, ordered by one of
/// six permutations selected by `day_of_year % 6`. Run 4, when configured,
/// gets the held-out type so a four-slot day covers all categories.
pub fn content_type_for(day_of_year: u32, run_index: u8) -> ContentType {
    let held_out = (day_of_year % 4) as usize;
    if run_index >= 4 {
        return CONTENT_TYPES[held_out];
    }
    let remaining: Vec<ContentType> = CONTENT_TYPES
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != held_out)
        .map(|(_, t)| *t)
        .collect();
    let perm = PERMUTATIONS[(day_of_year % 6) as usize];
    remaining[perm[(run_index - 1) as usize]]
}

/// Deterministic ~5% skip so some days post fewer tweets.
/// Same hash as every previous deployment, so historical runs stay auditable.
pub fn should_skip(day_of_year: u32, run_index: u8) -> bool {
    (day_of_year * 31 + run_index as u32) % 100 < 5
}

/// Index into a prompt variant set of size `num_variants`.
pub fn variant_index(day_of_year: u32, run_index: u8, num_variants: usize) -> usize {
    (day_of_year as usize + run_index as usize) % num_variants
}

/// Approximate time-of-day slot, used only on the manual path when no run
/// index was supplied by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
}

impl Slot {
    /// Manual runs stick to the three simpler types; cricket content needs
    /// the scheduled rotation to stay fresh.
    pub fn content_type(&self) -> ContentType {
        match self {
            Slot::Morning => ContentType::Info,
            Slot::Afternoon => ContentType::Question,
            Slot::Evening => ContentType::Poll,
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Slot::Morning),
            "afternoon" => Ok(Slot::Afternoon),
            "evening" => Ok(Slot::Evening),
            other => Err(format!(
                "unknown slot '{}' (expected morning, afternoon, or evening)",
                other
            )),
        }
    }
}

/// UTC hour boundaries for inferring a slot on the manual path.
/// These come from configuration; the defaults match the cron times the
/// scheduler fires at (IST morning/afternoon/evening in UTC).
#[derive(Debug, Clone, Copy)]
pub struct SlotBoundaries {
    pub afternoon_start_hour: u32,
    pub evening_start_hour: u32,
}

impl Default for SlotBoundaries {
    fn default() -> Self {
        Self {
            afternoon_start_hour: 7,
            evening_start_hour: 12,
        }
    }
}

impl SlotBoundaries {
    pub fn infer(&self, utc_hour: u32) -> Slot {
        if utc_hour < self.afternoon_start_hour {
            Slot::Morning
        } else if utc_hour < self.evening_start_hour {
            Slot::Afternoon
        } else {
            Slot::Evening
        }
    }
}

/// Everything one invocation decided, resolved up front from the date and
/// the (optional) run index. Never persisted.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub day_of_year: u32,
    pub run_index: Option<u8>,
    pub content_type: ContentType,
    pub skip: bool,
}

impl RunContext {
    /// Resolve the run context from an injected timestamp.
    ///
    /// With a run index this is the scheduled path: full four-type rotation
    /// plus the deterministic skip. Without one it is a manual invocation:
    /// the slot (forced or inferred from time of day) picks from the three
    /// simpler types and never skips.
    pub fn resolve(
        now: DateTime<Utc>,
        run_index: Option<u8>,
        forced_slot: Option<Slot>,
        boundaries: &SlotBoundaries,
    ) -> Self {
        let day_of_year = now.ordinal();
        match run_index {
            Some(run) => Self {
                day_of_year,
                run_index: Some(run),
                content_type: content_type_for(day_of_year, run),
                skip: should_skip(day_of_year, run),
            },
            None => {
                let slot = forced_slot.unwrap_or_else(|| boundaries.infer(now.hour()));
                Self {
                    day_of_year,
                    run_index: None,
                    content_type: slot.content_type(),
                    skip: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rotation_is_deterministic() {
        for day in 1..=366 {
            for run in 1..=3 {
                assert_eq!(
                    content_type_for(day, run),
                    content_type_for(day, run),
                    "day {} run {}",
                    day,
                    run
                );
            }
        }
    }

    #[test]
    fn runs_one_to_three_cover_the_non_held_out_types() {
        for day in 1..=366 {
            let held_out = held_out_type(day);
            let mut assigned: Vec<ContentType> =
                (1..=3).map(|run| content_type_for(day, run)).collect();
            assert!(
                !assigned.contains(&held_out),
                "day {}: held-out type {} appeared in runs 1-3",
                day,
                held_out
            );
            assigned.sort_by_key(|t| t.as_str());
            assigned.dedup();
            assert_eq!(assigned.len(), 3, "day {}: types not pairwise distinct", day);
        }
    }

    #[test]
    fn fourth_run_gets_the_held_out_type() {
        for day in 1..=366 {
            assert_eq!(content_type_for(day, 4), held_out_type(day));
        }
    }

    #[test]
    fn day_eight_example() {
        // 8 % 4 = 0 holds out info; 8 % 6 = 2 picks the permutation
        // [poll, question, cricket] of the remaining three.
        assert_eq!(held_out_type(8), ContentType::Info);
        assert_eq!(content_type_for(8, 1), ContentType::Poll);
        assert_eq!(content_type_for(8, 2), ContentType::Question);
        assert_eq!(content_type_for(8, 3), ContentType::Cricket);
        assert_eq!(content_type_for(8, 4), ContentType::Info);
    }

    #[test]
    fn skip_rate_is_about_five_percent() {
        let mut skipped = 0u32;
        let mut total = 0u32;
        for day in 1..=366 {
            for run in 1..=3 {
                total += 1;
                if should_skip(day, run) {
                    skipped += 1;
                }
            }
        }
        let rate = skipped as f64 / total as f64;
        assert!(
            (0.02..=0.08).contains(&rate),
            "skip rate {:.3} outside expected band",
            rate
        );
    }

    #[test]
    fn variant_index_stays_in_range() {
        for day in 1..=366 {
            for run in 1..=4 {
                for n in 1..=3 {
                    assert!(variant_index(day, run, n) < n);
                }
            }
        }
    }

    #[test]
    fn manual_afternoon_never_selects_cricket() {
        let boundaries = SlotBoundaries::default();
        // 09:30 UTC falls inside the afternoon window with default boundaries.
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let ctx = RunContext::resolve(now, None, None, &boundaries);
        assert_eq!(ctx.content_type, ContentType::Question);
        assert_ne!(ctx.content_type, ContentType::Cricket);
        assert!(!ctx.skip);
    }

    #[test]
    fn forced_slot_overrides_time_of_day() {
        let boundaries = SlotBoundaries::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 0, 0).unwrap();
        let ctx = RunContext::resolve(now, None, Some(Slot::Morning), &boundaries);
        assert_eq!(ctx.content_type, ContentType::Info);
    }

    #[test]
    fn scheduled_path_uses_the_rotation() {
        let boundaries = SlotBoundaries::default();
        let now = Utc.with_ymd_and_hms(2026, 1, 8, 2, 30, 0).unwrap();
        let ctx = RunContext::resolve(now, Some(1), None, &boundaries);
        assert_eq!(ctx.day_of_year, 8);
        assert_eq!(ctx.content_type, ContentType::Poll);
    }

    #[test]
    fn slot_parsing() {
        assert_eq!("Morning".parse::<Slot>().unwrap(), Slot::Morning);
        assert_eq!(" evening ".parse::<Slot>().unwrap(), Slot::Evening);
        assert!("noon".parse::<Slot>().is_err());
    }
}
