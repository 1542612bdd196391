/// Configuration module for managing environment variables and API keys
///
/// Loads and validates all configuration from environment variables
/// (typically from a .env file). The rotation selector itself never reads
/// any of this; it only sees the values the caller passes in.

use anyhow::{Context, Result};
use std::env;

use crate::rotation::SlotBoundaries;

#[derive(Debug, Clone)]
pub struct Config {
    /// Google Gemini API key (https://aistudio.google.com/apikey)
    pub gemini_api_key: String,

    /// Gemini model to use (e.g. "gemini-2.5-flash")
    pub gemini_model: String,

    /// X API bearer token with write access. Optional so dry runs work
    /// without posting credentials; checked before any network call when
    /// an actual post is requested.
    pub twitter_bearer_token: Option<String>,

    /// Number of scheduled run slots per day (3 or 4)
    pub daily_run_slots: u8,

    /// UTC hour boundaries for inferring a slot on manual runs
    pub slot_boundaries: SlotBoundaries,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or out of range.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let daily_run_slots = parse_daily_run_slots(env::var("DAILY_RUN_SLOTS").ok().as_deref())?;

        Ok(Config {
            gemini_api_key: env::var("GEMINI_API_KEY").context(
                "GEMINI_API_KEY must be set (get one at https://aistudio.google.com/apikey)",
            )?,

            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),

            twitter_bearer_token: env::var("TWITTER_BEARER_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),

            daily_run_slots,

            // Defaults match the scheduler's cron times (8 AM / 1 PM / 6 PM
            // IST = 2:30 / 7:30 / 12:30 UTC), rounded to the hour.
            slot_boundaries: SlotBoundaries {
                afternoon_start_hour: hour_var("SLOT_AFTERNOON_UTC_HOUR", 7)?,
                evening_start_hour: hour_var("SLOT_EVENING_UTC_HOUR", 12)?,
            },
        })
    }
}

fn parse_daily_run_slots(raw: Option<&str>) -> Result<u8> {
    let slots: u8 = raw
        .map(|v| v.parse().context("DAILY_RUN_SLOTS must be an integer"))
        .transpose()?
        .unwrap_or(3);
    if !(3..=4).contains(&slots) {
        anyhow::bail!("DAILY_RUN_SLOTS must be 3 or 4, got {}", slots);
    }
    Ok(slots)
}

fn parse_hour(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    let hour = raw
        .map(|v| {
            v.parse::<u32>()
                .with_context(|| format!("{} must be an integer", name))
        })
        .transpose()?
        .unwrap_or(default);
    if hour > 23 {
        anyhow::bail!("{} must be 0-23, got {}", name, hour);
    }
    Ok(hour)
}

fn hour_var(name: &str, default: u32) -> Result<u32> {
    parse_hour(name, env::var(name).ok().as_deref(), default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_or_four_slots() {
        assert_eq!(parse_daily_run_slots(Some("3")).unwrap(), 3);
        assert_eq!(parse_daily_run_slots(Some("4")).unwrap(), 4);
    }

    #[test]
    fn defaults_to_three_slots_when_unset() {
        assert_eq!(parse_daily_run_slots(None).unwrap(), 3);
    }

    #[test]
    fn rejects_out_of_range_slot_counts() {
        assert!(parse_daily_run_slots(Some("2")).is_err());
        assert!(parse_daily_run_slots(Some("5")).is_err());
        assert!(parse_daily_run_slots(Some("0")).is_err());
        assert!(parse_daily_run_slots(Some("three")).is_err());
    }

    #[test]
    fn parses_slot_boundary_hours() {
        assert_eq!(parse_hour("SLOT_EVENING_UTC_HOUR", Some("18"), 12).unwrap(), 18);
        assert_eq!(parse_hour("SLOT_EVENING_UTC_HOUR", None, 12).unwrap(), 12);
    }

    #[test]
    fn rejects_invalid_boundary_hours() {
        assert!(parse_hour("SLOT_EVENING_UTC_HOUR", Some("24"), 12).is_err());
        assert!(parse_hour("SLOT_EVENING_UTC_HOUR", Some("noon"), 12).is_err());
    }
}
