use std::str::FromStr;

use chrono::{DateTime, TimeDelta, TimeZone};

use crate::error::UserInputError;

/// Relative fire time accepted by `/remindme`: `30m`, `2h` or `tomorrow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOffset {
    Minutes(i64),
    Hours(i64),
    Tomorrow,
}

impl ReminderOffset {
    pub fn as_delta(self) -> Option<TimeDelta> {
        match self {
            ReminderOffset::Minutes(minutes) => TimeDelta::try_minutes(minutes),
            ReminderOffset::Hours(hours) => TimeDelta::try_hours(hours),
            ReminderOffset::Tomorrow => TimeDelta::try_days(1),
        }
    }
}

impl FromStr for ReminderOffset {
    type Err = UserInputError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.to_lowercase();

        if let Some(minutes) = parse_amount(&token, 'm') {
            return Ok(ReminderOffset::Minutes(minutes));
        }
        if let Some(hours) = parse_amount(&token, 'h') {
            return Ok(ReminderOffset::Hours(hours));
        }
        if token == "tomorrow" {
            return Ok(ReminderOffset::Tomorrow);
        }

        Err(UserInputError::UnrecognizedFormat)
    }
}

/// Matches `^\d+<unit>$`. Amounts that do not fit an `i64` are rejected.
fn parse_amount(token: &str, unit: char) -> Option<i64> {
    let digits = token.strip_suffix(unit)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub offset: ReminderOffset,
    pub text: String,
}

impl ReminderRequest {
    /// Absolute fire time relative to `now`. Offsets too large to represent
    /// count as an unrecognized format.
    pub fn fire_time<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, UserInputError> {
        self.offset
            .as_delta()
            .and_then(|delta| now.clone().checked_add_signed(delta))
            .ok_or(UserInputError::UnrecognizedFormat)
    }
}

/// Parses the arguments of `/remindme`: a duration token followed by at least
/// one word of reminder text. Text words are re-joined with single spaces.
pub fn parse_remind_me(args: &str) -> Result<ReminderRequest, UserInputError> {
    let mut words = args.split_whitespace();
    let (Some(token), Some(first_word)) = (words.next(), words.next()) else {
        return Err(UserInputError::MissingArguments);
    };

    let offset = token.parse()?;
    let text = std::iter::once(first_word)
        .chain(words)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ReminderRequest { offset, text })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    use super::*;

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn fire_time(args: &str) -> Result<DateTime<Utc>, UserInputError> {
        parse_remind_me(args)?.fire_time(&now())
    }

    #[test]
    fn minutes_hours_and_tomorrow_are_offsets_from_now() {
        assert_eq!(fire_time("30m Buy groceries"), Ok(now() + TimeDelta::minutes(30)));
        assert_eq!(fire_time("2h Call mom"), Ok(now() + TimeDelta::hours(2)));
        assert_eq!(fire_time("tomorrow Submit report"), Ok(now() + TimeDelta::hours(24)));
    }

    #[test]
    fn duration_token_is_case_insensitive() {
        assert_eq!(fire_time("30M Ping"), Ok(now() + TimeDelta::minutes(30)));
        assert_eq!(fire_time("Tomorrow Ping"), Ok(now() + TimeDelta::days(1)));
    }

    #[test]
    fn zero_offset_fires_immediately() {
        assert_eq!(fire_time("0m Ping"), Ok(now()));
    }

    #[test]
    fn unknown_durations_are_rejected() {
        for token in ["5d", "abc", "m", "30", "-5m", "1.5h", "30mm", "tomorrow!"] {
            assert_eq!(
                parse_remind_me(&format!("{token} text")),
                Err(UserInputError::UnrecognizedFormat),
                "token = {token}"
            );
        }
        assert_eq!("".parse::<ReminderOffset>(), Err(UserInputError::UnrecognizedFormat));
    }

    #[test]
    fn duration_without_text_is_missing_arguments() {
        assert_eq!(parse_remind_me("30m"), Err(UserInputError::MissingArguments));
        assert_eq!(parse_remind_me("   "), Err(UserInputError::MissingArguments));
        assert_eq!(parse_remind_me("abc"), Err(UserInputError::MissingArguments));
    }

    #[test]
    fn text_words_are_joined_with_single_spaces() {
        let request = parse_remind_me("  2h   Call   mom  ").unwrap();

        assert_eq!(request.offset, ReminderOffset::Hours(2));
        assert_eq!(request.text, "Call mom");
    }

    #[test]
    fn unrepresentable_offset_is_rejected() {
        assert_eq!(
            fire_time("99999999999999999h Ping"),
            Err(UserInputError::UnrecognizedFormat)
        );
        assert_eq!(
            fire_time("99999999999999999999999m Ping"),
            Err(UserInputError::UnrecognizedFormat)
        );
    }

    proptest! {
        #[test]
        fn fire_time_is_now_plus_minutes(
            now_utc in arb::<NaiveDateTime>(),
            minutes in 0i64..1_000_000
        ) {
            // Leap-second instants are one second shorter to add to.
            prop_assume!(now_utc.nanosecond() < 1_000_000_000);

            let now = now_utc.and_utc();
            let request = parse_remind_me(&format!("{minutes}m text")).unwrap();

            match request.fire_time(&now) {
                Ok(fire_at) => prop_assert_eq!(fire_at - now, TimeDelta::minutes(minutes)),
                Err(error) => prop_assert_eq!(error, UserInputError::UnrecognizedFormat),
            }
        }
    }
}
