use chrono::{DateTime, TimeDelta, Utc};

use crate::error::Error;

/// Half-open one-minute window `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl MinuteWindow {
    pub fn containing(timestamp: DateTime<Utc>) -> Result<MinuteWindow, Error> {
        let seconds = timestamp.timestamp();
        let start = seconds - seconds.rem_euclid(60);
        let from = DateTime::from_timestamp(start, 0).ok_or_else(|| {
            Error::ConfigurationError(format!(
                "timestamp out of range: {}",
                timestamp
            ))
        })?;

        Ok(MinuteWindow {
            from,
            to: from + TimeDelta::minutes(1),
        })
    }

    /// Window of the last fully elapsed minute before `now`.
    pub fn previous(now: DateTime<Utc>) -> Result<MinuteWindow, Error> {
        Self::containing(now - TimeDelta::minutes(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_window_truncates_to_minute() {
        let window = MinuteWindow::containing(at("2022-05-01T10:15:42.123Z"))
            .unwrap();
        assert_eq!(window.from, at("2022-05-01T10:15:00Z"));
        assert_eq!(window.to, at("2022-05-01T10:16:00Z"));
    }

    #[test]
    fn test_window_is_half_open() {
        let window =
            MinuteWindow::containing(at("2022-05-01T10:15:00Z")).unwrap();
        let last =
            MinuteWindow::containing(at("2022-05-01T10:15:59.999Z")).unwrap();
        let next =
            MinuteWindow::containing(at("2022-05-01T10:16:00Z")).unwrap();

        assert_eq!(window, last);
        assert_eq!(next.from, window.to);
    }

    #[test]
    fn test_previous_window() {
        let window =
            MinuteWindow::previous(at("2022-05-01T10:15:05Z")).unwrap();
        assert_eq!(window.from, at("2022-05-01T10:14:00Z"));
        assert_eq!(window.to, at("2022-05-01T10:15:00Z"));
    }
}
