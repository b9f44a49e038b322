use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Record time-to-live, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct TimeToLive(u32);

impl TimeToLive {
    /// One hour, the TTL applied when a line does not carry one.
    pub const DEFAULT: TimeToLive = TimeToLive(3600);

    pub fn from_secs(secs: u32) -> Self {
        TimeToLive(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl Default for TimeToLive {
    fn default() -> Self {
        TimeToLive::DEFAULT
    }
}

impl fmt::Display for TimeToLive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimeToLive {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(TimeToLive)
    }
}

impl From<u32> for TimeToLive {
    fn from(value: u32) -> Self {
        TimeToLive(value)
    }
}

impl From<TimeToLive> for u32 {
    fn from(value: TimeToLive) -> Self {
        value.0
    }
}

impl From<TimeToLive> for Duration {
    fn from(value: TimeToLive) -> Self {
        Duration::from_secs(value.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ttl() {
        assert_eq!("300".parse::<TimeToLive>().unwrap(), TimeToLive::from_secs(300));
        assert!("".parse::<TimeToLive>().is_err());
        assert!("-1".parse::<TimeToLive>().is_err());
        assert!("1h".parse::<TimeToLive>().is_err());
    }

    #[test]
    fn default_is_one_hour() {
        assert_eq!(TimeToLive::default(), TimeToLive::from_secs(3600));
        assert_eq!(Duration::from(TimeToLive::default()), Duration::from_secs(3600));
    }
}
