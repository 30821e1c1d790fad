// Who ran the tests, and where

use chrono::{DateTime, Utc};

use crate::time::to_run_name_timestamp;

/// User and host the run is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub user: String,
    pub host: String,
}

impl RunIdentity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Resolve from the process environment
    pub fn detect() -> Self {
        let user = first_env(&["USER", "USERNAME", "LOGNAME"]).unwrap_or_else(|| "unknown".into());
        let host = first_env(&["HOSTNAME", "COMPUTERNAME"])
            .or_else(read_hostname_file)
            .unwrap_or_else(|| "localhost".into());
        Self { user, host }
    }

    /// `<user>@<host> <YYYY-MM-DD HH:MM:SS>`
    pub fn run_name(&self, now: &DateTime<Utc>) -> String {
        format!("{}@{} {}", self.user, self.host, to_run_name_timestamp(now))
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn read_hostname_file() -> Option<String> {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_name_format() {
        let identity = RunIdentity::new("ada", "build-01");
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(identity.run_name(&now), "ada@build-01 2023-11-14 22:13:20");
    }

    #[test]
    fn test_detect_never_empty() {
        let identity = RunIdentity::detect();
        assert!(!identity.user.is_empty());
        assert!(!identity.host.is_empty());
    }
}
