//! Core shared types and identifiers

use crate::errors::{SharedError, SharedResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name prefix for every resource created by stress actions
pub const STRESS_PREFIX: &str = "stress-tests-";

/// Identity of a component that emits log events
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerId {
    /// The supervising driver
    Driver,
    /// One runner instance executing the named action
    Action { name: String, index: usize },
}

impl WorkerId {
    pub fn action<S: Into<String>>(name: S, index: usize) -> Self {
        WorkerId::Action {
            name: name.into(),
            index,
        }
    }

    /// Action name, or `None` for the driver
    pub fn action_name(&self) -> Option<&str> {
        match self {
            WorkerId::Driver => None,
            WorkerId::Action { name, .. } => Some(name),
        }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Driver => write!(f, "driver"),
            WorkerId::Action { name, index } => write!(f, "{name}#{index}"),
        }
    }
}

/// Inclusive range of share sizes in GiB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    min: u32,
    max: u32,
}

impl SizeRange {
    pub fn new(min: u32, max: u32) -> SharedResult<Self> {
        if min == 0 || min > max {
            return Err(SharedError::InvalidSizeRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Pick a size uniformly from the range
    pub fn pick(&self) -> u32 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 1, max: 2 }
    }
}

impl FromStr for SizeRange {
    type Err = SharedError;

    /// Accepts `"1-4"`, `"1,4"` or a single size `"3"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SharedError::InvalidConfig {
            field: "sizes_range".to_string(),
            value: s.to_string(),
        };

        let mut bounds = s.split(['-', ',']).map(str::trim);
        let min = bounds
            .next()
            .and_then(|b| b.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let max = match bounds.next() {
            Some(b) => b.parse::<u32>().map_err(|_| invalid())?,
            None => min,
        };
        if bounds.next().is_some() {
            return Err(invalid());
        }

        SizeRange::new(min, max)
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Random resource name: `<prefix>-<n>`
pub fn rand_name(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(1..=0x7fff_ffff);
    format!("{prefix}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId::Driver.to_string(), "driver");
        assert_eq!(
            WorkerId::action("share_create_delete", 3).to_string(),
            "share_create_delete#3"
        );
        assert_eq!(WorkerId::Driver.action_name(), None);
        assert_eq!(
            WorkerId::action("snapshot_create_delete", 0).action_name(),
            Some("snapshot_create_delete")
        );
    }

    #[test]
    fn test_size_range_validation() {
        assert!(SizeRange::new(1, 1).is_ok());
        assert!(SizeRange::new(2, 5).is_ok());
        assert!(matches!(
            SizeRange::new(0, 2),
            Err(SharedError::InvalidSizeRange { min: 0, max: 2 })
        ));
        assert!(matches!(
            SizeRange::new(4, 2),
            Err(SharedError::InvalidSizeRange { min: 4, max: 2 })
        ));
    }

    #[test]
    fn test_size_range_parsing() {
        assert_eq!("1-4".parse::<SizeRange>().unwrap(), SizeRange::new(1, 4).unwrap());
        assert_eq!("2, 3".parse::<SizeRange>().unwrap(), SizeRange::new(2, 3).unwrap());
        assert_eq!("5".parse::<SizeRange>().unwrap(), SizeRange::new(5, 5).unwrap());
        assert!("a-b".parse::<SizeRange>().is_err());
        assert!("1-2-3".parse::<SizeRange>().is_err());
        assert!("3-1".parse::<SizeRange>().is_err());
    }

    #[test]
    fn test_size_range_pick_stays_in_bounds() {
        let range = SizeRange::new(2, 4).unwrap();
        for _ in 0..100 {
            let size = range.pick();
            assert!((2..=4).contains(&size));
        }
    }

    #[test]
    fn test_rand_name_format() {
        let name = rand_name("stress-tests-share-name");
        let suffix = name.strip_prefix("stress-tests-share-name-").unwrap();
        assert!(suffix.parse::<u32>().unwrap() >= 1);
        assert!(name.starts_with(STRESS_PREFIX));
    }
}
