//! Protocol versions and the running maximum kept during a translation.

use std::fmt;

/// Protocol revision, ordered by `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const V4: ProtocolVersion = ProtocolVersion::new(4, 0);
    pub const V4_01: ProtocolVersion = ProtocolVersion::new(4, 1);

    /// Every translation starts here.
    pub const BASELINE: ProtocolVersion = ProtocolVersion::V4;

    pub const fn new(major: u8, minor: u8) -> Self {
        ProtocolVersion { major, minor }
    }

    /// Parses `"4.0"` or `"4.01"`.
    pub fn parse(text: &str) -> Option<Self> {
        let (major, minor) = text.trim().split_once('.')?;
        Some(ProtocolVersion::new(major.parse().ok()?, minor.parse().ok()?))
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        ProtocolVersion::BASELINE
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 4.01 is spelled with two minor digits on the wire
        if self.minor == 0 {
            write!(f, "{}.0", self.major)
        } else {
            write!(f, "{}.{:02}", self.major, self.minor)
        }
    }
}

/// Highest version required so far. Never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionTracker {
    held: ProtocolVersion,
}

impl VersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, candidate: ProtocolVersion) {
        if candidate > self.held {
            log::trace!("protocol version raised {} -> {}", self.held, candidate);
            self.held = candidate;
        }
    }

    pub fn current(&self) -> ProtocolVersion {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ProtocolVersion::V4.to_string(), "4.0");
        assert_eq!(ProtocolVersion::V4_01.to_string(), "4.01");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ProtocolVersion::parse("4.0"), Some(ProtocolVersion::V4));
        assert_eq!(ProtocolVersion::parse("4.01"), Some(ProtocolVersion::V4_01));
        assert_eq!(ProtocolVersion::parse("four"), None);
    }

    #[test]
    fn test_raise_never_lowers() {
        let mut tracker = VersionTracker::new();
        assert_eq!(tracker.current(), ProtocolVersion::BASELINE);

        tracker.raise(ProtocolVersion::V4_01);
        tracker.raise(ProtocolVersion::V4);
        tracker.raise(ProtocolVersion::new(3, 0));

        assert_eq!(tracker.current(), ProtocolVersion::V4_01);
    }
}
