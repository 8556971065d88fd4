//! Observable events emitted while collating
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Collator configuration loaded from disk
    ConfigLoaded,
    /// A collate call began
    CollateStart,
    /// A collate call produced its timeline
    CollateComplete,
    /// A malformed log line was dropped under the skip policy
    LogLineSkipped,
    /// A malformed log line aborted the call
    ParseFailed,
}

impl Event {
    /// Returns the event name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CollateStart => "COLLATE_START",
            Event::CollateComplete => "COLLATE_COMPLETE",
            Event::LogLineSkipped => "LOG_LINE_SKIPPED",
            Event::ParseFailed => "PARSE_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::LogLineSkipped => Severity::Warn,
            Event::ParseFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::CollateStart,
            Event::CollateComplete,
            Event::LogLineSkipped,
            Event::ParseFailed,
        ];

        for event in events {
            assert!(!event.as_str().is_empty());
            assert_eq!(event.to_string(), event.as_str());
        }
    }

    #[test]
    fn test_failure_severities() {
        assert_eq!(Event::LogLineSkipped.severity(), Severity::Warn);
        assert_eq!(Event::ParseFailed.severity(), Severity::Error);
        assert_eq!(Event::CollateComplete.severity(), Severity::Info);
    }
}
