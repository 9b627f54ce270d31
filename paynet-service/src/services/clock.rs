use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of wall-clock time for receipts.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock, in a fixed offset when one is configured and in
/// the host's local offset otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => {
                let now = Local::now();
                now.with_timezone(now.offset())
            }
        }
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_uses_configured_offset() {
        let tashkent = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = SystemClock::new(Some(tashkent)).now();

        assert_eq!(now.offset(), &tashkent);
        assert!((now.timestamp_millis() - Utc::now().timestamp_millis()).abs() < 5_000);
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let instant = DateTime::parse_from_rfc3339("2025-05-15T18:57:30+05:00").unwrap();
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
