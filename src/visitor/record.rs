use std::fmt;
use std::str::FromStr;
use time::PrimitiveDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use crate::visitor::error::VisitorLogError;

pub const RECORD_SEPARATOR: &str = " | ";

pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One visitor event, stored as a single `"<name> | <timestamp>"` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorRecord {
    pub name: String,
    pub timestamp: PrimitiveDateTime,
}

impl VisitorRecord {
    pub fn new(name: impl Into<String>, timestamp: PrimitiveDateTime) -> VisitorRecord {
        VisitorRecord { name: name.into(), timestamp: truncate_to_second(timestamp) }
    }

    pub fn parse_line(line: &str) -> Result<VisitorRecord, VisitorLogError> {
        let fields: Vec<&str> = line.split(RECORD_SEPARATOR).collect();
        if fields.len() != 2 {
            return Err(VisitorLogError::Format { line: String::from(line) });
        }

        let timestamp = PrimitiveDateTime::parse(fields[1], TIMESTAMP_FORMAT)
            .map_err(|e| VisitorLogError::Timestamp { source: e, line: String::from(line) })?;

        Ok(VisitorRecord { name: String::from(fields[0]), timestamp })
    }
}

impl fmt::Display for VisitorRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ts = self.timestamp.format(TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        write!(f, "{}{}{}", self.name, RECORD_SEPARATOR, ts)
    }
}

impl FromStr for VisitorRecord {
    type Err = VisitorLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisitorRecord::parse_line(s)
    }
}

pub(crate) fn truncate_to_second(t: PrimitiveDateTime) -> PrimitiveDateTime {
    // nanosecond 0 is always in range
    t.replace_nanosecond(0).unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn renders_store_line() {
        let r = VisitorRecord::new("Alice", datetime!(2024-01-01 10:00:00));
        assert_eq!(r.to_string(), "Alice | 2024-01-01 10:00:00");
    }

    #[test]
    fn new_drops_subsecond_precision() {
        let r = VisitorRecord::new("Bob", datetime!(2024-01-01 10:00:07.999));
        assert_eq!(r.timestamp, datetime!(2024-01-01 10:00:07));
    }

    #[test]
    fn parses_store_line() {
        let r: VisitorRecord = "Alice | 2024-01-01 10:00:00".parse().unwrap();
        assert_eq!(r, VisitorRecord::new("Alice", datetime!(2024-01-01 10:00:00)));
    }

    #[test]
    fn name_may_contain_spaces_and_pipes_without_separator() {
        let r = VisitorRecord::parse_line("Mary Ann|Jones | 2024-02-29 23:59:59").unwrap();
        assert_eq!(r.name, "Mary Ann|Jones");
        assert_eq!(r.timestamp, datetime!(2024-02-29 23:59:59));
    }

    #[test]
    fn wrong_field_count_is_format_error() {
        for line in ["Alice", "Alice | Bob | 2024-01-01 10:00:00", ""] {
            match VisitorRecord::parse_line(line) {
                Err(VisitorLogError::Format { line: l }) => assert_eq!(l, line),
                other => panic!("expected format error for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn bad_timestamp_is_timestamp_error() {
        for line in ["Alice | yesterday", "Alice | 2024-13-01 10:00:00", "Alice | 2024-01-01T10:00:00"] {
            assert!(matches!(
                VisitorRecord::parse_line(line),
                Err(VisitorLogError::Timestamp { .. })
            ));
        }
    }
}
