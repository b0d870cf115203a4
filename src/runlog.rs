//! Run audit log and timestamp source.
//!
//! A [`RunLog`] accumulates one fact per line for a single run and is
//! rendered once at the end. In deterministic mode every timestamp is
//! [`deterministic_timestamp`], so two runs over the same input produce the
//! same log.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use std::path::Path;

/// 2000-01-01T00:00:00Z in nanoseconds since the Unix epoch.
const DETERMINISTIC_EPOCH_NANOS: i64 = 946_684_800_000_000_000;

/// Fixed timestamp used when the run is deterministic.
pub fn deterministic_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(DETERMINISTIC_EPOCH_NANOS)
}

/// Current UTC time, or the fixed timestamp unless `realtime` is set.
pub fn utc_now(realtime: bool) -> DateTime<Utc> {
    if realtime {
        Utc::now()
    } else {
        deterministic_timestamp()
    }
}

/// Formats a timestamp as RFC 3339 with a `Z` suffix, with microseconds
/// only when the sub-second part is non-zero.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    let precision = if timestamp.nanosecond() / 1_000 == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    timestamp.to_rfc3339_opts(precision, true)
}

/// Line-oriented audit log for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunLog {
    realtime: bool,
    lines: Vec<String>,
}

impl RunLog {
    /// Creates an empty log.
    pub fn new(realtime: bool) -> Self {
        RunLog {
            realtime,
            lines: Vec::new(),
        }
    }

    /// Records the start timestamp, input path and output directory.
    pub fn start(&mut self, input: &Path, outdir: &Path) {
        let ts = format_timestamp(utc_now(self.realtime));
        self.lines.push(format!("start_utc={ts}"));
        self.lines.push(format!("input={}", input.display()));
        self.lines.push(format!("outdir={}", outdir.display()));
    }

    pub fn info(&mut self, message: &str) {
        self.lines.push(format!("info={message}"));
    }

    pub fn counts(&mut self, extracted: usize, valid: usize, invalid: usize) {
        self.lines.push(format!(
            "counts extracted={extracted} valid={valid} invalid={invalid}"
        ));
    }

    /// Records one line per rejected record, e.g. `validation_error=ab12: price must be > 0`.
    pub fn validation_errors<'a, I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        for (id, messages) in errors {
            self.lines
                .push(format!("validation_error={id}: {}", messages.join(", ")));
        }
    }

    /// Records the end timestamp.
    pub fn end(&mut self) {
        let ts = format_timestamp(utc_now(self.realtime));
        self.lines.push(format!("end_utc={ts}"));
    }

    /// Renders the log, one line per fact with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deterministic_timestamp_format() {
        assert_eq!(
            format_timestamp(deterministic_timestamp()),
            "2000-01-01T00:00:00Z"
        );
        assert_eq!(utc_now(false), deterministic_timestamp());
    }

    #[test]
    fn test_sub_second_precision_is_micros() {
        let with_nanos =
            DateTime::from_timestamp_nanos(DETERMINISTIC_EPOCH_NANOS + 123_456_789);
        assert_eq!(format_timestamp(with_nanos), "2000-01-01T00:00:00.123456Z");

        let sub_micro = DateTime::from_timestamp_nanos(DETERMINISTIC_EPOCH_NANOS + 999);
        assert_eq!(format_timestamp(sub_micro), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_realtime_timestamp_is_current() {
        assert!(utc_now(true) > deterministic_timestamp());
        assert!(format_timestamp(utc_now(true)).ends_with('Z'));
    }

    #[test]
    fn test_log_lines_in_order() {
        let mut log = RunLog::new(false);
        log.start(&PathBuf::from("/in/page.html"), &PathBuf::from("/out"));
        log.info("extracted_cards=3");
        log.counts(3, 2, 1);

        let messages = vec!["price must be > 0".to_string(), "url must be present".to_string()];
        log.validation_errors([("abc", messages.as_slice())]);
        log.end();

        let expected = "\
start_utc=2000-01-01T00:00:00Z
input=/in/page.html
outdir=/out
info=extracted_cards=3
counts extracted=3 valid=2 invalid=1
validation_error=abc: price must be > 0, url must be present
end_utc=2000-01-01T00:00:00Z
";
        assert_eq!(log.render(), expected);
    }

    #[test]
    fn test_empty_validation_errors_add_nothing() {
        let mut log = RunLog::new(false);
        log.validation_errors(std::iter::empty());
        log.end();
        assert_eq!(log.render(), "end_utc=2000-01-01T00:00:00Z\n");
    }
}
