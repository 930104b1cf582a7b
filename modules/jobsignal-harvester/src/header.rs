use chrono::{Datelike, NaiveDateTime};
use regex::Regex;

/// Datetime templates tried against the combined `<date> <time>` string, in
/// priority order: 12-hour before 24-hour, month-first before day-first,
/// four-digit years before two-digit. First successful parse wins.
const DATE_FORMATS: [&str; 8] = [
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %I:%M %p",
    "%m/%d/%y %I:%M %p",
    "%d/%m/%y %I:%M %p",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%m/%d/%y %H:%M",
    "%d/%m/%y %H:%M",
];

/// Sender and timestamp pulled from one bubble header.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHeader {
    pub sender: String,
    pub timestamp: NaiveDateTime,
}

/// Parser for the metadata header a message bubble carries:
/// `[<time>, <date>] <sender>:`. Headers that do not match the shape or
/// whose datetime fits no template are dropped, never errors.
pub struct HeaderParser {
    pattern: Regex,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\[(?P<time>[^,\]]+),\s(?P<date>[^\]]+)\]\s(?P<sender>.*?):\s?$")
                .expect("valid header pattern"),
        }
    }

    pub fn parse(&self, header: &str) -> Option<ParsedHeader> {
        let caps = self.pattern.captures(header.trim())?;
        let time = caps.name("time")?.as_str().trim();
        let date = caps.name("date")?.as_str().trim();
        let sender = caps.name("sender")?.as_str().trim();

        let combined = format!("{date} {time}");
        let timestamp = parse_datetime(&combined)?;

        Some(ParsedHeader {
            sender: sender.to_string(),
            timestamp,
        })
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_datetime(combined: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS.iter().find_map(|fmt| {
        let parsed = NaiveDateTime::parse_from_str(combined, fmt).ok()?;
        // %Y also consumes bare two-digit years; reject those so the %y
        // templates see them and apply the 20xx century window.
        if fmt.contains("%Y") && parsed.year() < 100 {
            return None;
        }
        Some(parsed)
    })
}
