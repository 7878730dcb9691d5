use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

/// Canonical infobox date format
pub const STRICT_FORMAT: &str = "%Y-%m-%d";

/// Fallback formats seen on hand-edited infoboxes, tried in order
const LENIENT_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%Y %B %d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y.%m.%d",
    "%d.%m.%Y",
];

const LENIENT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse an infobox `birth_date` value
///
/// Bracketed annotations like `(age 27)` or `[1]` are removed first. The
/// strict ISO form is tried, then a fixed list of lenient formats. Anything
/// else, including partial dates such as `1998-??-??` or a bare year, is
/// treated as absent.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = strip_annotations(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, STRICT_FORMAT) {
        return Some(date);
    }

    let lenient = parse_lenient(&strip_ordinals(&cleaned));
    if lenient.is_none() {
        debug!("Unparsable birth date: {:?}", raw);
    }
    lenient
}

fn parse_lenient(value: &str) -> Option<NaiveDate> {
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            LENIENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Remove `( … )` and `[ … ]` spans (shortest match, mixed brackets allowed) and trim
pub fn strip_annotations(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find(&['(', '['][..]) {
        let tail = &rest[open + 1..];
        match tail.find(&[')', ']'][..]) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &tail[close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `March 1st, 1999` -> `March 1, 1999`
fn strip_ordinals(value: &str) -> String {
    value
        .split(' ')
        .map(|token| {
            let (body, comma) = match token.strip_suffix(',') {
                Some(body) => (body, ","),
                None => (token, ""),
            };
            let stripped = ["st", "nd", "rd", "th"]
                .iter()
                .find_map(|suffix| body.strip_suffix(suffix))
                .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
            format!("{}{}", stripped.unwrap_or(body), comma)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
