use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// `Wednesday, October 24, 2018 10:25:36 PM`
const ADDED_ON_FORMAT: &str = "%A, %B %d, %Y %I:%M:%S %p";
pub const CANONICAL_FORMAT: &str = "%d/%m/%y %H:%M:%S";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static DISALLOWED_TITLE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^a-zA-Z\p{Nd}\s;,_\-.()'"]+"#).expect("title filter regex")
});
static EDGE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\W+|\W+$").expect("title trim regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum DateError {
    InvalidAddedOn(String),
    InvalidCanonical(String),
}

impl std::fmt::Display for DateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateError::InvalidAddedOn(s) => {
                write!(f, "Invalid clipping date: '{}'", s)
            }
            DateError::InvalidCanonical(s) => {
                write!(f, "Invalid timestamp: '{}'. Expected DD/MM/YY HH:MM:SS", s)
            }
        }
    }
}

impl std::error::Error for DateError {}

/// Canonical grouping key for a raw book title.
///
/// Characters outside ASCII letters, decimal digits, whitespace and
/// `; , _ - . ( ) ' "` are dropped, then non-word characters are trimmed
/// from both ends.
pub fn normalize_title(raw: &str) -> String {
    let filtered = DISALLOWED_TITLE_CHARS.replace_all(raw, "");
    EDGE_NON_WORD.replace_all(&filtered, "").into_owned()
}

pub fn parse_added_on(raw: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = raw.trim();
    let date_str = trimmed.strip_prefix("Added on ").unwrap_or(trimmed).trim();

    NaiveDateTime::parse_from_str(date_str, ADDED_ON_FORMAT)
        .map_err(|_| DateError::InvalidAddedOn(raw.to_string()))
}

pub fn to_canonical(datetime: &NaiveDateTime) -> String {
    datetime.format(CANONICAL_FORMAT).to_string()
}

/// Verbose Kindle date straight to the canonical `DD/MM/YY HH:MM:SS` form.
pub fn normalize_date(raw: &str) -> Result<String, DateError> {
    parse_added_on(raw).map(|dt| to_canonical(&dt))
}

pub fn parse_canonical(canonical: &str) -> Result<NaiveDateTime, DateError> {
    NaiveDateTime::parse_from_str(canonical.trim(), CANONICAL_FORMAT)
        .map_err(|_| DateError::InvalidCanonical(canonical.to_string()))
}

/// Naive ISO-8601 timestamp (no offset) for the persistence sink.
pub fn canonical_to_iso(canonical: &str) -> Result<String, DateError> {
    parse_canonical(canonical).map(|dt| dt.format(ISO_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_title_keeps_allowed_punctuation() {
        assert_eq!(
            normalize_title("Surely You're Joking, Mr. Feynman! (Adventures of a Curious Character)"),
            "Surely You're Joking, Mr. Feynman (Adventures of a Curious Character"
        );
        assert_eq!(normalize_title("Walden; or, Life in the Woods"), "Walden; or, Life in the Woods");
    }

    #[test]
    fn test_title_trims_non_word_edges() {
        assert_eq!(normalize_title("\u{feff}The Great Book "), "The Great Book");
        assert_eq!(normalize_title("  -- Dune: Messiah --"), "Dune Messiah");
    }

    #[test]
    fn test_title_strips_filesystem_unsafe_chars() {
        assert_eq!(normalize_title("Why/How: A <Guide>?"), "WhyHow A Guide");
    }

    #[test]
    fn test_title_drops_non_ascii_letters() {
        assert_eq!(normalize_title("Cien años de soledad"), "Cien aos de soledad");
        assert_eq!(normalize_title("Über Alles"), "ber Alles");
    }

    #[test]
    fn test_title_keeps_decimal_digits_only() {
        assert_eq!(normalize_title("1984 ½ Edition²"), "1984  Edition");
        assert_eq!(normalize_title("Book ٣"), "Book ٣");
    }

    #[test]
    fn test_title_of_only_punctuation_is_empty() {
        assert_eq!(normalize_title("?!*"), "");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_near_duplicate_titles_collapse() {
        assert_eq!(normalize_title("Thinking: Fast & Slow"), normalize_title("Thinking Fast  Slow"));
    }

    #[test]
    fn test_normalize_date_pm() {
        assert_eq!(
            normalize_date("Wednesday, October 24, 2018 10:25:36 PM").unwrap(),
            "24/10/18 22:25:36"
        );
    }

    #[test]
    fn test_normalize_date_strips_added_on() {
        assert_eq!(
            normalize_date("Added on Sunday, June 3, 2018 9:05:01 AM").unwrap(),
            "03/06/18 09:05:01"
        );
    }

    #[test]
    fn test_normalize_date_midnight_and_noon() {
        assert_eq!(
            normalize_date("Monday, January 1, 2024 12:00:00 AM").unwrap(),
            "01/01/24 00:00:00"
        );
        assert_eq!(
            normalize_date("Monday, January 1, 2024 12:30:00 PM").unwrap(),
            "01/01/24 12:30:00"
        );
    }

    #[test]
    fn test_normalize_date_invalid() {
        let result = normalize_date("Yesterday around noon");

        assert_eq!(
            result,
            Err(DateError::InvalidAddedOn("Yesterday around noon".to_string()))
        );
    }

    #[test]
    fn test_normalize_date_wrong_weekday_is_invalid() {
        assert!(normalize_date("Monday, October 24, 2018 10:25:36 PM").is_err());
    }

    #[test]
    fn test_canonical_to_iso() {
        assert_eq!(
            canonical_to_iso("24/10/18 22:25:36").unwrap(),
            "2018-10-24T22:25:36"
        );
    }

    #[test]
    fn test_canonical_to_iso_invalid() {
        assert_eq!(
            canonical_to_iso("2018-10-24"),
            Err(DateError::InvalidCanonical("2018-10-24".to_string()))
        );
    }

    proptest! {
        #[test]
        fn title_normalization_is_idempotent(raw in "\\PC{0,60}") {
            let once = normalize_title(&raw);
            prop_assert_eq!(normalize_title(&once), once.clone());
        }
    }
}
