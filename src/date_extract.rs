// src/date_extract.rs
//! # Date extraction
//! Turns free text (post titles, OCR output) into a calendar date.
//!
//! Patterns are tried in priority order. Each pattern looks at its first match
//! anywhere in the text; when the captured fields are not a real calendar date
//! the next pattern is tried. Month/day-only forms take the current year, so a
//! menu dated "12월 31일" read on January 1st resolves to the coming December.
//! That ambiguity is accepted.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Builds a date from a pattern's captures; `current_year` fills in a missing year.
type BuildFn = fn(&Captures<'_>, i32) -> Option<NaiveDate>;

/// One entry of the priority list: matcher + constructor.
/// Validation is the constructor returning `None`.
pub struct DatePattern {
    pub name: &'static str,
    regex: Regex,
    build: BuildFn,
}

impl DatePattern {
    pub fn new(name: &'static str, regex: Regex, build: BuildFn) -> Self {
        Self { name, regex, build }
    }

    /// Apply this pattern to the first match in `text`.
    pub fn apply(&self, text: &str, current_year: i32) -> Option<NaiveDate> {
        let caps = self.regex.captures(text)?;
        (self.build)(&caps, current_year)
    }
}

impl std::fmt::Debug for DatePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Outcome of running the extractor over one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    /// A pattern matched and produced a valid date.
    Resolved {
        date: NaiveDate,
        pattern: &'static str,
    },
    /// Text had content but nothing usable.
    NoMatch,
    /// Text was empty or whitespace only.
    EmptyText,
}

impl DateResolution {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateResolution::Resolved { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, DateResolution::Resolved { .. })
    }
}

/// Map full-width digits (`０`..`９`, common in OCR output) to ASCII.
pub fn fold_digits(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_fullwidth_digit) {
        return Cow::Borrowed(text);
    }
    text.chars()
        .map(|c| {
            if is_fullwidth_digit(c) {
                char::from(b'0' + (c as u32 - '０' as u32) as u8)
            } else {
                c
            }
        })
        .collect()
}

fn is_fullwidth_digit(c: char) -> bool {
    ('０'..='９').contains(&c)
}

fn field<T: std::str::FromStr>(caps: &Captures<'_>, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

fn full_date(caps: &Captures<'_>, _current_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(field(caps, 1)?, field(caps, 2)?, field(caps, 3)?)
}

fn month_day(caps: &Captures<'_>, current_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(current_year, field(caps, 1)?, field(caps, 2)?)
}

/// Ordered pattern list.
#[derive(Debug)]
pub struct DateExtractor {
    patterns: Vec<DatePattern>,
}

static KOREAN: Lazy<DateExtractor> = Lazy::new(DateExtractor::build_korean);

impl DateExtractor {
    pub fn with_patterns(patterns: Vec<DatePattern>) -> Self {
        Self { patterns }
    }

    /// Shared instance of the Korean menu-post pattern set.
    pub fn korean() -> &'static DateExtractor {
        &KOREAN
    }

    fn build_korean() -> Self {
        let re = |s: &str| Regex::new(s).expect("static date pattern");
        Self::with_patterns(vec![
            // 2026년 02월 05일
            DatePattern::new(
                "year-month-day",
                re(r"([0-9]{4})년\s*([0-9]{1,2})월\s*([0-9]{1,2})일"),
                full_date,
            ),
            // 2월 5일 (목)
            DatePattern::new(
                "month-day",
                re(r"([0-9]{1,2})월\s*([0-9]{1,2})일"),
                month_day,
            ),
            // 02.05 / 2.5
            DatePattern::new("dotted", re(r"([0-9]{1,2})\.([0-9]{1,2})"), month_day),
            // 2/5
            DatePattern::new("slashed", re(r"([0-9]{1,2})/([0-9]{1,2})"), month_day),
        ])
    }

    pub fn patterns(&self) -> &[DatePattern] {
        &self.patterns
    }

    /// Resolve `text` against the pattern list; `today` supplies the default year.
    pub fn resolve(&self, text: &str, today: NaiveDate) -> DateResolution {
        if text.trim().is_empty() {
            return DateResolution::EmptyText;
        }

        let text = fold_digits(text);
        let year = today.year();
        for pattern in &self.patterns {
            if let Some(date) = pattern.apply(&text, year) {
                tracing::debug!(pattern = pattern.name, %date, "date parsed");
                return DateResolution::Resolved {
                    date,
                    pattern: pattern.name,
                };
            }
        }

        DateResolution::NoMatch
    }
}
