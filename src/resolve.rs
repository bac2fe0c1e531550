// src/resolve.rs
//! Chooses which texts are allowed to date a menu, and in what order.

use chrono::NaiveDate;

use crate::config::RestaurantConfig;
use crate::date_extract::{DateExtractor, DateResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    PostTitle,
    ImageOcr,
}

impl CandidateOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateOrigin::PostTitle => "post-title",
            CandidateOrigin::ImageOcr => "image-ocr",
        }
    }
}

impl std::fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled text considered for date extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCandidate<'a> {
    pub origin: CandidateOrigin,
    pub text: &'a str,
}

/// A date together with the candidate it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub origin: CandidateOrigin,
    pub pattern: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceResolver<'e> {
    extractor: &'e DateExtractor,
}

impl Default for SourceResolver<'static> {
    fn default() -> Self {
        Self::new(DateExtractor::korean())
    }
}

impl<'e> SourceResolver<'e> {
    pub fn new(extractor: &'e DateExtractor) -> Self {
        Self { extractor }
    }

    /// Candidate texts in priority order.
    ///
    /// The post title leads only when the restaurant dates its posts; OCR
    /// text is always present as the last candidate.
    pub fn candidates<'a>(
        config: &RestaurantConfig,
        post_title: Option<&'a str>,
        ocr_text: &'a str,
    ) -> Vec<TextCandidate<'a>> {
        let mut out = Vec::with_capacity(2);
        if config.date_in_post {
            if let Some(title) = post_title {
                out.push(TextCandidate {
                    origin: CandidateOrigin::PostTitle,
                    text: title,
                });
            }
        }
        out.push(TextCandidate {
            origin: CandidateOrigin::ImageOcr,
            text: ocr_text,
        });
        out
    }

    /// First candidate that yields a date wins; later ones are not consulted.
    pub fn resolve(&self, candidates: &[TextCandidate<'_>], today: NaiveDate) -> Option<ResolvedDate> {
        for candidate in candidates {
            match self.extractor.resolve(candidate.text, today) {
                DateResolution::Resolved { date, pattern } => {
                    return Some(ResolvedDate {
                        date,
                        origin: candidate.origin,
                        pattern,
                    });
                }
                DateResolution::NoMatch => {
                    tracing::debug!(origin = %candidate.origin, text = %preview(candidate.text), "no date in candidate");
                }
                DateResolution::EmptyText => {
                    tracing::debug!(origin = %candidate.origin, "candidate text empty");
                }
            }
        }
        None
    }
}

/// First 80 characters, single line, for log fields.
pub(crate) fn preview(text: &str) -> String {
    text.chars()
        .take(80)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
