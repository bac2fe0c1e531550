// src/record.rs
//! Per-restaurant outcome of one polling attempt.

use chrono::NaiveDate;

use crate::config::RestaurantConfig;
use crate::resolve::{CandidateOrigin, SourceResolver};

/// Shown instead of a date when none could be resolved.
pub const UNKNOWN_DATE_LABEL: &str = "날짜 미확인";

/// The downloaded menu image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRef")
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What the fetch collaborators hand over for one restaurant.
#[derive(Debug, Clone)]
pub struct ScrapedMenu {
    pub image: ImageRef,
    pub post_title: Option<String>,
    pub ocr_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRecord {
    pub restaurant: String,
    pub date: Option<NaiveDate>,
    /// Which candidate supplied `date`.
    pub date_source: Option<CandidateOrigin>,
    pub is_today: bool,
    pub ocr_text: String,
    pub image: ImageRef,
}

impl MenuRecord {
    /// Resolve the date from the scraped texts and stamp the is-today flag.
    pub fn assemble(
        restaurant: &RestaurantConfig,
        scraped: ScrapedMenu,
        resolver: &SourceResolver<'_>,
        today: NaiveDate,
    ) -> Self {
        let ScrapedMenu {
            image,
            post_title,
            ocr_text,
        } = scraped;

        let resolved = {
            let candidates =
                SourceResolver::candidates(restaurant, post_title.as_deref(), &ocr_text);
            resolver.resolve(&candidates, today)
        };

        if resolved.is_none() {
            tracing::warn!(restaurant = %restaurant.name, "menu date could not be resolved");
        }

        let date = resolved.map(|r| r.date);
        Self {
            restaurant: restaurant.name.clone(),
            date,
            date_source: resolved.map(|r| r.origin),
            is_today: is_today(date, today),
            ocr_text,
            image,
        }
    }

    /// `YYYY-MM-DD`, or the unknown-date label.
    pub fn display_date(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE_LABEL.to_string())
    }
}

/// Absent dates are never today.
pub fn is_today(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date == Some(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageLocatorStrategy;

    fn image() -> ImageRef {
        ImageRef {
            url: "https://img.example.com/menu.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xff, 0xd8],
        }
    }

    #[test]
    fn image_dated_restaurant_ignores_title() {
        let r = RestaurantConfig::new("원테이블", "u", "c", false, ImageLocatorStrategy::ProfileImage);
        let today = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let rec = MenuRecord::assemble(
            &r,
            ScrapedMenu {
                image: image(),
                post_title: Some("2월 5일 메뉴".into()),
                ocr_text: "2월 4일 (수)".into(),
            },
            &SourceResolver::default(),
            today,
        );
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2026, 2, 4));
        assert_eq!(rec.date_source, Some(CandidateOrigin::ImageOcr));
        assert!(!rec.is_today);
        assert_eq!(rec.display_date(), "2026-02-04");
    }

    #[test]
    fn unknown_date_label() {
        let r = RestaurantConfig::new("x", "u", "c", true, ImageLocatorStrategy::PostThumbnail);
        let today = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let rec = MenuRecord::assemble(
            &r,
            ScrapedMenu {
                image: image(),
                post_title: None,
                ocr_text: "김치찌개".into(),
            },
            &SourceResolver::default(),
            today,
        );
        assert_eq!(rec.display_date(), UNKNOWN_DATE_LABEL);
        assert!(rec.date_source.is_none());
    }

    #[test]
    fn image_debug_hides_bytes() {
        assert!(format!("{:?}", image()).contains("len: 2"));
    }
}
