// src/notify/digest.rs
//! Turns the final set of menu records into a digest (subject + HTML body +
//! inline images). Pure; delivery lives in `email`.

use std::fmt::Write as _;

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::record::{ImageRef, MenuRecord};

/// OCR text shown per menu card, in characters.
pub const MENU_TEXT_LIMIT: usize = 1000;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; }
.restaurant { margin: 20px 0; padding: 15px; border: 1px solid #ddd; border-radius: 5px; }
.restaurant h2 { color: #333; }
.menu-image { max-width: 100%; height: auto; }
.menu-text { background: #f5f5f5; padding: 10px; white-space: pre-wrap; }
.warning { color: #ff6b6b; padding: 10px; background: #fff3cd; border-radius: 5px; }";

/// Image referenced from the HTML as `cid:<content_id>`.
#[derive(Debug, Clone)]
pub struct InlineImage<'a> {
    pub content_id: String,
    pub image: &'a ImageRef,
}

#[derive(Debug, Clone)]
pub struct Digest<'a> {
    pub subject: String,
    pub html: String,
    pub inline_images: Vec<InlineImage<'a>>,
}

/// `(today, not today)`, each in input order.
pub fn partition(records: &[MenuRecord]) -> (Vec<&MenuRecord>, Vec<&MenuRecord>) {
    records.iter().partition(|r| r.is_today)
}

pub fn subject(today: NaiveDate) -> String {
    format!("🍱 {} 점심 메뉴", today.format("%Y년 %m월 %d일"))
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn compose(records: &[MenuRecord], today: NaiveDate) -> Digest<'_> {
    let subject = subject(today);
    let (fresh, stale) = partition(records);

    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n<h1>{}</h1>\n",
        encode_text(&subject)
    );

    if fresh.is_empty() && stale.is_empty() {
        html.push_str("<p>❌ 오늘 메뉴를 찾을 수 없습니다.</p>\n");
    }

    let mut inline_images = Vec::with_capacity(fresh.len());
    for (i, menu) in fresh.iter().enumerate() {
        let content_id = format!("image{i}");
        let _ = write!(
            html,
            "<div class=\"restaurant\">\n<h2>🍽️ {name}</h2>\n<p>📅 {date}</p>\n\
             <img src=\"cid:{content_id}\" class=\"menu-image\" alt=\"{alt} 메뉴\"/>\n\
             <div class=\"menu-text\">{text}</div>\n</div>\n",
            name = encode_text(&menu.restaurant),
            date = menu.display_date(),
            alt = encode_double_quoted_attribute(&menu.restaurant),
            text = encode_text(truncate_chars(&menu.ocr_text, MENU_TEXT_LIMIT)),
        );
        inline_images.push(InlineImage {
            content_id,
            image: &menu.image,
        });
    }

    if !stale.is_empty() {
        html.push_str("<div class=\"warning\">\n<h3>⚠️ 아직 업데이트되지 않은 메뉴</h3>\n<ul>\n");
        for menu in &stale {
            let _ = writeln!(
                html,
                "<li>{} (마지막 업데이트: {})</li>",
                encode_text(&menu.restaurant),
                menu.display_date()
            );
        }
        html.push_str("</ul>\n</div>\n");
    }

    html.push_str("</body>\n</html>\n");

    Digest {
        subject,
        html,
        inline_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_uses_zero_padded_korean_date() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        assert_eq!(subject(d), "🍱 2026년 02월 05일 점심 메뉴");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("김치찌개", 2), "김치");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
