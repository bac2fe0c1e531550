// src/scrape/html.rs
//! Pure extraction helpers over a fetched channel page.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::config::ImageLocatorStrategy;

static POST_THUMB: Lazy<Selector> = Lazy::new(|| selector("div.wrap_fit_thumb"));
static PROFILE_IMG: Lazy<Selector> =
    Lazy::new(|| selector(r#"img.img_thumb[alt="프로필이미지"]"#));
static POST_TITLE: Lazy<Selector> = Lazy::new(|| selector("strong.tit_card"));
static CSS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*["']?(.*?)["']?\s*\)"#).expect("static css url pattern"));

fn selector(s: &str) -> Selector {
    match Selector::parse(s) {
        Ok(sel) => sel,
        Err(e) => panic!("Error parsing static selector {s}: {e:?}"),
    }
}

/// Locate the menu image URL, resolved against `page_url`.
pub fn extract_image_url(
    document: &Html,
    strategy: ImageLocatorStrategy,
    page_url: &str,
) -> Option<String> {
    let raw = match strategy {
        ImageLocatorStrategy::PostThumbnail => post_thumbnail(document)?,
        ImageLocatorStrategy::ProfileImage => profile_image(document)?,
    };
    Some(absolutize(page_url, &raw))
}

fn post_thumbnail(document: &Html) -> Option<String> {
    let style = document.select(&POST_THUMB).next()?.value().attr("style")?;
    background_url(style)
}

fn profile_image(document: &Html) -> Option<String> {
    let src = document.select(&PROFILE_IMG).next()?.value().attr("src")?;
    if src.trim().is_empty() {
        return None;
    }
    Some(original_from_thumbnail(src).unwrap_or_else(|| src.to_string()))
}

/// The `url(...)` argument of an inline style.
pub fn background_url(style: &str) -> Option<String> {
    let caps = CSS_URL.captures(style)?;
    let url = caps.get(1)?.as_str().trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Thumbnail proxies carry the original under `fname=`; return it decoded.
pub fn original_from_thumbnail(src: &str) -> Option<String> {
    let query = src.split_once('?')?.1;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "fname")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn absolutize(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Trimmed text of the latest post's title card.
pub fn extract_post_title(document: &Html) -> Option<String> {
    let el = document.select(&POST_TITLE).next()?;
    let text = el.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_url_handles_quotes() {
        assert_eq!(
            background_url(r#"background-image: url("https://a/b.jpg")"#).as_deref(),
            Some("https://a/b.jpg")
        );
        assert_eq!(
            background_url("background-image:url('https://a/b.jpg');").as_deref(),
            Some("https://a/b.jpg")
        );
        assert_eq!(
            background_url("background-image: url(https://a/b.jpg)").as_deref(),
            Some("https://a/b.jpg")
        );
        assert!(background_url("color: red").is_none());
    }

    #[test]
    fn fname_is_decoded() {
        let src = "https://img1.kakaocdn.net/thumb/C640x640/?fname=https%3A%2F%2Fk.kakaocdn.net%2Fdn%2Fmenu.jpg";
        assert_eq!(
            original_from_thumbnail(src).as_deref(),
            Some("https://k.kakaocdn.net/dn/menu.jpg")
        );
        assert!(original_from_thumbnail("https://a/b.jpg").is_none());
    }

    #[test]
    fn relative_urls_are_resolved() {
        assert_eq!(
            absolutize("https://pf.kakao.com/_gVFMn", "//k.kakaocdn.net/x.png"),
            "https://k.kakaocdn.net/x.png"
        );
    }
}
