// src/scrape/mod.rs
//! Fetch side: page → image URL → image bytes → OCR text.

pub mod html;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::Html;

use crate::config::{FetchConfig, RestaurantConfig};
use crate::error::ScrapeError;
use crate::ocr::OcrEngine;
use crate::record::{ImageRef, ScrapedMenu};

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Produces the raw material for one restaurant's menu record.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn scrape(&self, restaurant: &RestaurantConfig) -> Result<ScrapedMenu, ScrapeError>;
}

/// Scrapes Kakao channel pages and reads menu images with an owned OCR engine.
pub struct KakaoChannelScraper<O> {
    client: Client,
    ocr: O,
}

impl<O: OcrEngine> KakaoChannelScraper<O> {
    pub fn new(config: &FetchConfig, ocr: O) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, ocr })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let fetch_err = |source: reqwest::Error| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)
    }

    async fn download_image(&self, url: &str) -> Result<ImageRef, ScrapeError> {
        let download_err = |source: reqwest::Error| ScrapeError::Download {
            url: url.to_string(),
            source,
        };
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download_err)?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());
        let bytes = resp.bytes().await.map_err(download_err)?;

        Ok(ImageRef {
            url: url.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Image URL and post title pulled out of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtract {
    pub image_url: Option<String>,
    pub post_title: Option<String>,
}

/// Parse `page` and pull out what the scraper needs. `Html` is not `Send`,
/// so parsing stays inside this synchronous function.
pub fn extract_page(page: &str, restaurant: &RestaurantConfig) -> PageExtract {
    let document = Html::parse_document(page);
    PageExtract {
        image_url: html::extract_image_url(&document, restaurant.image_locator, &restaurant.url),
        post_title: html::extract_post_title(&document),
    }
}

#[async_trait]
impl<O: OcrEngine> MenuSource for KakaoChannelScraper<O> {
    async fn scrape(&self, restaurant: &RestaurantConfig) -> Result<ScrapedMenu, ScrapeError> {
        tracing::info!(restaurant = %restaurant.name, url = %restaurant.url, "scraping");

        let page = self.fetch_page(&restaurant.url).await?;
        tracing::debug!(restaurant = %restaurant.name, bytes = page.len(), "page fetched");

        let PageExtract {
            image_url,
            post_title,
        } = extract_page(&page, restaurant);

        let Some(image_url) = image_url else {
            tracing::warn!(restaurant = %restaurant.name, "image URL not found");
            return Err(ScrapeError::NoImage {
                url: restaurant.url.clone(),
            });
        };
        tracing::info!(restaurant = %restaurant.name, %image_url, "menu image located");
        if let Some(title) = &post_title {
            tracing::info!(restaurant = %restaurant.name, %title, "post title");
        }

        let image = self.download_image(&image_url).await?;
        let ocr_text = self
            .ocr
            .recognize(&image.bytes)
            .await
            .map_err(ScrapeError::Ocr)?;
        tracing::debug!(
            restaurant = %restaurant.name,
            ocr = %crate::resolve::preview(&ocr_text),
            "OCR text"
        );

        Ok(ScrapedMenu {
            image,
            post_title,
            ocr_text,
        })
    }
}
