// src/ocr.rs
//! OCR over downloaded menu images.
//!
//! The engine is acquired once, before polling starts, and owned by the
//! scraper for the rest of the run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};
use tokio::process::Command;

use crate::config::OcrConfig;

/// Longest image side fed to the recogniser.
pub const MAX_IMAGE_SIDE: u32 = 2000;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognised text, one line per detected text line.
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

/// Decode, cap the longest side at [`MAX_IMAGE_SIDE`], convert to RGB.
pub fn preprocess(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes).context("decode menu image")?;
    let img = if img.width().max(img.height()) > MAX_IMAGE_SIDE {
        img.resize(MAX_IMAGE_SIDE, MAX_IMAGE_SIDE, FilterType::Lanczos3)
    } else {
        img
    };
    Ok(img.to_rgb8())
}

/// Trim every line and drop blank ones.
pub fn normalize_output(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `tesseract` command-line engine.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    languages: String,
    timeout: Duration,
}

impl TesseractOcr {
    /// Locate the binary and check the language packs are installed.
    pub async fn acquire(config: &OcrConfig) -> Result<Self> {
        let binary = match &config.binary {
            Some(path) => path.clone(),
            None => which::which("tesseract").context("tesseract not found on PATH")?,
        };
        tracing::info!(binary = %binary.display(), languages = %config.languages, "initialising OCR engine");

        let output = Command::new(&binary)
            .arg("--list-langs")
            .output()
            .await
            .with_context(|| format!("run {} --list-langs", binary.display()))?;
        // Older releases print the list on stderr.
        let listing = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let installed: Vec<&str> = listing.lines().map(str::trim).collect();
        let missing: Vec<&str> = config
            .languages
            .split('+')
            .map(str::trim)
            .filter(|lang| !lang.is_empty() && !installed.contains(lang))
            .collect();
        if !missing.is_empty() {
            bail!("tesseract language data missing: {}", missing.join(", "));
        }

        tracing::info!("OCR engine ready");
        Ok(Self {
            binary,
            languages: config.languages.clone(),
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let bytes = image.to_vec();
        let file = tokio::task::spawn_blocking(move || -> Result<tempfile::NamedTempFile> {
            let rgb = preprocess(&bytes)?;
            let file = tempfile::Builder::new()
                .prefix("menu-")
                .suffix(".png")
                .tempfile()
                .context("create OCR temp file")?;
            rgb.save_with_format(file.path(), ImageFormat::Png)
                .context("write OCR input")?;
            Ok(file)
        })
        .await
        .context("OCR preprocessing task")??;

        // kill_on_drop reaps the child when the timeout drops the future.
        let run = Command::new(&self.binary)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| anyhow!("tesseract timed out after {}s", self.timeout.as_secs_f32()))?
            .context("run tesseract")?;

        if !output.status.success() {
            bail!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(normalize_output(&String::from_utf8_lossy(&output.stdout)))
    }
}
