//! Lunch menu notifier binary.
//! Checks configuration, acquires the OCR engine, polls every restaurant until
//! today's menu shows up (or the budget runs out) and emails the digest.

use anyhow::Context;
use lunch_menu_notifier::config::{self, AppConfig};
use lunch_menu_notifier::notify::EmailSender;
use lunch_menu_notifier::ocr::TesseractOcr;
use lunch_menu_notifier::poll::TokioSleeper;
use lunch_menu_notifier::scrape::KakaoChannelScraper;
use lunch_menu_notifier::{telemetry, PollingController, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local runs; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    telemetry::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(
                error = %e,
                "set SENDER_EMAIL, SENDER_PASSWORD and RECIPIENT_EMAIL before running"
            );
            return Err(e.into());
        }
    };
    tracing::info!(
        max_attempts = config.polling.max_attempts,
        retry_interval_secs = config.polling.retry_interval.as_secs(),
        recipient = %config.mail.to,
        "configuration loaded"
    );

    let notifier = EmailSender::new(&config.mail)?;
    let ocr = TesseractOcr::acquire(&config.ocr)
        .await
        .context("acquire OCR engine")?;
    let scraper = KakaoChannelScraper::new(&config.fetch, ocr).context("build HTTP client")?;

    let restaurants = config::restaurants();
    let controller = PollingController::new(config.polling, SystemClock, TokioSleeper);
    let outcome = controller.run(&restaurants, &scraper, &notifier).await;

    // Releases the OCR engine.
    drop(scraper);

    tracing::info!(
        state = ?outcome.state,
        attempts = outcome.attempts,
        today = outcome.today_count(),
        stale = outcome.stale_count(),
        notification = ?outcome.notification,
        "run finished"
    );

    Ok(())
}
