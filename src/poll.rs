// src/poll.rs
//! # Polling controller
//! Repeats the scrape → resolve cycle over every restaurant until one of them
//! has today's menu or the attempt budget runs out, then hands the collected
//! records to the notifier.
//!
//! States: `Idle → Attempting → (Success | Exhausted)`.
//! - Success: some aggregated record is dated today. Notify with all records.
//! - Exhausted: budget spent. Notify with whatever was collected, or skip
//!   when nothing was.
//!
//! A restaurant that fails on an attempt keeps its record from earlier
//! attempts; a fresh record always replaces the old one.

use std::time::Duration;

use async_trait::async_trait;

use crate::clock::Clock;
use crate::config::RestaurantConfig;
use crate::notify::Notifier;
use crate::record::MenuRecord;
use crate::resolve::SourceResolver;
use crate::scrape::MenuSource;

const DEFAULT_MAX_ATTEMPTS: u32 = 6;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Always at least 1.
    pub max_attempts: u32,
    pub retry_interval: Duration,
}

impl PollingConfig {
    pub fn new(max_attempts: u32, retry_interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_interval,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Attempting { attempt: u32 },
    Success,
    Exhausted,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Success | PollState::Exhausted)
    }
}

/// Transition after `attempt` has been aggregated.
pub fn next_state(attempt: u32, max_attempts: u32, aggregated: &Aggregate) -> PollState {
    if aggregated.any_today() {
        PollState::Success
    } else if attempt >= max_attempts {
        PollState::Exhausted
    } else {
        PollState::Attempting {
            attempt: attempt + 1,
        }
    }
}

/// Latest record per restaurant, in restaurant order.
#[derive(Debug, Clone)]
pub struct Aggregate {
    slots: Vec<Option<MenuRecord>>,
}

impl Aggregate {
    pub fn new(restaurant_count: usize) -> Self {
        Self {
            slots: vec![None; restaurant_count],
        }
    }

    /// Replace the record held for restaurant `idx`.
    pub fn update(&mut self, idx: usize, record: MenuRecord) {
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Some(record);
        }
    }

    pub fn any_today(&self) -> bool {
        self.iter().any(|r| r.is_today)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuRecord> {
        self.slots.iter().flatten()
    }

    pub fn into_records(self) -> Vec<MenuRecord> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Pause between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed(String),
    /// Nothing was collected, so nothing was sent.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// `Success` or `Exhausted`.
    pub state: PollState,
    pub attempts: u32,
    pub records: Vec<MenuRecord>,
    pub notification: NotificationStatus,
}

impl PollOutcome {
    pub fn today_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_today).count()
    }

    pub fn stale_count(&self) -> usize {
        self.records.len() - self.today_count()
    }
}

pub struct PollingController<C, S> {
    config: PollingConfig,
    clock: C,
    sleeper: S,
    resolver: SourceResolver<'static>,
}

impl<C: Clock, S: Sleeper> PollingController<C, S> {
    pub fn new(config: PollingConfig, clock: C, sleeper: S) -> Self {
        Self {
            config,
            clock,
            sleeper,
            resolver: SourceResolver::default(),
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Drive the state machine to a terminal state and notify.
    pub async fn run(
        &self,
        restaurants: &[RestaurantConfig],
        source: &dyn MenuSource,
        notifier: &dyn Notifier,
    ) -> PollOutcome {
        let max_attempts = self.config.max_attempts.max(1);
        let mut aggregate = Aggregate::new(restaurants.len());
        let mut state = PollState::Idle;
        let mut attempts = 0;

        tracing::debug!(?state, max_attempts, "polling started");
        state = PollState::Attempting { attempt: 1 };

        while let PollState::Attempting { attempt } = state {
            attempts = attempt;
            tracing::info!(attempt, max_attempts, "polling attempt");

            self.attempt_once(attempt, restaurants, source, &mut aggregate)
                .await;

            state = next_state(attempt, max_attempts, &aggregate);
            match state {
                PollState::Success => {
                    let today = aggregate.iter().filter(|r| r.is_today).count();
                    tracing::info!(attempt, today, "today's menu found");
                }
                PollState::Exhausted => {
                    tracing::warn!(attempt, "attempt budget exhausted without today's menu");
                }
                PollState::Attempting { .. } | PollState::Idle => {
                    tracing::info!(
                        wait_secs = self.config.retry_interval.as_secs(),
                        "today's menu not posted yet; waiting"
                    );
                    self.sleeper.sleep(self.config.retry_interval).await;
                }
            }
        }

        let records = aggregate.into_records();
        let notification = if records.is_empty() {
            tracing::error!(attempts, "no menu data collected; notification skipped");
            NotificationStatus::Skipped
        } else {
            match notifier.send_digest(&records, self.clock.today()).await {
                Ok(()) => {
                    tracing::info!(records = records.len(), "digest sent");
                    NotificationStatus::Sent
                }
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "digest delivery failed");
                    NotificationStatus::Failed(format!("{e:#}"))
                }
            }
        };

        PollOutcome {
            state,
            attempts,
            records,
            notification,
        }
    }

    async fn attempt_once(
        &self,
        attempt: u32,
        restaurants: &[RestaurantConfig],
        source: &dyn MenuSource,
        aggregate: &mut Aggregate,
    ) {
        for (idx, restaurant) in restaurants.iter().enumerate() {
            match source.scrape(restaurant).await {
                Ok(scraped) => {
                    let today = self.clock.today();
                    let record = MenuRecord::assemble(restaurant, scraped, &self.resolver, today);
                    tracing::info!(
                        restaurant = %record.restaurant,
                        attempt,
                        date = %record.display_date(),
                        source = record.date_source.map(|o| o.as_str()).unwrap_or("-"),
                        is_today = record.is_today,
                        "menu record"
                    );
                    aggregate.update(idx, record);
                }
                Err(e) => {
                    tracing::warn!(restaurant = %restaurant.name, attempt, error = %e, "restaurant skipped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ImageRef;
    use chrono::NaiveDate;

    fn record(name: &str, is_today: bool) -> MenuRecord {
        MenuRecord {
            restaurant: name.into(),
            date: NaiveDate::from_ymd_opt(2026, 2, 5),
            date_source: None,
            is_today,
            ocr_text: String::new(),
            image: ImageRef {
                url: String::new(),
                content_type: "image/jpeg".into(),
                bytes: Vec::new(),
            },
        }
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(PollingConfig::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn transitions() {
        let mut agg = Aggregate::new(2);
        assert_eq!(next_state(1, 3, &agg), PollState::Attempting { attempt: 2 });
        assert_eq!(next_state(3, 3, &agg), PollState::Exhausted);
        agg.update(1, record("b", true));
        assert_eq!(next_state(1, 3, &agg), PollState::Success);
        assert!(PollState::Success.is_terminal());
        assert!(!PollState::Attempting { attempt: 1 }.is_terminal());
    }

    #[test]
    fn aggregate_keeps_latest_per_slot_in_order() {
        let mut agg = Aggregate::new(3);
        agg.update(2, record("c", false));
        agg.update(0, record("a", false));
        agg.update(0, record("a2", true));
        agg.update(7, record("ignored", true));
        let names: Vec<_> = agg.into_records().into_iter().map(|r| r.restaurant).collect();
        assert_eq!(names, ["a2", "c"]);
    }
}
