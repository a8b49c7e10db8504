//! Reconciliation engine: classifies every input fiscal code as registered
//! with the IO service or not.
//!
//! Two strategies exist because the subscriptions feed requires special
//! authorization. The fast strategy costs one API call per day in the date
//! range; the slow strategy costs one call per fiscal code. Both produce
//! the same kind of outcome: an exact partition of the input set.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

use crate::error::{BotError, Result};
use crate::hashing;
use crate::io::models::{SubscriptionsFeed, UserProfile};
use crate::io::IoServiceClient;
use crate::reconcile::retry::RetryPolicy;

/// The two IO API operations the engine consumes.
///
/// Abstracted so tests can script the remote; `IoServiceClient` is the
/// production implementation.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn subscriptions_on_day(&self, day: NaiveDate) -> Result<SubscriptionsFeed>;
    async fn profile(&self, fiscal_code: &str) -> Result<UserProfile>;
}

#[async_trait]
impl RemoteService for IoServiceClient {
    async fn subscriptions_on_day(&self, day: NaiveDate) -> Result<SubscriptionsFeed> {
        self.get_subscriptions_on_day(day).await
    }

    async fn profile(&self, fiscal_code: &str) -> Result<UserProfile> {
        self.get_profile(fiscal_code).await
    }
}

/// Inclusive range of calendar dates to pull subscription feeds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered; zero when `end` precedes `start`.
    pub fn day_count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).num_days() as u64 + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.day_count() as usize)
    }
}

/// Strategy selector for a reconciliation run.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Diff the per-date subscription feeds over the given range.
    Fast(DateRange),
    /// Probe the profile of every fiscal code individually.
    Slow,
}

/// Exact partition of the input set produced by a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub registered: BTreeSet<String>,
    pub unregistered: BTreeSet<String>,
}

impl ReconcileOutcome {
    pub fn total(&self) -> usize {
        self.registered.len() + self.unregistered.len()
    }
}

pub struct ReconcileEngine<S> {
    service: S,
    retry: RetryPolicy,
}

impl<S: RemoteService> ReconcileEngine<S> {
    pub fn new(service: S, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    /// Run the selected strategy. `progress` receives an opaque
    /// "N of M processed" signal for display and never affects the result.
    pub async fn reconcile(
        &self,
        codes: &BTreeSet<String>,
        strategy: Strategy,
        progress: impl FnMut(u64, u64),
    ) -> Result<ReconcileOutcome> {
        match strategy {
            Strategy::Fast(range) => self.reconcile_fast(codes, range, progress).await,
            Strategy::Slow => self.reconcile_slow(codes, progress).await,
        }
    }

    /// Feed-diffing strategy: one API call per day in the range.
    ///
    /// Days are applied strictly in chronological order so that a later
    /// unsubscription overrides an earlier subscription of the same hash,
    /// and vice versa. A code whose hash never appears in any feed was
    /// never subscribed, hence unregistered.
    pub async fn reconcile_fast(
        &self,
        codes: &BTreeSet<String>,
        range: DateRange,
        mut progress: impl FnMut(u64, u64),
    ) -> Result<ReconcileOutcome> {
        // Reverse index, built once per run and discarded with it.
        let index: HashMap<String, String> = codes
            .iter()
            .map(|code| Ok((hashing::hash_fiscal_code(code)?, code.clone())))
            .collect::<Result<_>>()?;

        let total_days = range.day_count();
        info!(
            codes = codes.len(),
            days = total_days,
            "reconciling against the subscriptions feed"
        );

        let mut subscribed: HashSet<String> = HashSet::new();
        for (processed, day) in range.days().enumerate() {
            let context = format!("subscriptions feed for {day}");
            let service = &self.service;
            let feed = self
                .retry
                .execute(&context, || service.subscriptions_on_day(day))
                .await?;

            for hash in feed.subscriptions {
                subscribed.insert(hash);
            }
            for hash in feed.unsubscriptions {
                subscribed.remove(&hash);
            }

            progress(processed as u64 + 1, total_days);
        }

        let mut outcome = ReconcileOutcome::default();
        for (hash, code) in index {
            if subscribed.contains(&hash) {
                outcome.registered.insert(code);
            } else {
                outcome.unregistered.insert(code);
            }
        }

        info!(
            registered = outcome.registered.len(),
            unregistered = outcome.unregistered.len(),
            "feed reconciliation complete"
        );
        Ok(outcome)
    }

    /// Profile-probing strategy: one API call per fiscal code.
    ///
    /// Classification is independent per code, so iteration order only
    /// affects progress reporting.
    pub async fn reconcile_slow(
        &self,
        codes: &BTreeSet<String>,
        mut progress: impl FnMut(u64, u64),
    ) -> Result<ReconcileOutcome> {
        let total = codes.len() as u64;
        info!(codes = codes.len(), "reconciling by probing profiles");

        let mut outcome = ReconcileOutcome::default();
        for (processed, code) in codes.iter().enumerate() {
            let context = format!("profile of {code}");
            let service = &self.service;
            match self.retry.execute(&context, || service.profile(code)).await {
                Ok(profile) if profile.sender_allowed => {
                    outcome.registered.insert(code.clone());
                }
                Ok(_) => {
                    outcome.unregistered.insert(code.clone());
                }
                Err(BotError::NotFound(_)) => {
                    outcome.unregistered.insert(code.clone());
                }
                Err(error) => return Err(error),
            }

            progress(processed as u64 + 1, total);
        }

        info!(
            registered = outcome.registered.len(),
            unregistered = outcome.unregistered.len(),
            "profile reconciliation complete"
        );
        Ok(outcome)
    }
}
