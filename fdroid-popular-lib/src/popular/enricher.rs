use super::{AppRecord, FetchOutcome, Progress, StarFetcher};
use crate::Result;
use core::fmt::{Display, Formatter};
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use futures_util::future::try_join_all;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = "    enrich";

/// How records are grouped and paced while querying the hosting services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Number of records queried concurrently; also the size of each batch
    pub size: usize,

    /// Pause between the end of one batch and the start of the next
    pub delay: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            size: 20,
            delay: Duration::from_secs(2),
        }
    }
}

/// Counts processed records for progress reporting.
#[derive(Debug)]
struct WorkCounter {
    processed: AtomicU64,
    total: u64,
}

impl WorkCounter {
    const fn new(total: u64) -> Self {
        Self {
            processed: AtomicU64::new(0),
            total,
        }
    }

    /// Mark one more record as processed and return its position.
    fn advance(&self) -> WorkPosition {
        WorkPosition {
            current: self.processed.fetch_add(1, Ordering::Relaxed) + 1,
            total: self.total,
        }
    }

    fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkPosition {
    current: u64,
    total: u64,
}

impl Display for WorkPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}/{})", self.current, self.total)
    }
}

/// Fills in the star count of application records by querying their hosting service.
///
/// Records are processed in consecutive batches. All records of a batch are queried
/// concurrently, and a batch must complete before the next one starts. A rate limit or
/// transport failure on any record aborts the whole operation.
pub struct Enricher<'a, F> {
    fetcher: &'a F,
    policy: BatchPolicy,
    progress: Arc<dyn Progress>,
}

impl<F> core::fmt::Debug for Enricher<'_, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Enricher")
            .field("policy", &self.policy)
            .field("progress", &"<dyn Progress>")
            .finish_non_exhaustive()
    }
}

impl<'a, F: StarFetcher> Enricher<'a, F> {
    /// # Panics
    ///
    /// Panics if the batch size is zero.
    #[must_use]
    pub fn new(fetcher: &'a F, policy: BatchPolicy, progress: Arc<dyn Progress>) -> Self {
        assert!(policy.size > 0, "batch size must be greater than zero");
        Self {
            fetcher,
            policy,
            progress,
        }
    }

    /// Query the star count of every record, returning the records in their original order.
    pub async fn enrich(&self, mut records: Vec<AppRecord>) -> Result<Vec<AppRecord>> {
        let counter = Arc::new(WorkCounter::new(records.len() as u64));
        let batch_count = records.len().div_ceil(self.policy.size);

        let callback_counter = Arc::clone(&counter);
        self.progress.set_phase("Querying");
        self.progress.set_determinate(Box::new(move || {
            let processed = callback_counter.processed();
            (
                callback_counter.total,
                processed,
                format!("{processed}/{} applications", callback_counter.total),
            )
        }));

        for (index, batch) in records.chunks_mut(self.policy.size).enumerate() {
            log::debug!(target: LOG_TARGET, "Starting batch {}/{batch_count} ({} applications)", index + 1, batch.len());

            let _ = try_join_all(batch.iter_mut().map(|app| self.process(app, &counter))).await?;

            if index + 1 < batch_count && !self.policy.delay.is_zero() {
                log::info!(target: LOG_TARGET, "Sleeping for {}s...", self.policy.delay.as_secs_f64());
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        Ok(records)
    }

    async fn process(&self, app: &mut AppRecord, counter: &WorkCounter) -> Result<()> {
        let Some((service, endpoint)) = app.target() else {
            let position = counter.advance();
            log::info!(target: LOG_TARGET, "{position} Skipped {app} as it does not have a supported hosting service");
            return Ok(());
        };

        let outcome = self.fetcher.fetch_stars(service, endpoint).await;
        match outcome {
            FetchOutcome::Found(stars) => {
                app.stars = stars;
                let position = counter.advance();
                log::info!(target: LOG_TARGET, "{position} Processed {app} from {service}");
                Ok(())
            }
            FetchOutcome::Skipped(reason) => {
                let position = counter.advance();
                log::warn!(target: LOG_TARGET, "{position} Skipped {app}: {reason}");
                Ok(())
            }
            FetchOutcome::RateLimited(service) => {
                log::error!(target: LOG_TARGET, "Rate limited by {service} while processing {app}");
                Err(app_err!("you have been rate limited by {service}"))
            }
            FetchOutcome::Failed(e) => {
                log::error!(target: LOG_TARGET, "Could not query {service} for {app}: {e:#}");
                Err(e)
            }
        }
    }
}
