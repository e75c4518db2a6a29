//! Periodic habit reset sweep.
//!
//! Clears the completion flag of every habit whose reset boundary has passed
//! since it was last completed, for every user that owns habits. Runs on a
//! fixed interval using `tokio::time::interval`.

use std::time::Duration;

use tally_core::clock::{Clock, SystemClock};
use tally_core::habit::service::HabitService;
use tally_core::habit::store::HabitStore;
use tally_db::repositories::HabitRepo;
use tally_db::{DbPool, PgHabitStore};
use tokio_util::sync::CancellationToken;

/// Totals of one sweep across all owners.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepTotals {
    pub owners: usize,
    pub reset: usize,
    pub failed: usize,
}

/// Run one sweep over every habit owner.
///
/// An owner whose habits cannot be loaded is logged and skipped.
pub async fn sweep<S: HabitStore, C: Clock>(
    pool: &DbPool,
    service: &HabitService<S, C>,
) -> Result<SweepTotals, sqlx::Error> {
    let owners = HabitRepo::list_owner_ids(pool).await?;
    let mut totals = SweepTotals {
        owners: owners.len(),
        ..SweepTotals::default()
    };

    for owner_id in owners {
        match service.reset_all(owner_id).await {
            Ok(summary) => {
                totals.reset += summary.reset.len();
                totals.failed += summary.failed.len();
            }
            Err(e) => {
                tracing::error!(user_id = owner_id, error = %e, "Habit reset: owner skipped");
            }
        }
    }
    Ok(totals)
}

/// Run the habit reset loop until `cancel` is triggered.
pub async fn run(pool: DbPool, interval_secs: u64, cancel: CancellationToken) {
    let service = HabitService::new(PgHabitStore::new(pool.clone()), SystemClock);

    tracing::info!(interval_secs, "Habit reset job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Habit reset job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, &service).await {
                    Ok(totals) if totals.reset > 0 || totals.failed > 0 => {
                        tracing::info!(
                            owners = totals.owners,
                            reset = totals.reset,
                            failed = totals.failed,
                            "Habit reset: sweep finished"
                        );
                    }
                    Ok(totals) => {
                        tracing::debug!(owners = totals.owners, "Habit reset: nothing to reset");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Habit reset: failed to list owners");
                    }
                }
            }
        }
    }
}
