//! [ChartSession] owns the chart selection (date, grouping mode, overlap toggle) and recomputes
//! the chart whenever it changes. Only the newest request may publish: every request bumps a
//! generation and cancels the fetch of the request before it.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    config::{ChartConfig, GroupingMode},
    engine::{compute_day, DayChart},
    provider::RecordProvider,
    utils::clock::Clock,
};

#[derive(Debug, Clone)]
pub enum RecomputeOutcome {
    Published(Arc<DayChart>),
    /// A newer request took over before this one finished. Nothing was published.
    Superseded,
}

impl RecomputeOutcome {
    pub fn chart(&self) -> Option<&Arc<DayChart>> {
        match self {
            RecomputeOutcome::Published(chart) => Some(chart),
            RecomputeOutcome::Superseded => None,
        }
    }
}

struct SessionState {
    date: NaiveDate,
    config: ChartConfig,
    generation: u64,
    in_flight: CancellationToken,
}

struct Request {
    date: NaiveDate,
    config: ChartConfig,
    generation: u64,
    cancellation: CancellationToken,
}

pub struct ChartSession<P: RecordProvider> {
    provider: P,
    clock: Box<dyn Clock>,
    state: Mutex<SessionState>,
    published: watch::Sender<Option<Arc<DayChart>>>,
}

impl<P: RecordProvider> ChartSession<P> {
    pub fn new(provider: P, clock: Box<dyn Clock>, date: NaiveDate, config: ChartConfig) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            provider,
            clock,
            state: Mutex::new(SessionState {
                date,
                config,
                generation: 0,
                in_flight: CancellationToken::new(),
            }),
            published,
        }
    }

    /// Renderers subscribe here. Every published chart is complete and never replaced by an
    /// older one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DayChart>>> {
        self.published.subscribe()
    }

    pub fn current(&self) -> Option<Arc<DayChart>> {
        self.published.borrow().clone()
    }

    pub fn date(&self) -> Result<NaiveDate> {
        Ok(self.state()?.date)
    }

    pub fn config(&self) -> Result<ChartConfig> {
        Ok(self.state()?.config)
    }

    pub async fn set_date(&self, date: NaiveDate) -> Result<RecomputeOutcome> {
        self.recompute(|state| state.date = date).await
    }

    pub async fn set_mode(&self, mode: GroupingMode) -> Result<RecomputeOutcome> {
        self.recompute(|state| state.config.mode = mode).await
    }

    pub async fn set_show_overlaps(&self, show_overlaps: bool) -> Result<RecomputeOutcome> {
        self.recompute(|state| state.config.show_overlaps = show_overlaps)
            .await
    }

    /// Recomputes the current selection, for example after the records changed.
    pub async fn refresh(&self) -> Result<RecomputeOutcome> {
        self.recompute(|_| ()).await
    }

    fn state(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Chart session state was poisoned"))
    }

    fn begin(&self, update: impl FnOnce(&mut SessionState)) -> Result<Request> {
        let mut state = self.state()?;
        update(&mut state);
        state.generation += 1;
        let previous = std::mem::replace(&mut state.in_flight, CancellationToken::new());
        previous.cancel();
        Ok(Request {
            date: state.date,
            config: state.config,
            generation: state.generation,
            cancellation: state.in_flight.clone(),
        })
    }

    #[instrument(skip_all)]
    async fn recompute(&self, update: impl FnOnce(&mut SessionState)) -> Result<RecomputeOutcome> {
        let request = self.begin(update)?;
        debug!(
            "Starting generation {} for {} ({})",
            request.generation, request.date, request.config.mode
        );

        let fetched = tokio::select! {
            _ = request.cancellation.cancelled() => {
                debug!("Generation {} cancelled during fetch", request.generation);
                return Ok(RecomputeOutcome::Superseded);
            }
            fetched = self.provider.fetch_day(request.date) => fetched,
        };

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                if self.is_current(request.generation)? {
                    return Err(e);
                }
                debug!(
                    "Discarding fetch error of stale generation {}: {e:?}",
                    request.generation
                );
                return Ok(RecomputeOutcome::Superseded);
            }
        };

        let chart = Arc::new(compute_day(
            &records,
            request.date,
            request.config,
            self.clock.time(),
        ));

        // The state lock keeps a newer request from starting between the check and the publish.
        let state = self.state()?;
        if state.generation != request.generation {
            debug!("Generation {} finished late, discarding", request.generation);
            return Ok(RecomputeOutcome::Superseded);
        }
        self.published.send_replace(Some(chart.clone()));
        drop(state);

        info!(
            "Published chart for {} with {} segments",
            chart.date,
            chart.segments.len()
        );
        Ok(RecomputeOutcome::Published(chart))
    }

    fn is_current(&self, generation: u64) -> Result<bool> {
        Ok(self.state()?.generation == generation)
    }
}
