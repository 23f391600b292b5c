//! Tracking task.
//!
//! A periodic control loop: each cycle it batch-propagates the registry for
//! the current instant, converts every tracked object to geodetic then pixel
//! coordinates, and publishes the results to the presentation sink shared
//! with the UI task. Per-object failures are skipped for the cycle; a
//! batch-level failure skips the whole cycle with a backoff delay and
//! retries on the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::geodesy::eci_to_geodetic;
use crate::projection::MapProjector;
use crate::propagation::Satellite;
use crate::registry::{SatRegistry, MAX_TRACKED};
use crate::EciPosition;

/// Source of the "current instant" the cycle propagates for.
///
/// The device build runs against a simulated fixed instant until the RTC
/// collaborator lands; tests script instants directly.
pub trait TimeSource {
    /// UTC seconds since the Unix epoch.
    fn now_unix(&self) -> i64;
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl TimeSource for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Reports wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Presentation-layer surface the tracking task publishes to.
///
/// Implementors must treat an out-of-range object index as a silent no-op,
/// and must tolerate being called before their widget tree exists.
pub trait PresentationSink {
    /// Marker slots the sink can display.
    const MAX_MARKERS: usize;

    /// Moves the marker for `index` to pixel (x, y).
    fn set_marker(&mut self, index: usize, x: i32, y: i32);
}

/// Periodic tracking loop over one registry.
///
/// The sink is the only resource shared with another task; every publish is
/// guarded by a scoped lock so a cycle can never tear the UI's object tree,
/// and the lock is released on every exit path including skips. The registry
/// itself is owned by the task: `add`/`clear` happen before `run` starts, so
/// no mutation can race an active batch.
pub struct TrackingTask<S, P, T> {
    registry: SatRegistry<S>,
    projector: MapProjector,
    sink: Arc<Mutex<P>>,
    time: T,
    cycle_period: Duration,
    backoff: Duration,
}

impl<S, P, T> TrackingTask<S, P, T>
where
    S: Satellite,
    P: PresentationSink,
    T: TimeSource,
{
    pub fn new(
        registry: SatRegistry<S>,
        projector: MapProjector,
        sink: Arc<Mutex<P>>,
        time: T,
    ) -> Self {
        TrackingTask {
            registry,
            projector,
            sink,
            time,
            cycle_period: Duration::from_secs(1),
            backoff: Duration::from_secs(1),
        }
    }

    /// Overrides the inter-cycle period and the delay used after a skipped
    /// cycle. Both default to one second, matching the device build.
    pub fn with_timing(mut self, cycle_period: Duration, backoff: Duration) -> Self {
        self.cycle_period = cycle_period;
        self.backoff = backoff;
        self
    }

    pub fn registry(&self) -> &SatRegistry<S> {
        &self.registry
    }

    /// Runs one tracking cycle.
    ///
    /// Returns `false` when the batch propagation itself failed and the
    /// cycle was skipped; the caller decides the retry delay. Per-object
    /// failures do not fail the cycle; the affected marker simply keeps its
    /// previous position.
    pub async fn run_cycle(&self) -> bool {
        let now_unix = self.time.now_unix();

        let mut eci = [EciPosition::ZERO; MAX_TRACKED];
        let outcome = match self.registry.propagate_all(now_unix, &mut eci) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Batch propagation failed: {e}");
                return false;
            }
        };

        // Ascending slot order, bounded by what the sink can display. All
        // pixel positions published this cycle derive from the same instant.
        let published = outcome.slots.min(P::MAX_MARKERS);
        for index in 0..published {
            if self.registry.get(index).is_none() || outcome.failed[index] {
                continue;
            }

            let geo = eci_to_geodetic(&eci[index], now_unix);
            let Some(px) = self.projector.project(geo.lat_deg, geo.lon_deg) else {
                log::warn!(
                    "Projection produced no pixel for slot {index} \
                     (lat {:.3}, lon {:.3})",
                    geo.lat_deg,
                    geo.lon_deg
                );
                continue;
            };

            let mut sink = self.sink.lock().await;
            sink.set_marker(index, px.x, px.y);
        }

        true
    }

    /// Runs the tracking loop until the task is torn down.
    ///
    /// The fixed inter-cycle delay is the only suspension point besides the
    /// sink lock; the numeric pipeline itself never blocks or yields.
    pub async fn run(self) {
        log::info!("Tracking task started, period {:?}", self.cycle_period);
        loop {
            let delay = if self.run_cycle().await {
                self.cycle_period
            } else {
                self.backoff
            };
            tokio::time::sleep(delay).await;
        }
    }
}
