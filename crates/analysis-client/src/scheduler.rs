//! Single-flight capture scheduling.
//!
//! Manual triggers and the periodic auto-capture timer both funnel into
//! one cycle runner guarded by an atomic Idle/InFlight flag. A trigger
//! that finds a cycle outstanding is dropped, not queued: the next tick
//! or manual trigger is the only retry path, so requests can never pile
//! up against a slow backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use boardlens_camera_engine::CameraManager;
use boardlens_detection_model::Detection;

use crate::client::Analyze;

/// Default auto-capture period.
pub const DEFAULT_AUTO_INTERVAL: Duration = Duration::from_millis(5000);

/// Whether an analysis cycle is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    InFlight,
}

/// What asked for a cycle, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerKind {
    Manual,
    Timer,
}

/// Asynchronous results of capture cycles.
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    /// A cycle finished and its detections were applied. An empty list
    /// means the display was cleared.
    Completed {
        detections: Vec<Detection>,
        /// Server-reported processing time, when present.
        processing_time_secs: Option<f64>,
        /// Locally measured capture → response duration.
        round_trip: Duration,
        completed_at: DateTime<Utc>,
        generation: u64,
    },
    /// A cycle failed; the detection set was cleared.
    Failed { reason: String },
    /// A cycle completed against a session that no longer exists
    /// (facing switched mid-flight); its result was discarded.
    StaleDiscarded {
        result_generation: u64,
        active_generation: u64,
    },
}

/// Status snapshot for UI chrome ("Analyzing…" vs countdown).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub auto_interval: Option<Duration>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

struct Shared {
    camera: Arc<CameraManager>,
    analyzer: Arc<dyn Analyze>,
    in_flight: AtomicBool,
    detections: RwLock<Vec<Detection>>,
    auto_interval: Mutex<Option<Duration>>,
    last_completed_at: RwLock<Option<DateTime<Utc>>>,
    events: mpsc::UnboundedSender<AnalysisEvent>,
}

/// Paces capture → encode → analyze cycles.
pub struct CaptureScheduler {
    shared: Arc<Shared>,
    auto_task: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureScheduler {
    /// Create a scheduler and the receiver its events arrive on.
    pub fn new(
        camera: Arc<CameraManager>,
        analyzer: Arc<dyn Analyze>,
    ) -> (Self, mpsc::UnboundedReceiver<AnalysisEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            shared: Arc::new(Shared {
                camera,
                analyzer,
                in_flight: AtomicBool::new(false),
                detections: RwLock::new(Vec::new()),
                auto_interval: Mutex::new(None),
                last_completed_at: RwLock::new(None),
                events,
            }),
            auto_task: Mutex::new(None),
        };
        (scheduler, rx)
    }

    /// Attempt one cycle now. Dropped silently if a cycle is in flight.
    pub fn trigger_manual(&self) {
        let shared = self.shared.clone();
        tokio::spawn(async move {
            run_cycle(shared, TriggerKind::Manual).await;
        });
    }

    /// Enable or disable the periodic trigger.
    ///
    /// Enabling starts a timer at `interval` (default 5000 ms); enabling
    /// while already enabled restarts the timer with the new period;
    /// disabling cancels the timer task outright.
    pub fn set_auto_capture(&self, enabled: bool, interval: Option<Duration>) {
        let mut task_slot = self.auto_task.lock().unwrap();
        if let Some(task) = task_slot.take() {
            task.abort();
        }
        *self.shared.auto_interval.lock().unwrap() = None;

        if !enabled {
            tracing::info!("Auto-capture disabled");
            return;
        }

        let period = interval.unwrap_or(DEFAULT_AUTO_INTERVAL);
        *self.shared.auto_interval.lock().unwrap() = Some(period);
        tracing::info!(interval_ms = period.as_millis() as u64, "Auto-capture enabled");

        let shared = self.shared.clone();
        *task_slot = Some(tokio::spawn(async move {
            // First tick after one full period, matching the manual
            // trigger being the way to analyze immediately.
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                run_cycle(shared.clone(), TriggerKind::Timer).await;
            }
        }));
    }

    /// Current Idle/InFlight state.
    pub fn state(&self) -> SchedulerState {
        if self.shared.in_flight.load(Ordering::SeqCst) {
            SchedulerState::InFlight
        } else {
            SchedulerState::Idle
        }
    }

    /// The last successfully applied detection set.
    pub fn current_detections(&self) -> Vec<Detection> {
        self.shared.detections.read().unwrap().clone()
    }

    /// Snapshot for status chrome.
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            state: self.state(),
            auto_interval: *self.shared.auto_interval.lock().unwrap(),
            last_completed_at: *self.shared.last_completed_at.read().unwrap(),
        }
    }
}

impl Drop for CaptureScheduler {
    fn drop(&mut self) {
        // Timer tasks must not outlive the scheduler.
        if let Ok(mut task_slot) = self.auto_task.lock() {
            if let Some(task) = task_slot.take() {
                task.abort();
            }
        }
    }
}

/// Restores Idle on every exit path of a cycle.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn run_cycle(shared: Arc<Shared>, trigger: TriggerKind) {
    if shared
        .in_flight
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        tracing::debug!(?trigger, "Cycle already in flight, dropping trigger");
        return;
    }
    let _guard = FlightGuard(&shared.in_flight);

    let started = Instant::now();
    let (frame, generation) = match shared.camera.capture_frame().await {
        Ok(captured) => captured,
        Err(e) => {
            fail_cycle(&shared, format!("frame capture failed: {e}"));
            return;
        }
    };

    tracing::debug!(
        ?trigger,
        width = frame.width(),
        height = frame.height(),
        generation,
        "Submitting frame for analysis"
    );

    match shared.analyzer.process_image(&frame.transport_payload()).await {
        Ok(outcome) => {
            let active_generation = shared.camera.current_generation().await;
            if active_generation != generation {
                tracing::info!(
                    result_generation = generation,
                    active_generation,
                    "Discarding analysis result from a released session"
                );
                let _ = shared.events.send(AnalysisEvent::StaleDiscarded {
                    result_generation: generation,
                    active_generation,
                });
                return;
            }

            let completed_at = Utc::now();
            *shared.detections.write().unwrap() = outcome.detections.clone();
            *shared.last_completed_at.write().unwrap() = Some(completed_at);

            tracing::info!(
                detections = outcome.detections.len(),
                round_trip_ms = started.elapsed().as_millis() as u64,
                "Analysis cycle completed"
            );
            let _ = shared.events.send(AnalysisEvent::Completed {
                detections: outcome.detections,
                processing_time_secs: outcome.processing_time_secs,
                round_trip: started.elapsed(),
                completed_at,
                generation,
            });
        }
        Err(e) => {
            fail_cycle(&shared, e.to_string());
        }
    }
}

/// Clear stale detections and surface the failure. A failed cycle must
/// never leave overlays from an earlier frame on screen.
fn fail_cycle(shared: &Shared, reason: String) {
    shared.detections.write().unwrap().clear();
    tracing::warn!(%reason, "Analysis cycle failed");
    let _ = shared.events.send(AnalysisEvent::Failed { reason });
}
