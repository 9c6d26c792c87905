use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{error, info, warn};

use crate::classifier;
use crate::config::{AppConfig, ConfigError};
use crate::dispatch::ActionDispatcher;
use crate::features;
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::source::{LandmarkSource, SourceError};
use crate::stabilizer::Stabilizer;
use crate::types::{Frame, GestureEvent};

/// Pipeline lifecycle: `Stopped -> Running -> Draining -> Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Stopped,
    Running,
    Draining,
}

/// Final account of a pipeline run, returned by [`Pipeline::shutdown`].
#[derive(Debug)]
pub struct PipelineReport {
    pub state: PipelineState,
    /// Source fault that ended the run, if any.
    pub fault: Option<SourceError>,
    pub metrics: MetricsSnapshot,
    /// False when the drain deadline elapsed with frames still in flight.
    pub drained_cleanly: bool,
}

/// Owns the three stage threads (capture, processing, dispatch) and the
/// bounded queues between them.
///
/// Capture never blocks on downstream congestion: a full frame queue drops
/// its oldest entry in favor of the newest (latest-frame-wins). Shutdown
/// propagates stage to stage by dropping senders, so every stage observes
/// end-of-stream and exits on its own; `shutdown` merely waits for that
/// cascade up to the drain deadline.
pub struct Pipeline {
    stop_flag: Arc<AtomicBool>,
    metrics: Arc<PipelineMetrics>,
    fault_rx: Receiver<SourceError>,
    done_rx: Receiver<()>,
    handles: Vec<JoinHandle<()>>,
    drain_deadline: Duration,
}

impl Pipeline {
    /// Validate the configuration and start all stages. Configuration
    /// defects are fatal here and never reach the classification path.
    pub fn start<S, D>(config: AppConfig, source: S, dispatcher: D) -> Result<Pipeline, ConfigError>
    where
        S: LandmarkSource,
        D: ActionDispatcher,
    {
        config.validate()?;

        let metrics = Arc::new(PipelineMetrics::default());
        let stop_flag = Arc::new(AtomicBool::new(false));

        let (frame_tx, frame_rx) = bounded::<Frame>(config.channels.frame_queue_capacity);
        let (event_tx, event_rx) = bounded::<GestureEvent>(config.channels.event_queue_capacity);
        let (fault_tx, fault_rx) = bounded::<SourceError>(1);
        // Completion signal: every stage holds a sender and sends nothing;
        // the receiver disconnects exactly when the last stage exits.
        let (done_tx, done_rx) = bounded::<()>(1);

        let drain_deadline = Duration::from_millis(config.pipeline.drain_deadline_ms);

        let mut handles = Vec::with_capacity(3);

        {
            let stop_flag = Arc::clone(&stop_flag);
            let metrics = Arc::clone(&metrics);
            let drop_rx = frame_rx.clone();
            let done_tx = done_tx.clone();
            handles.push(
                thread::Builder::new()
                    .name("gh-capture".into())
                    .spawn(move || {
                        capture_stage(source, frame_tx, drop_rx, stop_flag, metrics, fault_tx);
                        drop(done_tx);
                    })
                    .expect("failed to spawn capture stage"),
            );
        }

        {
            let config = config.clone();
            let metrics = Arc::clone(&metrics);
            let done_tx = done_tx.clone();
            handles.push(
                thread::Builder::new()
                    .name("gh-process".into())
                    .spawn(move || {
                        processing_stage(frame_rx, event_tx, config, metrics);
                        drop(done_tx);
                    })
                    .expect("failed to spawn processing stage"),
            );
        }

        {
            let metrics = Arc::clone(&metrics);
            handles.push(
                thread::Builder::new()
                    .name("gh-dispatch".into())
                    .spawn(move || {
                        dispatch_stage(event_rx, dispatcher, metrics);
                        drop(done_tx);
                    })
                    .expect("failed to spawn dispatch stage"),
            );
        }

        info!("pipeline started (running)");
        Ok(Pipeline {
            stop_flag,
            metrics,
            fault_rx,
            done_rx,
            handles,
            drain_deadline,
        })
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn state(&self) -> PipelineState {
        if self.stop_flag.load(Ordering::Relaxed) {
            PipelineState::Draining
        } else {
            PipelineState::Running
        }
    }

    /// Block until every stage has exited on its own (source fault or
    /// upstream end-of-stream), or the timeout elapses. Returns true once
    /// the pipeline is fully drained.
    pub fn wait(&self, timeout: Duration) -> bool {
        matches!(
            self.done_rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Request a drain and wait for the stage cascade to finish, up to the
    /// configured drain deadline. Frames still queued past the deadline are
    /// abandoned with the stages that hold them.
    pub fn shutdown(self) -> PipelineReport {
        info!("pipeline draining");
        self.stop_flag.store(true, Ordering::Relaxed);

        let drained_cleanly = matches!(
            self.done_rx.recv_timeout(self.drain_deadline),
            Err(RecvTimeoutError::Disconnected)
        );

        if drained_cleanly {
            for handle in self.handles {
                let _ = handle.join();
            }
            info!("pipeline stopped");
        } else {
            warn!(
                "drain deadline ({:?}) elapsed, abandoning in-flight frames",
                self.drain_deadline
            );
        }

        PipelineReport {
            state: PipelineState::Stopped,
            fault: self.fault_rx.try_recv().ok(),
            metrics: self.metrics.snapshot(),
            drained_cleanly,
        }
    }
}

/// Capture stage: pulls frames from the landmark source and forwards them
/// under the latest-frame-wins policy. A source fault is reported once and
/// ends the stage; it is never retried here.
fn capture_stage<S: LandmarkSource>(
    mut source: S,
    frame_tx: Sender<Frame>,
    drop_rx: Receiver<Frame>,
    stop_flag: Arc<AtomicBool>,
    metrics: Arc<PipelineMetrics>,
    fault_tx: Sender<SourceError>,
) {
    while !stop_flag.load(Ordering::Relaxed) {
        match source.next_frame() {
            Ok(frame) => {
                PipelineMetrics::incr(&metrics.frames_captured);
                let mut pending = frame;
                loop {
                    match frame_tx.try_send(pending) {
                        Ok(()) => break,
                        Err(TrySendError::Full(frame)) => {
                            // Latest frame wins: displace the oldest queued
                            // frame so capture never stalls.
                            if drop_rx.try_recv().is_ok() {
                                PipelineMetrics::incr(&metrics.frames_dropped);
                            }
                            pending = frame;
                        }
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
            }
            Err(fault) => {
                error!("landmark source fault: {}", fault);
                let _ = fault_tx.send(fault);
                stop_flag.store(true, Ordering::Relaxed);
                break;
            }
        }
    }
    info!("capture stage exiting");
}

/// Processing stage: extraction, classification and stabilization, in frame
/// order. Owns the per-hand stabilizer map exclusively (single writer).
fn processing_stage(
    frame_rx: Receiver<Frame>,
    event_tx: Sender<GestureEvent>,
    config: AppConfig,
    metrics: Arc<PipelineMetrics>,
) {
    let mut stabilizer = Stabilizer::new(&config.recognition);

    while let Ok(frame) = frame_rx.recv() {
        PipelineMetrics::set(&metrics.frame_queue_depth, frame_rx.len() as u64);

        for hand in frame.hands.iter().take(config.detection.max_num_hands) {
            if hand.confidence < config.detection.min_detection_confidence {
                PipelineMetrics::incr(&metrics.hands_skipped);
                continue;
            }

            let features = match features::extract(hand) {
                Ok(f) => f,
                Err(e) => {
                    // Input defect: skip this hand for this frame only.
                    warn!("frame {}: skipping {} hand: {}", frame.seq, hand.handedness, e);
                    PipelineMetrics::incr(&metrics.hands_skipped);
                    continue;
                }
            };

            let classification = classifier::classify(&features, &config.recognition);
            if let Some(event) = stabilizer.observe(
                hand.handedness,
                classification,
                frame.captured_at,
                frame.timestamp_ms,
            ) {
                PipelineMetrics::incr(&metrics.events_emitted);
                if event_tx.send(event).is_err() {
                    info!("dispatch stage gone, processing stage exiting");
                    return;
                }
            }
        }

        stabilizer.prune(frame.captured_at);
        PipelineMetrics::incr(&metrics.frames_processed);
        PipelineMetrics::set(
            &metrics.last_latency_us,
            frame.captured_at.elapsed().as_micros() as u64,
        );
    }
    info!("processing stage exiting");
}

/// Dispatch stage: forwards confirmed events to the action boundary,
/// fire-and-forget.
fn dispatch_stage<D: ActionDispatcher>(
    event_rx: Receiver<GestureEvent>,
    dispatcher: D,
    metrics: Arc<PipelineMetrics>,
) {
    while let Ok(event) = event_rx.recv() {
        PipelineMetrics::set(&metrics.event_queue_depth, event_rx.len() as u64);
        if dispatcher.dispatch(&event) {
            PipelineMetrics::incr(&metrics.commands_dispatched);
        } else {
            PipelineMetrics::incr(&metrics.commands_dropped);
        }
    }
    info!("dispatch stage exiting");
}
