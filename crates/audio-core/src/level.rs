//! Output level monitoring
//!
//! A [`LevelMonitor`] polls a [`PeakMeter`] on a dedicated thread and hands
//! the readings to async code as a [`LevelStream`]. OS meter handles are
//! usually tied to the thread that created them (COM apartments, for
//! instance), so the meter is opened inside the polling thread by a
//! factory closure rather than passed in.
//!
//! The loop runs until its [`StopHandle`] is raised or the stream is
//! dropped. A failed meter query is skipped and polling continues.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use futures::Stream as FuturesStream;
use tokio::sync::mpsc as tokio_mpsc;

use crate::error::AudioError;
use crate::traits::PeakMeter;

/// Delay between two meter queries
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Peak above which audio is considered to be playing
pub const AUDIBLE_THRESHOLD: f32 = 0.01;

/// A single peak meter sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReading {
    pub peak: f32,
}

impl LevelReading {
    pub fn new(peak: f32) -> Self {
        Self { peak }
    }

    fn clamped(&self) -> f32 {
        if self.peak.is_nan() {
            0.0
        } else {
            self.peak.clamp(0.0, 1.0)
        }
    }

    pub fn percent(&self) -> f32 {
        self.clamped() * 100.0
    }

    pub fn is_audible(&self) -> bool {
        self.peak > AUDIBLE_THRESHOLD
    }

    /// Render the level as `width` characters of `#` (filled) and `-`
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.clamped() * width as f32) as usize).min(width);
        let mut bar = "#".repeat(filled);
        bar.push_str(&"-".repeat(width - filled));
        bar
    }
}

/// Shared stop signal for a running monitor
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Starts level polling threads
pub struct LevelMonitor;

impl LevelMonitor {
    /// Start polling at [`POLL_INTERVAL`]
    pub fn start<M, F>(open_meter: F) -> Result<LevelStream, AudioError>
    where
        M: PeakMeter,
        F: FnOnce() -> Result<M, AudioError> + Send + 'static,
    {
        Self::start_with_interval(open_meter, POLL_INTERVAL)
    }

    /// Start polling at a custom interval
    ///
    /// Blocks until the meter has been opened so that an open failure is
    /// reported here rather than as a silently empty stream.
    pub fn start_with_interval<M, F>(open_meter: F, interval: Duration) -> Result<LevelStream, AudioError>
    where
        M: PeakMeter,
        F: FnOnce() -> Result<M, AudioError> + Send + 'static,
    {
        let (tx, rx) = tokio_mpsc::unbounded_channel::<LevelReading>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), AudioError>>();
        let stop = StopHandle::default();
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("level-monitor".to_string())
            .spawn(move || {
                let mut meter = match open_meter() {
                    Ok(meter) => {
                        let _ = ready_tx.send(Ok(()));
                        meter
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run_level_loop(&mut meter, &thread_stop, &tx, interval);
            })
            .map_err(|e| AudioError::MeterError(format!("Failed to spawn monitor thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(LevelStream {
                receiver: rx,
                stop,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(AudioError::MeterError(
                    "Monitor thread exited before opening the meter".to_string(),
                ))
            }
        }
    }
}

/// Poll the meter until stopped or until nobody listens anymore
fn run_level_loop<M: PeakMeter>(
    meter: &mut M,
    stop: &StopHandle,
    tx: &tokio_mpsc::UnboundedSender<LevelReading>,
    interval: Duration,
) {
    tracing::info!("Level monitor started");

    while !stop.is_stopped() {
        match meter.peak() {
            Ok(peak) => {
                if tx.send(LevelReading::new(peak)).is_err() {
                    tracing::debug!("Level receiver dropped");
                    break;
                }
            }
            Err(e) => {
                tracing::trace!("Peak meter query failed: {}", e);
            }
        }
        thread::sleep(interval);
    }

    tracing::info!("Level monitor stopped");
}

/// Stream of level readings from a running monitor
///
/// Ends once the monitor is stopped. Dropping the stream stops the polling
/// thread and waits for it to exit.
pub struct LevelStream {
    receiver: tokio_mpsc::UnboundedReceiver<LevelReading>,
    stop: StopHandle,
    handle: Option<JoinHandle<()>>,
}

impl LevelStream {
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }
}

impl FuturesStream for LevelStream {
    type Item = LevelReading;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}

impl Drop for LevelStream {
    fn drop(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Level monitor thread panicked");
            }
        }
    }
}
