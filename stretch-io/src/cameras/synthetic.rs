//! Synthetic camera driver
//!
//! Renders a moving gradient test pattern at the configured rate. A capture
//! thread keeps the latest frame available for `async_read`; `read` renders
//! on the caller's thread, paced to the configured fps.

use crate::config::CameraConfig;
use crate::core::driver::{Camera, CameraLogs};
use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use image::{imageops, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Minimum time `async_read` waits for a frame
const MIN_ASYNC_TIMEOUT: Duration = Duration::from_millis(200);

struct TimedFrame {
    image: RgbImage,
    captured_at: Instant,
}

struct CaptureThread {
    frames: Receiver<TimedFrame>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureThread {
    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub struct SyntheticCamera {
    name: String,
    config: CameraConfig,
    capture: Option<CaptureThread>,
    connected_at: Option<Instant>,
    last_frame_at: Option<Instant>,
    sync_index: u64,
    logs: CameraLogs,
}

impl SyntheticCamera {
    pub fn new(name: &str, config: CameraConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            capture: None,
            connected_at: None,
            last_frame_at: None,
            sync_index: 0,
            logs: CameraLogs::default(),
        }
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.fps as f64)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Camera {
            name: self.name.clone(),
            message: message.into(),
        }
    }

    fn record_frame(&mut self, captured_at: Instant) {
        if let Some(previous) = self.last_frame_at {
            self.logs.delta_timestamp_s = captured_at.saturating_duration_since(previous).as_secs_f64();
        }
        if let Some(connected_at) = self.connected_at {
            self.logs.timestamp_s = captured_at.saturating_duration_since(connected_at).as_secs_f64();
        }
        self.last_frame_at = Some(captured_at);
    }
}

/// Render frame `index` of the test pattern, rotated as configured
fn render_frame(config: &CameraConfig, index: u64) -> RgbImage {
    let shift = (index % 256) as u32;
    let frame = RgbImage::from_fn(config.width, config.height, |x, y| {
        Rgb([
            ((x + shift * 4) % 256) as u8,
            ((y + shift * 2) % 256) as u8,
            ((x ^ y) % 256) as u8,
        ])
    });
    match config.rotation {
        Some(90) => imageops::rotate90(&frame),
        Some(-90) => imageops::rotate270(&frame),
        Some(180) => imageops::rotate180(&frame),
        _ => frame,
    }
}

/// Keep only the newest frame in the single-slot channel
fn publish(tx: &Sender<TimedFrame>, stale: &Receiver<TimedFrame>, frame: TimedFrame) -> bool {
    match tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(frame)) => {
            let _ = stale.try_recv();
            tx.try_send(frame).is_ok()
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn capture_loop(
    config: CameraConfig,
    tx: Sender<TimedFrame>,
    stale: Receiver<TimedFrame>,
    shutdown: Arc<AtomicBool>,
) {
    let period = Duration::from_secs_f64(1.0 / config.fps as f64);
    let mut index = 0u64;
    let mut next_frame = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        let frame = TimedFrame {
            image: render_frame(&config, index),
            captured_at: Instant::now(),
        };
        if !publish(&tx, &stale, frame) {
            break;
        }
        index += 1;

        next_frame += period;
        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
        } else {
            // Fell behind, resync instead of bursting
            next_frame = now;
        }
    }
}

impl Camera for SyntheticCamera {
    fn connect(&mut self) -> Result<()> {
        if self.capture.is_some() {
            return Err(Error::AlreadyConnected);
        }
        if self.config.fail_connect {
            return Err(self.error("device not found"));
        }

        let (tx, rx) = bounded(1);
        let stale = rx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown);
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name(format!("camera-{}", self.name))
            .spawn(move || capture_loop(config, tx, stale, thread_shutdown))
            .map_err(|e| self.error(format!("failed to spawn capture thread: {}", e)))?;

        self.capture = Some(CaptureThread {
            frames: rx,
            shutdown,
            handle: Some(handle),
        });
        self.connected_at = Some(Instant::now());
        self.last_frame_at = None;
        self.logs = CameraLogs::default();
        log::debug!(
            "Camera {}: connected ({}x{} @ {} fps)",
            self.name,
            self.config.width,
            self.config.height,
            self.config.fps
        );
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.capture.is_some()
    }

    fn read(&mut self) -> Result<RgbImage> {
        if self.capture.is_none() {
            return Err(Error::NotConnected);
        }
        if let Some(previous) = self.last_frame_at {
            let due = previous + self.frame_period();
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        let image = render_frame(&self.config, self.sync_index);
        self.sync_index += 1;
        self.record_frame(Instant::now());
        Ok(image)
    }

    fn async_read(&mut self) -> Result<RgbImage> {
        let timeout = (self.frame_period() * 10).max(MIN_ASYNC_TIMEOUT);
        let frame = {
            let capture = self.capture.as_ref().ok_or(Error::NotConnected)?;
            match capture.frames.recv_timeout(timeout) {
                Ok(frame) => frame,
                Err(RecvTimeoutError::Timeout) => return Err(Error::Timeout),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(self.error("capture thread exited"));
                }
            }
        };
        self.record_frame(frame.captured_at);
        Ok(frame.image)
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut capture = self.capture.take().ok_or(Error::NotConnected)?;
        capture.stop();
        self.connected_at = None;
        log::debug!("Camera {}: disconnected", self.name);
        Ok(())
    }

    fn logs(&self) -> CameraLogs {
        self.logs
    }

    fn frame_shape(&self) -> (usize, usize) {
        let (w, h) = (self.config.width as usize, self.config.height as usize);
        match self.config.rotation {
            Some(90) | Some(-90) => (w, h),
            _ => (h, w),
        }
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
    }
}
