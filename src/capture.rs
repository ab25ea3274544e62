//! # Webcam Capture Module
//!
//! Grabs a frame from the webcam on a fixed period and offers it to the
//! backend connection as a JPEG data URI.
//!
//! ## Per-tick rules, checked in order
//! 1. Paused: skip
//! 2. Connection not open: skip
//! 3. Grab (a black frame when there is no camera), encode, offer. A frame
//!    the connection cannot take right now is dropped.
//!
//! The worker thread only exits on shutdown; every failure is logged and the
//! next tick proceeds normally. The camera is opened on the worker thread
//! and released when the worker exits.

use crate::config::Config;
use crate::connection::FrameSink;
use crate::error::CaptureError;
use crate::frame::FrameEncoder;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use image::RgbImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Anything that can produce RGB frames on demand
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbImage, CaptureError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    NotOpen,
    Sent,
    Dropped,
    Failed,
}

/// One capture loop's worth of state, driven one tick at a time.
pub struct CaptureLoop {
    source: Option<Box<dyn FrameSource>>,
    encoder: FrameEncoder,
    sink: FrameSink,
    paused: Arc<AtomicBool>,
}

impl CaptureLoop {
    pub fn new(
        source: Option<Box<dyn FrameSource>>,
        encoder: FrameEncoder,
        sink: FrameSink,
        paused: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            encoder,
            sink,
            paused,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.paused.load(Ordering::Relaxed) {
            return TickOutcome::Paused;
        }
        if !self.sink.is_open() {
            return TickOutcome::NotOpen;
        }
        let grabbed = match self.source.as_mut() {
            Some(source) => source.grab(),
            None => Ok(self.encoder.blank_frame()),
        };

        let frame = match grabbed.and_then(|frame| self.encoder.encode(&frame)) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("{}", e);
                return TickOutcome::Failed;
            }
        };

        if self.sink.offer(frame) {
            TickOutcome::Sent
        } else {
            log::trace!("Connection busy, frame dropped");
            TickOutcome::Dropped
        }
    }
}

/// Stops the capture worker when asked or when dropped.
pub struct CaptureHandle {
    paused: Arc<AtomicBool>,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureHandle {
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// Stop ticking and release the camera. Waits for the worker to exit.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the worker's select
        if self.shutdown.take().is_some() {
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    log::error!("Capture worker panicked");
                }
            }
            log::info!("Capture loop stopped");
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the capture worker.
///
/// `open_source` runs on the worker thread, since some camera backends must
/// be used from the thread that opened them. If it fails the worker still
/// ticks and sends black frames.
pub fn spawn<F>(config: &Config, sink: FrameSink, open_source: F) -> CaptureHandle
where
    F: FnOnce() -> Result<Box<dyn FrameSource>, CaptureError> + Send + 'static,
{
    let paused = Arc::new(AtomicBool::new(false));
    let (shutdown_sender, shutdown_receiver) = bounded::<()>(0);
    let encoder = FrameEncoder::new(config.frame_width, config.frame_height, config.jpeg_quality());
    let interval = config.capture_interval();
    let worker_paused = paused.clone();

    let worker = thread::Builder::new()
        .name("capture".to_string())
        .spawn(move || {
            let source = match open_source() {
                Ok(source) => Some(source),
                Err(e) => {
                    log::error!("{}; sending black frames", e);
                    None
                }
            };
            let capture = CaptureLoop::new(source, encoder, sink, worker_paused);
            run_worker(capture, interval, shutdown_receiver);
        });

    let worker = match worker {
        Ok(worker) => Some(worker),
        Err(e) => {
            log::error!("Failed to spawn capture thread: {}", e);
            None
        }
    };

    CaptureHandle {
        paused,
        shutdown: Some(shutdown_sender),
        worker,
    }
}

fn run_worker(mut capture: CaptureLoop, interval: Duration, shutdown: Receiver<()>) {
    log::info!("Capture loop started, one frame every {:?}", interval);
    let ticker = tick(interval);

    loop {
        select! {
            recv(ticker) -> _ => {
                let outcome = capture.tick();
                log::trace!("Capture tick: {:?}", outcome);
            }
            recv(shutdown) -> _ => break,
        }
    }
}

/// Opens the configured webcam
#[cfg(feature = "webcam")]
pub fn open_camera(index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
    Ok(Box::new(webcam::Webcam::open(index)?))
}

/// Opens the configured webcam
#[cfg(not(feature = "webcam"))]
pub fn open_camera(_index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
    Err(CaptureError::Unsupported)
}

#[cfg(feature = "webcam")]
mod webcam {
    use super::FrameSource;
    use crate::error::CaptureError;
    use image::RgbImage;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;

    pub struct Webcam {
        camera: Camera,
    }

    impl Webcam {
        pub fn open(index: u32) -> Result<Self, CaptureError> {
            let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera = Camera::new(CameraIndex::Index(index), format)
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
            log::info!("Opened webcam {}: {}", index, camera.info().human_name());
            Ok(Self { camera })
        }
    }

    impl FrameSource for Webcam {
        fn grab(&mut self) -> Result<RgbImage, CaptureError> {
            let buffer = self
                .camera
                .frame()
                .map_err(|e| CaptureError::GrabFailed(e.to_string()))?;
            let decoded = buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| CaptureError::GrabFailed(e.to_string()))?;
            let (width, height) = (decoded.width(), decoded.height());
            RgbImage::from_raw(width, height, decoded.into_raw())
                .ok_or_else(|| CaptureError::GrabFailed("frame buffer size mismatch".to_string()))
        }
    }

    impl Drop for Webcam {
        fn drop(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                log::warn!("Failed to release webcam: {}", e);
            }
        }
    }
}
