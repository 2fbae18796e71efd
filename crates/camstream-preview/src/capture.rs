//! Synthetic capture source.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use camstream_engine::Error;
use camstream_engine::frame::{Frame, FrameProducer};
use camstream_engine::time::presentation_nanos;

/// SMPTE-style bars, left to right.
const BARS: [[u8; 4]; 7] = [
    [192, 192, 192, 255],
    [192, 192, 0, 255],
    [0, 192, 192, 255],
    [0, 192, 0, 255],
    [192, 0, 192, 255],
    [192, 0, 0, 255],
    [0, 0, 192, 255],
];

/// Capture thread that writes scrolling color bars into a frame queue.
pub struct TestPattern {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TestPattern {
    pub fn start(producer: FrameProducer, width: u32, height: u32, fps: u32) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let interval = Duration::from_secs(1) / fps.max(1);

        let thread = std::thread::Builder::new()
            .name("camstream-test-pattern".to_string())
            .spawn({
                let stop = Arc::clone(&stop);
                move || run(producer, width, height, interval, &stop)
            })
            .context("failed to spawn test pattern thread")?;

        log::info!("test pattern started: {width}x{height} @ {fps} fps");

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Stops the thread and waits for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("test pattern thread panicked");
            }
        }
    }
}

impl Drop for TestPattern {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(producer: FrameProducer, width: u32, height: u32, interval: Duration, stop: &AtomicBool) {
    let mut index = 0u32;

    while !stop.load(Ordering::Acquire) {
        let pixels = bars(width, height, index);
        let frame = match Frame::rgba8(presentation_nanos(), width, height, pixels) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("test pattern produced an invalid frame: {e}");
                return;
            }
        };

        match producer.submit(frame) {
            Ok(()) => {}
            Err(Error::UseAfterRelease { .. }) => {
                log::debug!("frame queue released; test pattern stopping");
                return;
            }
            Err(e) => {
                log::error!("frame submission failed: {e}");
                return;
            }
        }

        index = index.wrapping_add(1);
        std::thread::sleep(interval);
    }
}

/// Bars scrolled left by `index` pixels, with a white sweep line.
fn bars(width: u32, height: u32, index: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    let bar_width = (width / BARS.len() as u32).max(1);
    let sweep = index % width.max(1);

    for _ in 0..height {
        for x in 0..width {
            if x == sweep {
                pixels.extend_from_slice(&[255, 255, 255, 255]);
                continue;
            }
            let bar = ((x + index) / bar_width) as usize % BARS.len();
            pixels.extend_from_slice(&BARS[bar]);
        }
    }

    pixels
}
