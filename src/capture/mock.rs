//! Scripted camera backend for tests and the headless demo.
//!
//! A [`MockBackend`] is a cheap clonable view onto a shared rig, so a
//! test can hand one clone to the controller and keep another to
//! queue frames and inspect which devices are open.

use super::{Camera, CameraBackend, CameraError, Frame, PixelFormat};
use crate::config::CaptureConfig;
use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

/// One scripted result for a frame read.
#[derive(Debug)]
enum ScriptedRead {
    Frame(Frame),
    Failure,
}

#[derive(Debug, Default)]
struct Rig {
    /// Indices that open successfully.
    available: BTreeSet<u32>,
    /// Indices currently held open.
    open: BTreeSet<u32>,
    /// Every index passed to `open_device`, in order.
    probed: Vec<u32>,
    /// Successful opens since creation.
    total_opens: u64,
    /// Reads served, scripted or synthetic.
    total_reads: u64,
    script: VecDeque<ScriptedRead>,
}

/// Camera backend backed by an in-memory rig.
#[derive(Debug, Clone)]
pub struct MockBackend {
    rig: Rc<RefCell<Rig>>,
}

impl MockBackend {
    /// Creates a backend where only device 0 opens.
    pub fn new() -> Self {
        Self::with_devices(&[0])
    }

    /// Creates a backend where exactly the given indices open.
    pub fn with_devices(indices: &[u32]) -> Self {
        let rig = Rig {
            available: indices.iter().copied().collect(),
            ..Rig::default()
        };
        Self {
            rig: Rc::new(RefCell::new(rig)),
        }
    }

    /// Creates a backend where no device opens.
    pub fn without_devices() -> Self {
        Self::with_devices(&[])
    }

    /// Makes a device index available or unavailable for future opens.
    pub fn set_available(&self, index: u32, available: bool) {
        let mut rig = self.rig.borrow_mut();
        if available {
            rig.available.insert(index);
        } else {
            rig.available.remove(&index);
        }
    }

    /// Queues a frame to be returned by the next read.
    pub fn push_frame(&self, frame: Frame) {
        self.rig
            .borrow_mut()
            .script
            .push_back(ScriptedRead::Frame(frame));
    }

    /// Queues a failed read.
    pub fn push_read_failure(&self) {
        self.rig.borrow_mut().script.push_back(ScriptedRead::Failure);
    }

    /// Number of devices currently open.
    pub fn open_devices(&self) -> usize {
        self.rig.borrow().open.len()
    }

    /// Number of successful opens so far.
    pub fn total_opens(&self) -> u64 {
        self.rig.borrow().total_opens
    }

    /// Number of frame reads served so far.
    pub fn total_reads(&self) -> u64 {
        self.rig.borrow().total_reads
    }

    /// Every index an open was attempted on, in order.
    pub fn probed(&self) -> Vec<u32> {
        self.rig.borrow().probed.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for MockBackend {
    fn open_device(
        &mut self,
        index: u32,
        config: &CaptureConfig,
    ) -> Result<Box<dyn Camera>, CameraError> {
        let mut rig = self.rig.borrow_mut();
        rig.probed.push(index);

        if !rig.available.contains(&index) {
            return Err(CameraError::OpenFailed {
                index,
                reason: "no such device".to_string(),
            });
        }
        if !rig.open.insert(index) {
            return Err(CameraError::OpenFailed {
                index,
                reason: "device busy".to_string(),
            });
        }
        rig.total_opens += 1;
        tracing::info!(index, "MockCamera opened");

        Ok(Box::new(MockCamera {
            index,
            width: config.width,
            height: config.height,
            sequence: 0,
            open: true,
            rig: Rc::clone(&self.rig),
        }))
    }
}

/// A device opened through [`MockBackend`].
#[derive(Debug)]
pub struct MockCamera {
    index: u32,
    width: u32,
    height: u32,
    sequence: u64,
    open: bool,
    rig: Rc<RefCell<Rig>>,
}

impl MockCamera {
    fn synthetic_frame(&self) -> Frame {
        // Deterministic pattern, no QR code in it
        let pixel_count = (self.width * self.height) as usize;
        let pixels: Vec<u8> = (0..pixel_count * 3)
            .map(|i| ((i as u64 ^ self.sequence) % 256) as u8)
            .collect();
        Frame::new(pixels, self.width, self.height, PixelFormat::Bgr8, self.sequence)
    }
}

impl Camera for MockCamera {
    fn index(&self) -> u32 {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.open {
            return Err(CameraError::Closed);
        }
        self.sequence += 1;

        let scripted = {
            let mut rig = self.rig.borrow_mut();
            rig.total_reads += 1;
            rig.script.pop_front()
        };
        match scripted {
            Some(ScriptedRead::Frame(frame)) => Ok(frame),
            Some(ScriptedRead::Failure) => {
                Err(CameraError::CaptureFailed("scripted read failure".to_string()))
            }
            None => Ok(self.synthetic_frame()),
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.rig.borrow_mut().open.remove(&self.index);
            tracing::info!(index = self.index, "MockCamera closed");
        }
    }
}

impl Drop for MockCamera {
    fn drop(&mut self) {
        self.close();
    }
}
