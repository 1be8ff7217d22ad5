//! Video input and window output behind small traits, so the capture loop
//! can run against real devices or test doubles.

use crate::{constants::KEY_POLL_DELAY_MS, Error, Result};
use log::{info, warn};
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::path::PathBuf;

/// Video source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(PathBuf),
}

/// Something that produces BGR frames
pub trait FrameSource {
    /// Read the next frame into `frame`
    ///
    /// Returns `Ok(false)` when no frame is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device fails.
    fn read(&mut self, frame: &mut Mat) -> Result<bool>;

    /// Release the underlying device
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be released.
    fn release(&mut self) -> Result<()>;
}

/// Something that shows frames and reports key presses
pub trait DisplaySurface {
    /// Show a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be displayed.
    fn show(&mut self, frame: &Mat) -> Result<()>;

    /// Key pressed since the last poll, or -1 if none
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop fails.
    fn poll_key(&mut self) -> Result<i32>;

    /// Close the window
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be destroyed.
    fn close(&mut self) -> Result<()>;
}

/// `OpenCV` video capture for cameras and video files
pub struct CameraSource {
    capture: VideoCapture,
    source: VideoSource,
}

impl CameraSource {
    /// Open a video source
    ///
    /// A device that fails to open is not an error here; its reads fail and
    /// the capture loop ends on the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `OpenCV` cannot create the capture object.
    pub fn open(source: VideoSource) -> Result<Self> {
        let mut capture = match &source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                VideoCapture::new(*index, videoio::CAP_ANY)?
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path.display());
                let path = path
                    .to_str()
                    .ok_or_else(|| Error::Capture(format!("Video path is not valid UTF-8: {}", path.display())))?;
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        if !capture.is_opened()? {
            warn!("Video source {:?} could not be opened", source);
        } else if matches!(source, VideoSource::Camera(_)) {
            // Keep only the latest frame (webcam only)
            capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;
            info!("Camera buffer size set to 1 for low latency");
        }

        Ok(Self { capture, source })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self, frame: &mut Mat) -> Result<bool> {
        if !self.capture.is_opened()? {
            return Ok(false);
        }
        Ok(self.capture.read(frame)?)
    }

    fn release(&mut self) -> Result<()> {
        info!("Releasing video source {:?}", self.source);
        self.capture.release()?;
        Ok(())
    }
}

/// `HighGUI` window
pub struct HighGuiDisplay {
    window_name: String,
}

impl HighGuiDisplay {
    /// Create the named window
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(window_name: &str) -> Result<Self> {
        highgui::named_window(window_name, WINDOW_AUTOSIZE)
            .map_err(|e| Error::Display(format!("Failed to create window '{window_name}': {e}")))?;

        Ok(Self {
            window_name: window_name.to_string(),
        })
    }
}

impl DisplaySurface for HighGuiDisplay {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.window_name, frame)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<i32> {
        Ok(highgui::wait_key(KEY_POLL_DELAY_MS)?)
    }

    fn close(&mut self) -> Result<()> {
        highgui::destroy_window(&self.window_name)?;
        Ok(())
    }
}
