//! Capture loop: read, detect, draw, classify, display.

use crate::{
    capture::{CameraSource, DisplaySurface, FrameSource, HighGuiDisplay},
    config::Config,
    constants::{
        ACTIVE_TEXT_BGR, ESCAPE_KEY, INACTIVE_TEXT_BGR, NUM_FACE_MESH_LANDMARKS, QUIT_KEY, TEXT_LINE_SPACING,
        TEXT_ORIGIN_X, TEXT_ORIGIN_Y, TEXT_SCALE, TEXT_THICKNESS,
    },
    error::Result,
    expression::{classify, ExpressionFlags},
    face_mesh::FaceMeshPipeline,
    geometry::{bgr_scalar, draw_all_features, to_pixel_coordinates},
    landmarks::{LandmarkSet, LandmarkSource},
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

/// Capture loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Frames are being processed
    Running,
    /// The stream ended or the user quit
    Stopped,
}

/// Result of processing a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Faces returned by the landmark source
    pub faces_found: usize,
    /// Expression flags for every face that was analyzed
    pub expressions: Vec<ExpressionFlags>,
    /// Faces skipped because their landmarks did not fit the mesh topology
    pub skipped_faces: usize,
}

/// Per-frame orchestration of capture, landmarks and display
pub struct CaptureLoop {
    frames: Box<dyn FrameSource>,
    landmarks: Box<dyn LandmarkSource>,
    display: Box<dyn DisplaySurface>,
    mirror: bool,
    state: LoopState,
    frame_count: u64,
}

impl CaptureLoop {
    /// Create a capture loop from its collaborators
    #[must_use]
    pub fn new(
        frames: Box<dyn FrameSource>,
        landmarks: Box<dyn LandmarkSource>,
        display: Box<dyn DisplaySurface>,
        mirror: bool,
    ) -> Self {
        Self {
            frames,
            landmarks,
            display,
            mirror,
            state: LoopState::Running,
            frame_count: 0,
        }
    }

    /// Open the configured video source, models and window
    ///
    /// # Errors
    ///
    /// Returns an error if a model cannot be loaded or the capture device or
    /// window cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        info!("Initializing facial expression tracker");

        let landmarks = FaceMeshPipeline::new(&config.models, config.landmarks.clone())?;
        let frames = CameraSource::open(config.capture.video_source())?;
        let display = HighGuiDisplay::new(&config.display.window_name)?;

        Ok(Self::new(
            Box::new(frames),
            Box::new(landmarks),
            Box::new(display),
            config.capture.mirror,
        ))
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames processed so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Process one frame
    ///
    /// Returns `None` without touching the landmark source or the display
    /// when no frame could be read; the loop is stopped in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if color conversion, landmark inference, drawing or
    /// display fails.
    pub fn tick(&mut self) -> Result<Option<FrameReport>> {
        if self.state == LoopState::Stopped {
            return Ok(None);
        }

        let mut frame = Mat::default();
        match self.frames.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => {
                info!("No more frames after {} processed", self.frame_count);
                self.state = LoopState::Stopped;
                return Ok(None);
            }
            Err(e) => {
                info!("Failed to read frame: {}", e);
                self.state = LoopState::Stopped;
                return Ok(None);
            }
        }

        if self.mirror {
            let source = frame.clone();
            opencv::core::flip(&source, &mut frame, 1)?;
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(&frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        let faces = self.landmarks.process(&rgb)?;
        let report = annotate_frame(&mut frame, &faces)?;

        self.display.show(&frame)?;
        self.frame_count += 1;

        let key = self.display.poll_key()?;
        if is_quit_key(key) {
            info!("Exit requested by user");
            self.state = LoopState::Stopped;
        }

        Ok(Some(report))
    }

    /// Run until the stream ends or the user quits
    ///
    /// The video source and the window are released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the first per-frame error, or a shutdown error.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting capture loop with {}", self.landmarks.name());

        let outcome = loop {
            if self.state == LoopState::Stopped {
                break Ok(());
            }
            match self.tick() {
                Ok(Some(report)) => debug!(
                    "Frame {}: {} face(s), {:?}",
                    self.frame_count, report.faces_found, report.expressions
                ),
                Ok(None) => {}
                Err(e) => break Err(e),
            }
        };

        let shutdown = self.shutdown();
        info!("Capture loop finished after {} frames", self.frame_count);
        outcome.and(shutdown)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.state = LoopState::Stopped;
        let released = self.frames.release();
        let closed = self.display.close();
        released.and(closed)
    }
}

/// Draw landmarks and expression text for every face onto a BGR frame
///
/// Faces with fewer landmarks than the mesh topology are skipped.
///
/// # Errors
///
/// Returns an error if a drawing call fails.
pub fn annotate_frame(frame: &mut Mat, faces: &[LandmarkSet]) -> Result<FrameReport> {
    let (width, height) = (frame.cols(), frame.rows());
    let mut report = FrameReport {
        faces_found: faces.len(),
        ..FrameReport::default()
    };

    for face in faces {
        if face.len() < NUM_FACE_MESH_LANDMARKS {
            warn!(
                "Skipping face with {} landmarks, expected {}",
                face.len(),
                NUM_FACE_MESH_LANDMARKS
            );
            report.skipped_faces += 1;
            continue;
        }

        let points = to_pixel_coordinates(face, width, height);
        draw_all_features(frame, &points)?;

        let flags = classify(&points)?;
        render_expression_overlay(frame, &flags)?;
        report.expressions.push(flags);
    }

    Ok(report)
}

/// Write one `"<name>: YES|NO"` line per expression from the top-left corner
///
/// # Errors
///
/// Returns an error if text rendering fails.
pub fn render_expression_overlay(frame: &mut Mat, flags: &ExpressionFlags) -> Result<()> {
    let mut y = TEXT_ORIGIN_Y;
    for (name, active) in flags.entries() {
        let text = format!("{}: {}", name, if active { "YES" } else { "NO" });
        let color = bgr_scalar(if active { ACTIVE_TEXT_BGR } else { INACTIVE_TEXT_BGR });
        imgproc::put_text(
            frame,
            &text,
            Point::new(TEXT_ORIGIN_X, y),
            FONT_HERSHEY_SIMPLEX,
            TEXT_SCALE,
            color,
            TEXT_THICKNESS,
            LINE_8,
            false,
        )?;
        y += TEXT_LINE_SPACING;
    }

    Ok(())
}

/// Whether a polled key code stops the loop
#[must_use]
pub fn is_quit_key(key: i32) -> bool {
    // Some backends report modifier bits above the low byte
    let key = if key < 0 { key } else { key & 0xFF };
    key == QUIT_KEY || key == ESCAPE_KEY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(i32::from(b'q')));
        assert!(is_quit_key(27));
        assert!(!is_quit_key(-1));
        assert!(!is_quit_key(i32::from(b'Q')));
        assert!(!is_quit_key(i32::from(b'w')));
    }

    #[test]
    fn test_quit_key_with_modifier_bits() {
        assert!(is_quit_key(0x10_0000 | i32::from(b'q')));
    }
}
