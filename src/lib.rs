//! Real-time facial feature tracking with coarse expression analysis.
//!
//! This library draws facial feature outlines over live video and flags three
//! expressions per face using:
//! - ONNX Runtime for face detection and face mesh inference
//! - `OpenCV` for capture, drawing and display
//!
//! The per-frame pipeline consists of:
//! 1. Face detection (or region tracking from the previous frame)
//! 2. Face mesh inference for 468 landmarks (478 with iris refinement)
//! 3. Outline drawing for eyes, mouth, nose and face oval
//! 4. Smile, eyes-closed and surprise classification from pixel distances
//!
//! # Examples
//!
//! ## Classifying a landmark set
//!
//! ```no_run
//! use face_expression_tracker::{
//!     expression::classify,
//!     face_mesh::FaceMeshPipeline,
//!     geometry::to_pixel_coordinates,
//!     config::Config,
//!     landmarks::LandmarkSource,
//! };
//! use opencv::{core::Mat, imgproc, prelude::*, videoio};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut pipeline = FaceMeshPipeline::new(&config.models, config.landmarks.clone())?;
//!
//! let mut cap = videoio::VideoCapture::new(0, videoio::CAP_ANY)?;
//! let mut frame = Mat::default();
//! cap.read(&mut frame)?;
//!
//! let mut rgb = Mat::default();
//! imgproc::cvt_color(&frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
//!
//! for face in pipeline.process(&rgb)? {
//!     let points = to_pixel_coordinates(&face, frame.cols(), frame.rows());
//!     let flags = classify(&points)?;
//!     for (name, state) in flags.entries() {
//!         println!("{name}: {state}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the capture loop
//!
//! ```no_run
//! use face_expression_tracker::{app::CaptureLoop, config::Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut capture_loop = CaptureLoop::from_config(&config)?;
//! capture_loop.run()?;
//! # Ok(())
//! # }
//! ```

/// Main capture loop
pub mod app;

/// Video input and display window
pub mod capture;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Error types and result handling
pub mod error;

/// Expression classification from landmark geometry
pub mod expression;

/// Face detection module for finding faces in images
pub mod face_detection;

/// Face mesh landmark model and tracking pipeline
pub mod face_mesh;

/// Landmark coordinate conversion and feature drawing
pub mod geometry;

/// ONNX Runtime session wrapper
pub mod inference;

/// Landmark data types and the landmark source trait
pub mod landmarks;

/// Face mesh landmark indices and feature connection tables
pub mod topology;

/// Utility functions for image processing and region arithmetic
pub mod utils;

pub use error::{Error, Result};
