//! Constants used throughout the application

/// Number of landmarks in the base face mesh topology
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Number of landmarks when refined iris points are appended
pub const NUM_REFINED_LANDMARKS: usize = 478;

/// Coordinates per landmark in the mesh model output (x, y, z)
pub const LANDMARK_COORDS: usize = 3;

/// Default camera index (system default camera)
pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Title of the display window
pub const WINDOW_NAME: &str = "Facial Feature Tracking with Expression Analysis";

/// Key codes that stop the capture loop
pub const QUIT_KEY: i32 = b'q' as i32;
pub const ESCAPE_KEY: i32 = 27;

/// Delay passed to the key poll, in milliseconds
pub const KEY_POLL_DELAY_MS: i32 = 1;

/// Expression thresholds, in pixels of the displayed frame
pub const SMILE_RATIO_THRESHOLD: f64 = 80.0;
pub const EYES_CLOSED_THRESHOLD: f64 = 5.0;
pub const EYEBROW_RAISE_THRESHOLD: f64 = 2.1;

/// Feature outline colors (BGR)
pub const EYE_BGR: (f64, f64, f64) = (255.0, 0.0, 0.0);
pub const MOUTH_BGR: (f64, f64, f64) = (0.0, 255.0, 0.0);
pub const NOSE_BGR: (f64, f64, f64) = (0.0, 0.0, 255.0);
pub const FACE_OVAL_BGR: (f64, f64, f64) = (0.0, 255.0, 255.0);

/// Overlay text colors (BGR)
pub const ACTIVE_TEXT_BGR: (f64, f64, f64) = (0.0, 255.0, 0.0);
pub const INACTIVE_TEXT_BGR: (f64, f64, f64) = (0.0, 0.0, 255.0);

/// Feature line thickness and landmark dot radius, in pixels
pub const LINE_THICKNESS: i32 = 1;
pub const LANDMARK_RADIUS: i32 = 1;

/// Overlay text layout
pub const TEXT_ORIGIN_X: i32 = 10;
pub const TEXT_ORIGIN_Y: i32 = 30;
pub const TEXT_LINE_SPACING: i32 = 30;
pub const TEXT_SCALE: f64 = 0.7;
pub const TEXT_THICKNESS: i32 = 2;

/// Face detector (short-range `BlazeFace`) input size
pub const DETECTOR_INPUT_SIZE: i32 = 128;

/// Face detector anchor count and values per raw box
pub const DETECTOR_NUM_ANCHORS: usize = 896;
pub const DETECTOR_BOX_VALUES: usize = 16;

/// Face detector image normalization to [-1, 1]
pub const DETECTOR_NORMALIZATION_SCALE: f32 = 1.0 / 127.5;
pub const DETECTOR_NORMALIZATION_OFFSET: f32 = -1.0;

/// IoU above which overlapping detections are suppressed
pub const DETECTOR_NMS_THRESHOLD: f32 = 0.3;

/// Raw detector scores are clipped to this magnitude before the sigmoid
pub const DETECTOR_SCORE_CLIP: f32 = 100.0;

/// Face mesh input size
pub const MESH_INPUT_SIZE: i32 = 192;

/// Face mesh image normalization to [0, 1]
pub const MESH_NORMALIZATION_SCALE: f32 = 1.0 / 255.0;

/// Expansion applied to a face box before cropping it for the mesh model
pub const ROI_SCALE: f32 = 1.5;
