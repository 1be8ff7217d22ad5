//! Tests for pixel conversion and feature drawing on full mesh landmark sets


use face_expression_tracker::{
    geometry::{draw_all_features, to_pixel_coordinates},
    landmarks::{Landmark, LandmarkSet},
    topology::{index, ALL_FEATURES, FACE_OVAL},
};
use opencv::core::{Point, CV_8UC3};
use proptest::prelude::*;
use test_helpers::{centered_face, create_test_image, face_with_pixels, pixel_at};

#[test]
fn test_conversion_preserves_order_and_length() {
    let face = face_with_pixels(640, 480, &[(index::MOUTH_LEFT, 10, 20), (index::MOUTH_RIGHT, 630, 470)]);
    let points = to_pixel_coordinates(&face, 640, 480);

    assert_eq!(points.len(), face.len());
    assert_eq!(points[index::MOUTH_LEFT], Point::new(10, 20));
    assert_eq!(points[index::MOUTH_RIGHT], Point::new(630, 470));
    assert_eq!(points[0], Point::new(320, 240));
}

#[test]
fn test_corner_landmarks_map_to_frame_corners() {
    let face = LandmarkSet::new(vec![Landmark::new(0.0, 0.0, 0.0), Landmark::new(1.0, 1.0, -0.2)]);
    let points = to_pixel_coordinates(&face, 1280, 720);
    assert_eq!(points, vec![Point::new(0, 0), Point::new(1280, 720)]);
}

#[test]
fn test_draw_full_face_outlines() {
    let (width, height) = (400, 400);
    let oval_start = FACE_OVAL.connections[0].0;
    let oval_end = FACE_OVAL.connections[0].1;
    let face = face_with_pixels(width, height, &[(oval_start, 100, 50), (oval_end, 300, 50)]);

    let mut frame = create_test_image(height, width, CV_8UC3).unwrap();
    let points = to_pixel_coordinates(&face, width, height);
    draw_all_features(&mut frame, &points).unwrap();

    // Face oval segment in yellow
    assert_eq!(pixel_at(&frame, 200, 50).unwrap(), [0, 255, 255]);
    // Dots at the collapsed center end up in the last table's color
    assert_eq!(pixel_at(&frame, 200, 200).unwrap(), [0, 255, 255]);
    // Background untouched
    assert_eq!(pixel_at(&frame, 10, 390).unwrap(), [0, 0, 0]);
}

#[test]
fn test_draw_centered_face_stays_inside_frame() {
    let mut frame = create_test_image(120, 160, CV_8UC3).unwrap();
    let points = to_pixel_coordinates(&centered_face(), 160, 120);

    assert!(draw_all_features(&mut frame, &points).is_ok());
    assert_eq!(pixel_at(&frame, 80, 60).unwrap(), [0, 255, 255]);
}

#[test]
fn test_all_tables_fit_base_mesh() {
    for table in &ALL_FEATURES {
        let max = table.max_index().unwrap();
        assert!(max < 468, "{} references landmark {}", table.name, max);
    }
}

proptest! {
    #[test]
    fn prop_pixels_within_frame_bounds(
        x in 0.0f32..=1.0,
        y in 0.0f32..=1.0,
        width in 1i32..4000,
        height in 1i32..4000,
    ) {
        let face = LandmarkSet::new(vec![Landmark::new(x, y, 0.0)]);
        let points = to_pixel_coordinates(&face, width, height);

        prop_assert!(points[0].x >= 0 && points[0].x <= width);
        prop_assert!(points[0].y >= 0 && points[0].y <= height);
    }

    #[test]
    fn prop_pixels_round_to_nearest(
        x in 0.0f32..=1.0,
        y in 0.0f32..=1.0,
        width in 1i32..4000,
        height in 1i32..4000,
    ) {
        let face = LandmarkSet::new(vec![Landmark::new(x, y, 0.0)]);
        let points = to_pixel_coordinates(&face, width, height);

        let exact_x = f64::from(x) * f64::from(width);
        let exact_y = f64::from(y) * f64::from(height);
        prop_assert!((f64::from(points[0].x) - exact_x).abs() <= 0.5);
        prop_assert!((f64::from(points[0].y) - exact_y).abs() <= 0.5);
    }
}
