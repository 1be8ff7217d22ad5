//! Benchmarks for the per-frame landmark processing path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_expression_tracker::{
    app::annotate_frame,
    constants::NUM_FACE_MESH_LANDMARKS,
    expression::classify,
    face_detection::{decode_detections, generate_anchors, non_max_suppression},
    geometry::{draw_all_features, to_pixel_coordinates},
    landmarks::{Landmark, LandmarkSet},
};
use opencv::core::{Mat, Scalar, CV_8UC3};
use std::time::Duration;

/// A face-sized ring of landmarks around the frame center with random jitter
fn jittered_face() -> LandmarkSet {
    let landmarks = (0..NUM_FACE_MESH_LANDMARKS)
        .map(|i| {
            let angle = i as f32 / NUM_FACE_MESH_LANDMARKS as f32 * std::f32::consts::TAU;
            Landmark::new(
                0.5 + 0.15 * angle.cos() + 0.01 * (rand::random::<f32>() - 0.5),
                0.5 + 0.2 * angle.sin() + 0.01 * (rand::random::<f32>() - 0.5),
                0.02 * (rand::random::<f32>() - 0.5),
            )
        })
        .collect::<Vec<_>>();
    LandmarkSet::new(landmarks)
}

fn blank_frame(width: i32, height: i32) -> Mat {
    Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(0.0)).unwrap()
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression");

    let faces: Vec<LandmarkSet> = (0..100).map(|_| jittered_face()).collect();

    group.bench_function("pixel_conversion", |b| {
        b.iter(|| {
            for face in &faces {
                black_box(to_pixel_coordinates(black_box(face), 1280, 720));
            }
        });
    });

    let pixel_faces: Vec<_> = faces.iter().map(|f| to_pixel_coordinates(f, 1280, 720)).collect();
    group.bench_function("classify", |b| {
        b.iter(|| {
            for points in &pixel_faces {
                let _ = black_box(classify(black_box(points)));
            }
        });
    });

    group.finish();
}

fn bench_drawing(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawing");
    group.measurement_time(Duration::from_secs(10));

    for (width, height) in [(640, 480), (1280, 720), (1920, 1080)] {
        let face = jittered_face();
        let points = to_pixel_coordinates(&face, width, height);

        group.bench_with_input(
            BenchmarkId::new("draw_all_features", format!("{width}x{height}")),
            &points,
            |b, points| {
                let mut frame = blank_frame(width, height);
                b.iter(|| draw_all_features(black_box(&mut frame), black_box(points)).unwrap());
            },
        );

        group.bench_with_input(
            BenchmarkId::new("annotate_frame", format!("{width}x{height}")),
            &face,
            |b, face| {
                let faces = vec![face.clone()];
                let mut frame = blank_frame(width, height);
                b.iter(|| annotate_frame(black_box(&mut frame), black_box(&faces)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_detector_decoding(c: &mut Criterion) {
    let anchors = generate_anchors(128);
    let boxes: Vec<f32> = (0..anchors.len() * 16).map(|_| rand::random::<f32>() * 20.0 - 10.0).collect();
    let scores: Vec<f32> = (0..anchors.len()).map(|_| rand::random::<f32>() * 10.0 - 5.0).collect();

    c.bench_function("detector_decode_and_nms", |b| {
        b.iter(|| {
            let candidates = decode_detections(
                black_box(&boxes),
                black_box(&scores),
                &anchors,
                128,
                0.7,
                640.0,
            );
            black_box(non_max_suppression(candidates, 0.3, 1))
        });
    });
}

criterion_group!(benches, bench_classification, bench_drawing, bench_detector_decoding);
criterion_main!(benches);
