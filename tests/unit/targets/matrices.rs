use super::*;
use crate::foundation::error::AugError;
use crate::targets::keypoints::Keypoints;

fn camera() -> CameraMatrix {
    CameraMatrix::new(8, 6, 100.0, 90.0, 4.0, 3.0)
}

fn project(m: &Mat3, p: [f64; 3]) -> [f64; 2] {
    let row = |r: [f64; 3]| r[0] * p[0] + r[1] * p[1] + r[2] * p[2];
    let z = row(m[2]);
    [row(m[0]) / z, row(m[1]) / z]
}

fn rect(x: u32, y: u32, width: u32, height: u32) -> CropRect {
    CropRect {
        x,
        y,
        width,
        height,
    }
}

#[test]
fn crop_shifts_the_principal_point() {
    let k = camera().crop(rect(2, 1, 4, 4)).unwrap();
    assert_eq!(k.principal_point(), (2.0, 2.0));
    assert_eq!((k.width, k.height), (4, 4));
    assert_eq!(k.matrix[0][0], 100.0);
    assert_eq!(k.matrix[1][1], 90.0);
}

#[test]
fn crop_outside_the_frame_is_rejected() {
    let err = camera().crop(rect(6, 0, 4, 4)).unwrap_err();
    assert!(matches!(err, AugError::ShapeMismatch(_)));
}

#[test]
fn flips_mirror_the_principal_point() {
    let k = camera().flip_horizontal();
    assert_eq!(k.principal_point(), (4.0, 3.0));
    assert_eq!(k.matrix[0][0], -100.0);

    let k = CameraMatrix::new(8, 6, 100.0, 90.0, 1.0, 2.0).flip_vertical();
    assert_eq!(k.principal_point(), (1.0, 4.0));
    assert_eq!(k.matrix[1][1], -90.0);
}

#[test]
fn projections_follow_keypoints_through_every_operation() {
    let k = CameraMatrix::new(8, 6, 10.0, 12.0, 3.0, 2.0);
    let world = [0.25, -0.5, 2.0];
    let [u, v] = project(&k.matrix, world);
    let kp = Keypoints::new(8, 6, vec![[u as f32, v as f32]]);

    let cases: Vec<(CameraMatrix, Keypoints)> = vec![
        (k.clone().flip_horizontal(), kp.clone().flip_horizontal()),
        (k.clone().flip_vertical(), kp.clone().flip_vertical()),
        (
            k.clone().rotate90(Rotation::Right),
            kp.clone().rotate90(Rotation::Right),
        ),
        (
            k.clone().rotate90(Rotation::Left),
            kp.clone().rotate90(Rotation::Left),
        ),
        (
            k.clone().crop(rect(1, 2, 5, 3)).unwrap(),
            kp.clone().crop(rect(1, 2, 5, 3)).unwrap(),
        ),
    ];
    for (cam, points) in cases {
        let [pu, pv] = project(&cam.matrix, world);
        let [ku, kv] = points.points[0];
        assert!((pu - f64::from(ku)).abs() < 1e-4, "{pu} vs {ku}");
        assert!((pv - f64::from(kv)).abs() < 1e-4, "{pv} vs {kv}");
        assert_eq!((cam.width, cam.height), (points.width, points.height));
    }
}

#[test]
fn quarter_turn_swaps_the_frame() {
    let k = camera().rotate90(Rotation::Right);
    assert_eq!((k.width, k.height), (6, 8));
    // A clockwise turn sends (cx, cy) to (h - cy, cx).
    assert_eq!(k.principal_point(), (3.0, 4.0));
}

#[test]
fn matrices_2d_shift_every_translation() {
    let m = Matrices2D::new(
        8,
        8,
        vec![
            [[1.0, 0.0, 5.0], [0.0, 1.0, 6.0], [0.0, 0.0, 1.0]],
            [[2.0, 0.0, 1.0], [0.0, 2.0, 1.0], [0.0, 0.0, 1.0]],
        ],
    );
    let out = m.crop(rect(1, 1, 4, 4)).unwrap();
    assert_eq!(out.matrices[0][0][2], 4.0);
    assert_eq!(out.matrices[0][1][2], 5.0);
    assert_eq!(out.matrices[1][0][2], 0.0);
    assert_eq!(out.matrices[1][1][2], 0.0);
    assert_eq!(out.matrices[1][0][0], 2.0);
    assert_eq!((out.width, out.height), (4, 4));
}
