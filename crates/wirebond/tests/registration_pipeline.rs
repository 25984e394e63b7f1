mod common;

use approx::assert_abs_diff_eq;
use common::{
    registration_board, registration_params, rotate_board_point, rotated_registration_board,
    TARGETS,
};
use image::{Rgb, RgbImage};
use nalgebra::{Point2, Rotation2, Vector2};
use wirebond::annotate::{annotate_registration, TARGET_COLOR};
use wirebond::inspect::{register_images, rgb_view};
use wirebond::register::{
    absolute_frame, board_frame, find_targets, PadLayout, RegistrationError,
};
use wirebond::InspectError;

#[test]
fn reference_targets_are_found_in_window_order() {
    let img = registration_board(0, 0);
    let targets = find_targets(&rgb_view(&img), &registration_params().targets).expect("targets");
    assert_eq!(targets.len(), 8);
    for (t, (x, y)) in targets.iter().zip(TARGETS) {
        assert_abs_diff_eq!(t.center.x, x, epsilon = 1.0);
        assert_abs_diff_eq!(t.center.y, y, epsilon = 1.0);
    }
}

#[test]
fn board_frame_sits_on_the_wire_and_bottom_edge() {
    let img = registration_board(0, 0);
    let frame = board_frame(&rgb_view(&img), &registration_params()).expect("frame");
    assert_abs_diff_eq!(frame.origin.x, 400.0, epsilon = 2.0);
    assert_abs_diff_eq!(frame.origin.y, 1599.0, epsilon = 1.0);
    assert_abs_diff_eq!(frame.dilation, 1399.0, epsilon = 1.0);
}

#[test]
fn registering_a_board_onto_itself_is_the_identity() {
    let img = registration_board(0, 0);
    let report = register_images(&img, &img, &registration_params(), None).expect("report");
    let registration = &report.registration;

    assert_abs_diff_eq!(registration.relative_dilation, 1.0, epsilon = 1e-12);
    for (t, p) in registration
        .reference_targets
        .iter()
        .zip(&registration.mapped_targets)
    {
        assert_abs_diff_eq!(t.center.x, p.x, epsilon = 1e-6);
        assert_abs_diff_eq!(t.center.y, p.y, epsilon = 1e-6);
    }
    assert!(report.pads.is_empty());
}

#[test]
fn shifted_photo_receives_shifted_targets_and_pads() {
    let reference = registration_board(0, 0);
    let photo = registration_board(20, 30);
    let params = registration_params();

    let bare = register_images(&reference, &photo, &params, None).expect("registration");
    let layout = PadLayout {
        reference_dilation: bare.absolute.dilation,
        pads: vec![[[-100.0, -50.0], [100.0, 50.0]]],
    };
    let report = register_images(&reference, &photo, &params, Some(&layout)).expect("report");
    let registration = &report.registration;

    assert_abs_diff_eq!(registration.relative_dilation, 1.0, epsilon = 1e-3);
    for (t, p) in registration
        .reference_targets
        .iter()
        .zip(&registration.mapped_targets)
    {
        assert_abs_diff_eq!(p.x, t.center.x + 20.0, epsilon = 2.0);
        assert_abs_diff_eq!(p.y, t.center.y + 30.0, epsilon = 2.0);
    }

    let absolute = &report.absolute;
    assert_abs_diff_eq!(absolute.origin.x, 420.0, epsilon = 2.0);
    assert_abs_diff_eq!(absolute.origin.y, 1030.0, epsilon = 2.0);
    assert_abs_diff_eq!(absolute.slope, 0.0, epsilon = 0.01);
    assert_abs_diff_eq!(absolute.dilation, 500f64.hypot(1100.0), epsilon = 3.0);

    assert_eq!(report.pads.len(), 1);
    let (lo, hi) = report.pads[0].bounds();
    assert_abs_diff_eq!(lo.x, 320.0, epsilon = 3.0);
    assert_abs_diff_eq!(lo.y, 980.0, epsilon = 3.0);
    assert_abs_diff_eq!(hi.x, 520.0, epsilon = 3.0);
    assert_abs_diff_eq!(hi.y, 1080.0, epsilon = 3.0);

    let out = annotate_registration(&photo, &report);
    let first = registration.mapped_targets[0];
    assert_eq!(
        *out.get_pixel(first.x.round() as u32, first.y.round() as u32),
        TARGET_COLOR
    );
}

#[test]
fn registering_twice_gives_identical_reports() {
    let reference = registration_board(0, 0);
    let photo = registration_board(20, 30);
    let params = registration_params();
    let layout = PadLayout {
        reference_dilation: 1200.0,
        pads: vec![[[-100.0, -50.0], [100.0, 50.0]]],
    };

    let first = register_images(&reference, &photo, &params, Some(&layout)).expect("first");
    let second = register_images(&reference, &photo, &params, Some(&layout)).expect("second");
    assert_eq!(first, second);
    assert_eq!(
        first.registration.photo_frame,
        second.registration.photo_frame
    );
    assert_eq!(
        first.registration.relative_dilation.to_bits(),
        second.registration.relative_dilation.to_bits()
    );
}

#[test]
fn rotated_photo_receives_rotated_targets_and_pads() {
    const DEGREES: f64 = 2.0;
    let reference = rotated_registration_board(0.0);
    let photo = rotated_registration_board(DEGREES);
    let mut params = registration_params();
    // slanted wire edges spread their votes over neighbouring rho cells
    params.center_wire.vote_threshold = 120;

    let bare = register_images(&reference, &reference, &params, None).expect("reference");
    let reference_frame = bare.registration.reference_frame;
    let reference_centers: Vec<Point2<f64>> = bare
        .registration
        .reference_targets
        .iter()
        .map(|t| t.center)
        .collect();
    let reference_absolute = absolute_frame(&reference_centers).expect("reference frame");
    let layout = PadLayout {
        reference_dilation: reference_absolute.dilation,
        pads: vec![[[-100.0, -50.0], [100.0, 50.0]]],
    };

    let report = register_images(&reference, &photo, &params, Some(&layout)).expect("report");
    let registration = &report.registration;
    let (sin, cos) = DEGREES.to_radians().sin_cos();
    let rotation = Rotation2::new(DEGREES.to_radians());

    assert_abs_diff_eq!(registration.relative_dilation, 1.0 / cos, epsilon = 2e-3);
    let origin = rotate_board_point(reference_frame.origin, DEGREES);
    assert_abs_diff_eq!(registration.photo_frame.origin.x, origin.x, epsilon = 2.0);
    assert_abs_diff_eq!(registration.photo_frame.origin.y, origin.y, epsilon = 2.0);
    assert_abs_diff_eq!(registration.photo_frame.basis[(0, 0)], cos, epsilon = 2e-3);
    assert_abs_diff_eq!(registration.photo_frame.basis[(1, 0)], sin, epsilon = 2e-3);

    for (t, p) in reference_centers.iter().zip(&registration.mapped_targets) {
        let expected = origin + rotation * (t - reference_frame.origin) / cos;
        assert_abs_diff_eq!(p.x, expected.x, epsilon = 2.0);
        assert_abs_diff_eq!(p.y, expected.y, epsilon = 2.0);
    }

    let seen = find_targets(&rgb_view(&photo), &params.targets).expect("photo targets");
    for (t, p) in seen.iter().zip(&registration.mapped_targets) {
        assert!((t.center - p).norm() < 3.0, "{:?} vs {p:?}", t.center);
    }

    let absolute = &report.absolute;
    assert_abs_diff_eq!(absolute.slope, sin / cos, epsilon = 2e-3);
    assert_abs_diff_eq!(absolute.rotation[(1, 0)], sin, epsilon = 2e-3);

    assert_eq!(report.pads.len(), 1);
    let [lo, hi] = report.pads[0].corners;
    for (corner, offset) in [(lo, [-100.0, -50.0]), (hi, [100.0, 50.0])] {
        let board = reference_absolute.origin + Vector2::new(offset[0], offset[1]);
        let expected = rotate_board_point(board, DEGREES);
        assert_abs_diff_eq!(corner.x, expected.x, epsilon = 3.0);
        assert_abs_diff_eq!(corner.y, expected.y, epsilon = 3.0);
    }
}

#[test]
fn photo_without_solder_mask_fails() {
    let reference = registration_board(0, 0);
    let blank = RgbImage::from_pixel(800, 1800, Rgb([10, 10, 10]));
    let err = register_images(&reference, &blank, &registration_params(), None)
        .expect_err("no edges");
    assert!(matches!(
        err,
        InspectError::Registration(RegistrationError::EdgeContourEmpty)
    ));
}
