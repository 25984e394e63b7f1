//! Synthetic board photographs shared by the integration tests.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use nalgebra::{Point2, Rotation2};
use wirebond::register::{
    CircleHoughParams, EdgeParams, RegistrationParams, TargetParams, TargetRegion,
};
use wirebond::wires::{BoardCropParams, PadStripParams, Side, SideSeeds, WireBand, WireSeeds};
use wirebond::WireCheckParams;

pub const SERIAL: &str = "20UPGM22110037";

const BOARD: Rgb<u8> = Rgb([20, 20, 20]);
const OUTSIDE: Rgb<u8> = Rgb([60, 60, 60]);
const MASK: Rgb<u8> = Rgb([30, 120, 30]);
const WIRE: Rgb<u8> = Rgb([250, 250, 250]);

pub const LEFT_WIRES: u32 = 110;
pub const RIGHT_WIRES: u32 = 105;
/// Left wire bridged to the one below it.
pub const BRIDGED: u32 = 10;

/// First row of left/right wire `k`; every wire is three rows thick.
pub fn wire_row(k: u32) -> u32 {
    80 + 8 * k
}

/// 1200 x 1100 bonded module: solder-mask rims at rows 50..60 and
/// 1040..1050, left wires over columns 40..540 and right wires over
/// 660..1160, each 500 x 3 pixels.
pub fn wiring_board() -> RgbImage {
    let mut img = RgbImage::from_pixel(1200, 1100, BOARD);
    draw_filled_rect_mut(&mut img, Rect::at(0, 0).of_size(1200, 50), OUTSIDE);
    draw_filled_rect_mut(&mut img, Rect::at(0, 50).of_size(1200, 10), MASK);
    draw_filled_rect_mut(&mut img, Rect::at(0, 1040).of_size(1200, 10), MASK);
    draw_filled_rect_mut(&mut img, Rect::at(0, 1050).of_size(1200, 50), OUTSIDE);
    for (count, col) in [(LEFT_WIRES, 40), (RIGHT_WIRES, 660)] {
        for k in 0..count {
            let rect = Rect::at(col, wire_row(k) as i32).of_size(500, 3);
            draw_filled_rect_mut(&mut img, rect, WIRE);
        }
    }
    let gap = wire_row(BRIDGED) + 3;
    let bridge = Rect::at(300, gap as i32).of_size(1, wire_row(BRIDGED + 1) - gap);
    draw_filled_rect_mut(&mut img, bridge, WIRE);
    img
}

pub fn module_table_json(serial: &str, trims: [u32; 4]) -> String {
    format!(
        r#"[{{"serialNumber": "{serial}", "IREF_TRIM_1": {}, "IREF_TRIM_2": {},
             "IREF_TRIM_3": {}, "IREF_TRIM_4": {}}}]"#,
        trims[0], trims[1], trims[2], trims[3]
    )
}

const GREEN: Rgb<u8> = Rgb([20, 80, 20]);
const DARK: Rgb<u8> = Rgb([10, 10, 10]);
const BRIGHT: Rgb<u8> = Rgb([230, 230, 230]);

pub const TARGET_RADIUS: i32 = 25;

/// Fiducial centers `(x, y)` of the unshifted board, in detection order.
pub const TARGETS: [(f64, f64); 8] = [
    (150.0, 350.0),
    (150.0, 1450.0),
    (150.0, 1000.0),
    (150.0, 1200.0),
    (650.0, 350.0),
    (650.0, 1450.0),
    (650.0, 1000.0),
    (650.0, 1200.0),
];

/// 800 x 1800 board translated by `(dx, dy)`: green solder mask over rows
/// 200..1600, central wire over columns 398..403, eight disk fiducials.
pub fn registration_board(dx: i32, dy: i32) -> RgbImage {
    let mut img = RgbImage::from_pixel(800, 1800, DARK);
    draw_filled_rect_mut(&mut img, Rect::at(dx, 200 + dy).of_size(800, 1400), GREEN);
    draw_filled_rect_mut(&mut img, Rect::at(398 + dx, 200 + dy).of_size(5, 1400), BRIGHT);
    for (x, y) in TARGETS {
        draw_filled_circle_mut(
            &mut img,
            (x as i32 + dx, y as i32 + dy),
            TARGET_RADIUS,
            BRIGHT,
        );
    }
    img
}

/// Search windows and edge columns sized for [`registration_board`].
pub fn registration_params() -> RegistrationParams {
    RegistrationParams {
        targets: TargetParams {
            regions: vec![
                TargetRegion::new(250, 450, 50, 250, 1),
                TargetRegion::new(-450, -250, 50, 250, 1),
                TargetRegion::new(900, 1300, 50, 250, 2),
                TargetRegion::new(250, 450, -250, -50, 1),
                TargetRegion::new(-450, -250, -250, -50, 1),
                TargetRegion::new(900, 1300, -250, -50, 2),
            ],
            hough: CircleHoughParams::default(),
            expected_total: 8,
        },
        edges: EdgeParams {
            column_ranges: vec![[-200, -100], [100, 200]],
            ..EdgeParams::default()
        },
        ..RegistrationParams::default()
    }
}

/// Pivot of [`rotated_registration_board`], the middle of the image.
pub const ROTATION_CENTER: (f64, f64) = (400.0, 900.0);

/// Where the unrotated board point `p` lands once the board is turned by
/// `degrees` about [`ROTATION_CENTER`].
pub fn rotate_board_point(p: Point2<f64>, degrees: f64) -> Point2<f64> {
    let c = Point2::new(ROTATION_CENTER.0, ROTATION_CENTER.1);
    c + Rotation2::new(degrees.to_radians()) * (p - c)
}

fn scene_pixel(u: i64, v: i64) -> Rgb<u8> {
    let r2 = (TARGET_RADIUS as i64).pow(2);
    let on_target = TARGETS.iter().any(|&(x, y)| {
        let (dx, dy) = (u - x as i64, v - y as i64);
        dx * dx + dy * dy <= r2
    });
    if on_target {
        BRIGHT
    } else if !(0..800).contains(&u) || !(200..1600).contains(&v) {
        DARK
    } else if (398..403).contains(&u) {
        BRIGHT
    } else {
        GREEN
    }
}

/// The [`registration_board`] scene turned by `degrees` (clockwise on
/// screen) about [`ROTATION_CENTER`], nearest-sampled.
pub fn rotated_registration_board(degrees: f64) -> RgbImage {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (cx, cy) = ROTATION_CENTER;
    RgbImage::from_fn(800, 1800, |x, y| {
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        let u = (cx + cos * dx + sin * dy).round() as i64;
        let v = (cy - sin * dx + cos * dy).round() as i64;
        scene_pixel(u, v)
    })
}

const CROP_MASK: Rgb<u8> = Rgb([60, 70, 10]);
const PAD: Rgb<u8> = Rgb([170, 170, 170]);

/// Left pad rows of [`crop_board_image`]; pads span columns 80..110.
pub const CROP_PADS: [(u32, u32); 5] = [(21, 61), (81, 121), (141, 181), (201, 241), (261, 301)];

/// Rows of the left wire stubs of [`crop_board_image`], three pixels thick.
pub const CROP_LEFT_STUBS: [u32; 3] = [50, 145, 210];

/// 600 x 400 board for cropping: solder-mask rows 20 and 379 and mask
/// columns 200..210 and 390..400. Left stubs start on pads 0, 2 and 3 and
/// run to column 175; right stubs reach at most column 520.
pub fn crop_board_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(600, 400, DARK);
    for row in [20, 379] {
        draw_filled_rect_mut(&mut img, Rect::at(0, row).of_size(600, 1), CROP_MASK);
    }
    for col in [200, 390] {
        draw_filled_rect_mut(&mut img, Rect::at(col, 0).of_size(10, 400), CROP_MASK);
    }
    for (top, bottom) in CROP_PADS {
        let rect = Rect::at(80, top as i32).of_size(30, bottom - top);
        draw_filled_rect_mut(&mut img, rect, PAD);
    }
    for (row, start) in CROP_LEFT_STUBS.into_iter().zip([90, 80, 100]) {
        let rect = Rect::at(start, row as i32).of_size(175 - start as u32, 3);
        draw_filled_rect_mut(&mut img, rect, WIRE);
    }
    for (row, end) in [(50, 500), (130, 521), (210, 510)] {
        let rect = Rect::at(425, row).of_size(end - 425, 3);
        draw_filled_rect_mut(&mut img, rect, WIRE);
    }
    img
}

/// Crop and pad-strip settings sized for [`crop_board_image`].
pub fn crop_params() -> WireCheckParams {
    WireCheckParams {
        crop: BoardCropParams {
            stub_rows: [40, 360],
            stub_offsets: [20, 150],
            slices: 4,
            slice_fraction: 0.5,
            seed_inset: 10,
            ..BoardCropParams::default()
        },
        pads: PadStripParams {
            strip_width: 30,
            ..PadStripParams::default()
        },
        ..WireCheckParams::default()
    }
}

/// Left seeds on the stubs of [`crop_board_image`], one per stub.
pub fn crop_board_seeds() -> WireSeeds {
    WireSeeds {
        left: SideSeeds {
            side: Side::Left,
            band: WireBand {
                top: 20,
                bottom: 379,
            },
            boundary_column: 200,
            column: 170,
            rows: CROP_LEFT_STUBS.iter().map(|&r| r as usize + 1).collect(),
        },
        right: SideSeeds {
            side: Side::Right,
            band: WireBand {
                top: 20,
                bottom: 379,
            },
            boundary_column: 400,
            column: 430,
            rows: vec![51, 131, 211],
        },
    }
}
