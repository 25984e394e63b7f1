mod common;

use common::{
    crop_board_image, crop_board_seeds, crop_params, module_table_json, wire_row, wiring_board,
    BRIDGED, CROP_PADS, LEFT_WIRES, RIGHT_WIRES, SERIAL,
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use wirebond::annotate::{annotate_wiring, TOUCHING_COLOR};
use wirebond::core::PixelCoord;
use wirebond::inspect::{board_pad_occupancy, inspect_wiring, pad_strip_occupancy, rgb_view};
use wirebond::wires::{
    analyse_wires, check_wiring, locate_wires, ModuleTable, PadStripParams, PadZone, Side, TracedWire, Wire,
    WireAnalysis, WireCheckError, WireCheckParams, WireEdges,
};
use wirebond::InspectError;

fn file_name() -> String {
    format!("{SERIAL}_AfterBonding.png")
}

fn table() -> ModuleTable {
    ModuleTable::from_json_str(&module_table_json(SERIAL, [0, 0, 0, 0])).expect("table")
}

#[test]
fn seeds_sit_on_every_wire() {
    let img = wiring_board();
    let seeds = locate_wires(&rgb_view(&img), &WireCheckParams::default().locator).expect("seeds");

    assert_eq!(seeds.left.rows.len(), LEFT_WIRES as usize);
    assert_eq!(seeds.right.rows.len(), RIGHT_WIRES as usize);
    assert_eq!(seeds.left.boundary_column, 40);
    assert_eq!(seeds.left.column, 75);
    assert_eq!(seeds.right.boundary_column, 1159);
    assert_eq!(seeds.right.column, 1124);
    for (k, &row) in seeds.left.rows.iter().enumerate() {
        assert_eq!(row as u32, wire_row(k as u32) + 1, "left wire {k}");
    }
}

#[test]
fn bridged_pair_is_the_only_touching_component() {
    let img = wiring_board();
    let report =
        inspect_wiring(&img, &file_name(), &table(), &WireCheckParams::default()).expect("report");

    assert_eq!(report.serial, SERIAL);
    assert_eq!(report.check.detected, LEFT_WIRES + RIGHT_WIRES);
    assert_eq!(report.check.expected, 709);
    assert!(!report.check.passed);

    let wires = &report.analysis.wires;
    assert_eq!(wires.len(), (LEFT_WIRES + RIGHT_WIRES) as usize);
    assert_eq!(report.touching, 2);
    assert_eq!(report.analysis.empty_count(), 0);

    let fused = &wires[BRIDGED as usize];
    assert!(fused.touching);
    assert_eq!(fused.pixel_count, 2 * 1500 + 5);
    let shared = &wires[BRIDGED as usize + 1];
    assert_eq!(shared.shared_with, Some(BRIDGED as usize));
    assert!(shared.wire.is_empty());

    let plain = &wires[0];
    assert_eq!(plain.pixel_count, 1500);
    assert!(!plain.touching);
    let edges = plain.edges.expect("edges");
    assert_eq!(edges.left.col, 40);
    assert_eq!(edges.right.col, 539);

    let right = &wires[LEFT_WIRES as usize];
    assert_eq!(right.side, Side::Right);
    assert_eq!(right.edges.expect("edges").left.col, 660);
    assert_eq!(report.analysis.components().count(), (LEFT_WIRES + RIGHT_WIRES - 1) as usize);
}

#[test]
fn count_passes_when_the_model_matches() {
    let img = wiring_board();
    let mut params = WireCheckParams::default();
    params.count.base_count = 199;

    let check = check_wiring(&rgb_view(&img), SERIAL, &table(), &params).expect("check");
    assert!(check.passed);
    assert_eq!(check.expected, 215);
    assert_eq!(check.detected, 215);
}

#[test]
fn missing_serial_is_reported() {
    let img = wiring_board();
    let err = inspect_wiring(&img, "board.png", &table(), &WireCheckParams::default())
        .expect_err("no serial");
    assert!(matches!(
        err,
        InspectError::Wires(WireCheckError::SerialNumberNotFound { .. })
    ));
}

#[test]
fn annotation_paints_the_bridged_pair() {
    let img = wiring_board();
    let report =
        inspect_wiring(&img, &file_name(), &table(), &WireCheckParams::default()).expect("report");
    let out = annotate_wiring(&img, &report.analysis);

    let row = wire_row(BRIDGED) + 1;
    assert_eq!(*out.get_pixel(200, row), TOUCHING_COLOR);
    assert_eq!(*out.get_pixel(200, wire_row(BRIDGED + 1) + 1), TOUCHING_COLOR);
    assert_eq!(*out.get_pixel(300, wire_row(BRIDGED) + 5), TOUCHING_COLOR);
    assert_ne!(*out.get_pixel(200, wire_row(0) + 1), TOUCHING_COLOR);
}

fn wire_at(side: Side, row: i32) -> TracedWire {
    let left = PixelCoord::new(row, 12);
    TracedWire {
        side,
        seed: left,
        wire: Wire::default(),
        pixel_count: 100,
        touching: false,
        edges: Some(WireEdges {
            left,
            right: PixelCoord::new(row, 80),
        }),
        shared_with: None,
    }
}

#[test]
fn pads_are_matched_with_left_wire_ends() {
    let mut img = RgbImage::from_pixel(40, 100, Rgb([20, 20, 20]));
    for start in [0, 25, 50] {
        draw_filled_rect_mut(&mut img, Rect::at(0, start).of_size(10, 20), Rgb([200, 200, 200]));
    }
    let analysis = WireAnalysis {
        wires: vec![
            wire_at(Side::Left, 10),
            wire_at(Side::Right, 30),
            wire_at(Side::Left, 60),
            wire_at(Side::Left, 90),
        ],
    };

    let pads = pad_strip_occupancy(
        &img,
        0..75,
        0..10,
        &analysis,
        Side::Left,
        &PadStripParams::default(),
    )
    .expect("pads");
    let zone = |row_start, row_end| PadZone { row_start, row_end };
    assert_eq!(
        pads,
        vec![(zone(0, 20), true), (zone(25, 45), false), (zone(50, 70), true)]
    );
}

#[test]
fn strip_outside_the_image_is_rejected() {
    let img = RgbImage::new(40, 100);
    let err = pad_strip_occupancy(
        &img,
        0..120,
        0..10,
        &WireAnalysis::default(),
        Side::Left,
        &PadStripParams::default(),
    )
    .expect_err("out of bounds");
    assert!(matches!(err, InspectError::StripOutOfBounds { .. }));
}

#[test]
fn cropped_board_reports_left_pad_occupancy() {
    let img = crop_board_image();
    let params = crop_params();
    let analysis =
        analyse_wires(&rgb_view(&img), &crop_board_seeds(), &params.trace).expect("analysis");
    assert_eq!(analysis.components().count(), 6);

    let (crop, pads) =
        board_pad_occupancy(&img, &analysis, Side::Left, &params).expect("pad occupancy");
    assert_eq!(crop.rows, 20..380);
    assert_eq!(crop.cols, 80..521);

    let zones: Vec<PadZone> = pads.iter().map(|(zone, _)| *zone).collect();
    let expected: Vec<PadZone> = CROP_PADS
        .iter()
        .enumerate()
        .map(|(k, &(top, bottom))| PadZone {
            // the first zone opens on the solder-mask row
            row_start: if k == 0 { 0 } else { (top - 20) as usize },
            row_end: (bottom - 20) as usize,
        })
        .collect();
    assert_eq!(zones, expected);

    let wired: Vec<bool> = pads.iter().map(|(_, wired)| *wired).collect();
    assert_eq!(wired, vec![true, false, true, true, false]);
}

#[test]
fn board_without_solder_mask_cannot_be_cropped() {
    let img = RgbImage::from_pixel(600, 400, Rgb([10, 10, 10]));
    let analysis = WireAnalysis::default();
    let err = board_pad_occupancy(&img, &analysis, Side::Left, &crop_params())
        .expect_err("no mask");
    assert!(matches!(
        err,
        InspectError::Wires(WireCheckError::MaskBorderNotFound { border: "top" })
    ));
}
