//! Annotated copies of inspected photographs.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use wirebond_wires::WireAnalysis;

use crate::RegistrationReport;

pub const TOUCHING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const EDGE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const TARGET_COLOR: Rgb<u8> = Rgb([0, 160, 255]);
pub const PAD_COLOR: Rgb<u8> = Rgb([255, 200, 0]);

const EDGE_MARK_RADIUS: i32 = 3;

/// Touching wires painted red, both ends of every traced wire circled.
pub fn annotate_wiring(img: &RgbImage, analysis: &WireAnalysis) -> RgbImage {
    let mut out = img.clone();
    for wire in analysis.components() {
        if wire.touching {
            for p in &wire.wire.pixels {
                if let Some(px) = out.get_pixel_mut_checked(p.col as u32, p.row as u32) {
                    *px = TOUCHING_COLOR;
                }
            }
        }
        if let Some(edges) = wire.edges {
            for end in [edges.left, edges.right] {
                draw_hollow_circle_mut(&mut out, (end.col, end.row), EDGE_MARK_RADIUS, EDGE_COLOR);
            }
        }
    }
    out
}

/// Predicted fiducials, the board-frame origin and any placed pads.
pub fn annotate_registration(img: &RgbImage, report: &RegistrationReport) -> RgbImage {
    let mut out = img.clone();
    let registration = &report.registration;
    for (target, center) in registration
        .reference_targets
        .iter()
        .zip(&registration.mapped_targets)
    {
        let radius = (target.radius * registration.relative_dilation).round() as i32;
        let c = (center.x.round() as i32, center.y.round() as i32);
        draw_hollow_circle_mut(&mut out, c, radius.max(1), TARGET_COLOR);
        draw_cross_mut(&mut out, TARGET_COLOR, c.0, c.1);
    }

    let origin = registration.photo_frame.origin;
    draw_cross_mut(
        &mut out,
        EDGE_COLOR,
        origin.x.round() as i32,
        origin.y.round() as i32,
    );

    for pad in &report.pads {
        let (lo, hi) = pad.bounds();
        let width = (hi.x - lo.x).round().max(1.0) as u32;
        let height = (hi.y - lo.y).round().max(1.0) as u32;
        let rect = Rect::at(lo.x.round() as i32, lo.y.round() as i32).of_size(width, height);
        draw_hollow_rect_mut(&mut out, rect, PAD_COLOR);
    }
    out
}
