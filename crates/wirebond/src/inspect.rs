//! End-to-end helpers on `image` buffers.

use std::ops::Range;
use std::path::Path;

use image::{ImageReader, RgbImage};
use log::info;
use wirebond_core::RgbImageView;
use wirebond_register::{absolute_frame, find_pads, register, PadLayout, RegistrationParams};
use wirebond_wires::{
    analyse_wires, crop_board, expected_wire_count, extract_serial_number, locate_wires,
    pad_occupancy, segment_pads, BoardCrop, ModuleTable, PadStripParams, PadZone, Side,
    WireAnalysis, WireCheckParams, WireCountCheck,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{InspectError, RegistrationReport, WiringReport};

/// Borrow an `image::RgbImage` as a `wirebond-core` view.
pub fn rgb_view(img: &RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode any format the `image` crate knows into 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, InspectError> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

/// File name of `path`; serial numbers and pairing markers are read from it.
pub fn image_file_name(path: &Path) -> Result<&str, InspectError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| InspectError::NoFileName(path.into()))
}

/// Locate, count and trace the wires of one bonded-module photograph.
///
/// The serial number is read from `file_name`; its table entry gives the
/// expected count.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, table, params),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn inspect_wiring(
    img: &RgbImage,
    file_name: &str,
    table: &ModuleTable,
    params: &WireCheckParams,
) -> Result<WiringReport, InspectError> {
    let view = rgb_view(img);
    let serial = extract_serial_number(file_name, &params.count.serial_prefix)?;
    let expected = expected_wire_count(&serial, table, &params.count)?;
    let seeds = locate_wires(&view, &params.locator)?;
    let analysis = analyse_wires(&view, &seeds, &params.trace)?;
    let check = WireCountCheck::new(expected, seeds.count() as u32);
    info!(
        "{serial}: {} of {} wires, {}",
        check.detected,
        check.expected,
        if check.passed { "pass" } else { "fail" }
    );
    Ok(WiringReport::new(serial, check, seeds, analysis))
}

/// [`inspect_wiring`] on a file, returning the decoded image alongside.
pub fn inspect_wiring_file(
    path: &Path,
    table: &ModuleTable,
    params: &WireCheckParams,
) -> Result<(RgbImage, WiringReport), InspectError> {
    let img = load_rgb(path)?;
    let report = inspect_wiring(&img, image_file_name(path)?, table, params)?;
    Ok((img, report))
}

/// Register `photo` against its unwired `reference` and, given a pad
/// layout, place the pads on the photograph.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(reference, photo, params, layout),
        fields(width = photo.width(), height = photo.height())
    )
)]
pub fn register_images(
    reference: &RgbImage,
    photo: &RgbImage,
    params: &RegistrationParams,
    layout: Option<&PadLayout>,
) -> Result<RegistrationReport, InspectError> {
    let registration = register(&rgb_view(reference), &rgb_view(photo), params)?;
    let absolute = absolute_frame(&registration.mapped_targets)?;
    let pads = match layout {
        Some(layout) => find_pads(&absolute, layout)?,
        None => Vec::new(),
    };
    Ok(RegistrationReport {
        registration,
        absolute,
        pads,
    })
}

/// Pads of the strip `rows x cols` of `img` and whether each carries a wire.
///
/// Wires of `side` whose left edge lies in `rows` are matched against the
/// pads top to bottom.
pub fn pad_strip_occupancy(
    img: &RgbImage,
    rows: Range<u32>,
    cols: Range<u32>,
    analysis: &WireAnalysis,
    side: Side,
    params: &PadStripParams,
) -> Result<Vec<(PadZone, bool)>, InspectError> {
    if rows.start >= rows.end
        || cols.start >= cols.end
        || rows.end > img.height()
        || cols.end > img.width()
    {
        return Err(InspectError::StripOutOfBounds {
            rows,
            cols,
            width: img.width(),
            height: img.height(),
        });
    }
    let strip = image::imageops::crop_imm(
        img,
        cols.start,
        rows.start,
        cols.end - cols.start,
        rows.end - rows.start,
    )
    .to_image();
    let zones = segment_pads(&rgb_view(&strip), params);

    let mut wire_rows: Vec<i64> = analysis
        .components()
        .filter(|w| w.side == side)
        .filter_map(|w| w.edges)
        .map(|e| e.left.row as i64)
        .filter(|&r| r >= rows.start as i64 && r < rows.end as i64)
        .map(|r| r - rows.start as i64)
        .collect();
    wire_rows.sort_unstable();

    let wired = pad_occupancy(&zones, &wire_rows)?;
    Ok(zones.into_iter().zip(wired).collect())
}

/// Crop `img` to its board and report the pads along the `side` edge of the crop.
///
/// The strip is `params.pads.strip_width` columns of the crop, from its
/// lateral edge inwards, over the solder-mask rows.
pub fn board_pad_occupancy(
    img: &RgbImage,
    analysis: &WireAnalysis,
    side: Side,
    params: &WireCheckParams,
) -> Result<(BoardCrop, Vec<(PadZone, bool)>), InspectError> {
    let crop = crop_board(&rgb_view(img), &params.crop, &params.trace.norm)?;
    let (rows, cols) = crop.pad_strip(side, params.pads.strip_width);
    let pads = pad_strip_occupancy(
        img,
        rows.start as u32..rows.end as u32,
        cols.start as u32..cols.end as u32,
        analysis,
        side,
        &params.pads,
    )?;
    Ok((crop, pads))
}
