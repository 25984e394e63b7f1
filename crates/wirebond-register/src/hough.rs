//! Hough transforms: gradient voting for circles, standard (rho, theta) voting for lines.
//!
//! The line accumulator keeps a cell when it is strictly above the vote
//! threshold, strictly above its left and upper neighbours and not below its
//! right and lower ones. Survivors are sorted by votes; ties keep scan order.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_scharr, vertical_scharr};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{CenterWireParams, CircleHoughParams, RegistrationError};

/// Blur applied before gradient directions are taken.
const GRADIENT_SIGMA: f32 = 2.0;
/// Blur of the circle accumulator before peak search.
const ACCUMULATOR_SIGMA: f32 = 1.5;
/// Half-size of the square peak neighbourhood and of the centroid window.
const PEAK_RADIUS: i64 = 3;

/// A detected circle; `center.x` is the column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
    /// Votes inside the centroid window around `center`.
    pub votes: u32,
}

/// A line `x cos(theta) + y sin(theta) = rho` in the coordinates of the voted image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarLine {
    pub rho: f64,
    pub theta: f64,
    pub votes: u32,
}

struct Accumulator {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl Accumulator {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    fn add(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.width + x as usize] += 1;
        }
    }

    #[inline]
    fn get(&self, x: i64, y: i64) -> u32 {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.width + x as usize]
        } else {
            0
        }
    }

    /// `(x, y, votes)` of local maxima above `threshold`, strongest first.
    fn peaks(&self, threshold: u32) -> Vec<(usize, usize, u32)> {
        let mut out = Vec::new();
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                let v = self.get(x, y);
                if v > threshold
                    && v > self.get(x - 1, y)
                    && v >= self.get(x + 1, y)
                    && v > self.get(x, y - 1)
                    && v >= self.get(x, y + 1)
                {
                    out.push((x as usize, y as usize, v));
                }
            }
        }
        out.sort_by(|a, b| b.2.cmp(&a.2));
        out
    }
}

/// Sub-pixel circle-center votes.
struct VoteMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl VoteMap {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Split one vote over the four cells around `(x, y)`.
    fn add_bilinear(&mut self, x: f64, y: f64) {
        if x < 0.0 || y < 0.0 || x >= (self.width - 1) as f64 || y >= (self.height - 1) as f64 {
            return;
        }
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = ((x - x0) as f32, (y - y0) as f32);
        let base = y0 as usize * self.width + x0 as usize;
        self.data[base] += (1.0 - fx) * (1.0 - fy);
        self.data[base + 1] += fx * (1.0 - fy);
        self.data[base + self.width] += (1.0 - fx) * fy;
        self.data[base + self.width + 1] += fx * fy;
    }

    #[inline]
    fn get(&self, x: i64, y: i64) -> f32 {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.width + x as usize]
        } else {
            0.0
        }
    }

    fn smoothed(&self) -> Vec<f32> {
        ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(
            self.width as u32,
            self.height as u32,
            self.data.clone(),
        )
        .map(|img| gaussian_blur_f32(&img, ACCUMULATOR_SIGMA).into_raw())
        .unwrap_or_else(|| self.data.clone())
    }

    /// Vote-weighted centroid and vote mass of the window around `(cx, cy)`.
    fn centroid(&self, cx: i64, cy: i64) -> Option<(Point2<f64>, f64)> {
        let (mut sx, mut sy, mut mass) = (0.0, 0.0, 0.0);
        for y in cy - PEAK_RADIUS..=cy + PEAK_RADIUS {
            for x in cx - PEAK_RADIUS..=cx + PEAK_RADIUS {
                let v = self.get(x, y) as f64;
                sx += v * x as f64;
                sy += v * y as f64;
                mass += v;
            }
        }
        (mass > 0.0).then(|| (Point2::new(sx / mass, sy / mass), mass))
    }

    /// Centroid refined once more around its own rounded position.
    fn refine(&self, x: usize, y: usize) -> Option<(Point2<f64>, f64)> {
        let (first, _) = self.centroid(x as i64, y as i64)?;
        self.centroid(first.x.round() as i64, first.y.round() as i64)
    }
}

/// Indices of cells that dominate their square neighbourhood; ties go to the earlier cell.
fn local_maxima(values: &[f32], width: usize, height: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..height as i64 {
        'cell: for x in 0..width as i64 {
            let idx = y as usize * width + x as usize;
            let v = values[idx];
            if v <= 0.0 {
                continue;
            }
            for ny in (y - PEAK_RADIUS).max(0)..=(y + PEAK_RADIUS).min(height as i64 - 1) {
                for nx in (x - PEAK_RADIUS).max(0)..=(x + PEAK_RADIUS).min(width as i64 - 1) {
                    let nidx = ny as usize * width + nx as usize;
                    if values[nidx] > v || (values[nidx] == v && nidx < idx) {
                        continue 'cell;
                    }
                }
            }
            out.push((x as usize, y as usize));
        }
    }
    out
}

/// Circles in an already smoothed image, strongest first.
///
/// Every Canny edge pixel votes along its gradient, both ways, at each radius
/// in `min_radius..=max_radius`. Peaks of the blurred accumulator are refined
/// to the vote centroid around them, need more than `accumulator_threshold`
/// votes in that window and stay at least `min_dist` apart. The radius is the
/// mean edge distance around the most common one.
pub fn hough_circles(
    gray: &GrayImage,
    params: &CircleHoughParams,
) -> Result<Vec<Circle>, RegistrationError> {
    params.validate()?;
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return Ok(Vec::new());
    }
    let edges = canny(gray, params.canny_high / 2.0, params.canny_high);
    let blurred = gaussian_blur_f32(gray, GRADIENT_SIGMA);
    let gx = horizontal_scharr(&blurred);
    let gy = vertical_scharr(&blurred);

    let mut votes = VoteMap::new(w as usize, h as usize);
    let mut edge_points = Vec::new();
    for (x, y, px) in edges.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        edge_points.push(Point2::new(x as f64, y as f64));
        let dx = gx.get_pixel(x, y)[0] as f64;
        let dy = gy.get_pixel(x, y)[0] as f64;
        let mag = dx.hypot(dy);
        if mag == 0.0 {
            continue;
        }
        let (ux, uy) = (dx / mag, dy / mag);
        for sign in [1.0, -1.0] {
            for r in params.min_radius..=params.max_radius {
                let r = sign * r as f64;
                votes.add_bilinear(x as f64 + ux * r, y as f64 + uy * r);
            }
        }
    }

    let smoothed = votes.smoothed();
    let mut candidates: Vec<(Point2<f64>, f64)> = local_maxima(&smoothed, votes.width, votes.height)
        .into_iter()
        .filter_map(|(x, y)| votes.refine(x, y))
        .filter(|(_, mass)| *mass > params.accumulator_threshold as f64)
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut circles: Vec<Circle> = Vec::new();
    for (center, mass) in candidates {
        if circles
            .iter()
            .any(|c| (c.center - center).norm() < params.min_dist)
        {
            continue;
        }
        if let Some(radius) = estimate_radius(center, &edge_points, params) {
            circles.push(Circle {
                center,
                radius,
                votes: mass.round() as u32,
            });
        }
    }
    Ok(circles)
}

fn estimate_radius(
    center: Point2<f64>,
    edge_points: &[Point2<f64>],
    params: &CircleHoughParams,
) -> Option<f64> {
    let lo = params.min_radius as f64;
    let mut hist = vec![0u32; (params.max_radius - params.min_radius + 1) as usize];
    let distances: Vec<f64> = edge_points.iter().map(|p| (*p - center).norm()).collect();
    for &d in &distances {
        let bin = d.round() - lo;
        if bin >= 0.0 {
            if let Some(slot) = hist.get_mut(bin as usize) {
                *slot += 1;
            }
        }
    }
    let (best, &count) = hist
        .iter()
        .enumerate()
        .fold((0, &0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if count == 0 {
        return None;
    }
    let mode = lo + best as f64;
    let near: Vec<f64> = distances
        .into_iter()
        .filter(|d| (d - mode).abs() <= 1.0)
        .collect();
    Some(near.iter().sum::<f64>() / near.len() as f64)
}

/// Near-vertical lines in an edge map, strongest first.
pub fn hough_lines(edges: &GrayImage, params: &CenterWireParams) -> Vec<PolarLine> {
    let (w, h) = edges.dimensions();
    let num_rho = (((w + h) * 2 + 1) as f64 / params.rho_step).round() as usize;
    let num_theta = ((params.max_theta - params.min_theta) / params.theta_step + 1e-9).floor()
        as usize
        + 1;
    let rho_offset = ((num_rho - 1) / 2) as i64;
    let trig: Vec<(f64, f64)> = (0..num_theta)
        .map(|n| {
            let t = params.min_theta + n as f64 * params.theta_step;
            (t.cos() / params.rho_step, t.sin() / params.rho_step)
        })
        .collect();

    // x: rho index, y: theta index.
    let mut acc = Accumulator::new(num_rho, num_theta);
    for (x, y, px) in edges.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        for (n, &(c, s)) in trig.iter().enumerate() {
            let r = (x as f64 * c + y as f64 * s).round() as i64 + rho_offset;
            acc.add(r, n as i64);
        }
    }

    acc.peaks(params.vote_threshold)
        .into_iter()
        .map(|(r, n, votes)| PolarLine {
            rho: (r as f64 - (num_rho - 1) as f64 * 0.5) * params.rho_step,
            theta: params.min_theta + n as f64 * params.theta_step,
            votes,
        })
        .collect()
}
