//! 1-D peak detection along an intensity profile.
//!
//! Candidates are strict local maxima (the middle of a flat top counts once),
//! then filtered in order by height, minimum distance (taller peaks win),
//! topographic prominence and width at `rel_height` of the prominence.

use crate::PeakParams;

/// Indices of the accepted peaks of `signal`, ascending.
pub fn find_peaks(signal: &[u8], params: &PeakParams) -> Vec<usize> {
    let x: Vec<f64> = signal.iter().map(|&v| v as f64).collect();

    let mut peaks: Vec<usize> = local_maxima(&x)
        .into_iter()
        .filter(|&p| x[p] >= params.min_height)
        .collect();

    peaks = select_by_distance(&x, &peaks, params.min_distance);

    peaks
        .into_iter()
        .filter_map(|p| {
            let prom = prominence(&x, p);
            (prom.value >= params.min_prominence).then_some((p, prom))
        })
        .filter(|&(p, prom)| width(&x, p, &prom, params.rel_height) <= params.max_width)
        .map(|(p, _)| p)
        .collect()
}

/// Number of accepted peaks; the wire count of one column.
#[inline]
pub fn count_peaks(signal: &[u8], params: &PeakParams) -> usize {
    find_peaks(signal, params).len()
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                out.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    out
}

fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }
    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct Prominence {
    value: f64,
    left_base: usize,
    right_base: usize,
}

fn prominence(x: &[f64], peak: usize) -> Prominence {
    let top = x[peak];

    let mut left_min = top;
    let mut left_base = peak;
    let mut i = peak as isize;
    while i >= 0 && x[i as usize] <= top {
        if x[i as usize] < left_min {
            left_min = x[i as usize];
            left_base = i as usize;
        }
        i -= 1;
    }

    let mut right_min = top;
    let mut right_base = peak;
    let mut i = peak;
    while i < x.len() && x[i] <= top {
        if x[i] < right_min {
            right_min = x[i];
            right_base = i;
        }
        i += 1;
    }

    Prominence {
        value: top - left_min.max(right_min),
        left_base,
        right_base,
    }
}

fn width(x: &[f64], peak: usize, prom: &Prominence, rel_height: f64) -> f64 {
    let height = x[peak] - prom.value * rel_height;

    let mut i = peak;
    while prom.left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left = i as f64;
    if x[i] < height {
        left += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < prom.right_base && height < x[i] {
        i += 1;
    }
    let mut right = i as f64;
    if x[i] < height {
        right -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right - left
}
