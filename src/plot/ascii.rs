//! ASCII plotting for terminal output.
//!
//! Intentionally "dumb" (fixed-size character grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - spectral trace / fitted line: `-`
//! - detected peaks / matched points: `x`

use crate::domain::CalibrationFit;

/// Render the enhanced-resolution spectrum with detected peaks marked.
///
/// The x axis is labeled in native pixels (`bin / resolution`) so peak
/// positions line up with the exported calibration table.
pub fn render_spectrum_plot(
    spectrum: &[u32],
    peaks_px: &[f64],
    resolution: u32,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let r = f64::from(resolution.max(1));
    let x_max = if spectrum.is_empty() {
        1.0
    } else {
        (spectrum.len() - 1) as f64 / r
    };

    let y_max = spectrum.iter().copied().max().unwrap_or(0) as f64;
    let (y_min, y_max) = pad_range(0.0, y_max.max(1.0), 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Trace first so peak markers overlay it.
    let mut prev = None;
    for (bin, &count) in spectrum.iter().enumerate() {
        let x = map_x(bin as f64 / r, 0.0, x_max, width);
        let y = map_y(f64::from(count), y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }

    for &peak in peaks_px {
        let bin = (peak * r).round() as usize;
        let count = spectrum.get(bin).copied().unwrap_or(0);
        let x = map_x(peak, 0.0, x_max, width);
        let y = map_y(f64::from(count), y_min, y_max, height);
        grid[y][x] = 'x';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Spectrum: x=[0.0, {x_max:.1}]px | counts=[0, {:.0}]\n",
        y_max
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Render the pixel-to-wavelength fit with the matched peaks marked.
pub fn render_calibration_plot(
    peaks_px: &[f64],
    known_lines: &[f64],
    fit: &CalibrationFit,
    max_px: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let x_max = max_px.max(1.0);

    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    for &w in known_lines {
        y_lo = y_lo.min(w);
        y_hi = y_hi.max(w);
    }
    y_lo = y_lo.min(fit.wavelength_at(0.0));
    y_hi = y_hi.max(fit.wavelength_at(x_max));
    if !(y_lo.is_finite() && y_hi.is_finite() && y_hi > y_lo) {
        y_lo = 0.0;
        y_hi = 1.0;
    }
    let (y_lo, y_hi) = pad_range(y_lo, y_hi, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let x0 = map_x(0.0, 0.0, x_max, width);
    let y0 = map_y(fit.wavelength_at(0.0), y_lo, y_hi, height);
    let x1 = map_x(x_max, 0.0, x_max, width);
    let y1 = map_y(fit.wavelength_at(x_max), y_lo, y_hi, height);
    draw_line(&mut grid, x0, y0, x1, y1, '-');

    for (&p, &w) in peaks_px.iter().zip(known_lines.iter()) {
        let x = map_x(p, 0.0, x_max, width);
        let y = map_y(w, y_lo, y_hi, height);
        grid[y][x] = 'x';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Calibration: x=[0.0, {x_max:.1}]px | wavelength=[{y_lo:.2}, {y_hi:.2}]nm\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(v: f64, v_min: f64, v_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, v_min: f64, v_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    // v=top of range -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_plot_has_expected_shape_and_markers() {
        let mut spectrum = vec![1u32; 64];
        spectrum[30] = 100;
        spectrum[31] = 250;
        spectrum[32] = 90;

        let txt = render_spectrum_plot(&spectrum, &[15.5], 2, 40, 10);
        let lines: Vec<&str> = txt.lines().collect();

        // Header plus one line per grid row.
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("Spectrum:"));
        for row in &lines[1..] {
            assert_eq!(row.chars().count(), 40);
        }
        assert!(txt.contains('x'), "peak marker missing:\n{txt}");
        assert!(txt.contains('-'), "trace missing:\n{txt}");
    }

    #[test]
    fn calibration_plot_marks_each_matched_peak() {
        let peaks = [50.0, 70.0, 90.0, 110.0];
        let lines: Vec<f64> = peaks.iter().map(|&p| 0.4 * p + 760.0).collect();
        let fit = CalibrationFit {
            slope: 0.4,
            intercept: 760.0,
            slope_stderr: 0.0,
            intercept_stderr: 0.0,
        };

        let txt = render_calibration_plot(&peaks, &lines, &fit, 128.0, 60, 12);
        let marker_count = txt.chars().filter(|&c| c == 'x').count();

        // Markers may collide on a coarse grid but never exceed the peak count.
        assert!(marker_count >= 2 && marker_count <= peaks.len());
        assert!(txt.starts_with("Calibration:"));
    }

    #[test]
    fn empty_spectrum_still_renders_a_grid() {
        let txt = render_spectrum_plot(&[], &[], 2, 20, 6);
        assert_eq!(txt.lines().count(), 7);
    }
}
