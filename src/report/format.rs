//! Formatting of calibration results for the terminal.
//!
//! Formatting lives in one place so the fitting code stays clean and output
//! changes are localized.

use crate::domain::ChannelCalibration;

/// Format the per-channel calibration summary.
pub fn format_channel_summary(cal: &ChannelCalibration) -> String {
    let mut out = String::new();

    out.push_str(&format!("Calibration for channel {}:\n", cal.channel));
    out.push_str(&format!(
        "- line row: {:.2} px (sigma {:.2} px)\n",
        cal.profile.center, cal.profile.sigma
    ));
    out.push_str(&format!(
        "- slope    : {:.6} nm/px (+/- {:.3}%)\n",
        cal.fit.slope,
        relative_pct(cal.fit.slope_stderr, cal.fit.slope)
    ));
    out.push_str(&format!(
        "- intercept: {:.4} nm (+/- {:.3}%)\n",
        cal.fit.intercept,
        relative_pct(cal.fit.intercept_stderr, cal.fit.intercept)
    ));
    out.push_str(&format!("- peaks    : {}\n", fmt_vec(&cal.peaks_px)));

    out
}

fn relative_pct(err: f64, value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        (err / value).abs() * 100.0
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.1}")).collect();
    format!("[{}]", parts.join(", "))
}
