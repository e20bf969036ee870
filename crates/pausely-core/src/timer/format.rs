//! Countdown and total-duration rendering.
//!
//! The countdown renders as `MM:SS` with unbounded minutes (a 90-minute
//! work phase shows as `90:00`, not wrapped at 60); accumulated totals
//! render as `HH:MM:SS`.

/// Format a countdown as `MM:SS`.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an accumulated total as `HH:MM:SS`.
pub fn format_hms(secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
