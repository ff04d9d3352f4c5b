//! Arrival countdown formatting.
//!
//! The panel only has room for the next two arrivals per line, so everything past
//! the second entry is dropped here regardless of how many the fetcher kept.

/// Shown when a feed has no arrivals for the selected direction
pub const PLACEHOLDER: &str = "--";

/// How many arrivals fit next to a badge
pub const MAX_SHOWN: usize = 2;

/// Format minutes-until-arrival as `"3 & 7 min"`, or `"--"` when empty.
///
/// Values are printed verbatim; range checking is the fetcher's job.
///
/// # Example
/// ```
/// use transit_ticker_lib::format::format_arrivals;
///
/// assert_eq!(format_arrivals(&[3, 7, 12]), "3 & 7 min");
/// assert_eq!(format_arrivals(&[5]), "5 min");
/// assert_eq!(format_arrivals(&[]), "--");
/// ```
pub fn format_arrivals(minutes: &[i64]) -> String {
    let shown = &minutes[..minutes.len().min(MAX_SHOWN)];
    if shown.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let joined = shown
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" & ");
    format!("{} min", joined)
}
