//! Display text composition.
//!
//! Enabled metrics are laid out on at most two rows: VPN and CPU on the
//! first, RAM and temperature on the second. A row with no constituent
//! metric is omitted entirely, so the output never contains a blank line.
//! An empty result means nothing is enabled and the caller must skip the
//! display cycle rather than show an empty overlay.

/// Separator between the two tokens of a row.
pub const TOKEN_SEPARATOR: &str = "  ";

/// Per-cycle display tokens; `None` marks a metric disabled this cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingSet {
    pub vpn: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub temp: Option<String>,
}

/// Compose the overlay text for one display cycle.
pub fn compose_display_text(readings: &ReadingSet) -> String {
    let rows = [
        row(&readings.vpn, &readings.cpu),
        row(&readings.ram, &readings.temp),
    ];
    rows.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

fn row(left: &Option<String>, right: &Option<String>) -> Option<String> {
    let tokens: Vec<&str> = [left, right]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(TOKEN_SEPARATOR))
    }
}
