//! Duration formatting for progress lines.

use std::time::Duration;

/// Format a duration the way progress lines show it (`850ms`, `4.2s`, `1.5m`).
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
