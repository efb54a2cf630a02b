//! Log level selection for the library's own `tracing` events.
//!
//! The library only emits events under the `cmdtree` target; installing a
//! subscriber is up to the binary. These helpers let it honour
//! `CMDTREE_TRACE` / `CMDTREE_DEBUG`, read once at startup.

use tracing::Level;

pub const TRACE_ENV: &str = "CMDTREE_TRACE";
pub const DEBUG_ENV: &str = "CMDTREE_DEBUG";

/// Level requested through the process environment, if any.
pub fn level_from_env() -> Option<Level> {
    level_from(|key| std::env::var(key).ok())
}

/// Level requested through `lookup`; trace takes precedence over debug.
pub fn level_from<F>(lookup: F) -> Option<Level>
where
    F: Fn(&str) -> Option<String>,
{
    if enabled(lookup(TRACE_ENV)) {
        Some(Level::TRACE)
    } else if enabled(lookup(DEBUG_ENV)) {
        Some(Level::DEBUG)
    } else {
        None
    }
}

fn enabled(value: Option<String>) -> bool {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}
