#![forbid(unsafe_code)]

//! Logging facade.
//!
//! All tvnav crates log through `tracing` directly. With the `subscriber`
//! feature this module installs a subscriber for applications that have
//! none.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TVNAV_LOG` | `EnvFilter` directive | `warn` |
//! | `TVNAV_LOG_FORMAT` | `json` for JSON lines, anything else for text | text |

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "TVNAV_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "TVNAV_LOG_FORMAT";

/// Whether `value` selects JSON output.
#[must_use]
pub fn wants_json(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

/// Install a global subscriber configured from the environment.
///
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "subscriber")]
pub fn init() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = wants_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
