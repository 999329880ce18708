pub mod services;
pub mod webhook;

use tracing::error;

/// Missing credentials are reported but never stop startup.
pub fn report_missing(names: &[&str]) {
    if !names.is_empty() {
        error!(
            "One or more environment variables are missing: {}",
            names.join(", ")
        );
    }
}
