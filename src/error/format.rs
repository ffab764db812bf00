use crate::error::LaunchError;
use std::error::Error;

/// Format an error and its source chain for display to the operator.
pub fn format_error_chain(error: &LaunchError) -> String {
    let mut output = format!("Error: {error}");

    let mut source = error.source();
    while let Some(cause) = source {
        output.push_str(&format!("\nCaused by: {cause}"));
        source = cause.source();
    }

    output
}
