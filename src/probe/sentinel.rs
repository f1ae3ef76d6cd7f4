//! The single line a probe child prints on success:
//!
//! ```text
//! ngs-version-probe: ngs-sdk version=2.10.0
//! ```

/// Leading marker of the sentinel line
pub const SENTINEL_PREFIX: &str = "ngs-version-probe: ";

const VERSION_MARK: &str = " version=";

/// Sentinel line announcing `version` of `library`
#[must_use]
pub fn format_line(library: &str, version: &str) -> String {
    format!("{SENTINEL_PREFIX}{library}{VERSION_MARK}{version}")
}

/// Version from a sentinel line about `library`, if `line` is one.
#[must_use]
pub fn parse_line(line: &str, library: &str) -> Option<String> {
    let rest = line.trim_end().strip_prefix(SENTINEL_PREFIX)?;
    let version = rest.strip_prefix(library)?.strip_prefix(VERSION_MARK)?;
    let version = version.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// First sentinel version found in a child's output
#[must_use]
pub fn find_version(output: &str, library: &str) -> Option<String> {
    output.lines().find_map(|line| parse_line(line, library))
}
