//! Version information for the application, populated at build time.
//!
//! Display format:
//! - release builds: `stable:{version}`
//! - debug builds: `dev:{commit}`

/// Get the build date in RFC3339 format
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

/// Get the git commit hash (short)
pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

/// Get the package version
pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Format the environment and version info as a display string.
pub fn format_env_version() -> String {
    if cfg!(debug_assertions) {
        format!("dev:{}", build_commit())
    } else {
        format!("stable:{}", build_version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_metadata_is_stamped() {
        assert!(!build_date().is_empty());
        assert!(!build_commit().is_empty());
        assert!(!build_version().is_empty());
    }

    #[test]
    fn env_version_has_a_prefix() {
        let formatted = format_env_version();
        assert!(formatted.starts_with("dev:") || formatted.starts_with("stable:"));
    }
}
