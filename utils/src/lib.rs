//! Shared helpers for the wallshell workspace.

mod version_info;

pub use version_info::{build_commit, build_date, build_version, format_env_version};
