//! Static build metadata reported by the info endpoint and startup logs.

use std::fmt;

use serde::Serialize;

/// Build number used when the binary was not produced by CI.
const LOCAL_BUILD: &str = "local";

/// Version, build number and build date of the running binary.
///
/// The build number and date are baked in at compile time through the
/// `CHATUI_BUILD_NUMBER` and `CHATUI_BUILD_DATE` environment variables; a
/// developer build falls back to `local` and the current date.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    /// Crate version.
    pub version: &'static str,
    /// CI build number, or `local`.
    pub build_number: &'static str,
    /// Date the binary was built.
    pub build_date: String,
}

impl BuildInfo {
    /// Metadata of the running binary.
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_number: option_env!("CHATUI_BUILD_NUMBER").unwrap_or(LOCAL_BUILD),
            build_date: option_env!("CHATUI_BUILD_DATE")
                .map_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string(), str::to_string),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{} build {} ({})",
            self.version, self.build_number, self.build_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_has_no_empty_fields() {
        let info = BuildInfo::current();
        assert!(!info.version.is_empty());
        assert!(!info.build_number.is_empty());
        assert!(!info.build_date.is_empty());
    }

    #[test]
    fn test_serializes_expected_shape() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(BuildInfo::current())?;
        assert!(value.get("version").is_some());
        assert!(value.get("build_number").is_some());
        assert!(value.get("build_date").is_some());
        Ok(())
    }

    #[test]
    fn test_display_mentions_version_and_build() {
        let info = BuildInfo::current();
        let text = info.to_string();
        assert!(text.contains(info.version));
        assert!(text.contains(info.build_number));
    }
}
