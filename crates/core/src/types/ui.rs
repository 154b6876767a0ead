//! Documentation UI kinds and cache lifetimes.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown [`UiKind`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown documentation UI '{0}' (expected 'swagger' or 'redoc')")]
pub struct UiKindError(pub String);

/// Presentation format of a documentation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiKind {
    /// Browsable try-it-out explorer (Swagger UI).
    #[serde(rename = "swagger")]
    Interactive,
    /// Static read-only reference (ReDoc).
    #[serde(rename = "redoc")]
    Reference,
}

impl UiKind {
    /// Template name of the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "swagger",
            Self::Reference => "redoc",
        }
    }
}

impl fmt::Display for UiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UiKind {
    type Err = UiKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swagger" => Ok(Self::Interactive),
            "redoc" => Ok(Self::Reference),
            _ => Err(UiKindError(s.to_owned())),
        }
    }
}

/// How long a rendered documentation body may be reused, in seconds.
///
/// `0` means the body is regenerated on every request.
///
/// ```
/// use minha_api_core::CacheTimeout;
///
/// assert!(CacheTimeout::NEVER.is_disabled());
/// assert_eq!(CacheTimeout::from_secs(30).as_secs(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTimeout(u64);

impl CacheTimeout {
    /// Never cache.
    pub const NEVER: Self = Self(0);

    /// Create a timeout from whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Number of seconds.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Returns `true` when rendered bodies must not be reused.
    #[must_use]
    pub const fn is_disabled(self) -> bool {
        self.0 == 0
    }

    /// The timeout as a [`Duration`].
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl fmt::Display for CacheTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_kind_parse() {
        assert_eq!("swagger".parse::<UiKind>().unwrap(), UiKind::Interactive);
        assert_eq!("ReDoc".parse::<UiKind>().unwrap(), UiKind::Reference);
        assert!("rapidoc".parse::<UiKind>().is_err());
    }

    #[test]
    fn test_ui_kind_display_matches_serde() {
        for kind in [UiKind::Interactive, UiKind::Reference] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_cache_timeout_zero_is_disabled() {
        assert!(CacheTimeout::default().is_disabled());
        assert!(!CacheTimeout::from_secs(60).is_disabled());
        assert_eq!(CacheTimeout::from_secs(60).as_duration(), Duration::from_secs(60));
    }
}
