//! Adaptive presentation rules for file listings.
//!
//! Pure functions of the total result count. Larger collections get bigger
//! pages and denser display modes so that rendering cost stays bounded on
//! the client. The step functions are monotonic: more files never yields a
//! smaller page or a less dense mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Display density for a file listing, from richest to densest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Full cards with preview and metadata.
    Cards,
    /// Compact cards, one line of metadata.
    Compact,
    /// Plain table rows.
    Table,
}

impl Density {
    /// Return the density as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::Compact => "compact",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Density {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cards" => Ok(Self::Cards),
            "compact" => Ok(Self::Compact),
            "table" => Ok(Self::Table),
            _ => Err(AppError::validation(format!(
                "Invalid display density: '{s}'. Expected one of: cards, compact, table"
            ))),
        }
    }
}

/// Recommended page size for a collection of `total_files` items.
pub fn optimal_page_size(total_files: u64) -> u64 {
    match total_files {
        0..=200 => 12,
        201..=1000 => 15,
        1001..=5000 => 25,
        5001..=10000 => 50,
        _ => 100,
    }
}

/// Recommended display density for a collection of `total_files` items.
pub fn recommended_density(total_files: u64) -> Density {
    match total_files {
        0..=1000 => Density::Cards,
        1001..=5000 => Density::Compact,
        _ => Density::Table,
    }
}

/// Whether the UI should switch away from `current` automatically.
///
/// True exactly when `current` is strictly less dense than the
/// recommendation, so the transition fires once and never oscillates.
pub fn should_auto_switch(total_files: u64, current: Density) -> bool {
    current < recommended_density(total_files)
}

/// Presentation hints attached to file listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationHints {
    /// Page size suited to the collection size.
    pub optimal_page_size: u64,
    /// Density suited to the collection size.
    pub recommended_density: Density,
    /// Whether the client should switch to the recommendation now.
    pub should_auto_switch: bool,
}

impl PresentationHints {
    /// Compute hints for a collection of `total_files` rendered at `current`.
    pub fn for_listing(total_files: u64, current: Density) -> Self {
        Self {
            optimal_page_size: optimal_page_size(total_files),
            recommended_density: recommended_density(total_files),
            should_auto_switch: should_auto_switch(total_files, current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_steps() {
        assert_eq!(optimal_page_size(0), 12);
        assert_eq!(optimal_page_size(200), 12);
        assert_eq!(optimal_page_size(201), 15);
        assert_eq!(optimal_page_size(1000), 15);
        assert_eq!(optimal_page_size(1001), 25);
        assert_eq!(optimal_page_size(5000), 25);
        assert_eq!(optimal_page_size(5001), 50);
        assert_eq!(optimal_page_size(10_000), 50);
        assert_eq!(optimal_page_size(10_001), 100);
    }

    #[test]
    fn test_page_size_is_monotonic() {
        let samples = [0, 1, 200, 201, 999, 1001, 4999, 5001, 9999, 10_001, 50_000];
        let mut previous = 0;
        for total in samples {
            let size = optimal_page_size(total);
            assert!(size >= previous, "page size shrank at total={total}");
            previous = size;
        }
    }

    #[test]
    fn test_density_steps() {
        assert_eq!(recommended_density(0), Density::Cards);
        assert_eq!(recommended_density(1000), Density::Cards);
        assert_eq!(recommended_density(1200), Density::Compact);
        assert_eq!(recommended_density(5001), Density::Table);
    }

    #[test]
    fn test_auto_switch_fires_only_upward() {
        // 1,200 files rendered as cards should switch to compact.
        assert!(should_auto_switch(1200, Density::Cards));
        assert_eq!(recommended_density(1200), Density::Compact);

        // Already at or past the recommendation: no switch.
        assert!(!should_auto_switch(1200, Density::Compact));
        assert!(!should_auto_switch(1200, Density::Table));
        assert!(!should_auto_switch(0, Density::Cards));
    }

    #[test]
    fn test_empty_collection_hints() {
        let hints = PresentationHints::for_listing(0, Density::Cards);
        assert_eq!(hints.optimal_page_size, 12);
        assert_eq!(hints.recommended_density, Density::Cards);
        assert!(!hints.should_auto_switch);
    }
}
