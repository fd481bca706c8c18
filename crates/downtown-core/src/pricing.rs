//! # Pricing
//!
//! The price settings document and the labour type classification.
//!
//! ## Labour Type Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  free-text label ──► lowercase ──► first matching substring wins       │
//! │                                                                         │
//! │    1. "recycling"       → Recycling      → labour_prices.recycling     │
//! │    2. "blending"        → Blending       → labour_prices.blending      │
//! │    3. "crushing waste"  → CrushingWaste  → labour_prices.crushingWaste │
//! │    4. "crushing sack"   → CrushingSack   → labour_prices.crushingSack  │
//! │    -  anything else     → Unknown        → rate 0                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`LabourType::classify`] is the only place labels are matched. Every
//! consumer after it switches on the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Price Table
// =============================================================================

/// What the company charges customers per kg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompanyPrices {
    pub recycling_kg: f64,
    pub blending_kg: f64,
    pub crushing_kg: f64,
}

/// What staff are paid per kg, by labour type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LabourPrices {
    pub recycling: f64,
    pub blending: f64,
    pub crushing_waste: f64,
    pub crushing_sack: f64,
}

impl LabourPrices {
    /// Per-kg rate for a labour type. `Unknown` pays nothing.
    #[inline]
    pub fn rate_for(&self, labour_type: LabourType) -> f64 {
        match labour_type {
            LabourType::Recycling => self.recycling,
            LabourType::Blending => self.blending,
            LabourType::CrushingWaste => self.crushing_waste,
            LabourType::CrushingSack => self.crushing_sack,
            LabourType::Unknown => 0.0,
        }
    }
}

/// The singleton price settings document.
///
/// Always passed explicitly into allocation and wage folds; the engine
/// keeps no ambient copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceTable {
    pub company_prices: CompanyPrices,
    pub labour_prices: LabourPrices,
}

impl PriceTable {
    /// Turns an absent price document into `ConfigurationMissing`.
    ///
    /// ## Example
    /// ```rust
    /// use downtown_core::pricing::PriceTable;
    ///
    /// assert!(PriceTable::require(None).is_err());
    /// assert!(PriceTable::require(Some(&PriceTable::default())).is_ok());
    /// ```
    pub fn require(table: Option<&PriceTable>) -> CoreResult<&PriceTable> {
        table.ok_or_else(CoreError::prices_missing)
    }

    /// Checks every rate is finite and non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rates = [
            ("company_prices.recyclingKg", self.company_prices.recycling_kg),
            ("company_prices.blendingKg", self.company_prices.blending_kg),
            ("company_prices.crushingKg", self.company_prices.crushing_kg),
            ("labour_prices.recycling", self.labour_prices.recycling),
            ("labour_prices.blending", self.labour_prices.blending),
            ("labour_prices.crushingWaste", self.labour_prices.crushing_waste),
            ("labour_prices.crushingSack", self.labour_prices.crushing_sack),
        ];

        for (field, rate) in rates {
            if !rate.is_finite() {
                return Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: "must be a finite number".to_string(),
                });
            }
            if rate < 0.0 {
                return Err(ValidationError::Negative {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Labour Type
// =============================================================================

/// Canonical labour type, derived from a record's free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LabourType {
    Recycling,
    Blending,
    CrushingWaste,
    CrushingSack,
    /// Label matched none of the known types.
    Unknown,
}

impl LabourType {
    /// Known types with the substring that selects each, in match order.
    const PATTERNS: [(&'static str, LabourType); 4] = [
        ("recycling", LabourType::Recycling),
        ("blending", LabourType::Blending),
        ("crushing waste", LabourType::CrushingWaste),
        ("crushing sack", LabourType::CrushingSack),
    ];

    /// Classifies a free-text label.
    ///
    /// ## Example
    /// ```rust
    /// use downtown_core::pricing::LabourType;
    ///
    /// assert_eq!(LabourType::classify("Labour Recycling"), LabourType::Recycling);
    /// assert_eq!(LabourType::classify("labour crushing sack"), LabourType::CrushingSack);
    /// assert_eq!(LabourType::classify("labour crushing"), LabourType::Unknown);
    /// ```
    pub fn classify(label: &str) -> LabourType {
        let label = label.to_lowercase();
        Self::PATTERNS
            .iter()
            .find(|(needle, _)| label.contains(needle))
            .map(|(_, kind)| *kind)
            .unwrap_or(LabourType::Unknown)
    }

    /// Every known type, in display order.
    pub fn known() -> [LabourType; 4] {
        [
            LabourType::Recycling,
            LabourType::Blending,
            LabourType::CrushingWaste,
            LabourType::CrushingSack,
        ]
    }

    /// Canonical label written on new records.
    pub fn label(&self) -> &'static str {
        match self {
            LabourType::Recycling => "labour recycling",
            LabourType::Blending => "labour blending",
            LabourType::CrushingWaste => "labour crushing waste",
            LabourType::CrushingSack => "labour crushing sack",
            LabourType::Unknown => "unknown",
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, LabourType::Unknown)
    }
}

impl fmt::Display for LabourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
