//! # Labour Allocation
//!
//! Computes what a labour record is worth and how it splits across the
//! staff who worked it.
//!
//! ```text
//!   kg ─────────┐
//!               ├──► amount = rate × kg ──► member_share = amount / staff
//!   labourType ─┤                                         (0 if no staff)
//!   (classify)  │
//!   PriceTable ─┘
//! ```
//!
//! Allocation runs once, when a record is written. Reports read the stored
//! `amount` and `member_share` back instead of recomputing them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use crate::pricing::{LabourPrices, LabourType, PriceTable};
use crate::types::{NewLabourRecord, StaffIdentity};

/// Result of pricing one labour record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Allocation {
    /// Total paid out for the record.
    pub amount: Amount,
    /// Equal share for each participating staff member.
    pub member_share: Amount,
}

/// Prices `kg` of `labour_type` work shared by `staff_count` people.
///
/// Pure and deterministic. An unknown labour type is worth nothing and zero
/// staff gives a zero share.
pub fn allocate(
    prices: &LabourPrices,
    labour_type: LabourType,
    kg: f64,
    staff_count: usize,
) -> Allocation {
    let amount = Amount::new(prices.rate_for(labour_type) * kg);
    Allocation {
        amount,
        member_share: amount.split(staff_count),
    }
}

/// Allocates a record that is about to be stored.
///
/// Fails fast on bad input instead of storing a wrong amount:
/// - `MalformedRecord` for negative or non-finite kg, or a staff entry
///   with no identifier
/// - `ConfigurationMissing` when pricing is needed and `prices` is `None`
///
/// When the caller already supplied both `amount` and `member_share`,
/// those are kept as-is and no price table is needed.
pub fn allocate_record(
    record_id: &str,
    record: &NewLabourRecord,
    prices: Option<&PriceTable>,
) -> CoreResult<Allocation> {
    if !record.kg.is_finite() || record.kg < 0.0 {
        return Err(CoreError::MalformedRecord {
            record_id: record_id.to_string(),
            reason: format!("kg must be a non-negative number, got {}", record.kg),
        });
    }

    if let Some(position) = record.staffs.iter().position(|s| s.key().is_none()) {
        return Err(CoreError::MalformedRecord {
            record_id: record_id.to_string(),
            reason: format!("staff entry {} has no identifier", position),
        });
    }

    if let (Some(amount), Some(member_share)) = (record.amount, record.member_share) {
        return Ok(Allocation {
            amount,
            member_share,
        });
    }

    let table = PriceTable::require(prices)?;
    Ok(allocate(
        &table.labour_prices,
        LabourType::classify(&record.labour_type),
        record.kg,
        record.staffs.len(),
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
