//! # Wage Aggregation
//!
//! Two read-only folds over labour records, keyed by staff.
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ wages_by_type                │ monthly_wages                            │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ all dates                    │ inclusive [start, end] date window       │
//! │ recomputed: kg/staff × rate  │ stored member_share                      │
//! │ four fixed LabourType fields │ free-text breakdown (trimmed, lowercase) │
//! │ staff seen in records only   │ every roster entry, zero if idle         │
//! │ needs the PriceTable         │ no prices needed                         │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Malformed records (see [`crate::validation::check_labour_record`]) are
//! skipped. A staff entry with no identifier is skipped on its own; the
//! rest of its record still counts.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar;
use crate::money::Amount;
use crate::pricing::{LabourPrices, LabourType};
use crate::types::{LabourRecord, StaffIdentity};
use crate::validation::check_labour_record;

// =============================================================================
// Per-Type Summary
// =============================================================================

/// Per-staff kg and pay, split by labour type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffLabourSummary {
    pub id: String,
    pub name: String,
    pub total_kg: f64,
    pub amount_recycling: Amount,
    pub amount_blending: Amount,
    pub amount_crushing_waste: Amount,
    pub amount_crushing_sack: Amount,
    /// Sum of the four amount fields.
    pub total_amount_due: Amount,
}

impl StaffLabourSummary {
    fn new(id: String, name: String) -> Self {
        StaffLabourSummary {
            id,
            name,
            total_kg: 0.0,
            amount_recycling: Amount::zero(),
            amount_blending: Amount::zero(),
            amount_crushing_waste: Amount::zero(),
            amount_crushing_sack: Amount::zero(),
            total_amount_due: Amount::zero(),
        }
    }

    fn field_mut(&mut self, labour_type: LabourType) -> Option<&mut Amount> {
        match labour_type {
            LabourType::Recycling => Some(&mut self.amount_recycling),
            LabourType::Blending => Some(&mut self.amount_blending),
            LabourType::CrushingWaste => Some(&mut self.amount_crushing_waste),
            LabourType::CrushingSack => Some(&mut self.amount_crushing_sack),
            LabourType::Unknown => None,
        }
    }

    fn finish(mut self) -> Self {
        self.total_amount_due = self.amount_recycling
            + self.amount_blending
            + self.amount_crushing_waste
            + self.amount_crushing_sack;
        self
    }
}

/// Per-staff pay across all labour records, split into the four labour
/// type fields.
///
/// Each record's kg is divided evenly among its staff and every staff
/// member is paid `kg_per_staff × rate` on the matching field. Records with
/// no staff are skipped; unknown labour types add kg but no pay.
///
/// Output order is the order staff are first seen in `records`.
pub fn wages_by_type(records: &[LabourRecord], prices: &LabourPrices) -> Vec<StaffLabourSummary> {
    let mut order: Vec<StaffLabourSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.staffs.is_empty() || check_labour_record(record).is_err() {
            continue;
        }

        let kg_per_staff = record.kg / record.staffs.len() as f64;
        let labour_type = LabourType::classify(&record.labour_type);
        let pay = Amount::new(kg_per_staff * prices.rate_for(labour_type));

        for staff in &record.staffs {
            let Some(key) = staff.key() else {
                continue;
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                order.push(StaffLabourSummary::new(key, staff.display_name().to_string()));
                order.len() - 1
            });

            let summary = &mut order[slot];
            summary.total_kg += kg_per_staff;
            if let Some(field) = summary.field_mut(labour_type) {
                *field += pay;
            }
        }
    }

    order.into_iter().map(StaffLabourSummary::finish).collect()
}

// =============================================================================
// Monthly Summary
// =============================================================================

/// Wage owed to one roster entry for a date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffWageSummary {
    pub id: String,
    pub name: String,
    pub total_wage: Amount,
    /// Wage per labour label (trimmed, lower-cased as written on records).
    pub breakdown: BTreeMap<String, Amount>,
}

#[derive(Default)]
struct WageTally {
    total: Amount,
    breakdown: BTreeMap<String, Amount>,
}

/// Wage per roster entry over labour records dated within
/// `[window_start, window_end]`, using each record's stored member share.
///
/// Every roster entry with an identifier appears exactly once, in roster
/// order, even when it has no matching records. Staff found in records but
/// absent from the roster are left out.
pub fn monthly_wages<S: StaffIdentity>(
    records: &[LabourRecord],
    roster: &[S],
    window_start: &str,
    window_end: &str,
) -> Vec<StaffWageSummary> {
    let mut tallies: HashMap<String, WageTally> = HashMap::new();

    for record in records {
        if check_labour_record(record).is_err()
            || !calendar::in_window(&record.date, window_start, window_end)
        {
            continue;
        }

        let label = record.labour_type.trim().to_lowercase();
        for staff in &record.staffs {
            let Some(key) = staff.key() else {
                continue;
            };
            let tally = tallies.entry(key).or_default();
            tally.total += record.member_share;
            *tally.breakdown.entry(label.clone()).or_default() += record.member_share;
        }
    }

    let mut seen = HashSet::new();
    roster
        .iter()
        .filter_map(|staff| {
            let key = staff.key()?;
            if !seen.insert(key.clone()) {
                return None;
            }
            let tally = tallies.remove(&key).unwrap_or_default();
            Some(StaffWageSummary {
                id: key,
                name: staff.display_name().to_string(),
                total_wage: tally.total,
                breakdown: tally.breakdown,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Shift, Staff, StaffRef};

    fn prices() -> LabourPrices {
        LabourPrices {
            recycling: 100.0,
            blending: 50.0,
            crushing_waste: 20.0,
            crushing_sack: 10.0,
        }
    }

    fn record(id: &str, date: &str, labour_type: &str, kg: f64, staff: &[(&str, &str)]) -> LabourRecord {
        let staffs: Vec<StaffRef> = staff.iter().map(|(id, name)| StaffRef::new(*id, *name)).collect();
        let amount = Amount::new(kg * prices().rate_for(LabourType::classify(labour_type)));
        LabourRecord {
            id: id.to_string(),
            member_share: amount.split(staffs.len()),
            staffs,
            kg,
            date: date.to_string(),
            time: Shift::Morning,
            labour_type: labour_type.to_string(),
            amount,
        }
    }

    fn roster_entry(id: &str, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            staff_id: None,
            name: name.to_string(),
            phone: String::new(),
            date_added: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_wages_by_type_splits_kg() {
        let records = vec![record(
            "l1",
            "2025-03-02",
            "labour recycling",
            10.0,
            &[("a", "Ada"), ("b", "Bola")],
        )];
        let out = wages_by_type(&records, &prices());

        assert_eq!(out.len(), 2);
        for s in &out {
            assert_eq!(s.total_kg, 5.0);
            assert_eq!(s.amount_recycling.value(), 500.0);
            assert_eq!(s.total_amount_due.value(), 500.0);
        }
    }

    #[test]
    fn test_wages_by_type_accumulates_fields() {
        let records = vec![
            record("l1", "2025-03-02", "labour recycling", 10.0, &[("a", "Ada")]),
            record("l2", "2025-03-03", "labour blending", 4.0, &[("a", "Ada"), ("b", "Bola")]),
            record("l3", "2025-03-04", "labour crushing waste", 5.0, &[("a", "Ada")]),
            record("l4", "2025-03-05", "labour crushing sack", 3.0, &[("b", "Bola")]),
        ];
        let out = wages_by_type(&records, &prices());

        let ada = &out[0];
        assert_eq!(ada.id, "a");
        assert_eq!(ada.total_kg, 17.0);
        assert_eq!(ada.amount_recycling.value(), 1000.0);
        assert_eq!(ada.amount_blending.value(), 100.0);
        assert_eq!(ada.amount_crushing_waste.value(), 100.0);
        assert_eq!(ada.total_amount_due.value(), 1200.0);

        let bola = &out[1];
        assert_eq!(bola.id, "b");
        assert_eq!(bola.total_kg, 5.0);
        assert_eq!(bola.amount_blending.value(), 100.0);
        assert_eq!(bola.amount_crushing_sack.value(), 30.0);
        assert_eq!(bola.total_amount_due.value(), 130.0);
    }

    #[test]
    fn test_wages_by_type_total_consistency() {
        let records = vec![
            record("l1", "2025-01-02", "labour recycling", 7.3, &[("a", "Ada"), ("b", "Bola"), ("c", "Chidi")]),
            record("l2", "2025-01-09", "labour crushing sack", 11.1, &[("c", "Chidi")]),
            record("l3", "2025-02-10", "Labour Blending", 2.2, &[("b", "Bola")]),
        ];
        for s in wages_by_type(&records, &prices()) {
            let sum = s.amount_recycling
                + s.amount_blending
                + s.amount_crushing_waste
                + s.amount_crushing_sack;
            assert_eq!(s.total_amount_due, sum);
        }
    }

    #[test]
    fn test_wages_by_type_unknown_adds_kg_only() {
        let records = vec![record("l1", "2025-03-02", "labour sorting", 9.0, &[("a", "Ada")])];
        let out = wages_by_type(&records, &prices());
        assert_eq!(out[0].total_kg, 9.0);
        assert!(out[0].total_amount_due.is_zero());
    }

    #[test]
    fn test_wages_by_type_skips_empty_staff_and_anonymous_entries() {
        let mut anonymous = record("l2", "2025-03-02", "labour recycling", 10.0, &[("a", "Ada")]);
        anonymous.staffs.push(StaffRef {
            id: None,
            raw_id: None,
            staff_id: None,
            name: "Nobody".to_string(),
        });

        let records = vec![
            record("l1", "2025-03-01", "labour recycling", 10.0, &[]),
            anonymous,
        ];
        let out = wages_by_type(&records, &prices());

        assert_eq!(out.len(), 1);
        // kg still divides by the full staff count of the record
        assert_eq!(out[0].total_kg, 5.0);
        assert_eq!(out[0].amount_recycling.value(), 500.0);
    }

    #[test]
    fn test_wages_by_type_skips_malformed_record() {
        let mut bad = record("l1", "2025-03-01", "labour recycling", 10.0, &[("a", "Ada")]);
        bad.kg = f64::NAN;
        let good = record("l2", "2025-03-02", "labour recycling", 1.0, &[("a", "Ada")]);

        let out = wages_by_type(&[bad, good], &prices());
        assert_eq!(out[0].total_kg, 1.0);
    }

    #[test]
    fn test_wages_by_type_empty() {
        assert!(wages_by_type(&[], &prices()).is_empty());
    }

    #[test]
    fn test_monthly_wages_roster_completeness() {
        let roster = vec![
            roster_entry("a", "Ada"),
            roster_entry("b", "Bola"),
            roster_entry("c", "Chidi"),
        ];
        let records = vec![record(
            "l1",
            "2025-04-10",
            "labour recycling",
            10.0,
            &[("a", "Ada"), ("b", "Bola")],
        )];
        let out = monthly_wages(&records, &roster, "2025-04-01", "2025-04-30");

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].total_wage.value(), 500.0);
        assert_eq!(out[1].total_wage.value(), 500.0);
        assert_eq!(out[2].id, "c");
        assert!(out[2].total_wage.is_zero());
        assert!(out[2].breakdown.is_empty());
    }

    #[test]
    fn test_monthly_wages_window_and_breakdown() {
        let roster = vec![roster_entry("a", "Ada")];
        let records = vec![
            record("l1", "2025-04-01", "Labour Recycling ", 2.0, &[("a", "Ada")]),
            record("l2", "2025-04-30", "labour recycling", 1.0, &[("a", "Ada")]),
            record("l3", "2025-04-15", "labour crushing", 5.0, &[("a", "Ada")]),
            record("l4", "2025-05-01", "labour recycling", 100.0, &[("a", "Ada")]),
            record("l5", "2025-03-31", "labour recycling", 100.0, &[("a", "Ada")]),
        ];
        let out = monthly_wages(&records, &roster, "2025-04-01", "2025-04-30");

        let ada = &out[0];
        assert_eq!(ada.total_wage.value(), 300.0);
        assert_eq!(ada.breakdown.len(), 2);
        assert_eq!(ada.breakdown["labour recycling"].value(), 300.0);
        // unknown labels keep their own key, worth what was stored
        assert!(ada.breakdown["labour crushing"].is_zero());
    }

    #[test]
    fn test_monthly_wages_uses_stored_share() {
        let mut r = record("l1", "2025-04-02", "labour recycling", 10.0, &[("a", "Ada")]);
        r.member_share = Amount::new(7.0);
        let out = monthly_wages(&[r], &[roster_entry("a", "Ada")], "2025-04-01", "2025-04-30");
        assert_eq!(out[0].total_wage.value(), 7.0);
    }

    #[test]
    fn test_monthly_wages_duplicate_roster_entry_once() {
        let roster = vec![roster_entry("a", "Ada"), roster_entry("a", "Ada again")];
        let out = monthly_wages::<Staff>(&[], &roster, "2025-04-01", "2025-04-30");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Ada");
    }

    #[test]
    fn test_monthly_wages_skips_malformed_date() {
        let bad = record("l1", "2025-04-xx", "labour recycling", 10.0, &[("a", "Ada")]);
        let out = monthly_wages(&[bad], &[roster_entry("a", "Ada")], "2025-04-01", "2025-04-30");
        assert!(out[0].total_wage.is_zero());
    }
}
