//! # Domain Types
//!
//! Record types shared by storage, the aggregation engine and reports.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LabourRecord   │   │  InvoiceRecord  │   │   Staff (roster)│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  staffs[]  ─────┼──►│  customer ──────┼─┐ │  id             │       │
//! │  │  kg, date, time │   │  processType[]  │ │ │  staff_id       │       │
//! │  │  labourType     │   │  kgIn, kgOut    │ │ │  name, phone    │       │
//! │  │  amount         │   │  status         │ │ └─────────────────┘       │
//! │  │  memberShare    │   │  recycler       │ │                            │
//! │  └────────┬────────┘   └─────────────────┘ │ ┌─────────────────┐       │
//! │           │                                 └►│  CustomerRef    │       │
//! │           ▼                                   │  (snapshot)     │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │    StaffRef     │   │ Sales / Purchase│                             │
//! │  │   (snapshot)    │   │ / Expense       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Records embed copies of staff and customer data taken when the record
//! was written. Renaming a staff member later does not rewrite history.
//!
//! ## Wire Names
//! Records serialize with the camelCase field names the dashboard already
//! reads (`kgIn`, `labourType`, `memberShare`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Amount;

/// Generates a new record identifier (UUID v4).
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Staff Identity
// =============================================================================

/// Anything that identifies a staff member.
///
/// Implemented by the embedded [`StaffRef`] snapshot and the roster
/// [`Staff`] entry so both resolve identity the same way.
pub trait StaffIdentity {
    /// Stable key for accumulation, or `None` when no identifier is set.
    fn key(&self) -> Option<String>;

    /// Display name.
    fn display_name(&self) -> &str;
}

/// Resolves identity: `id`, then the raw storage key, then the numeric
/// staff code. Blank strings count as absent.
fn resolve_key(id: Option<&str>, raw_id: Option<&str>, staff_id: Option<u32>) -> Option<String> {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    non_blank(id)
        .or_else(|| non_blank(raw_id))
        .map(str::to_string)
        .or_else(|| staff_id.map(|code| code.to_string()))
}

// =============================================================================
// Staff Snapshot
// =============================================================================

/// Staff member as embedded in a labour record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StaffRef {
    /// Storage identifier in string form.
    #[serde(default)]
    pub id: Option<String>,

    /// Legacy raw storage key carried by older documents.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<String>,

    /// Six-digit staff code.
    #[serde(default)]
    pub staff_id: Option<u32>,

    /// Name at the time the record was written (frozen).
    #[serde(default)]
    pub name: String,
}

impl StaffRef {
    /// Snapshot with a string identifier.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        StaffRef {
            id: Some(id.into()),
            raw_id: None,
            staff_id: None,
            name: name.into(),
        }
    }
}

impl StaffIdentity for StaffRef {
    fn key(&self) -> Option<String> {
        resolve_key(self.id.as_deref(), self.raw_id.as_deref(), self.staff_id)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Staff (Roster)
// =============================================================================

/// A staff member on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Staff {
    pub id: String,

    /// Six-digit staff code.
    pub staff_id: Option<u32>,

    pub name: String,

    pub phone: String,

    /// Date the staff member joined (YYYY-MM-DD).
    #[serde(rename = "dateAdded")]
    pub date_added: String,
}

impl Staff {
    /// Value copy for embedding in a labour record.
    pub fn snapshot(&self) -> StaffRef {
        StaffRef {
            id: Some(self.id.clone()),
            raw_id: None,
            staff_id: self.staff_id,
            name: self.name.clone(),
        }
    }
}

impl StaffIdentity for Staff {
    fn key(&self) -> Option<String> {
        resolve_key(Some(&self.id), None, self.staff_id)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer, also used as the snapshot embedded in sales, purchases
/// and invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<String>,

    /// Short six-character customer code.
    #[serde(default)]
    pub customer_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub contact: String,

    #[serde(default)]
    pub address: String,
}

/// Customer data frozen into a record.
pub type CustomerRef = Customer;

// =============================================================================
// Shift
// =============================================================================

/// Work shift of a labour record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Night,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Night => "night",
        }
    }
}

impl Default for Shift {
    fn default() -> Self {
        Shift::Morning
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "night" => Ok(Shift::Night),
            other => Err(format!("unknown shift '{}'", other)),
        }
    }
}

// =============================================================================
// Labour Record
// =============================================================================

/// A log of work performed by a group of staff on one date and shift.
///
/// ## Invariant
/// `amount == kg * rate(labour_type)` and
/// `member_share == amount / staffs.len()` (0 when `staffs` is empty).
/// Both are computed once, when the record is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LabourRecord {
    pub id: String,

    /// Participating staff, frozen at creation.
    pub staffs: Vec<StaffRef>,

    pub kg: f64,

    /// YYYY-MM-DD
    pub date: String,

    pub time: Shift,

    /// Free-text label such as "labour recycling".
    pub labour_type: String,

    #[serde(default)]
    pub amount: Amount,

    #[serde(default)]
    pub member_share: Amount,
}

/// Input for creating a labour record.
///
/// `amount` and `member_share` are computed from the price settings unless
/// both are supplied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewLabourRecord {
    pub staffs: Vec<StaffRef>,
    pub kg: f64,
    pub date: String,
    #[serde(default)]
    pub time: Shift,
    pub labour_type: String,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub member_share: Option<Amount>,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Processing state of an invoice.
///
/// ## State Machine
/// ```text
///          create (forced)
///               │
///               ▼
///        ┌─────────────┐  stop   ┌─────────┐
///        │ in progress │────────►│ stopped │
///        │             │◄────────│         │
///        └──────┬──────┘ resume  └────┬────┘
///               │                     │
///               │     complete        │
///               └─────────┬───────────┘
///                         ▼
///                  ┌─────────────┐
///                  │  completed  │  (terminal)
///                  └─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Material is being processed.
    #[serde(rename = "in progress")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "in progress"))]
    InProgress,
    /// Processing paused.
    Stopped,
    /// Processing done; counts towards revenue statistics.
    Completed,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::InProgress => "in progress",
            InvoiceStatus::Stopped => "stopped",
            InvoiceStatus::Completed => "completed",
        }
    }

    /// Member of the open-invoices query.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, InvoiceStatus::InProgress | InvoiceStatus::Stopped)
    }

    /// Member of the completed-invoices query.
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, InvoiceStatus::Completed)
    }

    /// Whether the state machine allows moving to `next`.
    ///
    /// Setting the current state again is a no-op and allowed, except that
    /// nothing leaves `completed`.
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        match (self, next) {
            (Completed, Completed) => true,
            (Completed, _) => false,
            (InProgress, _) | (Stopped, _) => true,
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::InProgress
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in progress" => Ok(InvoiceStatus::InProgress),
            "stopped" => Ok(InvoiceStatus::Stopped),
            "completed" => Ok(InvoiceStatus::Completed),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

// =============================================================================
// Process Codes
// =============================================================================

/// A single processing step applied to invoiced material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProcessCode {
    /// Recycling
    R,
    /// Crushing
    C,
    /// Blending
    B,
}

impl ProcessCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessCode::R => "R",
            ProcessCode::C => "C",
            ProcessCode::B => "B",
        }
    }
}

impl FromStr for ProcessCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "R" => Ok(ProcessCode::R),
            "C" => Ok(ProcessCode::C),
            "B" => Ok(ProcessCode::B),
            other => Err(format!("unknown process code '{}'", other)),
        }
    }
}

// =============================================================================
// Recycler
// =============================================================================

/// Recycling line an invoice ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Recycler {
    A,
    B,
}

impl Recycler {
    /// Case-insensitive parse; anything other than `a`/`b` is `None`.
    pub fn parse(raw: &str) -> Option<Recycler> {
        match raw.trim().to_lowercase().as_str() {
            "a" => Some(Recycler::A),
            "b" => Some(Recycler::B),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recycler::A => "a",
            Recycler::B => "b",
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// Material processed for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRecord {
    pub id: String,
    pub customer: CustomerRef,
    /// e.g. "pp" or "injection"
    pub product_type: String,
    /// Steps applied, in any order, possibly repeated.
    pub process_type: Vec<ProcessCode>,
    pub kg_in: f64,
    #[serde(default)]
    pub kg_out: f64,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Raw recycler label as stored; see [`InvoiceRecord::recycler`].
    #[serde(default)]
    pub recycler: Option<String>,
    /// YYYY-MM-DD
    pub date: String,
}

impl InvoiceRecord {
    /// Parsed recycler, if the stored label is `a` or `b`.
    pub fn recycler(&self) -> Option<Recycler> {
        self.recycler.as_deref().and_then(Recycler::parse)
    }
}

/// Input for creating an invoice. There is no status field: new invoices
/// always start `in progress`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewInvoice {
    pub customer: CustomerRef,
    pub product_type: String,
    pub process_type: Vec<ProcessCode>,
    pub kg_in: f64,
    #[serde(default)]
    pub kg_out: f64,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub recycler: Option<String>,
    pub date: String,
}

impl NewInvoice {
    /// Materializes the invoice with a fresh id and the initial status.
    pub fn into_record(self, id: String) -> InvoiceRecord {
        InvoiceRecord {
            id,
            customer: self.customer,
            product_type: self.product_type,
            process_type: self.process_type,
            kg_in: self.kg_in,
            kg_out: self.kg_out,
            amount: self.amount,
            status: InvoiceStatus::InProgress,
            recycler: self.recycler,
            date: self.date,
        }
    }
}

// =============================================================================
// Sales, Purchases, Expenses
// =============================================================================

/// A direct sale of material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesRecord {
    pub id: String,
    pub date: String,
    pub customer: CustomerRef,
    pub product_type: String,
    pub kg: f64,
    pub amount: Amount,
}

/// Material bought in, optionally from a known customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseRecord {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    pub product_type: String,
    pub kg: f64,
    pub amount: Amount,
}

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum ExpenseCategory {
    Utilities,
    Maintenance,
    Labour,
    Others,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Maintenance => "Maintenance",
            ExpenseCategory::Labour => "Labour",
            ExpenseCategory::Others => "Others",
        }
    }

    pub fn all() -> [ExpenseCategory; 4] {
        [
            ExpenseCategory::Utilities,
            ExpenseCategory::Maintenance,
            ExpenseCategory::Labour,
            ExpenseCategory::Others,
        ]
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown expense category '{}'", s))
    }
}

/// Money spent by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: String,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Amount,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a listing plus the size of the full result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Page {
            total: 0,
            items: Vec::new(),
        }
    }
}

/// Offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a request, clamping `limit` to `1..=MAX_PAGE_SIZE`.
    pub fn new(skip: u32, limit: u32) -> Self {
        PageRequest {
            skip,
            limit: limit.clamp(1, crate::MAX_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(0, crate::DEFAULT_PAGE_SIZE)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
