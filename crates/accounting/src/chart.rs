//! Chart of accounts used by CMI settlement postings.
//!
//! Codes follow the Moroccan general chart (CGNC) as used by merchants
//! reconciling CMI card-acquiring statements.

use serde::Serialize;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// General ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Account {
    pub code: &'static str,
    pub name: &'static str,
    pub kind: AccountKind,
}

pub const CMI_COMMISSIONS: Account = Account {
    code: "61473001",
    name: "Commissions bancaires CMI",
    kind: AccountKind::Expense,
};

pub const VAT_RECOVERABLE: Account = Account {
    code: "34552010",
    name: "Etat, TVA recuperable sur charges",
    kind: AccountKind::Asset,
};

pub const CMI_SETTLEMENT: Account = Account {
    code: "34210000",
    name: "Clients, remises CMI",
    kind: AccountKind::Asset,
};

pub const POS_RENTAL_EXPENSE: Account = Account {
    code: "61315000",
    name: "Location de materiel (TPE)",
    kind: AccountKind::Expense,
};

pub const SUPPLIERS: Account = Account {
    code: "44110000",
    name: "Fournisseurs",
    kind: AccountKind::Liability,
};

/// Third-party sub-account of [`SUPPLIERS`] for CMI as terminal lessor.
pub const CMI_SUPPLIER_THIRD_PARTY: &str = "4411CMI";

pub const CHART: [Account; 5] = [
    CMI_COMMISSIONS,
    VAT_RECOVERABLE,
    CMI_SETTLEMENT,
    POS_RENTAL_EXPENSE,
    SUPPLIERS,
];
