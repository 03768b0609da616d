use serde::{Deserialize, Serialize};

use cmi_core::{Amount, ValueObject};

/// One invoice (or summary period) extracted from a CMI statement.
///
/// Records live only in the in-memory session; they have no identity beyond
/// their position in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice reference or period name, as printed on the statement.
    pub reference: String,
    /// Free-form date text as produced by extraction (never parsed).
    pub date: String,
    pub total_remise: Amount,
    pub total_commissions_ht: Amount,
    pub total_vat_on_commissions: Amount,
    /// "Solde net remise".
    pub net_balance_after_remise: Amount,
    /// "Location TPE"; zero when the statement has no terminal rental line.
    pub pos_rental_fee: Amount,
    /// Name of the document the record was extracted from (provenance only).
    pub source_file: String,
}

impl ValueObject for InvoiceRecord {}

impl InvoiceRecord {
    pub fn has_pos_rental(&self) -> bool {
        self.pos_rental_fee.is_positive()
    }
}
