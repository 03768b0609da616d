use serde::{Deserialize, Serialize};

use cmi_core::Amount;

use crate::record::InvoiceRecord;

/// Sums of the five monetary fields over a collection of records.
///
/// Always recomputed from the full collection; never maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub total_remise: Amount,
    pub total_commissions_ht: Amount,
    pub total_vat_on_commissions: Amount,
    pub net_balance_after_remise: Amount,
    pub pos_rental_fee: Amount,
}

impl AggregateTotals {
    pub fn compute(records: &[InvoiceRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            total_remise: acc.total_remise + r.total_remise,
            total_commissions_ht: acc.total_commissions_ht + r.total_commissions_ht,
            total_vat_on_commissions: acc.total_vat_on_commissions + r.total_vat_on_commissions,
            net_balance_after_remise: acc.net_balance_after_remise + r.net_balance_after_remise,
            pos_rental_fee: acc.pos_rental_fee + r.pos_rental_fee,
        })
    }
}
