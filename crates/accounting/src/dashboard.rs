use serde::Serialize;

use cmi_core::Amount;
use cmi_invoicing::InvoiceRecord;

/// Column headers of the extraction sheet, in order.
pub const DASHBOARD_HEADERS: [&str; 8] = [
    "Nom de la Facture",
    "Date",
    "Total Remise (DH)",
    "Total Commissions HT",
    "Total TVA Sur Commissions",
    "Solde Net Remise",
    "Location TPE (DH)",
    "Fichier Source",
];

/// Flat audit row: one per invoice, fields copied without computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    pub reference: String,
    pub date: String,
    pub total_remise: Amount,
    pub total_commissions_ht: Amount,
    pub total_vat_on_commissions: Amount,
    pub net_balance_after_remise: Amount,
    pub pos_rental_fee: Amount,
    pub source_file: String,
}

impl From<&InvoiceRecord> for DashboardRow {
    fn from(r: &InvoiceRecord) -> Self {
        Self {
            reference: r.reference.clone(),
            date: r.date.clone(),
            total_remise: r.total_remise,
            total_commissions_ht: r.total_commissions_ht,
            total_vat_on_commissions: r.total_vat_on_commissions,
            net_balance_after_remise: r.net_balance_after_remise,
            pos_rental_fee: r.pos_rental_fee,
            source_file: r.source_file.clone(),
        }
    }
}

impl DashboardRow {
    /// The five amounts in header order.
    pub fn amounts(&self) -> [Amount; 5] {
        [
            self.total_remise,
            self.total_commissions_ht,
            self.total_vat_on_commissions,
            self.net_balance_after_remise,
            self.pos_rental_fee,
        ]
    }
}

pub fn dashboard_rows(records: &[InvoiceRecord]) -> Vec<DashboardRow> {
    records.iter().map(DashboardRow::from).collect()
}
