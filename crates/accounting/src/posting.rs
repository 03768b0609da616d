//! Posting table: which account, side and label each invoice amount lands on.
//!
//! Row order in these tables is the order rows appear in the exported
//! journal.

use serde::Serialize;

use cmi_core::Amount;
use cmi_invoicing::InvoiceRecord;

use crate::chart::{self, Account};

pub const LABEL_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

/// Monetary field of an [`InvoiceRecord`] a posting draws its amount from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    CommissionsHt,
    VatOnCommissions,
    NetBalanceAfterRemise,
    TotalRemise,
    PosRentalFee,
}

impl InvoiceField {
    pub fn amount(self, record: &InvoiceRecord) -> Amount {
        match self {
            InvoiceField::CommissionsHt => record.total_commissions_ht,
            InvoiceField::VatOnCommissions => record.total_vat_on_commissions,
            InvoiceField::NetBalanceAfterRemise => record.net_balance_after_remise,
            InvoiceField::TotalRemise => record.total_remise,
            InvoiceField::PosRentalFee => record.pos_rental_fee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostingRule {
    pub general_account: Account,
    pub third_party_account: Option<&'static str>,
    pub label_prefix: &'static str,
    pub side: Side,
    pub source: InvoiceField,
}

impl PostingRule {
    pub fn label(&self, reference: &str) -> String {
        format!("{}{LABEL_SEPARATOR}{reference}", self.label_prefix)
    }

    /// (debit, credit) for this rule applied to `record`.
    pub fn amounts(&self, record: &InvoiceRecord) -> (Amount, Amount) {
        let amount = self.source.amount(record);
        match self.side {
            Side::Debit => (amount, Amount::ZERO),
            Side::Credit => (Amount::ZERO, amount),
        }
    }
}

/// Rows emitted for every invoice.
pub static MANDATORY_POSTINGS: [PostingRule; 4] = [
    PostingRule {
        general_account: chart::CMI_COMMISSIONS,
        third_party_account: None,
        label_prefix: "COMMISSIONS HT",
        side: Side::Debit,
        source: InvoiceField::CommissionsHt,
    },
    PostingRule {
        general_account: chart::VAT_RECOVERABLE,
        third_party_account: None,
        label_prefix: "TVA SUR COMMISSIONS",
        side: Side::Debit,
        source: InvoiceField::VatOnCommissions,
    },
    PostingRule {
        general_account: chart::CMI_SETTLEMENT,
        third_party_account: None,
        label_prefix: "SOLDE NET",
        side: Side::Debit,
        source: InvoiceField::NetBalanceAfterRemise,
    },
    PostingRule {
        general_account: chart::CMI_SETTLEMENT,
        third_party_account: None,
        label_prefix: "TOTAL REMISE",
        side: Side::Credit,
        source: InvoiceField::TotalRemise,
    },
];

/// Rows emitted only when the invoice carries a terminal rental fee.
pub static POS_RENTAL_POSTINGS: [PostingRule; 2] = [
    PostingRule {
        general_account: chart::POS_RENTAL_EXPENSE,
        third_party_account: None,
        label_prefix: "LOCATION TPE",
        side: Side::Debit,
        source: InvoiceField::PosRentalFee,
    },
    PostingRule {
        general_account: chart::SUPPLIERS,
        third_party_account: Some(chart::CMI_SUPPLIER_THIRD_PARTY),
        label_prefix: "LOCATION TPE",
        side: Side::Credit,
        source: InvoiceField::PosRentalFee,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_rental_rules_mirror_each_other() {
        let [debit, credit] = &POS_RENTAL_POSTINGS;
        assert_eq!(debit.source, credit.source);
        assert_eq!(debit.side, Side::Debit);
        assert_eq!(credit.side, Side::Credit);
        assert_eq!(debit.label_prefix, credit.label_prefix);
    }

    #[test]
    fn label_joins_prefix_and_reference() {
        assert_eq!(MANDATORY_POSTINGS[1].label("F-001"), "TVA SUR COMMISSIONS - F-001");
    }

    #[test]
    fn every_rule_uses_a_charted_account() {
        for rule in MANDATORY_POSTINGS.iter().chain(POS_RENTAL_POSTINGS.iter()) {
            assert!(chart::CHART.contains(&rule.general_account));
        }
    }
}
