use serde::Serialize;

use cmi_core::Amount;
use cmi_invoicing::InvoiceRecord;

use crate::dashboard::{DashboardRow, dashboard_rows};
use crate::posting::{MANDATORY_POSTINGS, POS_RENTAL_POSTINGS, PostingRule};

/// Column headers of the accounting sheet, in order.
pub const JOURNAL_HEADERS: [&str; 6] = [
    "DATE",
    "COMPTE GENERALE",
    "COMPTE TIER",
    "LIBELLE",
    "DEBIT",
    "CREDIT",
];

/// One journal row (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub date: String,
    pub general_account: String,
    /// Empty unless the row posts to a third-party sub-account.
    pub third_party_account: String,
    pub label: String,
    pub debit: Amount,
    pub credit: Amount,
}

impl JournalEntry {
    fn post(rule: &PostingRule, record: &InvoiceRecord) -> Self {
        let (debit, credit) = rule.amounts(record);
        Self {
            date: record.date.clone(),
            general_account: rule.general_account.code.to_string(),
            third_party_account: rule.third_party_account.unwrap_or_default().to_string(),
            label: rule.label(&record.reference),
            debit,
            credit,
        }
    }
}

/// Journal rows for one invoice, in posting-table order.
///
/// The four mandatory rows are always emitted; the two terminal rental rows
/// only when `pos_rental_fee > 0`.
pub fn invoice_entries(record: &InvoiceRecord) -> Vec<JournalEntry> {
    let pos_rules: &[PostingRule] = if record.has_pos_rental() {
        &POS_RENTAL_POSTINGS
    } else {
        &[]
    };

    MANDATORY_POSTINGS
        .iter()
        .chain(pos_rules)
        .map(|rule| JournalEntry::post(rule, record))
        .collect()
}

/// Journal rows for a whole collection, preserving collection order.
pub fn derive_journal(records: &[InvoiceRecord]) -> Vec<JournalEntry> {
    records.iter().flat_map(invoice_entries).collect()
}

/// Both export views derived from one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedLedger {
    pub dashboard: Vec<DashboardRow>,
    pub journal: Vec<JournalEntry>,
}

pub fn derive(records: &[InvoiceRecord]) -> DerivedLedger {
    DerivedLedger {
        dashboard: dashboard_rows(records),
        journal: derive_journal(records),
    }
}

/// Debit/credit totals of an invoice's mandatory rows.
///
/// Derivation never corrects source data; this only reports whether the
/// statement figures were internally consistent
/// (`commissions + VAT + net == remise`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceBalance {
    pub debit: Amount,
    pub credit: Amount,
}

impl InvoiceBalance {
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Debit minus credit.
    pub fn difference(&self) -> Amount {
        self.debit.saturating_sub(self.credit)
    }
}

pub fn invoice_balance(record: &InvoiceRecord) -> InvoiceBalance {
    MANDATORY_POSTINGS.iter().fold(
        InvoiceBalance {
            debit: Amount::ZERO,
            credit: Amount::ZERO,
        },
        |acc, rule| {
            let (debit, credit) = rule.amounts(record);
            InvoiceBalance {
                debit: acc.debit + debit,
                credit: acc.credit + credit,
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::LABEL_SEPARATOR;
    use proptest::prelude::*;

    fn dh(units: i64) -> Amount {
        Amount::from_dh_units(units)
    }

    fn record(reference: &str, amounts: [i64; 5]) -> InvoiceRecord {
        InvoiceRecord {
            reference: reference.to_string(),
            date: "2024-01-01".to_string(),
            total_remise: Amount::from_centimes(amounts[0]),
            total_commissions_ht: Amount::from_centimes(amounts[1]),
            total_vat_on_commissions: Amount::from_centimes(amounts[2]),
            net_balance_after_remise: Amount::from_centimes(amounts[3]),
            pos_rental_fee: Amount::from_centimes(amounts[4]),
            source_file: "releve.pdf".to_string(),
        }
    }

    fn f001() -> InvoiceRecord {
        record("F-001", [10_000, 2_000, 400, 7_600, 1_500])
    }

    #[test]
    fn f001_produces_six_rows_in_table_order() {
        let rows = invoice_entries(&f001());
        assert_eq!(rows.len(), 6);

        let expected = [
            ("61473001", "", "COMMISSIONS HT - F-001", dh(20), Amount::ZERO),
            ("34552010", "", "TVA SUR COMMISSIONS - F-001", dh(4), Amount::ZERO),
            ("34210000", "", "SOLDE NET - F-001", dh(76), Amount::ZERO),
            ("34210000", "", "TOTAL REMISE - F-001", Amount::ZERO, dh(100)),
            ("61315000", "", "LOCATION TPE - F-001", dh(15), Amount::ZERO),
            ("44110000", "4411CMI", "LOCATION TPE - F-001", Amount::ZERO, dh(15)),
        ];

        for (row, (general, third, label, debit, credit)) in rows.iter().zip(expected) {
            assert_eq!(row.date, "2024-01-01");
            assert_eq!(row.general_account, general);
            assert_eq!(row.third_party_account, third);
            assert_eq!(row.label, label);
            assert_eq!(row.debit, debit);
            assert_eq!(row.credit, credit);
        }
    }

    #[test]
    fn zero_rental_fee_emits_mandatory_rows_only() {
        let rows = invoice_entries(&record("F-002", [10_000, 2_000, 400, 7_600, 0]));
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.third_party_account.is_empty()));
    }

    #[test]
    fn journal_preserves_collection_order() {
        let records = vec![
            record("A", [100, 20, 4, 76, 0]),
            f001(),
            record("C", [100, 20, 4, 76, 0]),
        ];
        let journal = derive_journal(&records);
        assert_eq!(journal.len(), 4 + 6 + 4);

        let refs: Vec<&str> = journal
            .iter()
            .map(|r| r.label.rsplit(LABEL_SEPARATOR).next().unwrap_or_default())
            .collect();
        assert_eq!(&refs[0..4], ["A"; 4]);
        assert_eq!(&refs[4..10], ["F-001"; 6]);
        assert_eq!(&refs[10..14], ["C"; 4]);
    }

    #[test]
    fn empty_collection_derives_empty_views() {
        let derived = derive(&[]);
        assert!(derived.dashboard.is_empty());
        assert!(derived.journal.is_empty());
    }

    #[test]
    fn inconsistent_statement_is_passed_through_but_reported() {
        let rec = record("BAD", [10_000, 2_000, 400, 7_000, 0]);
        let rows = invoice_entries(&rec);
        assert_eq!(rows[2].debit, dh(70));

        let balance = invoice_balance(&rec);
        assert!(!balance.is_balanced());
        assert_eq!(balance.difference(), dh(-6));
        assert!(invoice_balance(&f001()).is_balanced());
    }

    fn amounts() -> impl Strategy<Value = [i64; 5]> {
        prop::array::uniform5(0i64..1_000_000_000i64)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: 4 rows without a rental fee, 6 with one.
        #[test]
        fn row_count_depends_on_rental_fee(a in amounts()) {
            let rows = invoice_entries(&record("R", a));
            let expected = if a[4] > 0 { 6 } else { 4 };
            prop_assert_eq!(rows.len(), expected);
        }

        /// Property: mandatory debits sum to commissions + VAT + net,
        /// mandatory credits sum to total remise.
        #[test]
        fn mandatory_rows_sum_to_source_fields(a in amounts()) {
            let rec = record("R", a);
            let rows = invoice_entries(&rec);

            let debit: i64 = rows[..4].iter().map(|r| r.debit.centimes()).sum();
            let credit: i64 = rows[..4].iter().map(|r| r.credit.centimes()).sum();
            prop_assert_eq!(debit, a[1] + a[2] + a[3]);
            prop_assert_eq!(credit, a[0]);

            let balance = invoice_balance(&rec);
            prop_assert_eq!(balance.debit.centimes(), debit);
            prop_assert_eq!(balance.credit.centimes(), credit);
        }

        /// Property: rental rows always balance against each other.
        #[test]
        fn rental_rows_balance(a in amounts()) {
            let rows = invoice_entries(&record("R", a));
            let debit: i64 = rows[4..].iter().map(|r| r.debit.centimes()).sum();
            let credit: i64 = rows[4..].iter().map(|r| r.credit.centimes()).sum();
            prop_assert_eq!(debit, credit);
        }

        /// Property: no row carries both a debit and a credit.
        #[test]
        fn rows_are_single_sided(
            batch in prop::collection::vec(amounts(), 0..10)
        ) {
            let records: Vec<InvoiceRecord> =
                batch.iter().map(|a| record("R", *a)).collect();
            for row in derive_journal(&records) {
                prop_assert!(row.debit.is_zero() || row.credit.is_zero());
            }
        }
    }
}
