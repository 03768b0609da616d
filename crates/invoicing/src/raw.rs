//! Untrusted AI output and its normalization into [`InvoiceRecord`].
//!
//! The extraction service is asked for numbers but may omit fields, return
//! `null`, or hand back amounts as strings ("1 234,50"). Nothing here fails:
//! a malformed field degrades to its default (`0` for amounts, empty text).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use cmi_core::Amount;

use crate::record::InvoiceRecord;

/// Raw field set for one invoice, as returned by the extraction service.
///
/// Every field is kept as an untyped JSON value and defaults to `null` when
/// absent; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInvoice {
    #[serde(rename = "factureReference")]
    pub facture_reference: JsonValue,
    pub date: JsonValue,
    #[serde(rename = "totalRemise")]
    pub total_remise: JsonValue,
    #[serde(rename = "totalCommissionsHT")]
    pub total_commissions_ht: JsonValue,
    #[serde(rename = "totalTVASurCommissions")]
    pub total_tva_sur_commissions: JsonValue,
    #[serde(rename = "soldeNetRemise")]
    pub solde_net_remise: JsonValue,
    #[serde(rename = "locationTPE")]
    pub location_tpe: JsonValue,
}

impl RawInvoice {
    /// Interpret one element of the service's response array.
    ///
    /// Returns `None` when the element is not a JSON object.
    pub fn from_json(value: JsonValue) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Normalize a raw field set into a canonical record attributed to `source_file`.
pub fn normalize(raw: &RawInvoice, source_file: &str) -> InvoiceRecord {
    InvoiceRecord {
        reference: text_field(&raw.facture_reference),
        date: text_field(&raw.date),
        total_remise: amount_field("totalRemise", &raw.total_remise),
        total_commissions_ht: amount_field("totalCommissionsHT", &raw.total_commissions_ht),
        total_vat_on_commissions: amount_field(
            "totalTVASurCommissions",
            &raw.total_tva_sur_commissions,
        ),
        net_balance_after_remise: amount_field("soldeNetRemise", &raw.solde_net_remise),
        pos_rental_fee: amount_field("locationTPE", &raw.location_tpe),
        source_file: source_file.to_string(),
    }
}

fn text_field(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn amount_field(field: &'static str, value: &JsonValue) -> Amount {
    let number = match value {
        JsonValue::Null => return Amount::ZERO,
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_loose_number(s),
        _ => None,
    };

    let Some(number) = number else {
        tracing::debug!(field, raw = %value, "non-numeric amount defaulted to 0");
        return Amount::ZERO;
    };

    match Amount::from_dh(number) {
        Ok(amount) if amount.is_negative() => {
            tracing::warn!(field, raw = %value, "negative amount defaulted to 0");
            Amount::ZERO
        }
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(field, raw = %value, error = %e, "unrepresentable amount defaulted to 0");
            Amount::ZERO
        }
    }
}

/// Parse amounts written the way statements print them.
///
/// Accepts space / NBSP thousands separators, either `.` or `,` as decimal
/// separator (the last one present wins when both appear) and a trailing
/// `DH` currency marker.
fn parse_loose_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_suffix("DH")
        .or_else(|| trimmed.strip_suffix("dh"))
        .unwrap_or(trimmed);

    let compact: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        _ => compact,
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}
