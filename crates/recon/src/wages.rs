use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::dataset::{array, entries, number_text};
use crate::normalize::normalize_title;

/// Fields that make a wage record usable as a summary.
pub const SUMMARY_FIELDS: [&str; 4] = ["A_MEAN", "H_MEAN", "A_MEDIAN", "H_MEDIAN"];

pub const ANNUAL_MEAN: &str = "A_MEAN";
pub const HOURLY_MEAN: &str = "H_MEAN";

/// One raw wage record. Field names and value types are whatever the
/// wages dataset carries; nothing is validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WageRecord(Map<String, Value>);

impl WageRecord {
    /// Only JSON objects are records.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|m| Self(m.clone()))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Display text of a field: strings verbatim, numbers rendered, else empty.
    pub fn text(&self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => number_text(n),
            _ => String::new(),
        }
    }

    /// True if any summary field holds a truthy value.
    pub fn has_wage_figure(&self) -> bool {
        SUMMARY_FIELDS
            .iter()
            .any(|f| self.get(f).is_some_and(is_truthy))
    }
}

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Choose the representative record: the first with a truthy summary
/// field, else the first record, else none. Scan order only; values are
/// never compared.
pub fn pick_summary(records: &[WageRecord]) -> Option<&WageRecord> {
    records
        .iter()
        .find(|r| r.has_wage_figure())
        .or_else(|| records.first())
}

/// Normalized title → every wage record filed under any spelling of it.
#[derive(Debug, Default, Clone)]
pub struct WageIndex {
    by_title: HashMap<String, Vec<WageRecord>>,
}

impl WageIndex {
    /// Build from the wages dataset in one pass. Records of spellings that
    /// normalize alike are concatenated, not deduplicated.
    pub fn build(wages: &Value) -> Self {
        let mut by_title: HashMap<String, Vec<WageRecord>> = HashMap::new();
        for (raw_title, records) in entries(wages) {
            let recs = array(records).iter().filter_map(WageRecord::from_value);
            by_title
                .entry(normalize_title(raw_title))
                .or_default()
                .extend(recs);
        }
        Self { by_title }
    }

    pub fn records(&self, normalized: &str) -> &[WageRecord] {
        self.by_title.get(normalized).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

/// Format a wage figure as US dollars (`$70,000.00`).
///
/// Blank input gives an empty string; text that is not a finite number is
/// returned trimmed but otherwise untouched. Rounding (half up, to cents)
/// and grouping work on the decimal digits, so no magnitude is clamped.
pub fn format_usd(value: &str) -> String {
    let s = value.trim();
    if s.is_empty() {
        return String::new();
    }
    let n = match s.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return s.to_string(),
    };

    // f64 Display is the shortest round-trip form and never uses an exponent.
    let shortest = n.abs().to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((&shortest, ""));
    let mut cents: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(2))
        .collect();
    if frac_part.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        round_up(&mut cents);
    }

    let (whole, frac) = cents.split_at(cents.len() - 2);
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, &d) in whole.iter().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(d));
    }
    let is_zero = cents.iter().all(|&d| d == b'0');
    let sign = if n < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}${grouped}.{}{}", char::from(frac[0]), char::from(frac[1]))
}

/// Add one to the last place of a run of ASCII digits.
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
