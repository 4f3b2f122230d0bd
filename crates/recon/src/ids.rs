//! ID credential cards: `{"ids": [...]}` in a side document next to the
//! datasets. Cards are never reconciled with occupations; every field is
//! optional and read defensively.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::dataset::{array, lookup, number_text};
use crate::wages::is_truthy;

/// Default file name of the ID document.
pub const IDS_FILE: &str = "ids.json";

static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Student,
    Driver,
    Passport,
    Business,
    Other,
}

impl CardKind {
    /// Classify by a substring of the card type (or name), case-insensitively.
    pub fn classify(card_type: &str) -> Self {
        let t = card_type.to_lowercase();
        if t.contains("student") {
            Self::Student
        } else if t.contains("driver") {
            Self::Driver
        } else if t.contains("passport") {
            Self::Passport
        } else if t.contains("business") {
            Self::Business
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Driver => "driver",
            Self::Passport => "passport",
            Self::Business => "business",
            Self::Other => "other",
        }
    }
}

/// One raw card record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IdCard(Map<String, Value>);

/// Cards of an ID document. A missing or non-array `ids` member, or a
/// document that is not an object, yields no cards; non-object entries
/// are skipped.
pub fn parse_ids(doc: &Value) -> Vec<IdCard> {
    lookup(doc, "ids")
        .map(array)
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_object)
        .map(|m| IdCard(m.clone()))
        .collect()
}

/// The card whose `id_id`, rendered as text, equals `id`.
pub fn find_card<'a>(cards: &'a [IdCard], id: &str) -> Option<&'a IdCard> {
    cards.iter().find(|c| c.id() == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdSummary {
    pub id: String,
    pub name: String,
    /// "ACTIVE", else the raw status, else "STATUS".
    pub status: String,
    pub active: bool,
    pub kind: CardKind,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdDetail {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub status: String,
    pub active: bool,
    pub kind: CardKind,
    pub holder: String,
    pub card_type: String,
    pub campus: String,
    pub issued_on: String,
    pub issued_by: String,
    /// Every `details` member, in document order.
    pub details: Vec<DetailRow>,
}

impl IdCard {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| lookup(value, key))
    }

    /// Text of the first truthy value among `paths`, else empty.
    fn first_text(&self, paths: &[&[&str]]) -> String {
        paths
            .iter()
            .filter_map(|p| self.at(p))
            .find(|v| is_truthy(v))
            .map(value_text)
            .unwrap_or_default()
    }

    pub fn id(&self) -> String {
        self.at(&["id_id"]).map(value_text).unwrap_or_default()
    }

    pub fn name(&self) -> String {
        let name = self.first_text(&[&["id_name"], &["card_type"]]);
        if name.is_empty() {
            "ID".to_string()
        } else {
            name
        }
    }

    pub fn is_active(&self) -> bool {
        self.first_text(&[&["status"]]).to_lowercase() == "active"
    }

    fn status_label(&self) -> String {
        if self.is_active() {
            return "ACTIVE".to_string();
        }
        let status = self.first_text(&[&["status"]]);
        if status.is_empty() {
            "STATUS".to_string()
        } else {
            status
        }
    }

    pub fn kind(&self) -> CardKind {
        CardKind::classify(&self.first_text(&[&["card_type"], &["id_name"]]))
    }

    /// Issuing organization, else institution, jurisdiction or campus.
    pub fn subtitle(&self) -> String {
        self.first_text(&[
            &["issuer", "organization"],
            &["details", "institution"],
            &["issuer", "jurisdiction"],
            &["issuer", "campus"],
        ])
    }

    pub fn summary(&self) -> IdSummary {
        IdSummary {
            id: self.id(),
            name: self.name(),
            status: self.status_label(),
            active: self.is_active(),
            kind: self.kind(),
            subtitle: self.subtitle(),
        }
    }

    pub fn detail(&self) -> IdDetail {
        let details = self
            .at(&["details"])
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(k, v)| DetailRow { label: labelize_key(k), value: value_text(v) })
                    .collect()
            })
            .unwrap_or_default();

        IdDetail {
            id: self.id(),
            title: self.name(),
            subtitle: self.subtitle(),
            status: self.status_label(),
            active: self.is_active(),
            kind: self.kind(),
            holder: self.first_text(&[&["holder", "full_name"]]),
            card_type: self.first_text(&[&["card_type"]]),
            campus: self.first_text(&[
                &["issuer", "campus"],
                &["details", "campus"],
                &["details", "institution"],
            ]),
            issued_on: self.at(&["issued_on"]).map(format_date).unwrap_or_default(),
            issued_by: self.first_text(&[&["issuer", "organization"]]),
            details,
        }
    }
}

/// `program_of_study` → `Program Of Study`.
pub fn labelize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// A date as `Aug 15, 2024`. Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD`, or epoch milliseconds. Falsy values give an empty string;
/// anything unparseable is returned as text.
pub fn format_date(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    let date = match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|d| d.date_naive()),
        _ => None,
    };
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => value_text(value),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.date_naive())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(|d| d.date())
                .ok()
        })
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Display text of any value. Arrays join with commas, objects print as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student() -> IdCard {
        let doc = json!({"ids": [{
            "id_id": "stu-001",
            "id_name": "Student ID",
            "card_type": "Student Card",
            "status": "Active",
            "holder": {"full_name": "Ada Park"},
            "issued_on": "2024-08-15",
            "issuer": {"organization": "Lakeside University", "campus": "North"},
            "details": {"student_number": "S123456", "year": 2, "expires": null}
        }]});
        parse_ids(&doc).remove(0)
    }

    #[test]
    fn missing_or_malformed_ids_read_empty() {
        assert!(parse_ids(&json!({})).is_empty());
        assert!(parse_ids(&json!({"ids": {"a": 1}})).is_empty());
        assert!(parse_ids(&json!({"ids": null})).is_empty());
        assert!(parse_ids(&json!([{"id_id": 1}])).is_empty());
        assert_eq!(parse_ids(&json!({"ids": ["junk", {"id_id": 1}, 3]})).len(), 1);
    }

    #[test]
    fn summary_fields() {
        let s = student().summary();
        assert_eq!(s.id, "stu-001");
        assert_eq!(s.name, "Student ID");
        assert_eq!(s.status, "ACTIVE");
        assert!(s.active);
        assert_eq!(s.kind, CardKind::Student);
        assert_eq!(s.subtitle, "Lakeside University");
    }

    #[test]
    fn fallbacks_for_sparse_cards() {
        let cards = parse_ids(&json!({"ids": [
            {"id_id": 42, "card_type": "Driver License", "status": "expired", "issuer": {"jurisdiction": "WA"}},
            {"status": ""}
        ]}));
        let driver = cards[0].summary();
        assert_eq!(driver.id, "42");
        assert_eq!(driver.name, "Driver License");
        assert_eq!(driver.status, "expired");
        assert_eq!(driver.kind, CardKind::Driver);
        assert_eq!(driver.subtitle, "WA");

        let bare = cards[1].summary();
        assert_eq!(bare.id, "");
        assert_eq!(bare.name, "ID");
        assert_eq!(bare.status, "STATUS");
        assert_eq!(bare.kind, CardKind::Other);
        assert_eq!(bare.subtitle, "");
    }

    #[test]
    fn detail_rows_keep_document_order() {
        let d = student().detail();
        assert_eq!(d.holder, "Ada Park");
        assert_eq!(d.campus, "North");
        assert_eq!(d.issued_by, "Lakeside University");
        assert_eq!(d.issued_on, "Aug 15, 2024");
        let rows: Vec<_> = d.details.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect();
        assert_eq!(rows, vec![("Student Number", "S123456"), ("Year", "2"), ("Expires", "")]);
    }

    #[test]
    fn find_matches_rendered_id() {
        let cards = parse_ids(&json!({"ids": [{"id_id": 7}, {"id_id": "x"}]}));
        assert!(find_card(&cards, "7").is_some());
        assert!(find_card(&cards, "x").is_some());
        assert!(find_card(&cards, "8").is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(labelize_key("program_of_study"), "Program Of Study");
        assert_eq!(labelize_key("gpa"), "Gpa");
        assert_eq!(labelize_key("ID"), "ID");
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(&json!("2024-08-15")), "Aug 15, 2024");
        assert_eq!(format_date(&json!("2023-01-05T10:30:00Z")), "Jan 5, 2023");
        assert_eq!(format_date(&json!("2023-01-05T10:30:00")), "Jan 5, 2023");
        assert_eq!(format_date(&json!(0)), "");
        assert_eq!(format_date(&json!(86_400_000)), "Jan 2, 1970");
        assert_eq!(format_date(&json!(null)), "");
        assert_eq!(format_date(&json!("someday")), "someday");
    }
}
