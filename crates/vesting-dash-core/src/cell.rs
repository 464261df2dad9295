//! Cell model for the transaction history table.
//!
//! A [`Row`] is an ordered mapping from column key to [`CellValue`]. Tagging
//! happens when the row is built, so rendering never has to guess what a
//! value is from its shape.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::domain::{
    is_structural_key, CancelTarget, StatusKind, TxStatus, ACTIONS_KEY, STATUS_KEY, TX_HASH_KEY,
    TX_INDEX_KEY,
};

pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Primitive cell content with a fixed formatting rule.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

/// Caller-supplied formatter for a [`CellValue::Rendered`] cell.
#[derive(Clone)]
pub struct Renderer(Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>);

impl Renderer {
    pub fn new(f: impl Fn(&Value, &Row) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn render(&self, value: &Value, row: &Row) -> String {
        (self.0)(value, row)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Renderer(..)")
    }
}

#[derive(Debug, Clone)]
pub enum CellValue {
    Plain(PlainValue),
    Rendered {
        value: Value,
        renderer: Option<Renderer>,
    },
    Status(StatusKind),
    ActionsRef {
        transaction_link: String,
    },
}

impl CellValue {
    pub fn rendered(value: Value, renderer: Renderer) -> Self {
        Self::Rendered {
            value,
            renderer: Some(renderer),
        }
    }

    pub fn actions(transaction_link: impl Into<String>) -> Self {
        Self::ActionsRef {
            transaction_link: transaction_link.into(),
        }
    }

    pub fn status_label(label: &str) -> Self {
        Self::Status(StatusKind::from_label(label))
    }

    /// Unformatted text, used for structural keys such as `txHash`.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Self::Plain(PlainValue::Text(s)) => Some(s.clone()),
            Self::Plain(PlainValue::Integer(n)) => Some(n.to_string()),
            Self::Plain(PlainValue::Decimal(x)) => Some(x.to_string()),
            Self::Plain(PlainValue::Bool(b)) => Some(b.to_string()),
            Self::Plain(PlainValue::Date(d)) => Some(d.format(DATE_FORMAT).to_string()),
            Self::Plain(PlainValue::Null) => None,
            Self::Rendered { value, .. } => json_literal(value),
            Self::Status(kind) => Some(match kind {
                StatusKind::Known(status) => status.label().to_owned(),
                StatusKind::Unrecognized(raw) => raw.clone(),
            }),
            Self::ActionsRef { transaction_link } => Some(transaction_link.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Plain(PlainValue::Text(value.to_owned()))
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Plain(PlainValue::Text(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Plain(PlainValue::Integer(value))
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Plain(PlainValue::Integer(i64::from(value)))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Plain(PlainValue::Decimal(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Plain(PlainValue::Bool(value))
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Plain(PlainValue::Date(value))
    }
}

impl From<TxStatus> for CellValue {
    fn from(value: TxStatus) -> Self {
        Self::Status(StatusKind::Known(value))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Replaces the value in place when the key already exists, keeping column order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn status(&self) -> Option<&StatusKind> {
        match self.get(STATUS_KEY) {
            Some(CellValue::Status(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn cancel_target(&self) -> Option<CancelTarget> {
        let tx_hash = self.get(TX_HASH_KEY)?.literal_text()?;
        let tx_index = self.get(TX_INDEX_KEY)?.literal_text()?;
        if tx_hash.is_empty() {
            return None;
        }
        Some(CancelTarget { tx_hash, tx_index })
    }

    /// Builds a row from one object of the row source. Object key order is
    /// the column order.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let cells = object
            .iter()
            .map(|(key, value)| (key.clone(), classify(key, value)))
            .collect();
        Self { cells }
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_json_object)
    }
}

fn classify(key: &str, value: &Value) -> CellValue {
    match key {
        STATUS_KEY => match value {
            Value::String(label) => CellValue::status_label(label),
            other => CellValue::Status(StatusKind::Unrecognized(other.to_string())),
        },
        ACTIONS_KEY => match value.get("transactionLink").and_then(Value::as_str) {
            Some(link) => CellValue::actions(link),
            None => CellValue::Plain(PlainValue::Null),
        },
        _ if is_structural_key(key) => plain_from_json(value),
        _ => match value {
            Value::Object(map) if map.contains_key("render") => CellValue::Rendered {
                value: map.get("value").cloned().unwrap_or(Value::Null),
                renderer: None,
            },
            other => plain_from_json(other),
        },
    }
}

fn plain_from_json(value: &Value) -> CellValue {
    let plain = match value {
        Value::String(s) => PlainValue::Text(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => PlainValue::Integer(i),
            None => PlainValue::Decimal(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::Bool(b) => PlainValue::Bool(*b),
        Value::Null => PlainValue::Null,
        other => PlainValue::Text(other.to_string()),
    };
    CellValue::Plain(plain)
}

fn json_literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Neutral,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeIcon {
    Check,
    Clock,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub status: TxStatus,
    pub label: &'static str,
    pub tone: BadgeTone,
    pub icon: BadgeIcon,
}

impl StatusBadge {
    pub fn for_status(status: TxStatus) -> Self {
        let (tone, icon) = match status {
            TxStatus::Executed => (BadgeTone::Success, BadgeIcon::Check),
            TxStatus::Pending => (BadgeTone::Neutral, BadgeIcon::Clock),
            TxStatus::Cancelled => (BadgeTone::Error, BadgeIcon::Cross),
        };
        Self {
            status,
            label: status.label(),
            tone,
            icon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Text,
    Badge,
    Actions,
}

/// What the table shows for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellDisplay {
    Text(String),
    Badge(StatusBadge),
    Actions { transaction_link: String },
    Empty,
    Placeholder(PlaceholderKind),
}

/// Deterministic, side-effect free rendering of `row[key]`.
///
/// Missing keys and null plain values render empty. Status labels outside
/// the known set also render empty rather than as a default badge.
pub fn render_cell(row: &Row, key: &str) -> CellDisplay {
    match row.get(key) {
        None => CellDisplay::Empty,
        Some(CellValue::Plain(PlainValue::Null)) => CellDisplay::Empty,
        Some(CellValue::Plain(plain)) => CellDisplay::Text(format_plain(plain)),
        Some(CellValue::Rendered {
            value,
            renderer: Some(renderer),
        }) => CellDisplay::Text(renderer.render(value, row)),
        Some(CellValue::Rendered {
            value,
            renderer: None,
        }) => json_literal(value)
            .map(CellDisplay::Text)
            .unwrap_or(CellDisplay::Empty),
        Some(CellValue::Status(StatusKind::Known(status))) => {
            CellDisplay::Badge(StatusBadge::for_status(*status))
        }
        Some(CellValue::Status(StatusKind::Unrecognized(_))) => CellDisplay::Empty,
        Some(CellValue::ActionsRef { transaction_link }) => CellDisplay::Actions {
            transaction_link: transaction_link.clone(),
        },
    }
}

pub fn placeholder_for(row: &Row, key: &str) -> PlaceholderKind {
    match row.get(key) {
        Some(CellValue::Status(_)) => PlaceholderKind::Badge,
        Some(CellValue::ActionsRef { .. }) => PlaceholderKind::Actions,
        _ if key == STATUS_KEY => PlaceholderKind::Badge,
        _ if key == ACTIONS_KEY => PlaceholderKind::Actions,
        _ => PlaceholderKind::Text,
    }
}

pub fn format_plain(value: &PlainValue) -> String {
    match value {
        PlainValue::Text(s) => s.clone(),
        PlainValue::Integer(n) => format_grouped_integer(*n),
        PlainValue::Decimal(x) => format_grouped_decimal(*x),
        PlainValue::Bool(b) => b.to_string(),
        PlainValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        PlainValue::Null => String::new(),
    }
}

pub fn format_grouped_integer(n: i64) -> String {
    let digits = group_digits(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Grouped digits with at most three fraction digits, trailing zeros trimmed.
pub fn format_grouped_decimal(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_owned();
    }
    let fixed = format!("{:.3}", x.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let mut out = String::new();
    if x < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `txAmount` -> `Tx Amount`.
pub fn column_title(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
