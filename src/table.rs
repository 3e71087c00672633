//! Sortable record table.
//!
//! Records are never reordered in place: `SortableTable::sorted` hands back a
//! freshly ordered view on every call, so the caller's slice stays in
//! insertion order.

use serde_json::{Map, Value};
use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub const EMPTY_MESSAGE: &str = "No student data available. Upload a CSV to get started.";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

static MISSING: CellValue = CellValue::Missing;

impl CellValue {
    /// String coercion used for comparison. `Missing` coerces to "undefined".
    pub fn coerce(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Missing => "undefined".to_string(),
        }
    }

    /// Text shown in a cell. Missing values render blank.
    pub fn display(&self) -> String {
        match self {
            CellValue::Missing => String::new(),
            other => other.coerce(),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Missing,
            Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Whole numbers print without a fractional part (85, not 85.0).
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One row: an ordered key/value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<CellValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<CellValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> &CellValue {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .unwrap_or(&MISSING)
    }

    pub fn from_json_object(obj: &Map<String, Value>) -> Self {
        let mut record = Record::new();
        for (key, value) in obj {
            record.set(key, CellValue::from_json(value));
        }
        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Blue,
    Amber,
    Rose,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeScheme {
    Status,
    Coverage,
    Priority,
    Bloom,
}

impl BadgeScheme {
    /// Case-insensitive lookup. Unknown categories get the default blue badge.
    pub fn tone(self, value: &str) -> BadgeTone {
        let v = value.trim().to_lowercase();
        let found = match self {
            BadgeScheme::Status => match v.as_str() {
                "excellent" => Some(BadgeTone::Green),
                "good" => Some(BadgeTone::Blue),
                "average" => Some(BadgeTone::Amber),
                "at-risk" | "poor" => Some(BadgeTone::Rose),
                _ => None,
            },
            BadgeScheme::Coverage => match v.as_str() {
                "high" => Some(BadgeTone::Green),
                "medium" => Some(BadgeTone::Amber),
                "low" => Some(BadgeTone::Rose),
                _ => None,
            },
            BadgeScheme::Priority => match v.as_str() {
                "critical" => Some(BadgeTone::Rose),
                "important" => Some(BadgeTone::Amber),
                _ => None,
            },
            BadgeScheme::Bloom => match v.as_str() {
                "remembering" | "creating" => Some(BadgeTone::Blue),
                "understanding" => Some(BadgeTone::Green),
                "applying" => Some(BadgeTone::Amber),
                "analyzing" => Some(BadgeTone::Purple),
                "evaluating" => Some(BadgeTone::Rose),
                _ => None,
            },
        };
        found.unwrap_or(BadgeTone::Blue)
    }

    fn for_key(key: &str) -> Option<Self> {
        match key {
            "status" => Some(BadgeScheme::Status),
            "coverage" => Some(BadgeScheme::Coverage),
            "priority" => Some(BadgeScheme::Priority),
            "bloom_level" => Some(BadgeScheme::Bloom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Plain,
    Badge(BadgeScheme),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// The renderer is picked here, once, from well-known keys.
    pub fn new(key: &str, label: &str) -> Self {
        let kind = BadgeScheme::for_key(key)
            .map(ColumnKind::Badge)
            .unwrap_or(ColumnKind::Plain);
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    pub fn badge(key: &str, label: &str, scheme: BadgeScheme) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ColumnKind::Badge(scheme),
        }
    }
}

pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("name", "Student Name"),
        ColumnSpec::new("score", "Score"),
        ColumnSpec::new("grade", "Grade"),
        ColumnSpec::new("status", "Status"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn toggle(&mut self, key: &str) {
        if self.field.as_deref() == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.field = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// Arrow for the header of `key`, only when it is the active sort column.
    pub fn indicator(&self, key: &str) -> Option<&'static str> {
        (self.field.as_deref() == Some(key)).then(|| self.direction.arrow())
    }
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accent_marks(s: &str) -> Vec<char> {
    s.nfd().filter(|c| is_combining_mark(*c)).collect()
}

/// Locale-style string ordering. Letters compare by their base form first
/// ("É" sits with "e"), then unaccented before accented, then lowercase
/// before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = base_letters(a).cmp(base_letters(b));
    if primary != Ordering::Equal {
        return primary;
    }
    let accents = accent_marks(a).cmp(&accent_marks(b));
    if accents != Ordering::Equal {
        return accents;
    }
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.len().cmp(&b.len())
}

pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => collate(&a.coerce(), &b.coerce()),
    }
}

#[derive(Debug, Clone)]
pub struct SortableTable {
    columns: Vec<ColumnSpec>,
    sort: SortState,
}

impl SortableTable {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        let columns = if columns.is_empty() {
            default_columns()
        } else {
            columns
        };
        Self {
            columns,
            sort: SortState::default(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn toggle_sort(&mut self, key: &str) {
        self.sort.toggle(key);
    }

    pub fn reset_sort(&mut self) {
        self.sort = SortState::default();
    }

    /// Derived display order. `sort_by` is stable, so ties keep insertion order.
    pub fn sorted<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut view: Vec<&Record> = records.iter().collect();
        if let Some(field) = &self.sort.field {
            view.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match self.sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        view
    }

    /// Plain-text rendering for the console.
    pub fn render_text(&self, records: &[Record]) -> String {
        if records.is_empty() {
            return format!("{EMPTY_MESSAGE}\n");
        }

        let headers: Vec<String> = self
            .columns
            .iter()
            .map(|c| match self.sort.indicator(&c.key) {
                Some(arrow) => format!("{} {arrow}", c.label),
                None => c.label.clone(),
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format!("{:<4}", "#"));
        for h in &headers {
            out.push_str(&format!(" | {:<18}", truncate_for_table(h, 18)));
        }
        out.push('\n');
        out.push_str(&"-".repeat(4 + headers.len() * 21));
        out.push('\n');

        for (idx, record) in self.sorted(records).into_iter().enumerate() {
            out.push_str(&format!("{:<4}", idx + 1));
            for col in &self.columns {
                let cell = record.get(&col.key).display();
                out.push_str(&format!(" | {:<18}", truncate_for_table(&cell, 18)));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for SortableTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

pub fn truncate_for_table(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_len.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Vec<Record> {
        vec![
            Record::new()
                .with("name", "Rahul Sharma")
                .with("score", 85i64)
                .with("status", "Excellent"),
            Record::new()
                .with("name", "amit Kumar")
                .with("score", 45i64)
                .with("status", "At-Risk"),
            Record::new()
                .with("name", "Divya Menon")
                .with("score", 67i64)
                .with("status", "Average"),
            Record::new()
                .with("name", "Ananya Desai")
                .with("score", 92i64)
                .with("status", "excellent"),
        ]
    }

    fn column<'a>(view: &[&'a Record], key: &str) -> Vec<String> {
        view.iter().map(|r| r.get(key).coerce()).collect()
    }

    #[test]
    fn unsorted_table_keeps_insertion_order() {
        let records = students();
        let table = SortableTable::default();
        let view = table.sorted(&records);
        assert_eq!(
            column(&view, "name"),
            vec!["Rahul Sharma", "amit Kumar", "Divya Menon", "Ananya Desai"]
        );
    }

    #[test]
    fn toggling_cycles_asc_desc_asc_and_never_unsorts() {
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        assert_eq!(table.sort_state().direction, SortDirection::Asc);
        table.toggle_sort("score");
        assert_eq!(table.sort_state().direction, SortDirection::Desc);
        table.toggle_sort("score");
        assert_eq!(table.sort_state().direction, SortDirection::Asc);
        assert_eq!(table.sort_state().field.as_deref(), Some("score"));
    }

    #[test]
    fn switching_column_resets_to_ascending() {
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        table.toggle_sort("score");
        table.toggle_sort("name");
        assert_eq!(table.sort_state().field.as_deref(), Some("name"));
        assert_eq!(table.sort_state().direction, SortDirection::Asc);
    }

    #[test]
    fn numeric_column_sorts_numerically_both_ways() {
        let records = students();
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        assert_eq!(column(&table.sorted(&records), "score"), vec!["45", "67", "85", "92"]);
        table.toggle_sort("score");
        assert_eq!(column(&table.sorted(&records), "score"), vec!["92", "85", "67", "45"]);
    }

    #[test]
    fn numbers_do_not_sort_lexicographically() {
        let records = vec![
            Record::new().with("score", 100i64),
            Record::new().with("score", 9i64),
        ];
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        assert_eq!(column(&table.sorted(&records), "score"), vec!["9", "100"]);
    }

    #[test]
    fn string_column_uses_case_insensitive_collation() {
        let records = students();
        let mut table = SortableTable::default();
        table.toggle_sort("name");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["amit Kumar", "Ananya Desai", "Divya Menon", "Rahul Sharma"]
        );
    }

    #[test]
    fn sorting_does_not_touch_the_source_slice() {
        let records = students();
        let before = records.clone();
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        let _ = table.sorted(&records);
        assert_eq!(records, before);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let records = vec![
            Record::new().with("grade", "A").with("name", "first"),
            Record::new().with("grade", "B").with("name", "second"),
            Record::new().with("grade", "A").with("name", "third"),
        ];
        let mut table = SortableTable::default();
        table.toggle_sort("grade");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["first", "third", "second"]
        );
        table.toggle_sort("grade");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["second", "first", "third"]
        );
    }

    #[test]
    fn missing_values_compare_as_undefined() {
        let records = vec![
            Record::new().with("name", "zoe"),
            Record::new(),
            Record::new().with("name", "adam"),
        ];
        let mut table = SortableTable::default();
        table.toggle_sort("name");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["adam", "undefined", "zoe"]
        );
        assert_eq!(records[1].get("name").display(), "");
    }

    #[test]
    fn collation_puts_lowercase_first_on_case_ties() {
        assert_eq!(collate("a", "B"), Ordering::Less);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("Abc", "abc"), Ordering::Greater);
        assert_eq!(collate("same", "same"), Ordering::Equal);
        assert_eq!(collate("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let records: Vec<Record> = ["Zoe", "Émile", "Eddie", "Fatima"]
            .into_iter()
            .map(|name| Record::new().with("name", name))
            .collect();
        let mut table = SortableTable::default();
        table.toggle_sort("name");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["Eddie", "Émile", "Fatima", "Zoe"]
        );
        table.toggle_sort("name");
        assert_eq!(
            column(&table.sorted(&records), "name"),
            vec!["Zoe", "Fatima", "Émile", "Eddie"]
        );
    }

    #[test]
    fn unaccented_sorts_before_accented_then_case_decides() {
        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        assert_eq!(collate("émile", "Émile"), Ordering::Less);
        assert_eq!(collate("Émile", "emile"), Ordering::Greater);
        assert_eq!(collate("Ångström", "angstrom"), Ordering::Greater);
    }

    #[test]
    fn empty_columns_fall_back_to_defaults() {
        let table = SortableTable::new(Vec::new());
        let keys: Vec<&str> = table.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "score", "grade", "status"]);
        assert_eq!(table.columns()[3].kind, ColumnKind::Badge(BadgeScheme::Status));
        assert_eq!(table.columns()[0].kind, ColumnKind::Plain);
    }

    #[test]
    fn status_badges_are_case_insensitive_with_blue_fallback() {
        assert_eq!(BadgeScheme::Status.tone("EXCELLENT"), BadgeTone::Green);
        assert_eq!(BadgeScheme::Status.tone("At-Risk"), BadgeTone::Rose);
        assert_eq!(BadgeScheme::Status.tone("poor"), BadgeTone::Rose);
        assert_eq!(BadgeScheme::Status.tone("Average"), BadgeTone::Amber);
        assert_eq!(BadgeScheme::Status.tone("mystery"), BadgeTone::Blue);
        assert_eq!(BadgeScheme::Coverage.tone("Low"), BadgeTone::Rose);
        assert_eq!(BadgeScheme::Priority.tone("Critical"), BadgeTone::Rose);
        assert_eq!(BadgeScheme::Bloom.tone("Analyzing"), BadgeTone::Purple);
    }

    #[test]
    fn indicator_only_on_active_column() {
        let mut state = SortState::default();
        assert_eq!(state.indicator("score"), None);
        state.toggle("score");
        assert_eq!(state.indicator("score"), Some("▲"));
        assert_eq!(state.indicator("name"), None);
        state.toggle("score");
        assert_eq!(state.indicator("score"), Some("▼"));
    }

    #[test]
    fn empty_records_render_the_empty_message() {
        let table = SortableTable::default();
        let text = table.render_text(&[]);
        assert_eq!(text.trim_end(), EMPTY_MESSAGE);
    }

    #[test]
    fn text_rendering_has_index_column_and_one_line_per_record() {
        let records = students();
        let mut table = SortableTable::default();
        table.toggle_sort("score");
        let text = table.render_text(&records);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + records.len());
        assert!(lines[0].starts_with('#'));
        assert!(lines[0].contains("Score ▲"));
        assert!(lines[2].starts_with("1 "));
        assert!(lines[2].contains("amit Kumar"));
    }

    #[test]
    fn json_objects_become_typed_cells() {
        let obj: Map<String, Value> =
            serde_json::from_str(r#"{"name":"Meera","score":74,"grade":null,"passed":true}"#)
                .unwrap();
        let record = Record::from_json_object(&obj);
        assert_eq!(record.get("score"), &CellValue::Number(74.0));
        assert_eq!(record.get("name"), &CellValue::Text("Meera".into()));
        assert_eq!(record.get("grade"), &CellValue::Missing);
        assert_eq!(record.get("passed"), &CellValue::Text("true".into()));
        assert_eq!(record.get("absent"), &CellValue::Missing);
    }

    #[test]
    fn whole_numbers_format_without_fraction() {
        assert_eq!(format_number(72.0), "72");
        assert_eq!(format_number(72.5), "72.5");
    }
}
