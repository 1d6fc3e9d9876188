use chrono::{DateTime, Utc};

/// One spreadsheet cell as handed over by the sheet parser.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Text form of the cell. Whole numbers render without a fractional part.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.to_rfc3339(),
        }
    }

    /// Leading numeric prefix of the cell (`"3 pts"` is 3); `None` for dates,
    /// booleans and text without one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_leading_float(s),
            CellValue::Bool(_) | CellValue::Date(_) => None,
        }
    }

    /// `true` for text cells that are blank after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Date(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parses the longest prefix of `s` (after leading whitespace) that forms a
/// decimal number, e.g. `"  12.5kg"` gives `12.5`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when it has digits.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Header normalization used for alias matching: lower-cased, with
/// whitespace, underscores and hyphens removed.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A raw spreadsheet row: headers mapped to cell values, in sheet order.
///
/// Empty cells are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(header, value);
        self
    }

    /// Sets `header`, replacing an existing cell with the exact same header.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<CellValue>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    /// First cell whose normalized header equals the already-normalized `key`.
    pub fn get_normalized(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, _)| normalize_header(h) == key)
            .map(|(_, v)| v)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<H: Into<String>, V: Into<CellValue>> FromIterator<(H, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (h, v) in iter {
            row.insert(h, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Submitted On "), "submittedon");
        assert_eq!(normalize_header("Question_ID"), "questionid");
        assert_eq!(normalize_header("total-points"), "totalpoints");
        assert_eq!(normalize_header("STORE\tNAME"), "storename");
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("3"), Some(3.0));
        assert_eq!(parse_leading_float("  12.5kg"), Some(12.5));
        assert_eq!(parse_leading_float("3 pts"), Some(3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("-2"), Some(-2.0));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("Good"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn test_cell_text_and_number() {
        assert_eq!(CellValue::Number(12.0).as_text(), "12");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::from("4 of 4").as_number(), Some(4.0));
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_row_lookup() {
        let row = RawRow::new()
            .with("Store Name", "Store A")
            .with("Points", 3.0)
            .with("Points", 4.0);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Points"), Some(&CellValue::Number(4.0)));
        assert_eq!(
            row.get_normalized("storename"),
            Some(&CellValue::from("Store A"))
        );
        assert_eq!(row.get_normalized("location"), None);
    }
}
