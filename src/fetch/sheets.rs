//! Published spreadsheet links.

const SHEETS_HOST: &str = "docs.google.com/spreadsheets";

/// Rewrites a Google Sheets link to its CSV export URL.
///
/// Anything else, including sheet links without a document id, is returned
/// unchanged.
pub fn export_url(url: &str) -> String {
    if !url.contains(SHEETS_HOST) {
        return url.to_string();
    }
    match sheet_id(url) {
        Some(id) => format!("https://docs.google.com/spreadsheets/d/{id}/export?format=csv"),
        None => url.to_string(),
    }
}

fn sheet_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/d/")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_link_rewritten() {
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/abc-DEF_123/edit?usp=sharing"),
            "https://docs.google.com/spreadsheets/d/abc-DEF_123/export?format=csv"
        );
    }

    #[test]
    fn test_bare_id_link_rewritten() {
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/xyz"),
            "https://docs.google.com/spreadsheets/d/xyz/export?format=csv"
        );
    }

    #[test]
    fn test_other_urls_untouched() {
        assert_eq!(
            export_url("https://example.com/audits.csv"),
            "https://example.com/audits.csv"
        );
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/u/0/"),
            "https://docs.google.com/spreadsheets/u/0/"
        );
    }
}
