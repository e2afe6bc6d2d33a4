use regex::Regex;
use std::sync::LazyLock;

/// Name used when a filename yields nothing usable.
pub const UNKNOWN_NAME: &str = "Unknown";

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "docx", "doc", "png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp",
];

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d{4}").expect("year pattern must compile"));

/// Derive an employee name from an uploaded file's name.
///
/// `"john_smith-2024.docx"` becomes `"john smith"`: the extension and any
/// `-YYYY` token are dropped, then underscores and hyphens become spaces.
pub fn name_from_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let stem = strip_known_extension(base);
    let without_year = YEAR_TOKEN.replace_all(stem, "");
    let spaced: String = without_year
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();

    let name = spaced.trim();
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Normalized lookup key for an employee name.
pub fn employee_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn strip_known_extension(base: &str) -> &str {
    match base.rfind('.') {
        Some(idx) => {
            let ext = base[idx + 1..].to_ascii_lowercase();
            if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
                &base[..idx]
            } else {
                base
            }
        }
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_and_separators_stripped() {
        assert_eq!(name_from_filename("john_smith-2024.docx"), "john smith");
    }

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(name_from_filename("Jane-Doe-2023.docx"), "Jane Doe");
        assert_eq!(name_from_filename("mike_johnson.DOC"), "mike johnson");
    }

    #[test]
    fn test_path_components_ignored() {
        assert_eq!(name_from_filename("/tmp/uploads/alex_chen-2025.png"), "alex chen");
        assert_eq!(name_from_filename(r"C:\docs\sarah_wilson.docx"), "sarah wilson");
    }

    #[test]
    fn test_unknown_extension_kept() {
        assert_eq!(name_from_filename("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(name_from_filename(".docx"), "Unknown");
        assert_eq!(name_from_filename("-2024.docx"), "Unknown");
        assert_eq!(name_from_filename("__"), "Unknown");
        assert_eq!(name_from_filename(""), "Unknown");
    }

    #[test]
    fn test_employee_key() {
        assert_eq!(employee_key("  John Smith "), "john smith");
    }
}
