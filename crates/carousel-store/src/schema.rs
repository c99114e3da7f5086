/// SQL DDL for the link store.
/// WAL mode enabled at connection time; one table per collection.
pub const SCHEMA_VERSION: u32 = 1;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;

pub const CREATE_META: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
"#;

/// Collection names become table names, so only plain identifiers pass.
pub fn is_valid_collection(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// DDL for a link collection. `collection` must pass [`is_valid_collection`].
pub fn create_collection(collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {collection} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            link TEXT NOT NULL,
            created_at TEXT NOT NULL
        );"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_collection_names() {
        assert!(is_valid_collection("carousal_app_image_link"));
        assert!(is_valid_collection("_links"));
        assert!(is_valid_collection("Links2"));
    }

    #[test]
    fn invalid_collection_names() {
        assert!(!is_valid_collection(""));
        assert!(!is_valid_collection("2links"));
        assert!(!is_valid_collection("links; DROP TABLE x"));
        assert!(!is_valid_collection("image-link"));
        assert!(!is_valid_collection("links\""));
    }

    #[test]
    fn create_collection_uses_autoincrement() {
        let ddl = create_collection("links");
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS links"));
        assert!(ddl.contains("AUTOINCREMENT"));
    }
}
