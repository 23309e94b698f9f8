//! Identifier generation.
//!
//! Every row uses a UUID v7: time-sortable, generated without coordination,
//! and stored natively by Postgres.

use uuid::Uuid;

/// Generate a new time-ordered row ID.
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}

/// Object storage key for an uploaded flight document.
///
/// Keys are grouped by flight so that a flight's files can be listed or purged
/// together: `flights/{flight_id}/{document_id}.{ext}`.
pub fn document_storage_key(flight_id: Uuid, document_id: Uuid, filename: &str) -> String {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
        .to_ascii_lowercase();
    format!("flights/{flight_id}/{document_id}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_sortable() {
        let id1 = generate_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = generate_id();
        assert_ne!(id1, id2);
        assert!(id1 < id2);
    }

    #[test]
    fn storage_key_keeps_extension() {
        let flight = Uuid::nil();
        let doc = Uuid::max();
        let key = document_storage_key(flight, doc, "Registration.PDF");
        assert_eq!(key, format!("flights/{flight}/{doc}.pdf"));
    }

    #[test]
    fn storage_key_falls_back_to_bin() {
        let key = document_storage_key(Uuid::nil(), Uuid::nil(), "no-extension");
        assert!(key.ends_with(".bin"));
        let key = document_storage_key(Uuid::nil(), Uuid::nil(), "weird.../../etc");
        assert!(key.ends_with(".bin"));
    }
}
