use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: String,
    pub role: String,
}

/// A catalog record as exposed over the API.
///
/// Storage documents may carry the identifier as `_id`; it is always
/// serialized back out as `id`. Decode stored documents through
/// [`Book::from_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<Author>,
    pub isbn: String,
    pub publication_year: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Book {
    /// Decodes a stored document. When both `id` and `_id` are present, `id`
    /// wins, matching `storage::document_id`.
    pub fn from_document(mut doc: Value) -> Result<Self, serde_json::Error> {
        if let Some(fields) = doc.as_object_mut() {
            if let Some(storage_id) = fields.remove("_id") {
                fields.entry("id").or_insert(storage_id);
            }
        }
        serde_json::from_value(doc)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_key_is_renamed_to_id() {
        let doc = json!({
            "_id": "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10",
            "title": "Dune",
            "authors": [{"author_id": "herbert", "role": "author"}],
            "isbn": "9780441013593",
            "publication_year": 1965,
            "image_url": "https://covers.example/dune.jpg"
        });

        let book = Book::from_document(doc).unwrap();
        let out = serde_json::to_value(&book).unwrap();

        assert_eq!(out["id"], "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10");
        assert!(out.get("_id").is_none());
    }

    #[test]
    fn test_public_id_wins_when_both_keys_present() {
        let doc = json!({
            "id": "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10",
            "_id": "00000000-0000-0000-0000-000000000001",
            "title": "Dune",
            "authors": [],
            "isbn": "1",
            "publication_year": 1965
        });

        let expected = crate::storage::document_id(&doc);
        let book = Book::from_document(doc).unwrap();

        assert_eq!(Some(book.id), expected);
        assert_eq!(book.id.to_string(), "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10");
    }

    #[test]
    fn test_field_order_matches_declaration() {
        let book = Book {
            id: Uuid::nil(),
            title: "Emma".to_string(),
            authors: vec![],
            isbn: "123".to_string(),
            publication_year: 1815,
            image_url: String::new(),
        };

        let text = serde_json::to_string(&book).unwrap();
        let positions: Vec<usize> = [
            "\"id\"",
            "\"title\"",
            "\"authors\"",
            "\"isbn\"",
            "\"publication_year\"",
            "\"image_url\"",
        ]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_or_null_image_becomes_empty() {
        let doc = json!({
            "id": "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10",
            "title": "Dune",
            "authors": [],
            "isbn": "1",
            "publication_year": 1965,
            "image_url": null
        });

        let book = Book::from_document(doc).unwrap();
        assert_eq!(book.image_url, "");
    }

    #[test]
    fn test_malformed_identifier_fails_decode() {
        let doc = json!({
            "id": "not-a-uuid",
            "title": "Dune",
            "authors": [],
            "isbn": "1",
            "publication_year": 1965
        });

        assert!(Book::from_document(doc).is_err());
    }
}
