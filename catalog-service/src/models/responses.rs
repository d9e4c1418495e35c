use crate::models::book::Book;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

/// Selects how stored documents are projected into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Decode every document into a `Book`; undecodable documents fail the request.
    #[default]
    Typed,
    /// Forward stored documents verbatim.
    Passthrough,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "typed" => Ok(Self::Typed),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!("unknown response mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Typed(Book),
    Passthrough(Value),
}

impl Record {
    pub fn decode(doc: Value, mode: ResponseMode) -> Result<Self, serde_json::Error> {
        match mode {
            ResponseMode::Typed => Book::from_document(doc).map(Record::Typed),
            ResponseMode::Passthrough => Ok(Record::Passthrough(doc)),
        }
    }
}

/// Paginated response body.
///
/// `totalCount` is the number of records in this page, not the size of the
/// full matching set.
#[derive(Debug, Serialize)]
pub struct ResultEnvelope {
    pub data: Vec<Record>,
    pub offset: u64,
    pub limit: u64,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_mode_parsing() {
        assert_eq!("typed".parse::<ResponseMode>(), Ok(ResponseMode::Typed));
        assert_eq!(
            " PassThrough ".parse::<ResponseMode>(),
            Ok(ResponseMode::Passthrough)
        );
        assert!("raw".parse::<ResponseMode>().is_err());
    }

    #[test]
    fn test_passthrough_keeps_document_verbatim() {
        let doc = json!({"_id": "abc", "extra": [1, 2]});
        let record = Record::decode(doc.clone(), ResponseMode::Passthrough).unwrap();

        assert_eq!(serde_json::to_value(&record).unwrap(), doc);
    }

    #[test]
    fn test_typed_rejects_incomplete_document() {
        let doc = json!({"_id": "5f0c7c3e-1d3b-4a57-9d3c-7a1e2b9c4f10"});
        assert!(Record::decode(doc, ResponseMode::Typed).is_err());
    }

    #[test]
    fn test_envelope_field_names() {
        let envelope = ResultEnvelope {
            data: Vec::new(),
            offset: 10,
            limit: 5,
            total_count: 0,
        };

        let text = serde_json::to_string(&envelope).unwrap();
        assert_eq!(text, r#"{"data":[],"offset":10,"limit":5,"totalCount":0}"#);
    }
}
