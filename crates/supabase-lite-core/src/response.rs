use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::SupabaseResult;

/// Result of a table query: `{ data, count, status }`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    /// Decoded body. An array of rows for normal selects, a single object
    /// for `single()`, an empty array for head requests.
    pub data: JsonValue,
    /// Total row count, when one was requested and the server knew it.
    pub count: Option<i64>,
    /// HTTP status code.
    pub status: u16,
}

impl QueryResponse {
    pub fn new(data: JsonValue, count: Option<i64>, status: u16) -> Self {
        Self {
            data,
            count,
            status,
        }
    }

    /// Rows as a slice; a single object counts as one row.
    pub fn rows(&self) -> &[JsonValue] {
        match &self.data {
            JsonValue::Array(rows) => rows,
            JsonValue::Null => &[],
            other => std::slice::from_ref(other),
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Deserialize the rows into typed values.
    pub fn into_rows<T: DeserializeOwned>(self) -> SupabaseResult<Vec<T>> {
        let rows = match self.data {
            JsonValue::Array(rows) => rows,
            JsonValue::Null => Vec::new(),
            other => vec![other],
        };
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .collect()
    }

    /// Deserialize the whole body into `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> SupabaseResult<T> {
        Ok(serde_json::from_value(self.data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Country {
        id: i64,
        name: String,
    }

    #[test]
    fn rows_of_array() {
        let resp = QueryResponse::new(json!([{"id": 1}, {"id": 2}]), Some(2), 200);
        assert_eq!(resp.len(), 2);
        assert_eq!(resp.rows()[1]["id"], 2);
    }

    #[test]
    fn rows_of_single_object() {
        let resp = QueryResponse::new(json!({"id": 1}), None, 200);
        assert_eq!(resp.len(), 1);
    }

    #[test]
    fn rows_of_null() {
        let resp = QueryResponse::new(JsonValue::Null, Some(5), 200);
        assert!(resp.is_empty());
        assert_eq!(resp.count, Some(5));
    }

    #[test]
    fn into_rows_typed() {
        let resp = QueryResponse::new(json!([{"id": 1, "name": "Japan"}]), None, 200);
        let rows: Vec<Country> = resp.into_rows().unwrap();
        assert_eq!(
            rows,
            vec![Country {
                id: 1,
                name: "Japan".into()
            }]
        );
    }

    #[test]
    fn into_rows_decode_error() {
        let resp = QueryResponse::new(json!([{"id": "x"}]), None, 200);
        assert!(resp.into_rows::<Country>().is_err());
    }
}
