use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A filter operand before it is written into the query string.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Rendered as an array literal `{a,b}` (for `cs`, `cd`, `ov`).
    List(Vec<FilterValue>),
    /// JSON object, rendered verbatim (jsonb containment).
    Json(JsonValue),
}

impl FilterValue {
    /// Render as the operand of `column=op.{value}`.
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => format!("{{{}}}", render_items(items)),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Render as one element of a list, quoting when PostgREST would
    /// otherwise split or misread the value.
    pub fn render_item(&self) -> String {
        let raw = self.render();
        match self {
            Self::Text(_) | Self::Json(_) if needs_quotes(&raw) => quote(&raw),
            _ => raw,
        }
    }
}

/// Render `(a,b,c)` for the `in` operator.
pub(crate) fn render_in_list(values: &[FilterValue]) -> String {
    format!("({})", render_items(values))
}

fn render_items(items: &[FilterValue]) -> String {
    items
        .iter()
        .map(FilterValue::render_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| matches!(c, ',' | '(' | ')' | '{' | '}' | '"' | ':' | '\\') || c.is_whitespace())
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Conversion into a [`FilterValue`].
pub trait IntoFilterValue {
    fn into_filter_value(self) -> FilterValue;
}

impl IntoFilterValue for FilterValue {
    fn into_filter_value(self) -> FilterValue {
        self
    }
}

impl IntoFilterValue for bool {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Bool(self)
    }
}

impl IntoFilterValue for i16 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self.into())
    }
}

impl IntoFilterValue for i32 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self.into())
    }
}

impl IntoFilterValue for i64 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self)
    }
}

impl IntoFilterValue for u32 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self.into())
    }
}

impl IntoFilterValue for u64 {
    fn into_filter_value(self) -> FilterValue {
        match i64::try_from(self) {
            Ok(n) => FilterValue::Int(n),
            Err(_) => FilterValue::Text(self.to_string()),
        }
    }
}

impl IntoFilterValue for f32 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Float(self.into())
    }
}

impl IntoFilterValue for f64 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Float(self)
    }
}

impl IntoFilterValue for String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self)
    }
}

impl IntoFilterValue for &str {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.to_string())
    }
}

impl IntoFilterValue for &String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.clone())
    }
}

impl IntoFilterValue for Uuid {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.to_string())
    }
}

impl IntoFilterValue for chrono::DateTime<chrono::Utc> {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.to_rfc3339())
    }
}

impl IntoFilterValue for NaiveDateTime {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl IntoFilterValue for NaiveDate {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.format("%Y-%m-%d").to_string())
    }
}

impl IntoFilterValue for NaiveTime {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Text(self.format("%H:%M:%S%.f").to_string())
    }
}

impl IntoFilterValue for JsonValue {
    fn into_filter_value(self) -> FilterValue {
        match self {
            JsonValue::Null => FilterValue::Null,
            JsonValue::Bool(b) => FilterValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => FilterValue::Int(i),
                None => FilterValue::Text(n.to_string()),
            },
            JsonValue::String(s) => FilterValue::Text(s),
            JsonValue::Array(items) => FilterValue::List(
                items.into_iter().map(IntoFilterValue::into_filter_value).collect(),
            ),
            obj @ JsonValue::Object(_) => FilterValue::Json(obj),
        }
    }
}

impl<T: IntoFilterValue> IntoFilterValue for Option<T> {
    fn into_filter_value(self) -> FilterValue {
        match self {
            Some(v) => v.into_filter_value(),
            None => FilterValue::Null,
        }
    }
}

impl<T: IntoFilterValue> IntoFilterValue for Vec<T> {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::List(self.into_iter().map(IntoFilterValue::into_filter_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(42i32.into_filter_value().render(), "42");
        assert_eq!(true.into_filter_value().render(), "true");
        assert_eq!(1.5f64.into_filter_value().render(), "1.5");
        assert_eq!("Japan".into_filter_value().render(), "Japan");
        assert_eq!(None::<i32>.into_filter_value().render(), "null");
    }

    #[test]
    fn text_is_not_quoted_outside_lists() {
        assert_eq!("New Zealand".into_filter_value().render(), "New Zealand");
    }

    #[test]
    fn list_items_quoted_when_needed() {
        let values = vec!["New Zealand", "Japan", "a,b"]
            .into_iter()
            .map(IntoFilterValue::into_filter_value)
            .collect::<Vec<_>>();
        assert_eq!(render_in_list(&values), r#"("New Zealand",Japan,"a,b")"#);
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(
            FilterValue::Text(r#"say "hi""#.into()).render_item(),
            r#""say \"hi\"""#
        );
    }

    #[test]
    fn array_literal() {
        assert_eq!(vec!["rust", "go"].into_filter_value().render(), "{rust,go}");
        assert_eq!(vec![1, 2, 3].into_filter_value().render(), "{1,2,3}");
    }

    #[test]
    fn json_conversion() {
        assert_eq!(json!(7).into_filter_value(), FilterValue::Int(7));
        assert_eq!(json!(["a"]).into_filter_value().render(), "{a}");
        assert_eq!(
            json!({"tier": "gold"}).into_filter_value().render(),
            r#"{"tier":"gold"}"#
        );
    }

    #[test]
    fn uuid_and_dates() {
        let id = Uuid::nil();
        assert_eq!(
            id.into_filter_value().render(),
            "00000000-0000-0000-0000-000000000000"
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date.into_filter_value().render(), "2024-03-09");
    }

    #[test]
    fn large_unsigned_falls_back_to_text() {
        assert_eq!(u64::MAX.into_filter_value().render(), u64::MAX.to_string());
    }
}
