use serde_json::Value as JsonValue;
use supabase_lite_core::{HttpMethod, HttpRequest, RequestBody, SupabaseError, SupabaseResult};

use crate::state::{CountOption, FilterCondition, NullsPosition, OrderDirection, QueryState};
use crate::value::IntoFilterValue;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Render a select into a GET (or HEAD) request against `/rest/v1/{table}`.
pub fn build_select_request(state: &QueryState) -> HttpRequest {
    let method = if state.head {
        HttpMethod::Head
    } else {
        HttpMethod::Get
    };
    let mut req = HttpRequest::new(method, ["rest", "v1", state.table.as_str()]);

    // Select columns
    let select = if state.columns.is_empty() {
        "*".to_string()
    } else {
        state.columns.join(",")
    };
    req = req.query("select", select);

    // Filters
    for filter in &state.filters {
        req = match filter {
            FilterCondition::Predicate {
                column,
                operator,
                negated,
                value,
            } => {
                let not = if *negated { "not." } else { "" };
                req.query(
                    column.as_str(),
                    format!("{not}{}.{value}", operator.as_postgrest()),
                )
            }
            FilterCondition::Or(filters) => req.query("or", format!("({filters})")),
        };
    }

    // Order
    if !state.orders.is_empty() {
        let order = state
            .orders
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    OrderDirection::Ascending => "asc",
                    OrderDirection::Descending => "desc",
                };
                let nulls = match o.nulls {
                    Some(NullsPosition::First) => ".nullsfirst",
                    Some(NullsPosition::Last) => ".nullslast",
                    None => "",
                };
                format!("{}.{}{}", o.column, dir, nulls)
            })
            .collect::<Vec<_>>()
            .join(",");
        req = req.query("order", order);
    }

    if let Some(limit) = state.limit {
        req = req.query("limit", limit.to_string());
    }
    if let Some(offset) = state.offset {
        req = req.query("offset", offset.to_string());
    }

    if state.single {
        req = req.header("Accept", SINGLE_OBJECT);
    }

    // Head mode implies count=exact unless a mode was chosen
    let count = match (state.head, state.count) {
        (true, CountOption::None) => CountOption::Exact,
        (_, count) => count,
    };
    if let Some(prefer) = count.prefer() {
        req = req.header("Prefer", prefer);
    }

    if state.schema != "public" {
        req = req.header("Accept-Profile", state.schema.as_str());
    }

    req
}

/// Render a call to `/rest/v1/rpc/{function}`.
///
/// POST carries the arguments as a JSON body; GET and HEAD carry them as
/// query parameters.
pub fn build_rpc_request(
    schema: &str,
    function: &str,
    args: &JsonValue,
    method: HttpMethod,
    count: CountOption,
) -> SupabaseResult<HttpRequest> {
    let mut req = HttpRequest::new(method, ["rest", "v1", "rpc", function]);
    let read_only = match method {
        HttpMethod::Post => false,
        HttpMethod::Get | HttpMethod::Head => true,
        other => {
            return Err(SupabaseError::invalid_input(format!(
                "rpc supports GET, HEAD and POST, got {other}"
            )))
        }
    };

    if read_only {
        if let JsonValue::Object(map) = args {
            for (key, value) in map {
                req = req.query(key.as_str(), value.clone().into_filter_value().render());
            }
        }
        if schema != "public" {
            req = req.header("Accept-Profile", schema);
        }
    } else {
        let body = if args.is_null() {
            JsonValue::Object(serde_json::Map::new())
        } else {
            args.clone()
        };
        req = req.body(RequestBody::Json(body));
        if schema != "public" {
            req = req.header("Content-Profile", schema);
        }
    }

    if let Some(prefer) = count.prefer() {
        req = req.header("Prefer", prefer);
    }

    Ok(req)
}

/// Total from a `Content-Range` header (`0-9/100` or `*/100`).
/// An unknown total (`0-9/*`) yields `None`.
pub fn parse_content_range(value: &str) -> Option<i64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FilterOperator, OrderClause};
    use serde_json::json;

    fn cities() -> QueryState {
        QueryState::new("public", "cities")
    }

    fn predicate(column: &str, operator: FilterOperator, value: &str) -> FilterCondition {
        FilterCondition::Predicate {
            column: column.into(),
            operator,
            negated: false,
            value: value.into(),
        }
    }

    // ─── SELECT Tests ───────────────────────────────────────

    #[test]
    fn test_select_simple() {
        let req = build_select_request(&cities());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path(), "/rest/v1/cities");
        assert_eq!(req.query, vec![("select".to_string(), "*".to_string())]);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_select_table_is_one_segment() {
        let state = QueryState::new("public", "rpc/hello_world");
        let req = build_select_request(&state);
        assert_eq!(req.segments, ["rest", "v1", "rpc/hello_world"]);
    }

    #[test]
    fn test_select_with_columns() {
        let mut state = cities();
        state.columns = vec!["name".into(), "country_id".into()];
        let req = build_select_request(&state);
        assert_eq!(req.query_value("select"), Some("name,country_id"));
    }

    #[test]
    fn test_select_with_filters_in_order() {
        let mut state = cities();
        state.filters.push(predicate("country_id", FilterOperator::Eq, "1"));
        state.filters.push(predicate("population", FilterOperator::Gt, "100000"));
        let req = build_select_request(&state);
        assert_eq!(
            req.query,
            vec![
                ("select".to_string(), "*".to_string()),
                ("country_id".to_string(), "eq.1".to_string()),
                ("population".to_string(), "gt.100000".to_string()),
            ]
        );
    }

    #[test]
    fn test_negated_filter() {
        let mut state = cities();
        state.filters.push(FilterCondition::Predicate {
            column: "nickname".into(),
            operator: FilterOperator::Is,
            negated: true,
            value: "null".into(),
        });
        let req = build_select_request(&state);
        assert_eq!(req.query_value("nickname"), Some("not.is.null"));
    }

    #[test]
    fn test_or_filter() {
        let mut state = cities();
        state.filters.push(FilterCondition::Or("id.eq.1,id.eq.2".into()));
        let req = build_select_request(&state);
        assert_eq!(req.query_value("or"), Some("(id.eq.1,id.eq.2)"));
    }

    #[test]
    fn test_select_with_order_limit_offset() {
        let mut state = cities();
        state.orders.push(OrderClause {
            column: "population".into(),
            direction: OrderDirection::Descending,
            nulls: None,
        });
        state.orders.push(OrderClause {
            column: "nickname".into(),
            direction: OrderDirection::Ascending,
            nulls: Some(NullsPosition::First),
        });
        state.limit = Some(10);
        state.offset = Some(20);
        let req = build_select_request(&state);
        assert_eq!(
            req.query_value("order"),
            Some("population.desc,nickname.asc.nullsfirst")
        );
        assert_eq!(req.query_value("limit"), Some("10"));
        assert_eq!(req.query_value("offset"), Some("20"));
    }

    #[test]
    fn test_select_single() {
        let mut state = cities();
        state.single = true;
        let req = build_select_request(&state);
        assert_eq!(req.header_value("accept"), Some(SINGLE_OBJECT));
    }

    #[test]
    fn test_select_count() {
        let mut state = cities();
        state.count = CountOption::Planned;
        let req = build_select_request(&state);
        assert_eq!(req.header_value("Prefer"), Some("count=planned"));
    }

    #[test]
    fn test_select_head_mode() {
        let mut state = cities();
        state.head = true;
        let req = build_select_request(&state);
        assert_eq!(req.method, HttpMethod::Head);
        assert_eq!(req.header_value("Prefer"), Some("count=exact"));
    }

    #[test]
    fn test_head_keeps_explicit_count() {
        let mut state = cities();
        state.head = true;
        state.count = CountOption::Estimated;
        let req = build_select_request(&state);
        assert_eq!(req.header_value("Prefer"), Some("count=estimated"));
    }

    #[test]
    fn test_schema_header() {
        let mut state = cities();
        state.schema = "inventory".into();
        let req = build_select_request(&state);
        assert_eq!(req.header_value("Accept-Profile"), Some("inventory"));
    }

    // ─── RPC Tests ──────────────────────────────────────────

    #[test]
    fn test_rpc_post_body() {
        let args = json!({"a": 1, "b": 2});
        let req = build_rpc_request("public", "add_numbers", &args, HttpMethod::Post, CountOption::None)
            .unwrap();
        assert_eq!(req.path(), "/rest/v1/rpc/add_numbers");
        assert_eq!(req.body, Some(RequestBody::Json(args)));
        assert!(req.query.is_empty());
    }

    #[test]
    fn test_rpc_function_is_one_segment() {
        let req = build_rpc_request("public", "a/b", &JsonValue::Null, HttpMethod::Post, CountOption::None)
            .unwrap();
        assert_eq!(req.segments, ["rest", "v1", "rpc", "a/b"]);
    }

    #[test]
    fn test_rpc_no_args() {
        let req = build_rpc_request("public", "hello_world", &JsonValue::Null, HttpMethod::Post, CountOption::None)
            .unwrap();
        assert_eq!(req.body, Some(RequestBody::Json(json!({}))));
    }

    #[test]
    fn test_rpc_get_uses_query() {
        let args = json!({"name": "world", "tags": ["a", "b"]});
        let req = build_rpc_request("public", "echo", &args, HttpMethod::Get, CountOption::Exact)
            .unwrap();
        assert!(req.body.is_none());
        assert_eq!(req.query_value("name"), Some("world"));
        assert_eq!(req.query_value("tags"), Some("{a,b}"));
        assert_eq!(req.header_value("prefer"), Some("count=exact"));
    }

    #[test]
    fn test_rpc_schema_headers() {
        let post = build_rpc_request("api", "f", &JsonValue::Null, HttpMethod::Post, CountOption::None)
            .unwrap();
        assert_eq!(post.header_value("Content-Profile"), Some("api"));
        let get = build_rpc_request("api", "f", &JsonValue::Null, HttpMethod::Get, CountOption::None)
            .unwrap();
        assert_eq!(get.header_value("Accept-Profile"), Some("api"));
    }

    #[test]
    fn test_rpc_rejects_other_methods() {
        let err = build_rpc_request("public", "f", &JsonValue::Null, HttpMethod::Delete, CountOption::None)
            .unwrap_err();
        assert!(matches!(err, SupabaseError::InvalidInput(_)));
    }

    // ─── Content-Range ──────────────────────────────────────

    #[test]
    fn test_content_range() {
        assert_eq!(parse_content_range("0-9/100"), Some(100));
        assert_eq!(parse_content_range("*/42"), Some(42));
        assert_eq!(parse_content_range("0-2/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }
}
