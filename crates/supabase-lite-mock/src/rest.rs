use std::cmp::Ordering;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::{error_response, MockState};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

struct OrderTerm {
    column: String,
    descending: bool,
    nulls_first: bool,
}

pub(crate) async fn select_rows(
    State(state): State<MockState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if let Some(profile) = header_str(&headers, "accept-profile") {
        if profile != "public" {
            return error_response(
                StatusCode::NOT_ACCEPTABLE,
                json!({"code": "PGRST106", "message": "The schema must be one of the following: public"}),
            );
        }
    }

    let Some(rows) = state.tables.get(&table) else {
        return error_response(
            StatusCode::NOT_FOUND,
            json!({
                "code": "PGRST205",
                "message": format!("Could not find the table 'public.{table}' in the schema cache"),
                "details": null,
                "hint": null,
            }),
        );
    };
    let known = |column: &str| rows.iter().any(|r| r.get(column).is_some());

    let mut columns: Option<Vec<String>> = None;
    let mut orders = Vec::new();
    let mut limit: Option<usize> = None;
    let mut offset = 0usize;
    let mut filters = Vec::new();

    let query = query.unwrap_or_default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "select" => {
                if value.trim() != "*" && !value.trim().is_empty() {
                    columns = Some(value.split(',').map(|c| c.trim().to_string()).collect());
                }
            }
            "order" => {
                for term in value.split(',') {
                    let mut parts = term.split('.');
                    let column = parts.next().unwrap_or_default().to_string();
                    let mut descending = false;
                    let mut nulls_first = false;
                    for modifier in parts {
                        match modifier {
                            "desc" => {
                                descending = true;
                                nulls_first = true;
                            }
                            "asc" => descending = false,
                            "nullsfirst" => nulls_first = true,
                            "nullslast" => nulls_first = false,
                            other => return bad_request(format!("unknown order modifier {other:?}")),
                        }
                    }
                    orders.push(OrderTerm {
                        column,
                        descending,
                        nulls_first,
                    });
                }
            }
            "limit" => match value.parse() {
                Ok(n) => limit = Some(n),
                Err(_) => return bad_request(format!("invalid limit {value:?}")),
            },
            "offset" => match value.parse() {
                Ok(n) => offset = n,
                Err(_) => return bad_request(format!("invalid offset {value:?}")),
            },
            "or" | "and" => return bad_request("logical operators are not supported".into()),
            column => filters.push((column.to_string(), value.into_owned())),
        }
    }

    for column in filters
        .iter()
        .map(|(c, _)| c)
        .chain(orders.iter().map(|o| &o.column))
        .chain(columns.iter().flatten())
    {
        if !known(column) {
            return error_response(
                StatusCode::BAD_REQUEST,
                json!({"code": "42703", "message": format!("column {table}.{column} does not exist")}),
            );
        }
    }

    let mut matched = Vec::new();
    for row in rows.iter() {
        let mut keep = true;
        for (column, expr) in &filters {
            let value = row.get(column).unwrap_or(&Value::Null);
            match evaluate(value, expr) {
                Ok(true) => {}
                Ok(false) => {
                    keep = false;
                    break;
                }
                Err(msg) => return bad_request(msg),
            }
        }
        if keep {
            matched.push(row.clone());
        }
    }

    if !orders.is_empty() {
        matched.sort_by(|a, b| {
            for term in &orders {
                let ord = order_values(
                    a.get(&term.column).unwrap_or(&Value::Null),
                    b.get(&term.column).unwrap_or(&Value::Null),
                    term,
                );
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    let total = matched.len();
    let page: Vec<Value> = matched
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .map(|row| project(row, columns.as_deref()))
        .collect();

    let wants_count = header_str(&headers, "prefer").is_some_and(|p| {
        p.split(',')
            .map(str::trim)
            .any(|p| matches!(p, "count=exact" | "count=planned" | "count=estimated"))
    });
    let total_part = if wants_count {
        total.to_string()
    } else {
        "*".to_string()
    };
    let content_range = if page.is_empty() {
        format!("*/{total_part}")
    } else {
        format!("{}-{}/{}", offset, offset + page.len() - 1, total_part)
    };

    let body = if header_str(&headers, "accept").is_some_and(|a| a.contains(SINGLE_OBJECT)) {
        if page.len() != 1 {
            return error_response(
                StatusCode::NOT_ACCEPTABLE,
                json!({
                    "code": "PGRST116",
                    "message": "JSON object requested, multiple (or no) rows returned",
                    "details": format!("The result contains {} rows", page.len()),
                    "hint": null,
                }),
            );
        }
        page.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::Array(page)
    };

    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&content_range) {
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    response
}

pub(crate) async fn call_rpc(
    Path(function): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let args = if method == Method::POST {
        if body.is_empty() {
            Map::new()
        } else {
            match serde_json::from_slice::<Value>(&body) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return bad_request("RPC arguments must be a JSON object".into()),
                Err(e) => return bad_request(format!("invalid JSON body: {e}")),
            }
        }
    } else {
        let query = query.unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| {
                let value = serde_json::from_str(&v).unwrap_or(Value::String(v.into_owned()));
                (k.into_owned(), value)
            })
            .collect()
    };

    match function.as_str() {
        "hello_world" => Json(json!("Hello world")).into_response(),
        "echo" => Json(Value::Object(args)).into_response(),
        "add_numbers" => match (
            args.get("a").and_then(Value::as_i64),
            args.get("b").and_then(Value::as_i64),
        ) {
            (Some(a), Some(b)) => Json(json!(a + b)).into_response(),
            _ => missing_function(&function, &args),
        },
        _ => missing_function(&function, &args),
    }
}

fn missing_function(function: &str, args: &Map<String, Value>) -> Response {
    let params = if args.is_empty() {
        "without parameters".to_string()
    } else {
        let names: Vec<&str> = args.keys().map(String::as_str).collect();
        format!("with parameters {}", names.join(", "))
    };
    error_response(
        StatusCode::NOT_FOUND,
        json!({
            "code": "PGRST202",
            "details": format!("Searched for the function public.{function} {params}, but no matches were found in the schema cache."),
            "hint": null,
            "message": format!("Could not find the function public.{function} {params} in the schema cache"),
        }),
    )
}

fn bad_request(message: String) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        json!({"code": "PGRST100", "message": message, "details": null, "hint": null}),
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn project(row: Value, columns: Option<&[String]>) -> Value {
    match (row, columns) {
        (Value::Object(map), Some(columns)) => Value::Object(
            columns
                .iter()
                .map(|c| (c.clone(), map.get(c).cloned().unwrap_or(Value::Null)))
                .collect(),
        ),
        (row, _) => row,
    }
}

/// Evaluate a PostgREST filter expression such as `eq.5` or `not.in.(1,2)`.
fn evaluate(value: &Value, expr: &str) -> Result<bool, String> {
    let (negated, expr) = match expr.strip_prefix("not.") {
        Some(rest) => (true, rest),
        None => (false, expr),
    };
    let (op, operand) = expr
        .split_once('.')
        .ok_or_else(|| format!("failed to parse filter {expr:?}"))?;
    let result = match op {
        "eq" => compare(value, operand) == Some(Ordering::Equal),
        "neq" => matches!(compare(value, operand), Some(o) if o != Ordering::Equal),
        "gt" => compare(value, operand) == Some(Ordering::Greater),
        "gte" => matches!(compare(value, operand), Some(Ordering::Greater | Ordering::Equal)),
        "lt" => compare(value, operand) == Some(Ordering::Less),
        "lte" => matches!(compare(value, operand), Some(Ordering::Less | Ordering::Equal)),
        "like" => value.as_str().is_some_and(|s| wildcard(s, operand)),
        "ilike" => value
            .as_str()
            .is_some_and(|s| wildcard(&s.to_lowercase(), &operand.to_lowercase())),
        "in" => {
            let list = operand
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| format!("failed to parse list {operand:?}"))?;
            list.split(',')
                .map(|item| item.trim().trim_matches('"'))
                .any(|item| compare(value, item) == Some(Ordering::Equal))
        }
        "is" => match operand {
            "null" => value.is_null(),
            "true" => value == &Value::Bool(true),
            "false" => value == &Value::Bool(false),
            other => return Err(format!("invalid is operand {other:?}")),
        },
        other => return Err(format!("unsupported operator {other:?}")),
    };
    Ok(result != negated)
}

fn compare(value: &Value, operand: &str) -> Option<Ordering> {
    match value {
        Value::Number(n) => n.as_f64()?.partial_cmp(&operand.parse::<f64>().ok()?),
        Value::String(s) => Some(s.as_str().cmp(operand)),
        Value::Bool(b) => Some(b.cmp(&operand.parse::<bool>().ok()?)),
        _ => None,
    }
}

fn order_values(a: &Value, b: &Value, term: &OrderTerm) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if term.nulls_first {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (false, true) => {
            if term.nulls_first {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, false) => {
            let ord = match (a, b) {
                (Value::Number(x), Value::Number(y)) => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(Ordering::Equal),
                (Value::String(x), Value::String(y)) => x.cmp(y),
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                _ => Ordering::Equal,
            };
            if term.descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// SQL LIKE with `%` (PostgREST also accepts `*`) matching any run of characters.
fn wildcard(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '%' || pattern[p] == '*') {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && (pattern[p] == '%' || pattern[p] == '*') {
        p += 1;
    }
    p == pattern.len()
}
