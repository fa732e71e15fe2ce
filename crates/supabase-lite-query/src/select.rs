use supabase_lite_core::{HttpRequest, QueryResponse, SupabaseError, SupabaseResult, Transport};

use crate::execute;
use crate::filter::Filterable;
use crate::modifier::Modifiable;
use crate::postgrest::build_select_request;
use crate::state::{validate_identifier, BuilderState, QueryState};

/// Builder for SELECT queries. Implements both Filterable and Modifiable.
///
/// `execute` consumes the builder, so its filters can back one request only.
pub struct SelectBuilder {
    transport: Transport,
    state: QueryState,
    error: Option<SupabaseError>,
}

impl BuilderState for SelectBuilder {
    fn state_mut(&mut self) -> &mut QueryState {
        &mut self.state
    }

    fn record_error(&mut self, error: SupabaseError) {
        self.error.get_or_insert(error);
    }
}

impl Filterable for SelectBuilder {}

impl Modifiable for SelectBuilder {}

impl SelectBuilder {
    pub(crate) fn new(
        transport: Transport,
        state: QueryState,
        error: Option<SupabaseError>,
    ) -> Self {
        Self {
            transport,
            state,
            error,
        }
    }

    /// Override the schema for this query (sent as `Accept-Profile`).
    pub fn schema(mut self, schema: &str) -> Self {
        match validate_identifier(schema, "Schema") {
            Ok(()) => self.state.schema = schema.trim().to_string(),
            Err(e) => {
                tracing::warn!("Invalid schema name: {e}");
                self.record_error(e);
            }
        }
        self
    }

    /// The accumulated state, for inspection.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Render the request without sending it. Returns the first recorded
    /// validation error, if any.
    pub fn to_request(self) -> SupabaseResult<HttpRequest> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(build_select_request(&self.state)),
        }
    }

    /// Execute the SELECT query and return rows, count and status.
    pub async fn execute(self) -> SupabaseResult<QueryResponse> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let request = build_select_request(&self.state);
        execute::execute_select(&self.transport, &self.state.table, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::QueryBuilder;
    use crate::state::{CountOption, IsValue, NullsPosition, OrderDirection, TextSearchType};
    use serde_json::json;
    use supabase_lite_core::SupabaseConfig;

    fn cities() -> SelectBuilder {
        let transport =
            Transport::new(&SupabaseConfig::new("https://example.supabase.co", "key")).unwrap();
        QueryBuilder::new(transport, "public".into(), "cities".into()).select(
            "*",
            CountOption::None,
            false,
        )
    }

    fn query(builder: SelectBuilder) -> Vec<(String, String)> {
        builder.to_request().unwrap().query
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn comparison_filters() {
        let q = query(
            cities()
                .eq("country_id", 1)
                .neq("name", "Osaka")
                .gt("population", 100_000)
                .gte("id", 2)
                .lt("id", 6)
                .lte("population", 5_000_000i64),
        );
        assert_eq!(
            q[1..],
            [
                pair("country_id", "eq.1"),
                pair("name", "neq.Osaka"),
                pair("population", "gt.100000"),
                pair("id", "gte.2"),
                pair("id", "lt.6"),
                pair("population", "lte.5000000"),
            ]
        );
    }

    #[test]
    fn pattern_and_is_filters() {
        let q = query(
            cities()
                .like("name", "%land")
                .ilike("name", "*OSAKA*")
                .is("nickname", IsValue::Null)
                .is("nickname", IsValue::NotNull)
                .is("is_capital", IsValue::True),
        );
        assert_eq!(
            q[1..],
            [
                pair("name", "like.%land"),
                pair("name", "ilike.*OSAKA*"),
                pair("nickname", "is.null"),
                pair("nickname", "not.is.null"),
                pair("is_capital", "is.true"),
            ]
        );
    }

    #[test]
    fn in_and_array_filters() {
        let q = query(
            cities()
                .in_("name", vec!["Tokyo", "New York"])
                .contains("tags", vec!["coastal"])
                .contained_by("tags", vec!["a", "b"])
                .overlaps("tags", vec!["x"])
                .contains("meta", json!({"tier": "gold"})),
        );
        assert_eq!(
            q[1..],
            [
                pair("name", r#"in.(Tokyo,"New York")"#),
                pair("tags", "cs.{coastal}"),
                pair("tags", "cd.{a,b}"),
                pair("tags", "ov.{x}"),
                pair("meta", r#"cs.{"tier":"gold"}"#),
            ]
        );
    }

    #[test]
    fn text_search_not_or_match() {
        let q = query(
            cities()
                .text_search("nickname", "harbour", TextSearchType::Plain, Some("english"))
                .not("name", "eq", "Tokyo")
                .or("id.eq.1,id.eq.2")
                .match_all([("country_id", 1), ("id", 2)]),
        );
        assert_eq!(
            q[1..],
            [
                pair("nickname", "plfts(english).harbour"),
                pair("name", "not.eq.Tokyo"),
                pair("or", "(id.eq.1,id.eq.2)"),
                pair("country_id", "eq.1"),
                pair("id", "eq.2"),
            ]
        );
    }

    #[test]
    fn generic_filter() {
        let q = query(
            cities()
                .filter("id", "in", "(1,2)")
                .filter("name", "not.like", "A*")
                .filter("population", "gt", 10),
        );
        assert_eq!(
            q[1..],
            [
                pair("id", "in.(1,2)"),
                pair("name", "not.like.A*"),
                pair("population", "gt.10"),
            ]
        );
    }

    #[test]
    fn modifiers() {
        let req = cities()
            .order("population", OrderDirection::Descending)
            .order_with_nulls("nickname", OrderDirection::Ascending, NullsPosition::Last)
            .range(10, 19)
            .single()
            .schema("inventory")
            .to_request()
            .unwrap();
        assert_eq!(
            req.query_value("order"),
            Some("population.desc,nickname.asc.nullslast")
        );
        assert_eq!(req.query_value("limit"), Some("10"));
        assert_eq!(req.query_value("offset"), Some("10"));
        assert_eq!(
            req.header_value("accept"),
            Some("application/vnd.pgrst.object+json")
        );
        assert_eq!(req.header_value("accept-profile"), Some("inventory"));
    }

    #[test]
    fn invalid_column_is_kept_not_dropped() {
        let err = cities().eq("", 1).eq("id", 2).to_request().unwrap_err();
        assert!(matches!(err, SupabaseError::InvalidInput(_)));
    }

    #[test]
    fn first_error_wins() {
        let err = cities()
            .not("id", "between", 1)
            .order("", OrderDirection::Ascending)
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("between"));
    }

    #[test]
    fn recorded_error_keeps_its_variant_and_message() {
        let err = cities().or("").to_request().unwrap_err();
        match err {
            SupabaseError::InvalidInput(msg) => assert_eq!(msg, "or filter cannot be empty"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn invalid_range_and_empty_or() {
        assert!(cities().range(5, 1).to_request().is_err());
        assert!(cities().or("  ").to_request().is_err());
    }

    #[test]
    fn range_to_max_is_unlimited() {
        let req = cities().range(0, u64::MAX).to_request().unwrap();
        assert_eq!(req.query_value("offset"), Some("0"));
        assert_eq!(req.query_value("limit"), None);

        let req = cities().range(5, u64::MAX).to_request().unwrap();
        assert_eq!(req.query_value("offset"), Some("5"));
        let expected = (u64::MAX - 4).to_string();
        assert_eq!(req.query_value("limit"), Some(expected.as_str()));
    }

    #[test]
    fn identical_builders_render_identically() {
        let a = cities().eq("id", 1).limit(1).to_request().unwrap();
        let b = cities().eq("id", 1).limit(1).to_request().unwrap();
        assert_eq!(a, b);
    }
}
