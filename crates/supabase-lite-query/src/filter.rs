use supabase_lite_core::SupabaseError;

use crate::state::{
    validate_column_name, BuilderState, FilterCondition, FilterOperator, IsValue, TextSearchType,
};
use crate::value::{render_in_list, FilterValue, IntoFilterValue};

/// Trait providing all filter methods for query builders.
///
/// A rejected filter is never dropped silently: the error is kept by the
/// builder and returned by `execute`.
pub trait Filterable: BuilderState + Sized {
    /// Push `column=[not.]op.value` after validating the column.
    fn push_predicate(
        mut self,
        column: &str,
        operator: FilterOperator,
        negated: bool,
        value: FilterValue,
    ) -> Self {
        if let Err(e) = validate_column_name(column) {
            tracing::warn!(operator = %operator.as_postgrest(), "Invalid column name in filter: {e}");
            self.record_error(e);
            return self;
        }
        let value = match (&operator, value) {
            (FilterOperator::In, FilterValue::List(items)) => render_in_list(&items),
            (FilterOperator::In, single) => render_in_list(std::slice::from_ref(&single)),
            (_, other) => other.render(),
        };
        self.state_mut().filters.push(FilterCondition::Predicate {
            column: column.trim().to_string(),
            operator,
            negated,
            value,
        });
        self
    }

    /// Filter: column = value
    fn eq(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Eq, false, value.into_filter_value())
    }

    /// Filter: column != value
    fn neq(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Neq, false, value.into_filter_value())
    }

    /// Filter: column > value
    fn gt(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Gt, false, value.into_filter_value())
    }

    /// Filter: column >= value
    fn gte(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Gte, false, value.into_filter_value())
    }

    /// Filter: column < value
    fn lt(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Lt, false, value.into_filter_value())
    }

    /// Filter: column <= value
    fn lte(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Lte, false, value.into_filter_value())
    }

    /// Filter: column LIKE pattern (`*` or `%` as wildcard)
    fn like(self, column: &str, pattern: &str) -> Self {
        self.push_predicate(column, FilterOperator::Like, false, pattern.into_filter_value())
    }

    /// Filter: column ILIKE pattern (case-insensitive)
    fn ilike(self, column: &str, pattern: &str) -> Self {
        self.push_predicate(column, FilterOperator::ILike, false, pattern.into_filter_value())
    }

    /// Filter: column IS NULL / IS NOT NULL / IS TRUE / IS FALSE
    fn is(self, column: &str, value: IsValue) -> Self {
        let (negated, operand) = match value {
            IsValue::Null => (false, FilterValue::Null),
            IsValue::NotNull => (true, FilterValue::Null),
            IsValue::True => (false, FilterValue::Bool(true)),
            IsValue::False => (false, FilterValue::Bool(false)),
        };
        self.push_predicate(column, FilterOperator::Is, negated, operand)
    }

    /// Filter: column IN (val1, val2, ...)
    fn in_<V: IntoFilterValue>(self, column: &str, values: Vec<V>) -> Self {
        let items = values.into_iter().map(IntoFilterValue::into_filter_value).collect();
        self.push_predicate(column, FilterOperator::In, false, FilterValue::List(items))
    }

    /// Filter: column @> value (array, range or jsonb containment)
    fn contains(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Contains, false, value.into_filter_value())
    }

    /// Filter: column <@ value
    fn contained_by(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::ContainedBy, false, value.into_filter_value())
    }

    /// Filter: column && value
    fn overlaps(self, column: &str, value: impl IntoFilterValue) -> Self {
        self.push_predicate(column, FilterOperator::Overlaps, false, value.into_filter_value())
    }

    /// Full-text search filter.
    fn text_search(
        self,
        column: &str,
        query: &str,
        search_type: TextSearchType,
        config: Option<&str>,
    ) -> Self {
        let operator = FilterOperator::TextSearch {
            search_type,
            config: config.map(str::to_string),
        };
        self.push_predicate(column, operator, false, query.into_filter_value())
    }

    /// Negated filter: `column=not.{operator}.{value}`.
    fn not(mut self, column: &str, operator: &str, value: impl IntoFilterValue) -> Self {
        match operator.parse::<FilterOperator>() {
            Ok(op) => self.push_predicate(column, op, true, value.into_filter_value()),
            Err(e) => {
                tracing::warn!("Invalid operator in not filter: {e}");
                self.record_error(e);
                self
            }
        }
    }

    /// OR filter in PostgREST syntax, e.g. `"id.eq.1,name.eq.Japan"`.
    fn or(mut self, filters: &str) -> Self {
        let filters = filters.trim();
        if filters.is_empty() {
            tracing::warn!("Empty or filter");
            self.record_error(SupabaseError::invalid_input("or filter cannot be empty"));
            return self;
        }
        self.state_mut().filters.push(FilterCondition::Or(filters.to_string()));
        self
    }

    /// Match multiple column=value pairs (all must match).
    fn match_all<'a, V: IntoFilterValue>(
        self,
        pairs: impl IntoIterator<Item = (&'a str, V)>,
    ) -> Self {
        pairs
            .into_iter()
            .fold(self, |builder, (column, value)| builder.eq(column, value))
    }

    /// Escape hatch: any PostgREST operator by name, e.g. `filter("id", "in", "(1,2)")`.
    /// Text operands are written as given.
    fn filter(mut self, column: &str, operator: &str, value: impl IntoFilterValue) -> Self {
        let (negated, operator) = match operator.strip_prefix("not.") {
            Some(rest) => (true, rest),
            None => (false, operator),
        };
        let op = match operator.parse::<FilterOperator>() {
            Ok(op) => op,
            Err(e) => {
                tracing::warn!("Invalid operator in filter: {e}");
                self.record_error(e);
                return self;
            }
        };
        match value.into_filter_value() {
            FilterValue::Text(raw) => {
                if let Err(e) = validate_column_name(column) {
                    tracing::warn!("Invalid column name in filter: {e}");
                    self.record_error(e);
                    return self;
                }
                self.state_mut().filters.push(FilterCondition::Predicate {
                    column: column.trim().to_string(),
                    operator: op,
                    negated,
                    value: raw,
                });
                self
            }
            other => self.push_predicate(column, op, negated, other),
        }
    }
}
