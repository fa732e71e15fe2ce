use supabase_lite_core::{SupabaseError, Transport};

use crate::select::SelectBuilder;
use crate::state::{validate_column_name, validate_identifier, CountOption, QueryState};

/// Entry point query builder created by `client.from("table")`.
///
/// Call `.select()` to specialize into a [`SelectBuilder`].
pub struct QueryBuilder {
    transport: Transport,
    state: QueryState,
    error: Option<SupabaseError>,
}

impl QueryBuilder {
    pub fn new(transport: Transport, schema: String, table: String) -> Self {
        let error = validate_identifier(&table, "Table").err();
        if let Some(e) = &error {
            tracing::warn!(table = %table, "Invalid table name: {e}");
        }
        Self {
            transport,
            state: QueryState::new(schema, table.trim()),
            error,
        }
    }

    /// Start a SELECT query.
    ///
    /// `columns` is a comma-separated list like `"name, country_id"`; empty
    /// or `"*"` selects every column. `head` asks for the count only.
    pub fn select(self, columns: &str, count: CountOption, head: bool) -> SelectBuilder {
        let mut state = self.state;
        let mut error = self.error;

        let columns = columns.trim();
        if !columns.is_empty() && columns != "*" {
            for column in columns.split(',').map(str::trim) {
                if let Err(e) = validate_column_name(column) {
                    tracing::warn!("Invalid column name in select: {e}");
                    error.get_or_insert(e);
                    continue;
                }
                state.columns.push(column.to_string());
            }
        }
        state.count = count;
        state.head = head;

        SelectBuilder::new(self.transport, state, error)
    }
}
