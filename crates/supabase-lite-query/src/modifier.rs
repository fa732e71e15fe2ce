use supabase_lite_core::SupabaseError;

use crate::state::{validate_column_name, BuilderState, NullsPosition, OrderClause, OrderDirection};

/// Trait providing modifier methods (order, limit, range, single).
pub trait Modifiable: BuilderState + Sized {
    /// Order by a column.
    fn order(self, column: &str, direction: OrderDirection) -> Self {
        self.push_order(column, direction, None)
    }

    /// Order by a column with explicit nulls positioning.
    fn order_with_nulls(
        self,
        column: &str,
        direction: OrderDirection,
        nulls: NullsPosition,
    ) -> Self {
        self.push_order(column, direction, Some(nulls))
    }

    #[doc(hidden)]
    fn push_order(
        mut self,
        column: &str,
        direction: OrderDirection,
        nulls: Option<NullsPosition>,
    ) -> Self {
        if let Err(e) = validate_column_name(column) {
            tracing::warn!("Invalid column name in order: {e}");
            self.record_error(e);
            return self;
        }
        self.state_mut().orders.push(OrderClause {
            column: column.trim().to_string(),
            direction,
            nulls,
        });
        self
    }

    /// Limit the number of rows returned.
    fn limit(mut self, count: u64) -> Self {
        self.state_mut().limit = Some(count);
        self
    }

    /// Return rows `from..=to` (zero-based, inclusive).
    fn range(mut self, from: u64, to: u64) -> Self {
        if to < from {
            tracing::warn!(from, to, "Invalid range");
            self.record_error(SupabaseError::invalid_input(format!(
                "range end ({to}) must not be before start ({from})"
            )));
            return self;
        }
        self.state_mut().offset = Some(from);
        // `0..=u64::MAX` has no representable row count; leave it unlimited.
        self.state_mut().limit = (to - from).checked_add(1);
        self
    }

    /// Return one object instead of an array. The server answers 406 when
    /// the filters match zero or several rows.
    fn single(mut self) -> Self {
        self.state_mut().single = true;
        self
    }
}
