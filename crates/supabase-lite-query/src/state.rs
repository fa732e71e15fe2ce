use std::fmt;
use std::str::FromStr;

use supabase_lite_core::SupabaseError;

// --- Filter types ---

/// A single condition in the query string. Conditions combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// `column=[not.]op.value`
    Predicate {
        column: String,
        operator: FilterOperator,
        negated: bool,
        /// Operand already rendered in PostgREST syntax.
        value: String,
    },
    /// `or=(a.eq.1,b.gt.2)`, given in PostgREST syntax.
    Or(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    Is,
    In,
    Contains,
    ContainedBy,
    Overlaps,
    TextSearch {
        search_type: TextSearchType,
        config: Option<String>,
    },
}

impl FilterOperator {
    /// The operator as it appears in the query string.
    pub fn as_postgrest(&self) -> String {
        let op = match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::Is => "is",
            Self::In => "in",
            Self::Contains => "cs",
            Self::ContainedBy => "cd",
            Self::Overlaps => "ov",
            Self::TextSearch {
                search_type,
                config,
            } => {
                return match config {
                    Some(cfg) => format!("{}({})", search_type.as_postgrest(), cfg),
                    None => search_type.as_postgrest().to_string(),
                };
            }
        };
        op.to_string()
    }
}

impl FromStr for FilterOperator {
    type Err = SupabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "like" => Self::Like,
            "ilike" => Self::ILike,
            "is" => Self::Is,
            "in" => Self::In,
            "cs" => Self::Contains,
            "cd" => Self::ContainedBy,
            "ov" => Self::Overlaps,
            "fts" | "plfts" | "phfts" | "wfts" => Self::TextSearch {
                search_type: s.parse()?,
                config: None,
            },
            other => {
                return Err(SupabaseError::invalid_input(format!(
                    "Unknown filter operator: {other:?}"
                )))
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsValue {
    Null,
    NotNull,
    True,
    False,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSearchType {
    /// `to_tsquery`
    Full,
    Plain,
    Phrase,
    Websearch,
}

impl TextSearchType {
    pub fn as_postgrest(&self) -> &'static str {
        match self {
            Self::Full => "fts",
            Self::Plain => "plfts",
            Self::Phrase => "phfts",
            Self::Websearch => "wfts",
        }
    }
}

impl FromStr for TextSearchType {
    type Err = SupabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fts" => Ok(Self::Full),
            "plfts" => Ok(Self::Plain),
            "phfts" => Ok(Self::Phrase),
            "wfts" => Ok(Self::Websearch),
            other => Err(SupabaseError::invalid_input(format!(
                "Unknown text search type: {other:?}"
            ))),
        }
    }
}

// --- Order / Modifier types ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub direction: OrderDirection,
    pub nulls: Option<NullsPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsPosition {
    First,
    Last,
}

/// Count mode for responses, sent as `Prefer: count=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountOption {
    /// No count requested.
    #[default]
    None,
    /// Exact count via COUNT(*).
    Exact,
    /// Planner estimate.
    Planned,
    /// Exact for small tables, planner estimate above the server's threshold.
    Estimated,
}

impl CountOption {
    /// Value of the `Prefer` header, if any.
    pub fn prefer(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Exact => Some("count=exact"),
            Self::Planned => Some("count=planned"),
            Self::Estimated => Some("count=estimated"),
        }
    }
}

impl fmt::Display for CountOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Exact => write!(f, "exact"),
            Self::Planned => write!(f, "planned"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

impl FromStr for CountOption {
    type Err = SupabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "exact" => Ok(Self::Exact),
            "planned" => Ok(Self::Planned),
            "estimated" => Ok(Self::Estimated),
            other => Err(SupabaseError::invalid_input(format!(
                "Unknown count mode: {other:?} (expected exact, planned, estimated or none)"
            ))),
        }
    }
}

// --- Query state ---

/// Everything a select accumulates before it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub schema: String,
    pub table: String,
    /// Projected columns (empty = *)
    pub columns: Vec<String>,
    pub count: CountOption,
    /// Count only, no body (HEAD)
    pub head: bool,
    pub filters: Vec<FilterCondition>,
    pub orders: Vec<OrderClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Ask for one object instead of an array
    pub single: bool,
}

impl QueryState {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns: Vec::new(),
            count: CountOption::None,
            head: false,
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            single: false,
        }
    }
}

/// Access to what a builder accumulates, shared by the filter and modifier traits.
pub trait BuilderState {
    fn state_mut(&mut self) -> &mut QueryState;
    /// Remember a validation error to surface at execute time. The first
    /// error wins.
    fn record_error(&mut self, error: SupabaseError);
}

/// Validate that a column name is non-empty and safe to put in a query string.
pub fn validate_column_name(name: &str) -> Result<(), SupabaseError> {
    validate_identifier(name, "Column")
}

/// Validate a table, function, schema or parameter name.
pub fn validate_identifier(name: &str, kind: &str) -> Result<(), SupabaseError> {
    if name.trim().is_empty() {
        return Err(SupabaseError::invalid_input(format!(
            "{kind} name cannot be empty"
        )));
    }
    if name.contains('"') || name.contains(';') || name.contains("--") {
        return Err(SupabaseError::invalid_input(format!(
            "Invalid {kind} name: {name:?} (contains prohibited characters)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_option_parse() {
        assert_eq!("exact".parse::<CountOption>().unwrap(), CountOption::Exact);
        assert_eq!("planned".parse::<CountOption>().unwrap(), CountOption::Planned);
        assert_eq!("estimated".parse::<CountOption>().unwrap(), CountOption::Estimated);
        assert_eq!("".parse::<CountOption>().unwrap(), CountOption::None);
        assert_eq!("none".parse::<CountOption>().unwrap(), CountOption::None);
    }

    #[test]
    fn count_option_rejects_unknown() {
        let err = "approximate".parse::<CountOption>().unwrap_err();
        assert!(matches!(err, SupabaseError::InvalidInput(_)));
    }

    #[test]
    fn count_option_prefer() {
        assert_eq!(CountOption::None.prefer(), None);
        assert_eq!(CountOption::Exact.prefer(), Some("count=exact"));
        assert_eq!(CountOption::Estimated.to_string(), "estimated");
    }

    #[test]
    fn operator_round_trip_through_text() {
        for op in ["eq", "neq", "gt", "gte", "lt", "lte", "like", "ilike", "is", "in", "cs", "cd", "ov", "wfts"] {
            assert_eq!(op.parse::<FilterOperator>().unwrap().as_postgrest(), op);
        }
        assert!("between".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn text_search_with_config() {
        let op = FilterOperator::TextSearch {
            search_type: TextSearchType::Websearch,
            config: Some("english".into()),
        };
        assert_eq!(op.as_postgrest(), "wfts(english)");
    }

    #[test]
    fn identifiers() {
        assert!(validate_identifier("countries", "Table").is_ok());
        assert!(validate_identifier("", "Table").is_err());
        assert!(validate_column_name("name; drop").is_err());
        assert!(validate_column_name("a--b").is_err());
    }
}
