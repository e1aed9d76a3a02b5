//! Query definitions
//!
//! [`SqlQuery`] is parameterized query text in the Cosmos DB SQL dialect.
//! [`Filter`] builds equality queries that run server-side; it keeps its
//! clauses so stores that cannot parse SQL can still evaluate them.

use super::errors::RepoError;
use super::result::Result;
use serde::Serialize;
use serde_json::Value;

/// Query text selecting every document in a container
pub const SELECT_ALL: &str = "SELECT * FROM c";

/// A named query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParameter {
    /// Parameter name including the leading `@`
    pub name: String,

    /// Parameter value
    pub value: Value,
}

/// Query text with its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    text: String,
    parameters: Vec<QueryParameter>,
    filter: Option<Filter>,
}

impl SqlQuery {
    /// Creates a query from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Vec::new(),
            filter: None,
        }
    }

    /// `SELECT * FROM c`
    pub fn select_all() -> Self {
        Self::new(SELECT_ALL)
    }

    /// Adds a parameter; a missing `@` prefix is added to the name
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Serialization`] if the value cannot be converted to JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmos_repo::domain::query::SqlQuery;
    ///
    /// let query = SqlQuery::new("SELECT * FROM c WHERE c.status = @status")
    ///     .with_parameter("status", "open")
    ///     .unwrap();
    /// assert_eq!(query.parameters()[0].name, "@status");
    /// ```
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.push_parameter(name.into(), value);
        Ok(self)
    }

    /// Adds a set of already-converted parameters
    pub fn with_parameters<I, K>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (name, value) in parameters {
            self.push_parameter(name.into(), value);
        }
        self
    }

    fn push_parameter(&mut self, name: String, value: Value) {
        let name = if name.starts_with('@') {
            name
        } else {
            format!("@{name}")
        };
        self.parameters.push(QueryParameter { name, value });
    }

    /// The query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The query parameters in insertion order
    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    /// The structured filter this query was built from, if any
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Whether the text selects every document without a predicate
    pub fn is_select_all(&self) -> bool {
        let normalized = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        normalized.eq_ignore_ascii_case(SELECT_ALL)
    }

    /// Fails with an argument error if the query text is empty
    pub fn require_text(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(RepoError::empty_argument("queryText"));
        }
        Ok(())
    }
}

/// Server-side equality filter builder
///
/// Field paths use `.` between nesting levels. Every clause becomes
/// `c["a"]["b"] = @pN` joined with `AND`.
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::query::Filter;
///
/// let query = Filter::new()
///     .eq("status", "open")
///     .eq("customer.region", "eu")
///     .into_query();
///
/// assert_eq!(
///     query.text(),
///     r#"SELECT * FROM c WHERE c["status"] = @p0 AND c["customer"]["region"] = @p1"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(Vec<String>, Value)>,
}

impl Filter {
    /// Creates an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        let path = field
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.clauses.push((path, value.into()));
        self
    }

    /// Whether the filter has no clauses
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates the filter against a document
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|(path, expected)| {
            let mut current = document;
            for segment in path {
                match current.get(segment) {
                    Some(next) => current = next,
                    None => return false,
                }
            }
            current == expected
        })
    }

    /// Builds the parameterized query text
    pub fn into_query(self) -> SqlQuery {
        let mut text = String::from(SELECT_ALL);
        let mut parameters = Vec::with_capacity(self.clauses.len());

        for (index, (path, value)) in self.clauses.iter().enumerate() {
            text.push_str(if index == 0 { " WHERE " } else { " AND " });
            text.push('c');
            for segment in path {
                let quoted = Value::String(segment.clone()).to_string();
                text.push_str(&format!("[{quoted}]"));
            }
            let name = format!("@p{index}");
            text.push_str(&format!(" = {name}"));
            parameters.push(QueryParameter {
                name,
                value: value.clone(),
            });
        }

        SqlQuery {
            text,
            parameters,
            filter: Some(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_prefix_is_added() {
        let query = SqlQuery::new("SELECT * FROM c WHERE c.a = @a AND c.b = @b")
            .with_parameter("a", 1)
            .unwrap()
            .with_parameters(vec![("@b", json!("two"))]);

        let names: Vec<&str> = query.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["@a", "@b"]);
        assert_eq!(query.parameters()[1].value, json!("two"));
        assert!(query.filter().is_none());
    }

    #[test]
    fn test_select_all_detection() {
        assert!(SqlQuery::select_all().is_select_all());
        assert!(SqlQuery::new("  select *   from C ").is_select_all());
        assert!(!SqlQuery::new("SELECT c.id FROM c").is_select_all());
    }

    #[test]
    fn test_require_text() {
        assert!(SqlQuery::select_all().require_text().is_ok());
        assert!(matches!(
            SqlQuery::new("  ").require_text(),
            Err(RepoError::Argument { argument, .. }) if argument == "queryText"
        ));
    }

    #[test]
    fn test_empty_filter_selects_all() {
        let query = Filter::new().into_query();
        assert!(query.is_select_all());
        assert!(query.parameters().is_empty());
        assert!(query.filter().unwrap().matches(&json!({"id": "x"})));
    }

    #[test]
    fn test_filter_escapes_field_names() {
        let query = Filter::new().eq("we\"ird", 1).into_query();
        assert_eq!(query.text(), r#"SELECT * FROM c WHERE c["we\"ird"] = @p0"#);
    }

    #[test]
    fn test_filter_matches_nested_fields() {
        let filter = Filter::new().eq("status", "open").eq("customer.region", "eu");

        assert!(filter.matches(&json!({"status": "open", "customer": {"region": "eu"}})));
        assert!(!filter.matches(&json!({"status": "open", "customer": {"region": "us"}})));
        assert!(!filter.matches(&json!({"status": "open"})));
    }
}
