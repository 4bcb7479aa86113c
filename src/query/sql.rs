//! Translation of search predicates into parameterised SQL.

use serde::Serialize;

use super::{Predicate, QueryError};
use crate::utils::validate_field_name;

/// A `WHERE` clause body with positional `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlFragment {
    pub sql: String,
    /// Bound values in placeholder order.
    pub params: Vec<String>,
}

impl Predicate {
    /// Compile into a SQL fragment.
    ///
    /// Each `FieldContains` becomes an upper-cased `LIKE` with the term bound
    /// as a `%term%` parameter; LIKE wildcards in the term are escaped.
    ///
    /// ```
    /// use listing_search::query::Predicate;
    ///
    /// let fragment = Predicate::contains("title", "50%").to_sql().unwrap();
    /// assert_eq!(fragment.sql, r#"UPPER("title") LIKE UPPER(?) ESCAPE '\'"#);
    /// assert_eq!(fragment.params, vec![r"%50\%%"]);
    /// ```
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidField`] if a field name is not a plain identifier.
    pub fn to_sql(&self) -> Result<SqlFragment, QueryError> {
        let mut params = Vec::with_capacity(self.leaf_count());
        let sql = write_sql(self, &mut params)?;
        Ok(SqlFragment { sql, params })
    }
}

fn write_sql(predicate: &Predicate, params: &mut Vec<String>) -> Result<String, QueryError> {
    match predicate {
        Predicate::FieldContains { field, term } => {
            validate_field_name(field)?;
            params.push(like_pattern(term));
            Ok(format!(r#"UPPER("{}") LIKE UPPER(?) ESCAPE '\'"#, field))
        }
        Predicate::And(left, right) => {
            let left = write_sql(left, params)?;
            let right = write_sql(right, params)?;
            Ok(format!("({} AND {})", left, right))
        }
        Predicate::Or(left, right) => {
            let left = write_sql(left, params)?;
            let right = write_sql(right, params)?;
            Ok(format!("({} OR {})", left, right))
        }
    }
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
