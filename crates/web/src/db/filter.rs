//! Product search filters.
//!
//! A [`ProductFilter`] is a conjunction of optional conditions that renders
//! itself into a [`QueryBuilder`]. User input only ever reaches SQLite as a
//! bound parameter; the SQL text is fixed.

use sqlx::{QueryBuilder, Sqlite};

/// Category value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

/// Escape character used in LIKE patterns.
const LIKE_ESCAPE: char = '\\';

/// Search filter for products.
///
/// - `term` matches `name`, `category` or `description` as a
///   case-insensitive substring (any of the three).
/// - `category` restricts to an exact category match.
///
/// Blank values and the [`ALL_CATEGORIES`] sentinel are dropped on
/// construction, so an empty filter selects every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    term: Option<String>,
    category: Option<String>,
}

impl ProductFilter {
    /// Build a filter from raw query parameters.
    #[must_use]
    pub fn new(term: Option<&str>, category: Option<&str>) -> Self {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_owned);

        Self { term, category }
    }

    /// The search term, if any.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// The category restriction, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the filter selects every product.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.term.is_none() && self.category.is_none()
    }

    /// Append the `WHERE` clause for this filter, if it has any conditions.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        let mut keyword = " WHERE ";

        if let Some(term) = &self.term {
            let pattern = like_pattern(term);
            query.push(keyword).push("(name LIKE ");
            query.push_bind(pattern.clone()).push(" ESCAPE '\\'");
            query.push(" OR category LIKE ");
            query.push_bind(pattern.clone()).push(" ESCAPE '\\'");
            query.push(" OR description LIKE ");
            query.push_bind(pattern).push(" ESCAPE '\\')");
            keyword = " AND ";
        }

        if let Some(category) = &self.category {
            query.push(keyword).push("category = ");
            query.push_bind(category.clone());
        }
    }
}

/// Build a `%term%` LIKE pattern that matches `term` literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filter: &ProductFilter) -> String {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM products");
        filter.push_where(&mut query);
        query.sql().to_owned()
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let filter = ProductFilter::new(Some("   "), Some(""));
        assert!(filter.is_empty());
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_all_sentinel_is_dropped() {
        let filter = ProductFilter::new(None, Some("all"));
        assert!(filter.category().is_none());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_values_are_trimmed() {
        let filter = ProductFilter::new(Some(" arroz "), Some(" Grãos "));
        assert_eq!(filter.term(), Some("arroz"));
        assert_eq!(filter.category(), Some("Grãos"));
    }

    #[test]
    fn test_empty_filter_renders_no_where_clause() {
        assert_eq!(render(&ProductFilter::default()), "SELECT id FROM products");
    }

    #[test]
    fn test_term_renders_three_bound_likes() {
        let sql = render(&ProductFilter::new(Some("café"), None));
        assert_eq!(
            sql,
            "SELECT id FROM products WHERE (name LIKE ? ESCAPE '\\' OR category LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')"
        );
        assert!(!sql.contains("café"));
    }

    #[test]
    fn test_term_and_category_are_conjoined() {
        let sql = render(&ProductFilter::new(Some("x"), Some("Grãos")));
        assert!(sql.ends_with(" AND category = ?"));
        assert!(!sql.contains("Grãos"));
    }

    #[test]
    fn test_category_alone() {
        let sql = render(&ProductFilter::new(None, Some("Massas")));
        assert_eq!(sql, "SELECT id FROM products WHERE category = ?");
    }

    #[test]
    fn test_injection_attempt_stays_out_of_sql() {
        let sql = render(&ProductFilter::new(
            Some("' OR 1=1; DROP TABLE products; --"),
            Some("x' OR '1'='1"),
        ));
        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("1=1"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("arroz"), "%arroz%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
