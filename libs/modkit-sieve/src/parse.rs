//! Reading builder state back from a query string or a `SieveModel`.
//!
//! Parsing never fails. Segments that cannot be understood are dropped and the
//! builder reflects whatever was parsed successfully; round-trip fidelity is only
//! promised for input this crate produced itself.

use crate::builder::SieveQuery;
use crate::grammar;
use crate::model::SieveModel;
use crate::options::SieveOptions;
use crate::schema::Schema;

impl<S: Schema> SieveQuery<S> {
    /// Parse a raw query string such as `?filters=Name%40%3DBob&page=2`.
    ///
    /// Parameter names are matched case-insensitively. Repeated parameters overwrite
    /// earlier ones.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, SieveOptions::default())
    }

    /// [`Self::parse`] with explicit options.
    #[must_use]
    pub fn parse_with(raw: &str, options: SieveOptions) -> Self {
        let mut query = Self::with_options(options);
        let raw = raw.trim();
        let raw = raw.strip_prefix('?').unwrap_or(raw);

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                tracing::debug!(segment = pair, "ignoring sieve parameter without value");
                continue;
            };
            let value = match urlencoding::decode(value) {
                Ok(decoded) => decoded,
                Err(err) => {
                    tracing::debug!(
                        segment = pair,
                        error = %err,
                        "ignoring undecodable sieve parameter"
                    );
                    continue;
                }
            };

            match key.to_lowercase().as_str() {
                "filters" => query.filters = tokens(&value),
                "sorts" => query.sorts = tokens(&value),
                "page" => {
                    if let Some(n) = number(key, &value) {
                        query.page = Some(n);
                    }
                }
                "pagesize" => {
                    if let Some(n) = number(key, &value) {
                        query.page_size = Some(n);
                    }
                }
                other => tracing::trace!(key = other, "ignoring unknown sieve parameter"),
            }
        }

        query
    }

    /// Rebuild a builder from a structured record.
    #[must_use]
    pub fn from_model(model: &SieveModel) -> Self {
        Self::from_model_with(model, SieveOptions::default())
    }

    /// [`Self::from_model`] with explicit options.
    #[must_use]
    pub fn from_model_with(model: &SieveModel, options: SieveOptions) -> Self {
        let mut query = Self::with_options(options);
        if let Some(filters) = model.filters.as_deref() {
            query.filters = tokens(filters);
        }
        if let Some(sorts) = model.sorts.as_deref() {
            query.sorts = tokens(sorts);
        }
        query.page = model.page;
        query.page_size = model.page_size;
        query
    }
}

impl<S: Schema> From<&SieveModel> for SieveQuery<S> {
    fn from(model: &SieveModel) -> Self {
        Self::from_model(model)
    }
}

impl<S: Schema> From<SieveModel> for SieveQuery<S> {
    fn from(model: SieveModel) -> Self {
        Self::from_model(&model)
    }
}

fn tokens(list: &str) -> Vec<String> {
    grammar::split_list(list).map(str::to_owned).collect()
}

fn number(key: &str, value: &str) -> Option<u32> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(err) => {
            tracing::debug!(key, value, error = %err, "ignoring unparseable sieve page number");
            None
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::DynamicSieveQuery;
    use crate::grammar::SieveOperator;

    #[test]
    fn test_parse_full_query() {
        let q = DynamicSieveQuery::parse(
            "?filters=Name%40%3DBob%2CAge%3E%3D18&sorts=-CreatedAt,Name&page=2&pageSize=25",
        );
        let filters = q.filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].field_name, "Name");
        assert_eq!(filters[0].operator, Some(SieveOperator::Contains));
        assert_eq!(filters[0].raw_value, "Bob");
        assert_eq!(filters[1].field_name, "Age");
        assert_eq!(filters[1].operator, Some(SieveOperator::GreaterThanOrEqual));

        let sorts = q.sorts();
        assert_eq!(sorts.len(), 2);
        assert!(sorts[0].descending);
        assert_eq!(sorts[0].field_name, "CreatedAt");
        assert!(!sorts[1].descending);

        assert_eq!(q.current_page(), Some(2));
        assert_eq!(q.current_page_size(), Some(25));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let q = DynamicSieveQuery::parse("filters=Name==Bob");
        assert_eq!(q.filter_string(), "Name==Bob");
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let upper = DynamicSieveQuery::parse("Filters=Name@=Bob&Page=1&PAGESIZE=5&SORTS=Name");
        let lower = DynamicSieveQuery::parse("filters=Name@=Bob&page=1&pagesize=5&sorts=Name");
        assert_eq!(upper, lower);
        assert_eq!(upper.current_page_size(), Some(5));
    }

    #[test]
    fn test_empty_input() {
        for raw in ["", "   ", "?", "&&"] {
            let q = DynamicSieveQuery::parse(raw);
            assert!(q.filters().is_empty());
            assert!(q.sorts().is_empty());
            assert_eq!(q.current_page(), None);
            assert_eq!(q.current_page_size(), None);
        }
    }

    #[test]
    fn test_malformed_segments_are_dropped() {
        let q = DynamicSieveQuery::parse(
            "filters&page=abc&pageSize=-1&unknown=1&sorts=Name&filters=Title%FF",
        );
        assert!(q.filters().is_empty());
        assert_eq!(q.sort_string(), "Name");
        assert_eq!(q.current_page(), None);
        assert_eq!(q.current_page_size(), None);
    }

    #[test]
    fn test_empty_segments_in_lists_are_dropped() {
        let q = DynamicSieveQuery::parse("filters=%20a%3D%3D1%20%2C%2C&sorts=%2C");
        assert_eq!(q.filter_string(), "a==1");
        assert!(q.sorts().is_empty());
    }

    #[test]
    fn test_plus_is_not_a_space() {
        let q = DynamicSieveQuery::parse("filters=Name==a+b");
        assert_eq!(q.filters()[0].raw_value, "a+b");
    }

    #[test]
    fn test_from_model() {
        let model = SieveModel {
            filters: Some("Title@=a, Likes>3".to_owned()),
            sorts: Some(String::new()),
            page: Some(4),
            page_size: None,
        };
        let q = DynamicSieveQuery::from_model(&model);
        assert_eq!(q.filter_string(), "Title@=a,Likes>3");
        assert!(q.sorts().is_empty());
        assert_eq!(q.current_page(), Some(4));
        assert_eq!(q.current_page_size(), None);
    }

    #[test]
    fn test_from_empty_model() {
        let q: DynamicSieveQuery = SieveModel::default().into();
        assert!(q.filters().is_empty());
        assert!(q.sorts().is_empty());
        assert_eq!(q.current_page(), None);
        assert_eq!(q.current_page_size(), None);
    }
}
