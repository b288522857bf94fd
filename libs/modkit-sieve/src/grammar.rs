//! Sieve clause grammar.
//!
//! A filter clause is `<field><operator><value>` with no separators, a sort token is
//! `<field>` or `-<field>`, and both are carried on the wire as comma-separated lists.
//! Nothing inside a value is escaped, so a value containing `,` or an operator-like
//! substring does not survive a round trip.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Clause list delimiter.
pub const LIST_SEPARATOR: char = ',';

/// Prefix marking a descending sort token.
pub const DESCENDING_PREFIX: char = '-';

/// The fixed set of Sieve filter operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SieveOperator {
    Equals,
    NotEquals,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    StartsWith,
    GreaterThan,
    LessThan,
}

impl SieveOperator {
    /// Decomposition order: two-character tokens before the bare comparisons so that
    /// `>=` is never split into `>` plus a value starting with `=`.
    pub const PRIORITY: [SieveOperator; 8] = [
        SieveOperator::Equals,
        SieveOperator::NotEquals,
        SieveOperator::GreaterThanOrEqual,
        SieveOperator::LessThanOrEqual,
        SieveOperator::Contains,
        SieveOperator::StartsWith,
        SieveOperator::GreaterThan,
        SieveOperator::LessThan,
    ];

    /// Wire symbol of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            SieveOperator::Equals => "==",
            SieveOperator::NotEquals => "!=",
            SieveOperator::GreaterThanOrEqual => ">=",
            SieveOperator::LessThanOrEqual => "<=",
            SieveOperator::Contains => "@=",
            SieveOperator::StartsWith => "_=",
            SieveOperator::GreaterThan => ">",
            SieveOperator::LessThan => "<",
        }
    }
}

impl fmt::Display for SieveOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for SieveOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SieveOperator::PRIORITY
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| Error::UnknownOperator(s.to_owned()))
    }
}

/// Decomposed view of a filter clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterTerm {
    pub field_name: String,
    /// `None` for a degenerate clause without any recognised operator.
    pub operator: Option<SieveOperator>,
    pub raw_value: String,
    pub original_text: String,
}

impl FilterTerm {
    /// Operator symbol, or `""` for a degenerate clause.
    #[must_use]
    pub fn operator_symbol(&self) -> &'static str {
        self.operator.map_or("", SieveOperator::symbol)
    }

    /// Decompose a raw clause.
    ///
    /// The operator is the one whose first occurrence past index 0 comes earliest in
    /// the text; ties go to the operator listed first in [`SieveOperator::PRIORITY`].
    /// Text without any operator is kept whole as the field name.
    #[must_use]
    pub fn parse(clause: &str) -> Self {
        let mut best: Option<(usize, SieveOperator)> = None;
        for op in SieveOperator::PRIORITY {
            let found = clause
                .match_indices(op.symbol())
                .map(|(idx, _)| idx)
                .find(|idx| *idx > 0);
            if let Some(idx) = found {
                if best.is_none_or(|(best_idx, _)| idx < best_idx) {
                    best = Some((idx, op));
                }
            }
        }

        match best {
            Some((idx, op)) => FilterTerm {
                field_name: clause[..idx].to_owned(),
                operator: Some(op),
                raw_value: clause[idx + op.symbol().len()..].to_owned(),
                original_text: clause.to_owned(),
            },
            None => FilterTerm {
                field_name: clause.to_owned(),
                operator: None,
                raw_value: String::new(),
                original_text: clause.to_owned(),
            },
        }
    }
}

/// Decomposed view of a sort token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortTerm {
    pub field_name: String,
    pub descending: bool,
    pub original_text: String,
}

impl SortTerm {
    /// Decompose a raw sort token.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let (field_name, descending) = match token.strip_prefix(DESCENDING_PREFIX) {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        SortTerm {
            field_name: field_name.to_owned(),
            descending,
            original_text: token.to_owned(),
        }
    }
}

/// Render a filter clause. The symbol is not validated.
#[must_use]
pub fn filter_clause(field: &str, symbol: &str, value: &str) -> String {
    let mut out = String::with_capacity(field.len() + symbol.len() + value.len());
    out.push_str(field);
    out.push_str(symbol);
    out.push_str(value);
    out
}

/// Render a sort token.
#[must_use]
pub fn sort_token(field: &str, descending: bool) -> String {
    if descending {
        format!("{DESCENDING_PREFIX}{field}")
    } else {
        field.to_owned()
    }
}

/// Split a comma-separated clause list, trimming segments and dropping empty ones.
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
}

/// Join clause tokens into a comma-separated list.
#[must_use]
pub fn join_list(tokens: &[String]) -> String {
    tokens.join(",")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_every_operator_round_trips() {
        for op in SieveOperator::PRIORITY {
            for (field, value) in [("Name", "Bob"), ("a", ""), ("CreatedAt", "2024-01-01")] {
                let clause = filter_clause(field, op.symbol(), value);
                let term = FilterTerm::parse(&clause);
                assert_eq!(term.field_name, field, "clause {clause}");
                assert_eq!(term.operator, Some(op), "clause {clause}");
                assert_eq!(term.raw_value, value, "clause {clause}");
                assert_eq!(term.original_text, clause);
            }
        }
    }

    #[test]
    fn test_two_char_operator_wins_tie() {
        let term = FilterTerm::parse("Age>=18");
        assert_eq!(term.operator, Some(SieveOperator::GreaterThanOrEqual));
        assert_eq!(term.raw_value, "18");

        let term = FilterTerm::parse("Age<=18");
        assert_eq!(term.operator, Some(SieveOperator::LessThanOrEqual));
        assert_eq!(term.raw_value, "18");
    }

    #[test]
    fn test_earliest_operator_wins() {
        let term = FilterTerm::parse("Title@=a==b");
        assert_eq!(term.field_name, "Title");
        assert_eq!(term.operator, Some(SieveOperator::Contains));
        assert_eq!(term.raw_value, "a==b");
    }

    #[test]
    fn test_operator_at_start_is_skipped() {
        let term = FilterTerm::parse("==x==y");
        assert_eq!(term.field_name, "==x");
        assert_eq!(term.operator, Some(SieveOperator::Equals));
        assert_eq!(term.raw_value, "y");
    }

    #[test]
    fn test_degenerate_clause_is_preserved() {
        let term = FilterTerm::parse("JustAName");
        assert_eq!(term.field_name, "JustAName");
        assert_eq!(term.operator, None);
        assert_eq!(term.operator_symbol(), "");
        assert_eq!(term.raw_value, "");
        assert_eq!(term.original_text, "JustAName");
    }

    #[test]
    fn test_sort_terms() {
        let asc = SortTerm::parse("Name");
        assert_eq!(asc.field_name, "Name");
        assert!(!asc.descending);

        let desc = SortTerm::parse("-CreatedAt");
        assert_eq!(desc.field_name, "CreatedAt");
        assert!(desc.descending);
        assert_eq!(desc.original_text, "-CreatedAt");

        assert_eq!(sort_token("CreatedAt", true), "-CreatedAt");
        assert_eq!(sort_token("Name", false), "Name");
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("@=".parse::<SieveOperator>(), Ok(SieveOperator::Contains));
        assert_eq!("<".parse::<SieveOperator>(), Ok(SieveOperator::LessThan));
        assert_eq!(
            "@=*".parse::<SieveOperator>(),
            Err(Error::UnknownOperator("@=*".to_owned()))
        );
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        let parts: Vec<_> = split_list(" a==1 ,, b>2 ,").collect();
        assert_eq!(parts, vec!["a==1", "b>2"]);
        assert_eq!(split_list("").count(), 0);
    }
}
