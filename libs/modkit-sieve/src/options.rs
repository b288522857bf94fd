//! Builder configuration.

use serde::Deserialize;

/// How declared schema names are spelled on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCase {
    /// Upper-case the first character (`createdAt` -> `CreatedAt`), matching the
    /// property names of the server-side models.
    #[default]
    Pascal,
    /// Use the declared name unchanged.
    AsDeclared,
}

impl FieldCase {
    /// Render a declared field name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            FieldCase::AsDeclared => name.to_owned(),
            FieldCase::Pascal => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// What the structured record reports for page and page size that were never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationDefaults {
    /// Leave unset values out.
    #[default]
    Omit,
    /// Substitute fixed values.
    Fallback {
        #[serde(default = "default_page")]
        page: u32,
        #[serde(default = "default_page_size")]
        page_size: u32,
    },
}

const fn default_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    10
}

impl PaginationDefaults {
    /// Fallback policy with the conventional first page of ten items.
    #[must_use]
    pub const fn fallback() -> Self {
        PaginationDefaults::Fallback {
            page: default_page(),
            page_size: default_page_size(),
        }
    }

    /// Resolve `(page, page_size)` against this policy.
    #[must_use]
    pub fn resolve(self, page: Option<u32>, page_size: Option<u32>) -> (Option<u32>, Option<u32>) {
        match self {
            PaginationDefaults::Omit => (page, page_size),
            PaginationDefaults::Fallback {
                page: default_page,
                page_size: default_size,
            } => (
                Some(page.unwrap_or(default_page)),
                Some(page_size.unwrap_or(default_size)),
            ),
        }
    }
}

/// Configuration for Sieve query builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SieveOptions {
    /// Spelling of typed field names. Default: `pascal`.
    pub field_case: FieldCase,
    /// Page/page-size policy for the structured record. Default: `omit`.
    pub pagination: PaginationDefaults,
}

impl SieveOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field-name spelling
    #[must_use]
    pub fn with_field_case(mut self, field_case: FieldCase) -> Self {
        self.field_case = field_case;
        self
    }

    /// Set the pagination policy
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationDefaults) -> Self {
        self.pagination = pagination;
        self
    }
}
