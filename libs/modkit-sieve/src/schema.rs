//! Sieve schema types for type-safe query building.
//!
//! This module defines the field-name authority used by the builder:
//! - `Schema` trait: maps field enums to wire names and lists every declared field
//! - `FieldRef`: type-safe field references with compile-time value checking
//! - `FilterClause`: a typed clause produced by the `FieldRef` constructors
//!
//! The server decides which fields are actually filterable or sortable; a schema only
//! constrains which names the caller can spell.

use crate::Error;
use crate::grammar::SieveOperator;
use crate::value::{IntoSieveValue, SieveValue};
use std::marker::PhantomData;

/// Schema trait defining field enums and their string mappings.
///
/// Implement it by hand or with `#[derive(SieveSchema)]`.
///
/// # Example
///
/// ```rust
/// use modkit_sieve::Schema;
///
/// #[derive(Copy, Clone, Debug, Eq, PartialEq)]
/// enum PostField {
///     Title,
///     CreatedAt,
/// }
///
/// struct PostSchema;
///
/// impl Schema for PostSchema {
///     type Field = PostField;
///
///     const FIELDS: &'static [PostField] = &[PostField::Title, PostField::CreatedAt];
///
///     fn field_name(field: Self::Field) -> &'static str {
///         match field {
///             PostField::Title => "title",
///             PostField::CreatedAt => "createdAt",
///         }
///     }
/// }
///
/// assert_eq!(PostSchema::resolve_field("p => p.title"), Ok(PostField::Title));
/// ```
pub trait Schema {
    /// The field enum type (must be Copy + Eq)
    type Field: Copy + Eq + 'static;

    /// Every declared field, in declaration order.
    const FIELDS: &'static [Self::Field];

    /// Map a field enum to its string name
    fn field_name(field: Self::Field) -> &'static str;

    /// Name of the record member behind `field`, when it differs from the wire name.
    fn member_name(field: Self::Field) -> &'static str {
        Self::field_name(field)
    }

    /// Resolve a textual field accessor to a declared field.
    ///
    /// Accepted shapes are a bare member (`title`), a member read on a receiver
    /// (`p.title`), the same wrapped in a closure (`|p| p.title`, `p => p.title`), each
    /// optionally followed by a single boxing cast (`p.age as i64`). Member names match
    /// declared wire or member names case-insensitively.
    ///
    /// # Errors
    /// Returns `Error::InvalidFieldExpression` for computed expressions, method calls,
    /// indexers, nested member paths, and members that are not declared.
    fn resolve_field(expr: &str) -> Result<Self::Field, Error> {
        let member = accessor_member(expr)
            .ok_or_else(|| Error::InvalidFieldExpression(expr.to_owned()))?;
        Self::FIELDS
            .iter()
            .copied()
            .find(|f| {
                Self::field_name(*f).eq_ignore_ascii_case(member)
                    || Self::member_name(*f).eq_ignore_ascii_case(member)
            })
            .ok_or_else(|| Error::InvalidFieldExpression(expr.to_owned()))
    }
}

/// Schema with no declared fields, for callers that only use by-name operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Untyped;

/// Field type of [`Untyped`]; it has no values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoField {}

impl Schema for Untyped {
    type Field = NoField;

    const FIELDS: &'static [NoField] = &[];

    fn field_name(field: Self::Field) -> &'static str {
        match field {}
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Extract the member name from a direct property-read accessor.
fn accessor_member(expr: &str) -> Option<&str> {
    let mut body = expr.trim();

    // closure forms: `|p| body` and `p => body`
    if let Some(rest) = body.strip_prefix('|') {
        let (param, rest) = rest.split_once('|')?;
        if !is_identifier(param.trim()) {
            return None;
        }
        body = rest.trim();
    } else if let Some((param, rest)) = body.split_once("=>") {
        if !is_identifier(param.trim()) {
            return None;
        }
        body = rest.trim();
    }

    // a single boxing cast
    if let Some((inner, ty)) = body.split_once(" as ") {
        if !is_identifier(ty.trim()) {
            return None;
        }
        body = inner.trim();
    }

    let member = match body.split_once('.') {
        Some((receiver, member)) if is_identifier(receiver.trim()) => member.trim(),
        Some(_) => return None,
        None => body,
    };

    is_identifier(member).then_some(member)
}

/// Type-safe field reference holding schema and Rust type information.
///
/// **NOTE:** equality is based solely on the underlying schema field; `T` is a phantom
/// type used only to select which clause constructors are available.
///
/// # Type Parameters
///
/// * `S` - The schema type implementing `Schema`
/// * `T` - The Rust type this field represents (e.g., `String`, `i32`)
pub struct FieldRef<S: Schema, T> {
    field: S::Field,
    _phantom: PhantomData<(S, T)>,
}

impl<S: Schema, T> FieldRef<S, T> {
    /// Create a new typed field reference.
    ///
    /// ```rust,ignore
    /// const TITLE: FieldRef<PostSchema, String> = FieldRef::new(PostField::Title);
    /// ```
    #[must_use]
    pub const fn new(field: S::Field) -> Self {
        Self {
            field,
            _phantom: PhantomData,
        }
    }

    /// Declared field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        S::field_name(self.field)
    }

    /// Underlying schema field key.
    #[must_use]
    pub fn field(&self) -> S::Field {
        self.field
    }

    fn clause(self, operator: SieveOperator, value: SieveValue) -> FilterClause<S> {
        FilterClause {
            field: self.field,
            operator,
            value,
        }
    }
}

impl<S: Schema, T> Clone for FieldRef<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Schema, T> Copy for FieldRef<S, T> {}

impl<S: Schema, T> std::fmt::Debug for FieldRef<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("field", &self.name())
            .finish()
    }
}

impl<S: Schema, T> PartialEq for FieldRef<S, T> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
    }
}

impl<S: Schema, T> Eq for FieldRef<S, T> {}

/// Trait for extracting schema field keys from field references.
///
/// Lets `sort_by` and friends accept `FieldRef`s of any value type.
#[doc(hidden)]
pub trait AsFieldKey<S: Schema> {
    /// Get the schema field key.
    fn as_field_key(&self) -> S::Field;
}

impl<S: Schema, T> AsFieldKey<S> for FieldRef<S, T> {
    fn as_field_key(&self) -> S::Field {
        self.field
    }
}

impl<S: Schema, T: AsFieldKey<S> + ?Sized> AsFieldKey<S> for &T {
    fn as_field_key(&self) -> S::Field {
        (*self).as_field_key()
    }
}

/// A typed filter clause waiting to be added to a builder.
pub struct FilterClause<S: Schema> {
    field: S::Field,
    operator: SieveOperator,
    value: SieveValue,
}

impl<S: Schema> FilterClause<S> {
    #[must_use]
    pub fn field(&self) -> S::Field {
        self.field
    }

    #[must_use]
    pub fn operator(&self) -> SieveOperator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> &SieveValue {
        &self.value
    }
}

impl<S: Schema> Clone for FilterClause<S> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            operator: self.operator,
            value: self.value.clone(),
        }
    }
}

impl<S: Schema> std::fmt::Debug for FilterClause<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterClause")
            .field("field", &S::field_name(self.field))
            .field("operator", &self.operator)
            .field("value", &self.value)
            .finish()
    }
}

/// Comparison operations for any field type.
impl<S: Schema, T> FieldRef<S, T> {
    /// `field==value`
    #[must_use]
    pub fn eq<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::Equals, value.into_sieve_value())
    }

    /// `field!=value`
    #[must_use]
    pub fn ne<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::NotEquals, value.into_sieve_value())
    }

    /// `field>value`
    #[must_use]
    pub fn gt<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::GreaterThan, value.into_sieve_value())
    }

    /// `field>=value`
    #[must_use]
    pub fn ge<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::GreaterThanOrEqual, value.into_sieve_value())
    }

    /// `field<value`
    #[must_use]
    pub fn lt<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::LessThan, value.into_sieve_value())
    }

    /// `field<=value`
    #[must_use]
    pub fn le<V: IntoSieveValue>(self, value: V) -> FilterClause<S> {
        self.clause(SieveOperator::LessThanOrEqual, value.into_sieve_value())
    }
}

/// String-specific operations (only available for String fields).
impl<S: Schema> FieldRef<S, String> {
    /// `field@=substring`
    #[must_use]
    pub fn contains(self, substring: &str) -> FilterClause<S> {
        self.clause(
            SieveOperator::Contains,
            SieveValue::String(substring.to_owned()),
        )
    }

    /// `field_=prefix`
    #[must_use]
    pub fn starts_with(self, prefix: &str) -> FilterClause<S> {
        self.clause(
            SieveOperator::StartsWith,
            SieveValue::String(prefix.to_owned()),
        )
    }
}
