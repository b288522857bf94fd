//! # modkit-sieve-macros
//!
//! Procedural macros for declaring Sieve field schemas.
//!
//! - `SieveSchema`: generate a field enum, a `Schema` impl and typed `FieldRef`
//!   constructors for client-side query building
//!
//! The generated code refers to `::modkit_sieve`, so the runtime crate must be a direct
//! dependency of the deriving crate.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod sieve_schema;

/// Derive macro declaring the filterable/sortable fields of a record.
///
/// For `struct Post` it generates:
/// - `PostField`, one variant per field;
/// - `PostSchema`, implementing `modkit_sieve::schema::Schema`;
/// - `mod post` with one `fn <field>() -> FieldRef<PostSchema, <field type>>` per field.
///
/// Wire names default to the lowerCamelCase form of the field (`created_at` -> `createdAt`).
///
/// Field attributes:
/// - `#[sieve(name = "...")]` overrides the wire name;
/// - `#[sieve(skip)]` leaves the field out of the schema.
///
/// # Example
///
/// ```ignore
/// use modkit_sieve_macros::SieveSchema;
///
/// #[derive(SieveSchema)]
/// pub struct Post {
///     pub title: String,
///     #[sieve(name = "created")]
///     pub created_at: chrono::DateTime<chrono::Utc>,
///     #[sieve(skip)]
///     pub body: String,
/// }
/// ```
#[proc_macro_derive(SieveSchema, attributes(sieve))]
#[proc_macro_error]
pub fn derive_sieve_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    sieve_schema::expand_derive_sieve_schema(&input).into()
}
