use modkit_sieve::schema::Schema;
use modkit_sieve_macros::SieveSchema;

#[derive(SieveSchema)]
struct Product {
    #[sieve(name = "productName")]
    name: String,
    #[sieve(skip)]
    internal_code: String,
    price: i64,
}

fn main() {
    assert_eq!(ProductSchema::field_name(ProductField::Name), "productName");
    assert_eq!(ProductSchema::field_name(ProductField::Price), "price");
    assert_eq!(product::price().name(), "price");
}
