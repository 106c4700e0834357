//! Rendering of product search results.

use std::fmt::Display;

use vanity_catalog::Product;

pub const NO_RATING: &'_ str = "N/A";
pub const NO_TAGS: &'_ str = "No tags";

/// An intermediate representation of a product used for rendering.
///
/// Optional fields are resolved to their placeholder text here, so the
/// `Display` impl never has to care whether the service sent them.
#[derive(Debug, PartialEq, Clone)]
struct DisplayItem {
    name: String,
    brand: String,
    price: String,
    rating: String,
    product_type: String,
    tags: String,
}

impl From<&Product> for DisplayItem {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: format!("${}", product.price),
            rating: product
                .rating
                .map(|rating| rating.to_string())
                .unwrap_or_else(|| NO_RATING.to_string()),
            product_type: product.product_type.clone(),
            tags: match &product.tag_list {
                Some(tags) if !tags.is_empty() => tags.join(", "),
                _ => NO_TAGS.to_string(),
            },
        }
    }
}

/// A struct that wraps the functionality needed to print products to a user.
///
/// If there are no products this renders nothing; it's the caller's
/// responsibility to print a message or error in that case.
pub struct DisplayProducts {
    display_items: Vec<DisplayItem>,
}

impl DisplayProducts {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            display_items: products.iter().map(DisplayItem::from).collect(),
        }
    }
}

impl Display for DisplayProducts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name_width = column_width(&self.display_items, |d| d.name.as_str());
        let brand_width = column_width(&self.display_items, |d| d.brand.as_str());
        let price_width = column_width(&self.display_items, |d| d.price.as_str());
        let rating_width = column_width(&self.display_items, |d| d.rating.as_str());
        let type_width = column_width(&self.display_items, |d| d.product_type.as_str());

        let mut items = self.display_items.iter().peekable();

        while let Some(d) = items.next() {
            write!(
                f,
                "{name:<name_width$}  {brand:<brand_width$}  {price:<price_width$}  \
                 {rating:<rating_width$}  {product_type:<type_width$}  {tags}",
                name = d.name,
                brand = d.brand,
                price = d.price,
                rating = d.rating,
                product_type = d.product_type,
                tags = d.tags,
            )?;
            // Only print a newline if there are more items to print
            if items.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn column_width(items: &[DisplayItem], column: impl Fn(&DisplayItem) -> &str) -> usize {
    items
        .iter()
        .map(|item| column(item).len())
        .max()
        .unwrap_or_default()
}
