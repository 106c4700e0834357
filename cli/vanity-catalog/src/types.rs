//! Catalog interaction types.
//!
//! The filter side models what a user has typed into the facet inputs; the
//! product side models what the catalog service returns. Both are plain data
//! with a single owner (the session).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The facets a catalog search can be constrained by.
///
/// Variant order is the serialization order of the derived query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Brand,
    ProductType,
    ProductTags,
    PriceGreaterThan,
    PriceLessThan,
    RatingGreaterThan,
    RatingLessThan,
}

impl FilterField {
    /// All fields, in declaration order.
    pub const ALL: [FilterField; 7] = [
        FilterField::Brand,
        FilterField::ProductType,
        FilterField::ProductTags,
        FilterField::PriceGreaterThan,
        FilterField::PriceLessThan,
        FilterField::RatingGreaterThan,
        FilterField::RatingLessThan,
    ];

    /// The query parameter name for this field.
    pub fn name(&self) -> &'static str {
        match self {
            FilterField::Brand => "brand",
            FilterField::ProductType => "product_type",
            FilterField::ProductTags => "product_tags",
            FilterField::PriceGreaterThan => "price_greater_than",
            FilterField::PriceLessThan => "price_less_than",
            FilterField::RatingGreaterThan => "rating_greater_than",
            FilterField::RatingLessThan => "rating_less_than",
        }
    }
}

/// The user-chosen facet constraints before translation into a request.
///
/// Every field is raw text; an empty string means the facet is absent.
/// Numeric facets stay text until serialization and are passed through
/// verbatim, the server enforces numeric well-formedness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub brand: String,
    pub product_type: String,
    /// Comma-separated raw text, split server-side.
    pub product_tags: String,
    pub price_greater_than: String,
    pub price_less_than: String,
    pub rating_greater_than: String,
    pub rating_less_than: String,
}

impl ProductFilter {
    /// Replace the value of exactly one field, leaving the others unchanged.
    ///
    /// No validation is performed; malformed numerics are accepted and left
    /// to the server to reject.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// The current value of one field.
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Brand => &self.brand,
            FilterField::ProductType => &self.product_type,
            FilterField::ProductTags => &self.product_tags,
            FilterField::PriceGreaterThan => &self.price_greater_than,
            FilterField::PriceLessThan => &self.price_less_than,
            FilterField::RatingGreaterThan => &self.rating_greater_than,
            FilterField::RatingLessThan => &self.rating_less_than,
        }
    }

    /// Derive the ordered query parameters for this filter.
    ///
    /// Fields are visited in declaration order and empty ones are skipped,
    /// so identical filter content always yields identical output. An
    /// all-empty filter yields an empty list; the request is still issued,
    /// unfiltered.
    pub fn to_query_params(&self) -> Vec<(&'static str, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|&field| {
                let value = self.get(field);
                (!value.is_empty()).then_some((field.name(), value))
            })
            .collect()
    }

    /// Whether every facet is absent.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|&field| self.get(field).is_empty())
    }

    fn field_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Brand => &mut self.brand,
            FilterField::ProductType => &mut self.product_type,
            FilterField::ProductTags => &mut self.product_tags,
            FilterField::PriceGreaterThan => &mut self.price_greater_than,
            FilterField::PriceLessThan => &mut self.price_less_than,
            FilterField::RatingGreaterThan => &mut self.rating_greater_than,
            FilterField::RatingLessThan => &mut self.rating_less_than,
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A product as returned by the catalog service.
///
/// Owned by the remote service, read-only on this side. The optional fields
/// may be absent or `null` in the payload; both deserialize to `None` so
/// rendering never has to care which it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    /// Decimal price, serialized as text by the service.
    pub price: String,
    pub product_type: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub tag_list: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_filter_yields_no_params() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.to_query_params(), Vec::<(&str, &str)>::new());
    }

    #[test]
    fn single_field_yields_single_param() {
        for field in FilterField::ALL {
            let mut filter = ProductFilter::default();
            filter.set(field, "value");
            assert_eq!(filter.to_query_params(), vec![(field.name(), "value")]);
        }
    }

    #[test]
    fn set_replaces_only_the_named_field() {
        let mut filter = ProductFilter::default();
        filter.set(FilterField::Brand, "maybelline");
        filter.set(FilterField::PriceGreaterThan, "5");
        filter.set(FilterField::Brand, "nyx");
        assert_eq!(filter.brand, "nyx");
        assert_eq!(filter.price_greater_than, "5");
        assert_eq!(filter.product_type, "");
    }

    #[test]
    fn params_preserve_declaration_order() {
        let mut filter = ProductFilter::default();
        // set out of order on purpose
        filter.set(FilterField::RatingLessThan, "4");
        filter.set(FilterField::Brand, "maybelline");
        filter.set(FilterField::PriceLessThan, "20");
        assert_eq!(filter.to_query_params(), vec![
            ("brand", "maybelline"),
            ("price_less_than", "20"),
            ("rating_less_than", "4"),
        ]);
    }

    #[test]
    fn malformed_numerics_pass_through() {
        let mut filter = ProductFilter::default();
        filter.set(FilterField::PriceGreaterThan, "not-a-number");
        assert_eq!(filter.to_query_params(), vec![(
            "price_greater_than",
            "not-a-number"
        )]);
    }

    #[test]
    fn optional_product_fields_absent_or_null_deserialize_to_none() {
        let bare: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Lip Gloss",
            "brand": "maybelline",
            "price": "5.00",
            "product_type": "lipstick",
        }))
        .unwrap();
        assert_eq!(bare.rating, None);
        assert_eq!(bare.image_link, None);
        assert_eq!(bare.tag_list, None);

        let nulled: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Lip Gloss",
            "brand": "maybelline",
            "price": "5.00",
            "product_type": "lipstick",
            "rating": null,
            "image_link": null,
            "tag_list": null,
        }))
        .unwrap();
        assert_eq!(bare, nulled);
    }

    proptest! {
        /// No empty-string value ever appears in the derived params, and
        /// every non-empty field appears exactly once, in order.
        #[test]
        fn derived_params_match_non_empty_fields(values in proptest::collection::vec(".{0,8}", 7)) {
            let mut filter = ProductFilter::default();
            for (field, value) in FilterField::ALL.iter().zip(values.iter()) {
                filter.set(*field, value.clone());
            }

            let expected = FilterField::ALL
                .iter()
                .zip(values.iter())
                .filter(|(_, value)| !value.is_empty())
                .map(|(field, value)| (field.name(), value.as_str()))
                .collect::<Vec<_>>();

            prop_assert_eq!(filter.to_query_params(), expected);
        }

        /// Derivation is a pure function of the filter content.
        #[test]
        fn derivation_is_deterministic(values in proptest::collection::vec(".{0,8}", 7)) {
            let mut filter = ProductFilter::default();
            for (field, value) in FilterField::ALL.iter().zip(values.iter()) {
                filter.set(*field, value.clone());
            }
            prop_assert_eq!(filter.to_query_params(), filter.to_query_params());
        }
    }
}
