use anyhow::{Result, bail};
use bpaf::Bpaf;
use tracing::{debug, instrument};
use vanity_catalog::{
    CatalogClient,
    CatalogClientConfig,
    Client,
    FetchState,
    FilterField,
    SearchSession,
    SubmitMode,
};

use crate::config::Config;
use crate::utils::message;
use crate::utils::render::DisplayProducts;

// Search for products matching the given facets
#[derive(Debug, Bpaf, Clone, Default)]
pub struct Search {
    /// Display search results as a JSON array
    #[bpaf(long)]
    pub json: bool,

    /// Only show products of this brand
    #[bpaf(long, argument("brand"))]
    pub brand: Option<String>,

    /// Only show products of this type, e.g. 'lipstick'
    #[bpaf(long, argument("type"))]
    pub product_type: Option<String>,

    /// Comma-separated tags the products must carry
    #[bpaf(long, argument("tags"))]
    pub product_tags: Option<String>,

    /// Only show products costing more than this
    #[bpaf(long, argument("price"))]
    pub price_greater_than: Option<String>,

    /// Only show products costing less than this
    #[bpaf(long, argument("price"))]
    pub price_less_than: Option<String>,

    /// Only show products rated higher than this
    #[bpaf(long, argument("rating"))]
    pub rating_greater_than: Option<String>,

    /// Only show products rated lower than this
    #[bpaf(long, argument("rating"))]
    pub rating_less_than: Option<String>,
}

impl Search {
    #[instrument(name = "search", fields(json = self.json), skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client_config = CatalogClientConfig {
            catalog_url: config.vanity.catalog_url.clone(),
            extra_headers: Default::default(),
            user_agent: Some(format!("vanity-cli/{}", env!("CARGO_PKG_VERSION"))),
        };
        let client = Client::Catalog(CatalogClient::new(client_config)?);

        // An eager session fetches the unfiltered catalog at construction;
        // the explicit submission below supersedes that fetch.
        let mode = if config.vanity.eager_fetch {
            SubmitMode::Eager
        } else {
            SubmitMode::Manual
        };
        let session = SearchSession::new(client, mode);

        for (field, value) in self.filter_values() {
            session.set_filter(field, value);
        }

        debug!(filter = ?session.filter(), "submitting catalog search");
        session.submit().await?;

        match session.state() {
            FetchState::Success(products) => {
                if self.json {
                    debug!("printing search results as JSON");
                    println!("{}", serde_json::to_string(&products)?);
                    return Ok(());
                }

                if products.is_empty() {
                    bail!("No products matched these filters");
                }

                println!("{}", DisplayProducts::from_products(&products));
                message::plain(format!("\n{} products shown", products.len()));
                Ok(())
            },
            FetchState::Error(message) => bail!(message),
            // the submission was awaited, so its outcome is terminal
            FetchState::Idle | FetchState::Loading => unreachable!("fetch did not settle"),
        }
    }

    fn filter_values(&self) -> impl Iterator<Item = (FilterField, &String)> {
        [
            (FilterField::Brand, &self.brand),
            (FilterField::ProductType, &self.product_type),
            (FilterField::ProductTags, &self.product_tags),
            (FilterField::PriceGreaterThan, &self.price_greater_than),
            (FilterField::PriceLessThan, &self.price_less_than),
            (FilterField::RatingGreaterThan, &self.rating_greater_than),
            (FilterField::RatingLessThan, &self.rating_less_than),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|value| (field, value)))
    }
}
