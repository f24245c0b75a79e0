use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Font, Script, SortOption, Variant};

/// Failures surfaced by a catalog backend
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    /// Transport-level failure (connection, timeout, HTTP status)
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but could not be parsed
    #[error("decode error: {0}")]
    Decode(String),

    /// A request URL could not be constructed
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Remote font catalog: the list endpoint plus the stylesheet endpoint
///
/// Implementations are stateless with respect to the picker; all fetch
/// de-duplication lives in the coordinator on top of the
/// [`StyleRegistry`](crate::StyleRegistry). One call to
/// [`fetch_stylesheet`](CatalogProvider::fetch_stylesheet) covers a whole
/// batch of families in a single round trip.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full catalog, ordered by `sort`
    async fn list_fonts(&self, sort: SortOption) -> Result<Vec<Font>, CatalogError>;

    /// Fetch the combined CSS for `fonts` in the given scripts and variants
    ///
    /// With `previews_only` the request is subset to the characters needed to
    /// render each family's own name.
    async fn fetch_stylesheet(
        &self,
        fonts: &[Font],
        scripts: &[Script],
        variants: &[Variant],
        previews_only: bool,
    ) -> Result<String, CatalogError>;
}
