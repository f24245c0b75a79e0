use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use fontpick_traits::{
    CatalogError, CatalogProvider, Category, Font, Script, SortOption, Variant, font_id,
};

const LIST_BASE_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";
const CSS_BASE_URL: &str = "https://fonts.googleapis.com/css";

/// Configuration for [`WebfontsCatalog`]
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// JSON list endpoint
    pub list_endpoint: Url,
    /// CSS stylesheet endpoint
    pub css_endpoint: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            list_endpoint: Url::parse(LIST_BASE_URL).expect("default list endpoint is valid"),
            css_endpoint: Url::parse(CSS_BASE_URL).expect("default css endpoint is valid"),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("fontpick/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Catalog client for the webfonts v1 API
///
/// Holds a reqwest client configured with the catalog timeout and user
/// agent. The endpoints are overridable through [`CatalogConfig`] so tests
/// and self-hosted mirrors can point elsewhere.
pub struct WebfontsCatalog {
    client: reqwest::Client,
    api_key: String,
    config: CatalogConfig,
}

impl WebfontsCatalog {
    /// Create a catalog client with default configuration
    pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_config(api_key, CatalogConfig::default())
    }

    /// Create a catalog client with custom configuration
    pub fn with_config(
        api_key: impl Into<String>,
        config: CatalogConfig,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn list_url(&self, sort: SortOption) -> Url {
        let mut url = self.config.list_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("sort", sort.query_value())
            .append_pair("key", &self.api_key);
        url
    }

    fn css_url(
        &self,
        fonts: &[Font],
        scripts: &[Script],
        variants: &[Variant],
        previews_only: bool,
    ) -> Url {
        let variants_str = variants
            .iter()
            .map(Variant::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let families = fonts
            .iter()
            .map(|font| format!("{}:{variants_str}", font.family))
            .collect::<Vec<_>>()
            .join("|");
        let subsets = scripts
            .iter()
            .map(Script::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.config.css_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("family", &families);
            pairs.append_pair("subset", &subsets);
            if previews_only {
                pairs.append_pair("text", &preview_text(fonts));
            }
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for WebfontsCatalog {
    async fn list_fonts(&self, sort: SortOption) -> Result<Vec<Font>, CatalogError> {
        log::debug!("requesting font catalog sorted by {}", sort.query_value());
        let body = self.get_text(self.list_url(sort)).await?;

        let list: WebfontList =
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        log::debug!("catalog returned {} fonts", list.items.len());

        Ok(list.items.into_iter().map(Font::from).collect())
    }

    async fn fetch_stylesheet(
        &self,
        fonts: &[Font],
        scripts: &[Script],
        variants: &[Variant],
        previews_only: bool,
    ) -> Result<String, CatalogError> {
        log::debug!(
            "requesting stylesheet for {} font(s) (previews_only: {previews_only})",
            fonts.len()
        );
        self.get_text(self.css_url(fonts, scripts, variants, previews_only))
            .await
    }
}

/// Characters needed to render the name of every font in the batch
///
/// Listed once each, in first-occurrence order, for the `text` subsetting
/// parameter of preview requests.
fn preview_text(fonts: &[Font]) -> String {
    let mut seen = std::collections::HashSet::new();
    fonts
        .iter()
        .flat_map(|font| font.family.chars())
        .filter(|ch| seen.insert(*ch))
        .collect()
}

/// Response shape of the list endpoint
#[derive(Debug, Deserialize)]
struct WebfontList {
    items: Vec<WebfontItem>,
}

/// One catalog entry as returned by the API. The `subsets` field is carried
/// into [`Font::scripts`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebfontItem {
    family: String,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    subsets: Vec<Script>,
    #[serde(default)]
    variants: Vec<Variant>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    files: Option<HashMap<Variant, String>>,
}

impl From<WebfontItem> for Font {
    fn from(item: WebfontItem) -> Self {
        Font {
            id: font_id(&item.family),
            family: item.family,
            url: None,
            category: item.category,
            scripts: item.subsets,
            variants: item.variants,
            kind: item.kind,
            version: item.version,
            last_modified: item.last_modified,
            files: item.files,
        }
    }
}
