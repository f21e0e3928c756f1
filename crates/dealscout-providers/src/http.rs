//! Thin request helpers shared by the provider variants.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::ProviderError;

/// One GET returning parsed JSON. No retry: a single failure is terminal
/// for the call and surfaces to the variant's recovery layer.
pub(crate) async fn get_json(client: &Client, url: Url) -> Result<Value, ProviderError> {
    let url_string = url.to_string();
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url: url_string,
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<Value>(&body).map_err(|e| ProviderError::Deserialize {
        context: url_string,
        source: e,
    })
}

/// One GET returning the response body as text (for HTML scraping).
pub(crate) async fn get_text(client: &Client, url: Url) -> Result<String, ProviderError> {
    let url_string = url.to_string();
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url: url_string,
        });
    }

    Ok(response.text().await?)
}
