//! Integration tests for `ScrapeProvider` using wiremock HTTP mocks.

use std::collections::BTreeMap;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealscout_core::SearchParams;
use dealscout_providers::{DealProvider, ProviderConfig, ScrapeProvider};

fn provider(base_url: &str) -> ScrapeProvider {
    let config = ProviderConfig {
        name: "dealnews".to_owned(),
        display_name: "DealNews".to_owned(),
        base_url: url::Url::parse(&format!("{base_url}/")).expect("base url"),
        api_key: None,
        headers: BTreeMap::new(),
        timeout_secs: 5,
        user_agent: "dealscout-test/0.1".to_owned(),
    };
    ScrapeProvider::new(config).expect("provider construction should not fail")
}

const LISTING_HTML: &str = r#"
<html><body>
  <div class="results">
    <div class="deal-item">
      <h3 class="title">ASUS ROG Strix G15 Gaming Laptop</h3>
      <span class="price">$899.99</span>
      <span class="original-price">$1,199.99</span>
      <span class="store">Best Buy</span>
      <a href="/deals/asus-rog-g15">View deal</a>
      <img src="/img/asus.jpg" alt="">
    </div>
    <div class="deal-item">
      <h3 class="title">Missing link deal</h3>
      <span class="price">$10.00</span>
    </div>
    <div class="deal-item">
      <h3 class="title">LG C3 OLED TV</h3>
      <span class="price">$1,299.00</span>
      <a href="https://cdn.example.com/deals/lg-c3">View deal</a>
    </div>
  </div>
</body></html>
"#;

#[tokio::test]
async fn search_extracts_and_resolves_relative_urls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "asus laptop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;

    let deals = provider(&server.uri())
        .search_deals(&SearchParams::for_query("asus laptop"))
        .await;

    assert_eq!(deals.len(), 2, "the block without a link must be dropped");

    let asus = &deals[0];
    assert_eq!(asus.title, "ASUS ROG Strix G15 Gaming Laptop");
    assert_eq!(asus.price, Some(899.99));
    assert_eq!(asus.original_price, Some(1199.99));
    assert_eq!(asus.discount_percentage, Some(25.0));
    assert_eq!(asus.store, "Best Buy");
    assert_eq!(
        asus.url,
        format!("{}/deals/asus-rog-g15", server.uri()),
        "relative hrefs must resolve against the provider base"
    );
    assert_eq!(
        asus.image_url.as_deref(),
        Some(format!("{}/img/asus.jpg", server.uri()).as_str())
    );
    assert!(asus.id.starts_with("dealnews-"));

    let lg = &deals[1];
    assert_eq!(
        lg.url, "https://cdn.example.com/deals/lg-c3",
        "absolute hrefs pass through"
    );
    assert_eq!(
        lg.store, "DealNews",
        "store must fall back to the display name"
    );
}

#[tokio::test]
async fn scraped_ids_are_stable_across_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;

    let provider = provider(&server.uri());
    let first = provider.search_deals(&SearchParams::for_query("x")).await;
    let second = provider.search_deals(&SearchParams::for_query("x")).await;
    assert_eq!(first[0].id, second[0].id);
}

#[tokio::test]
async fn search_respects_the_result_cap() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;

    let mut params = SearchParams::for_query("x");
    params.limit = 1;
    let deals = provider(&server.uri()).search_deals(&params).await;
    assert_eq!(deals.len(), 1);
}

#[tokio::test]
async fn top_deals_scrapes_hot_deals_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hot-deals"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;

    let deals = provider(&server.uri()).get_top_deals(10).await;
    assert_eq!(deals.len(), 2);
}

#[tokio::test]
async fn details_extracts_page_level_fields() {
    let server = MockServer::start().await;

    let detail_html = r#"
<html><body>
  <h1>ASUS ROG Strix G15 Gaming Laptop</h1>
  <p class="description">RTX 4060, 16GB RAM, 1TB SSD.</p>
  <span class="price">$899.99</span>
  <span class="was-price">$1,199.99</span>
  <span class="rating">4.5</span>
  <span class="merchant">Best Buy</span>
</body></html>
"#;

    Mock::given(method("GET"))
        .and(path("/deal/asus-rog-g15"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html))
        .mount(&server)
        .await;

    let deal = provider(&server.uri())
        .get_deal_details("asus-rog-g15")
        .await
        .expect("detail page should yield a deal");

    assert_eq!(deal.id, "asus-rog-g15");
    assert_eq!(deal.title, "ASUS ROG Strix G15 Gaming Laptop");
    assert_eq!(deal.description.as_deref(), Some("RTX 4060, 16GB RAM, 1TB SSD."));
    assert_eq!(deal.price, Some(899.99));
    assert_eq!(deal.original_price, Some(1199.99));
    assert_eq!(deal.rating, Some(4.5));
    assert_eq!(deal.store, "Best Buy");
    assert_eq!(deal.url, format!("{}/deal/asus-rog-g15", server.uri()));
}

#[tokio::test]
async fn http_failure_yields_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let deals = provider(&server.uri())
        .search_deals(&SearchParams::for_query("x"))
        .await;
    assert!(deals.is_empty());
}

#[tokio::test]
async fn page_without_deal_blocks_yields_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><p>No results</p></body></html>"),
        )
        .mount(&server)
        .await;

    let deals = provider(&server.uri())
        .search_deals(&SearchParams::for_query("x"))
        .await;
    assert!(deals.is_empty());
}
