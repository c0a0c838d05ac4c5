//! Facade tests: what each entry point submits and how listings are filtered.

use maxun_client::{SearchMode, TimeRange};
use maxun_core::{ClientConfig, CrawlMode, Format, RobotType};
use maxun_sdk::{
    Client, Crawl, CrawlConfig, Extract, LlmExtractOptions, LlmProvider, Scrape, ScrapeOptions,
    Search, SearchConfig,
};
use maxun_workflow::{ListCaptureConfig, Pagination};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new("test-key").with_base_url(server.uri())).unwrap()
}

fn record(id: &str, robot_type: &str) -> Value {
    json!({
        "id": format!("db-{}", id),
        "recording_meta": {"name": id, "id": id, "robotType": robot_type},
        "recording": {"meta": {"name": id, "id": id}, "workflow": []}
    })
}

async fn mount_create(server: &MockServer, endpoint: &str, response: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": response })))
        .mount(server)
        .await;
}

async fn posted_body(server: &MockServer, endpoint: &str) -> Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == endpoint)
        .unwrap();
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test]
async fn test_extract_build_submits_workflow() {
    let server = MockServer::start().await;
    mount_create(&server, "/robots", record("robot_1", "extract")).await;

    let robot = Extract::from_client(client_for(&server))
        .create("Books")
        .navigate("https://books.toscrape.com")
        .capture_list(
            ListCaptureConfig::new("article.product_pod")
                .indexed_fields([(1, "title"), (2, "price")])
                .pagination(Pagination::click_next("li.next a")),
            Some("books"),
        )
        .unwrap()
        .build()
        .await
        .unwrap();
    assert_eq!(robot.id(), "robot_1");

    let body = posted_body(&server, "/robots").await;
    assert_eq!(body["meta"]["name"], "Books");
    assert_eq!(body["meta"]["type"], "extract");
    assert!(body["meta"]["id"].as_str().unwrap().starts_with("robot_"));

    let workflow = body["workflow"].as_array().unwrap();
    assert_eq!(workflow.len(), 2);
    assert_eq!(workflow[0]["where"]["url"], "https://books.toscrape.com");
    assert_eq!(workflow[0]["what"][0]["action"], "scrapeList");
    assert_eq!(
        workflow[0]["what"][0]["args"][0]["fieldIndexMapping"],
        json!({"1": "title", "2": "price"})
    );
    assert_eq!(
        workflow[0]["what"][0]["args"][0]["pagination"],
        json!({"type": "clickNext", "selector": "li.next a"})
    );
    assert_eq!(workflow[1]["where"]["url"], "about:blank");
    assert_eq!(workflow[1]["what"][0]["action"], "goto");
}

#[tokio::test]
async fn test_extract_bulk_urls_are_submitted() {
    let server = MockServer::start().await;
    mount_create(&server, "/robots", record("robot_b", "extract")).await;

    Extract::from_client(client_for(&server))
        .create("Bulk")
        .navigate("https://shop.example/p/1")
        .capture_text([("title", "h1")], None)
        .urls(["https://shop.example/p/2", "https://shop.example/p/3"])
        .build()
        .await
        .unwrap();

    let body = posted_body(&server, "/robots").await;
    assert_eq!(body["meta"]["mode"], "bulk");
    assert_eq!(body["meta"]["deepExtraction"], true);
    assert_eq!(
        body["deepExtractionUrls"],
        json!(["https://shop.example/p/2", "https://shop.example/p/3"])
    );
}

#[tokio::test]
async fn test_extract_invalid_index_never_reaches_server() {
    let server = MockServer::start().await;
    let result = Extract::from_client(client_for(&server))
        .create("Bad")
        .navigate("https://a.example")
        .capture_list(ListCaptureConfig::new("li").indexed_fields([(-1, "x")]), None);

    let err = result.unwrap_err();
    assert_eq!(err.name(), "ValidationError");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_robots_filters_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            record("robot_a", "extract"),
            record("robot_b", "scrape"),
            record("robot_c", "extract"),
            record("robot_d", "crawl")
        ]})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let extract: Vec<_> = Extract::from_client(client.clone())
        .get_robots()
        .await
        .unwrap()
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(extract, vec!["robot_a", "robot_c"]);

    let scrape = Scrape::from_client(client.clone()).get_robots().await.unwrap();
    assert_eq!(scrape.len(), 1);
    assert_eq!(scrape[0].robot_type(), Some(RobotType::Scrape));

    assert_eq!(Crawl::from_client(client.clone()).get_robots().await.unwrap().len(), 1);
    assert!(Search::from_client(client).get_robots().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_extract_with_prompt_fetches_created_robot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract/llm"))
        .and(body_partial_json(json!({
            "url": "https://news.example",
            "prompt": "Extract headlines",
            "llmProvider": "openai"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"robotId": "robot_llm"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_llm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": record("robot_llm", "extract")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = LlmExtractOptions::new("Extract headlines").with_provider(LlmProvider::Openai);
    let robot = Extract::from_client(client_for(&server))
        .extract("https://news.example", &options)
        .await
        .unwrap();
    assert_eq!(robot.id(), "robot_llm");
}

#[tokio::test]
async fn test_scrape_create_defaults_to_markdown() {
    let server = MockServer::start().await;
    mount_create(&server, "/robots", record("robot_s", "scrape")).await;

    Scrape::from_client(client_for(&server))
        .create("Docs", "https://docs.example", ScrapeOptions::default())
        .await
        .unwrap();

    let body = posted_body(&server, "/robots").await;
    assert_eq!(body["meta"]["robotType"], "scrape");
    assert_eq!(body["meta"]["url"], "https://docs.example");
    assert_eq!(body["meta"]["formats"], json!(["markdown"]));
    assert_eq!(body["workflow"], json!([]));
}

#[tokio::test]
async fn test_scrape_builder_formats() {
    let server = MockServer::start().await;
    mount_create(&server, "/robots", record("robot_s", "scrape")).await;

    Scrape::from_client(client_for(&server))
        .builder("Docs")
        .url("https://docs.example")
        .as_html()
        .as_screenshot_fullpage()
        .as_html()
        .build()
        .await
        .unwrap();

    let body = posted_body(&server, "/robots").await;
    assert_eq!(body["meta"]["formats"], json!(["html", "screenshot-fullpage"]));
}

#[tokio::test]
async fn test_scrape_requires_url() {
    let server = MockServer::start().await;
    let scrape = Scrape::from_client(client_for(&server));

    let err = scrape
        .create("Docs", "", ScrapeOptions { formats: vec![Format::Html] })
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ValidationError");

    let err = scrape.builder("Docs").as_markdown().build().await.unwrap_err();
    assert_eq!(err.name(), "ValidationError");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crawl_create() {
    let server = MockServer::start().await;
    mount_create(&server, "/crawl", record("robot_c", "crawl")).await;

    let config = CrawlConfig {
        mode: CrawlMode::Domain,
        include_paths: vec!["/blog".to_string()],
        limit: Some(25),
        max_depth: Some(2),
        use_sitemap: Some(true),
        ..CrawlConfig::default()
    };
    let crawl = Crawl::from_client(client_for(&server));
    let robot = crawl
        .create("Blog crawl", "https://blog.example", &config)
        .await
        .unwrap();
    assert_eq!(robot.robot_type(), Some(RobotType::Crawl));

    let body = posted_body(&server, "/crawl").await;
    assert_eq!(body["url"], "https://blog.example");
    assert_eq!(body["name"], "Blog crawl");
    assert_eq!(body["crawlConfig"]["mode"], "domain");
    assert_eq!(body["crawlConfig"]["includePaths"], json!(["/blog"]));
    assert_eq!(body["crawlConfig"]["maxDepth"], 2);

    let err = crawl.create("x", " ", &config).await.unwrap_err();
    assert_eq!(err.name(), "ValidationError");
}

#[tokio::test]
async fn test_search_create() {
    let server = MockServer::start().await;
    mount_create(&server, "/search", record("robot_q", "search")).await;

    let mut config = SearchConfig::new("rust web scraping");
    config.mode = SearchMode::Scrape;
    config.limit = Some(5);
    config.filters = Some(maxun_client::SearchFilters {
        time_range: Some(TimeRange::Week),
        region: None,
    });

    let search = Search::from_client(client_for(&server));
    search.create("Rust search", &config).await.unwrap();

    let body = posted_body(&server, "/search").await;
    assert_eq!(body["name"], "Rust search");
    assert_eq!(body["searchConfig"]["query"], "rust web scraping");
    assert_eq!(body["searchConfig"]["mode"], "scrape");
    assert_eq!(body["searchConfig"]["filters"], json!({"timeRange": "week"}));

    let err = search
        .create("Empty", &SearchConfig::new(""))
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ValidationError");
}
