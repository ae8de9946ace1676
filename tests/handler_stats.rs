mod common;

use tempfile::TempDir;

#[tokio::test]
async fn test_stats_empty() {
    let dir = TempDir::new().unwrap();
    let (server, _state) = common::create_test_server(&dir).await;

    let response = server.get("/api/stats").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 0);
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_sorted_by_visits() {
    let dir = TempDir::new().unwrap();
    let (server, state) = common::create_test_server(&dir).await;

    let mut codes = Vec::new();
    for url in ["https://a.example", "https://b.example", "https://c.example"] {
        codes.push(
            state
                .link_service
                .shorten_or_reuse(url)
                .await
                .unwrap()
                .code,
        );
    }

    // a: 1 visit, b: 0 visits, c: 3 visits
    server.get(&format!("/{}", codes[0])).await;
    for _ in 0..3 {
        server.get(&format!("/{}", codes[2])).await;
    }

    let json = server.get("/api/stats").await.json::<serde_json::Value>();
    let items = json["items"].as_array().unwrap();

    assert_eq!(json["total"], 3);
    assert_eq!(items[0]["code"], codes[2].as_str());
    assert_eq!(items[0]["visits"], 3);
    assert_eq!(items[1]["code"], codes[0].as_str());
    assert_eq!(items[1]["visits"], 1);
    assert_eq!(items[2]["code"], codes[1].as_str());
    assert_eq!(items[2]["long_url"], "https://b.example");

    for pair in items.windows(2) {
        assert!(pair[0]["visits"].as_u64() >= pair[1]["visits"].as_u64());
    }
}

#[tokio::test]
async fn test_stats_page_renders_table() {
    let dir = TempDir::new().unwrap();
    let (server, state) = common::create_test_server(&dir).await;

    let code = state
        .link_service
        .shorten_or_reuse("https://example.com/page")
        .await
        .unwrap()
        .code;
    server.get(&format!("/{}", code)).await;

    let response = server.get("/stats").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<table>"));
    assert!(html.contains(&code));
    assert!(html.contains(">1</td>"));
}

#[tokio::test]
async fn test_stats_page_empty_state() {
    let dir = TempDir::new().unwrap();
    let (server, _state) = common::create_test_server(&dir).await;

    let response = server.get("/stats").await;

    response.assert_status_ok();
    assert!(response.text().contains("No short URLs yet"));
}
