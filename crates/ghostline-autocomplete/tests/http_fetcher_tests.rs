/// HTTP suggestion fetcher tests against a mock endpoint
///
/// Tests cover:
/// - Query string and bearer header on the wire
/// - Response decoding
/// - Non-success statuses and malformed bodies
/// - Missing credentials
/// - The plugin running against a live endpoint
use async_trait::async_trait;
use ghostline_autocomplete::{
    resolve_suggestion, AutocompleteConfig, AutocompleteError, AutocompletePlugin,
    CredentialProvider, EndpointConfig, HttpSuggestionFetcher, KeyCombo, MemoryEditor,
    StaticCredential, SuggestionFetcher,
};
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

struct SignedOut;

#[async_trait]
impl CredentialProvider for SignedOut {
    async fn credential(&self) -> Option<String> {
        None
    }
}

fn endpoint(base_url: String) -> EndpointConfig {
    EndpointConfig {
        base_url,
        timeout_ms: 2_000,
    }
}

fn autocomplete_path() -> Matcher {
    Matcher::Regex(r"^/autocomplete".to_string())
}

fn signed_in() -> Option<Arc<dyn CredentialProvider>> {
    Some(Arc::new(StaticCredential::new("secret-token")))
}

#[tokio::test]
async fn test_fetch_sends_query_and_bearer() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", autocomplete_path())
        .match_query(Matcher::UrlEncoded("query".to_string(), "Sagi".to_string()))
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": ["Sagittal", "Sagittal T2"]}"#)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), signed_in()).unwrap();
    let candidates = fetcher.fetch("Sagi").await.unwrap();

    assert_eq!(candidates, vec!["Sagittal", "Sagittal T2"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_without_credentials_sends_no_header() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", autocomplete_path())
        .match_query(Matcher::UrlEncoded("query".to_string(), "Ax".to_string()))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": ["Axial"]}"#)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), None).unwrap();
    assert_eq!(fetcher.fetch("Ax").await.unwrap(), vec!["Axial"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_suggestion_list() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", autocomplete_path())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": []}"#)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), signed_in()).unwrap();
    assert!(fetcher.fetch("Xyz").await.unwrap().is_empty());
    assert_eq!(resolve_suggestion(&fetcher, "Xyz").await, None);
}

#[tokio::test]
async fn test_server_error_is_reported_then_swallowed() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", autocomplete_path())
        .with_status(500)
        .with_body("Internal Server Error")
        .expect(2)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), signed_in()).unwrap();

    let result = fetcher.fetch("Sagi").await;
    assert!(matches!(result, Err(AutocompleteError::HttpStatus { status: 500 })));
    assert_eq!(resolve_suggestion(&fetcher, "Sagi").await, None);
}

#[tokio::test]
async fn test_unauthorized_status() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", autocomplete_path())
        .with_status(401)
        .with_body(r#"{"detail": "Invalid authentication credentials"}"#)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), signed_in()).unwrap();
    let result = fetcher.fetch("Sagi").await;
    assert!(matches!(result, Err(AutocompleteError::HttpStatus { status: 401 })));
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", autocomplete_path())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": "nope"}"#)
        .create_async()
        .await;

    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), signed_in()).unwrap();
    assert!(fetcher.fetch("Sagi").await.is_err());
    assert_eq!(resolve_suggestion(&fetcher, "Sagi").await, None);
}

#[tokio::test]
async fn test_missing_credential_skips_request() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", autocomplete_path())
        .with_status(200)
        .with_body(r#"{"suggestions": ["Sagittal"]}"#)
        .expect(0)
        .create_async()
        .await;

    let credentials: Option<Arc<dyn CredentialProvider>> = Some(Arc::new(SignedOut));
    let fetcher = HttpSuggestionFetcher::new(&endpoint(server.url()), credentials).unwrap();

    let result = fetcher.fetch("Sagi").await;
    assert!(matches!(result, Err(AutocompleteError::MissingCredential)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_network_error() {
    // Nothing listens on port 9 locally
    let fetcher = HttpSuggestionFetcher::new(&endpoint("http://127.0.0.1:9".to_string()), None)
        .unwrap();
    let result = fetcher.fetch("Sagi").await;
    assert!(matches!(result, Err(AutocompleteError::Network { .. })));
}

#[tokio::test]
async fn test_editor_completes_from_endpoint() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", autocomplete_path())
        .match_query(Matcher::UrlEncoded("query".to_string(), "Sagi".to_string()))
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": ["Sagittal"]}"#)
        .create_async()
        .await;

    let config = AutocompleteConfig {
        debounce_ms: 20,
        endpoint: Some(endpoint(server.url())),
        ..AutocompleteConfig::default()
    };
    let endpoint_config = config.endpoint.clone().unwrap();
    let fetcher: Arc<dyn SuggestionFetcher> =
        Arc::new(HttpSuggestionFetcher::new(&endpoint_config, signed_in()).unwrap());
    let plugin = AutocompletePlugin::new(config, fetcher).unwrap();
    let mut editor = MemoryEditor::new(plugin);

    editor.type_text("MRI spine Sagi");
    editor.settle(Duration::from_millis(500)).await;

    assert_eq!(editor.decorations().first().unwrap().text, "ttal");
    assert!(editor.press_key(&KeyCombo::default()));
    assert_eq!(editor.text(), "MRI spine Sagittal");
}
