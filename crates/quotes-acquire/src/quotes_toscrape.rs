use crate::normalize::clean_text;
use crate::AcquireError;
use quotes_model::Quote;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

/// The only page this crate scrapes. Later pages are never followed.
pub const QUOTES_URL: &str = "https://quotes.toscrape.com/";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch the quotes page and extract every quote on it.
pub async fn scrape_quotes() -> Result<Vec<Quote>, AcquireError> {
    scrape_quotes_from(QUOTES_URL).await
}

/// Same pipeline as [`scrape_quotes`], against an explicit page URL.
///
/// Either the fetch fails and nothing is extracted, or every block on the
/// page is processed.
pub async fn scrape_quotes_from(url: &str) -> Result<Vec<Quote>, AcquireError> {
    tracing::info!(url = %url, "Fetching quotes page");
    let html = fetch_page(url).await?;
    tracing::info!(bytes = html.len(), "Received HTML");

    let quotes = parse_quotes_page(&html);
    tracing::info!(quotes = quotes.len(), "Parsed quotes");

    Ok(quotes)
}

/// Issue a single GET for `url` and return the body as text.
///
/// Transport errors, non-success statuses, and unreadable bodies all map to
/// [`AcquireError::RetrievalFailed`]. No retries.
pub async fn fetch_page(url: &str) -> Result<String, AcquireError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| AcquireError::retrieval(format!("could not build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AcquireError::retrieval(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = %status, url = %url, "Non-success response");
        return Err(AcquireError::retrieval(format!("HTTP {status} for {url}")));
    }

    response
        .text()
        .await
        .map_err(|e| AcquireError::retrieval(format!("failed to read response body: {e}")))
}

/// Extract one [`Quote`] per `div.quote` block, in document order.
///
/// Blocks without a `span.text` or `small.author`, or whose body or author
/// is blank after cleaning, are skipped.
pub fn parse_quotes_page(html: &str) -> Vec<Quote> {
    let document = Html::parse_document(html);

    let block_sel = Selector::parse("div.quote").expect("valid selector");
    let text_sel = Selector::parse("span.text").expect("valid selector");
    let author_sel = Selector::parse("small.author").expect("valid selector");
    let tag_sel = Selector::parse("a.tag").expect("valid selector");

    let mut quotes = Vec::new();

    for (index, block) in document.select(&block_sel).enumerate() {
        let Some(text) = block.select(&text_sel).next() else {
            tracing::warn!(block = index, "Skipping quote block without span.text");
            continue;
        };
        let Some(author) = block.select(&author_sel).next() else {
            tracing::warn!(block = index, "Skipping quote block without small.author");
            continue;
        };

        let tags = block
            .select(&tag_sel)
            .map(|tag| clean_text(&element_text(tag)))
            .collect();

        match Quote::new(
            clean_text(&element_text(text)),
            clean_text(&element_text(author)),
            tags,
        ) {
            Ok(quote) => quotes.push(quote),
            Err(e) => tracing::warn!(block = index, error = %e, "Skipping quote block"),
        }
    }

    quotes
}

/// Concatenate all descendant text nodes of an element.
fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::Html as HtmlBody;
    use axum::routing::get;
    use axum::Router;

    const PAGE: &str = include_str!("../tests/fixtures/quotes_page.html");

    /// Serve `body` with `status` at `/` on an ephemeral local port.
    async fn spawn_origin(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/", get(move || async move { (status, HtmlBody(body)) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_parse_fixture_page() {
        let quotes = parse_quotes_page(PAGE);

        assert_eq!(quotes.len(), 3);
        assert_eq!(
            quotes[0].quote,
            concat!(
                "“The world as we have created it is a process of our thinking. ",
                "It cannot be changed without changing our thinking.”"
            )
        );
        assert_eq!(quotes[0].author, "Albert Einstein");
        assert_eq!(quotes[0].tags, vec!["change", "deep-thoughts", "thinking", "world"]);
        assert_eq!(quotes[1].author, "J.K. Rowling");
        assert_eq!(quotes[1].tags, vec!["abilities", "choices"]);
        assert_eq!(quotes[2].author, "Jane Austen");
        assert!(quotes[2].tags.is_empty());
    }

    #[test]
    fn test_parse_sample_block() {
        let html = r#"
        <html><body>
        <div class="quote">
            <span class="text">  Life isn't about waiting...
</span>
            <span>by <small class="author"> Unknown </small></span>
            <div class="tags">
                <a class="tag" href="/tag/hope/"> hope </a>
                <a class="tag" href="/tag/life/">life</a>
            </div>
        </div>
        </body></html>
        "#;

        let quotes = parse_quotes_page(html);

        assert_eq!(
            quotes,
            vec![Quote {
                quote: "Life isn't about waiting...".into(),
                author: "Unknown".into(),
                tags: vec!["hope".into(), "life".into()],
            }]
        );
    }

    #[test]
    fn test_no_blocks_yields_empty() {
        assert!(parse_quotes_page("").is_empty());
        assert!(parse_quotes_page("<html><body><p>Nothing here</p></body></html>").is_empty());
    }

    #[test]
    fn test_blocks_in_document_order() {
        let html: String = (0..5)
            .map(|i| {
                format!(
                    r#"<div class="quote"><span class="text">q{i}</span>
                    <small class="author">a{i}</small></div>"#
                )
            })
            .collect();

        let quotes = parse_quotes_page(&html);

        assert_eq!(quotes.len(), 5);
        for (i, quote) in quotes.iter().enumerate() {
            assert_eq!(quote.quote, format!("q{i}"));
            assert_eq!(quote.author, format!("a{i}"));
        }
    }

    #[test]
    fn test_incomplete_blocks_skipped() {
        let html = r#"
        <div class="quote"><small class="author">No body</small></div>
        <div class="quote"><span class="text">No author</span></div>
        <div class="quote">
            <span class="text">   </span><small class="author">Blank body</small>
        </div>
        <div class="quote"><span class="text">Kept</span><small class="author">Someone</small></div>
        "#;

        let quotes = parse_quotes_page(html);

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].quote, "Kept");
    }

    #[test]
    fn test_nested_text_and_duplicate_tags() {
        let html = r#"
        <div class="quote">
            <span class="text">Split <b>across</b>
 elements</span>
            <small class="author">Someone</small>
            <a class="tag">x</a><a class="tag">x</a>
            <a class="other">ignored</a>
        </div>
        "#;

        let quotes = parse_quotes_page(html);

        assert_eq!(quotes[0].quote, "Split across elements");
        assert_eq!(quotes[0].tags, vec!["x", "x"]);
    }

    #[tokio::test]
    async fn test_scrape_from_origin() {
        let url = spawn_origin(StatusCode::OK, PAGE).await;

        let first = scrape_quotes_from(&url).await.unwrap();
        let second = scrape_quotes_from(&url).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_not_found_is_retrieval_failure() {
        let url = spawn_origin(StatusCode::NOT_FOUND, "gone").await;

        let err = scrape_quotes_from(&url).await.unwrap_err();

        let AcquireError::RetrievalFailed { reason } = &err;
        assert!(reason.contains("404"), "unexpected reason: {reason}");
        assert!(err.to_string().starts_with("Failed to retrieve data from website"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_retrieval_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = fetch_page(&format!("http://{addr}/")).await;

        assert!(matches!(result, Err(AcquireError::RetrievalFailed { .. })));
    }
}
