use notifier_engine::{HtmlProgressSource, HttpSettings, ProgressSource, SourceError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
<html><body>
<div class="vc_progress_bar wpb_content_element">
    <div class="vc_label">Book Three <span class="vc_label_units">75%</span></div>
    <div class="vc_single_bar"><div class="vc_bar" data-percentage-value="75"></div></div>
    <div class="vc_label"><a href="https://example.com/four">Book Four</a> <span>10%</span></div>
    <div class="vc_single_bar"><div class="vc_bar" data-percentage-value="10"></div></div>
</div>
</body></html>
"#;

#[tokio::test]
async fn parses_titles_links_and_values_in_page_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let source = HtmlProgressSource::new(
        format!("{}/progress", server.uri()),
        HttpSettings::default(),
    );
    let items = source.fetch().await.expect("fetch ok");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Book Three");
    assert_eq!(items[0].link, "");
    assert_eq!(items[0].value, 75);
    assert_eq!(items[1].title, "Book Four");
    assert_eq!(items[1].link, "https://example.com/four");
    assert_eq!(items[1].value, 10);
}

#[tokio::test]
async fn page_without_bars_is_a_hard_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><p>maintenance</p></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let source = HtmlProgressSource::new(
        format!("{}/progress", server.uri()),
        HttpSettings::default(),
    );
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::EmptySource { .. }));
}

#[tokio::test]
async fn http_error_status_fails_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HtmlProgressSource::new(
        format!("{}/progress", server.uri()),
        HttpSettings::default(),
    );
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 503, .. }));
}

#[tokio::test]
async fn unparseable_value_defaults_to_zero() {
    let html = r#"
    <div class="vc_progress_bar">
        <div class="vc_label">Mystery Project</div>
        <div class="vc_single_bar"><div class="vc_bar" data-percentage-value="soon"></div></div>
    </div>"#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let source = HtmlProgressSource::new(
        format!("{}/progress", server.uri()),
        HttpSettings::default(),
    );
    let items = source.fetch().await.unwrap();
    assert_eq!(items[0].value, 0);
}
