use serde_json::json;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::provider_error;
use crate::helpers::spawn_app;

#[tokio::test]
async fn lists_link_to_their_forms() {
    let app = spawn_app().await;
    Mock::given(path("/lists/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "data": [
                { "id": "abc123", "name": "Weekly Digest" },
                { "id": "def456", "name": "Product News" },
            ],
        })))
        .expect(1)
        .mount(&app.provider)
        .await;

    let resp = app.get_index().await;
    assert_eq!(resp.status().as_u16(), 200);

    let html = resp.text().await.unwrap();
    assert!(html.contains("Weekly Digest"));
    assert!(html.contains("Product News"));
    assert!(html.contains(r#"href="/abc123/subscribe/""#));
    assert!(html.contains(r#"href="/def456/subscribe/""#));
}

#[tokio::test]
async fn no_lists() {
    let app = spawn_app().await;
    Mock::given(path("/lists/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "data": [] })))
        .mount(&app.provider)
        .await;

    let html = app.get_index().await.text().await.unwrap();
    assert!(html.contains("There are no mailing lists to subscribe to."));
}

#[tokio::test]
async fn provider_failure_is_500() {
    let app = spawn_app().await;
    Mock::given(path("/lists/list.json"))
        .respond_with(provider_error("Invalid_ApiKey", 104, "Invalid MailChimp API Key"))
        .mount(&app.provider)
        .await;

    assert_eq!(app.get_index().await.status().as_u16(), 500);
}
