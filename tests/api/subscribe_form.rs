use serde_json::json;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::merge_var;
use crate::helpers::spawn_app;
use crate::helpers::LIST_ID;
use crate::helpers::LIST_NAME;

#[tokio::test]
async fn renders_one_input_per_supported_merge_var() {
    let app = spawn_app().await;
    app.mock_list().await;
    app.mock_merge_vars(json!([
        merge_var("EMAIL", "email", "Email Address", true),
        merge_var("FNAME", "text", "First Name", false),
        merge_var("ZIP", "zip", "Zip Code", false),
        merge_var("PHONE", "phone", "Phone", false),
        merge_var("ADDRESS", "address", "Address", false),
        merge_var("BDAY", "birthday", "Birthday", false),
        merge_var("SITE", "url", "Website", false),
    ]))
    .await;

    let resp = app.get_subscribe_form(LIST_ID).await;
    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().await.unwrap();

    assert!(html.contains(LIST_NAME));
    assert!(html.contains(r#"<input type="email" name="EMAIL""#));
    assert!(html.contains(r#"<input type="text" name="FNAME""#));
    assert!(html.contains(r#"<input type="text" name="ZIP""#));
    assert!(html.contains(r#"<input type="tel" name="PHONE""#));
    // zip without help text gets the fallback
    assert!(html.contains("Enter in your US zip code."));

    for tag in ["ADDRESS", "BDAY", "SITE"] {
        assert!(!html.contains(&format!(r#"name="{tag}""#)), "{tag}");
    }

    // inputs appear in merge var order
    let email_at = html.find(r#"name="EMAIL""#).unwrap();
    let fname_at = html.find(r#"name="FNAME""#).unwrap();
    let zip_at = html.find(r#"name="ZIP""#).unwrap();
    assert!(email_at < fname_at && fname_at < zip_at);
}

#[tokio::test]
async fn hidden_defaults_and_dropdowns() {
    let app = spawn_app().await;
    app.mock_list().await;
    app.mock_merge_vars(json!([
        merge_var("EMAIL", "email", "Email Address", true),
        {
            "tag": "SOURCE", "field_type": "text", "name": "Source", "req": false,
            "show": false, "default": "website", "helptext": "",
        },
        {
            "tag": "COLOUR", "field_type": "dropdown", "name": "Colour", "req": false,
            "show": true, "default": "Green", "helptext": "", "choices": ["Red", "Green"],
        },
    ]))
    .await;

    let html = app.get_subscribe_form(LIST_ID).await.text().await.unwrap();

    assert!(html.contains(r#"<input type="hidden" name="SOURCE" value="website" />"#));
    assert!(!html.contains("Source"));
    assert!(html.contains(r#"<select name="COLOUR">"#));
    assert!(html.contains(r#"<option value="Green" selected>Green</option>"#));
    assert!(html.contains(r#"<option value="Red">Red</option>"#));
}

#[tokio::test]
async fn unknown_list_is_404() {
    let app = spawn_app().await;
    Mock::given(path("/lists/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "data": [] })))
        .mount(&app.provider)
        .await;
    Mock::given(path("/lists/merge-vars.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider)
        .await;

    assert_eq!(app.get_subscribe_form("nope").await.status().as_u16(), 404);
}
