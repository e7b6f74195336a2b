use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;
    let resp = reqwest::get(format!("{}/health_check", app.addr))
        .await
        .expect("execute request");

    assert!(resp.status().is_success());
    assert_eq!(resp.content_length().unwrap(), 0); // empty body

    // the provider is never consulted
    assert!(app.provider.received_requests().await.unwrap().is_empty());
}
