use list_signup::configuration::get_configuration;
use list_signup::startup::Application;
use list_signup::telemetry::get_subscriber;
use list_signup::telemetry::init_subscriber;
use once_cell::sync::Lazy;
use serde_json::json;
use serde_json::Value;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

pub const LIST_ID: &str = "abc123";
pub const LIST_NAME: &str = "Weekly Digest";

/// Init the tracing subscriber once for the whole test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sinks are different types, hence the duplicated arms
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber).unwrap();
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber).unwrap();
        }
    };
});

pub struct TestApp {
    pub addr: String,
    /// Stands in for the mailing list provider
    pub provider: MockServer,
}

impl TestApp {
    pub async fn get_index(&self) -> reqwest::Response {
        reqwest::get(format!("{}/", self.addr))
            .await
            .expect("execute request")
    }

    pub async fn get_subscribe_form(
        &self,
        list_id: &str,
    ) -> reqwest::Response {
        reqwest::get(format!("{}/{list_id}/subscribe/", self.addr))
            .await
            .expect("execute request")
    }

    /// `body` is urlencoded, e.g. `EMAIL=user%40example.com`
    pub async fn post_subscribe(
        &self,
        list_id: &str,
        body: String,
    ) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/{list_id}/subscribe/", self.addr))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("execute request")
    }

    /// Answer `lists/list` with a single list, whatever the filter
    pub async fn mock_list(&self) {
        Mock::given(path("/lists/list.json"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "data": [{ "id": LIST_ID, "name": LIST_NAME, "web_id": 42 }],
            })))
            .mount(&self.provider)
            .await;
    }

    pub async fn mock_merge_vars(
        &self,
        merge_vars: Value,
    ) {
        Mock::given(path("/lists/merge-vars.json"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success_count": 1,
                "error_count": 0,
                "data": [{ "id": LIST_ID, "name": LIST_NAME, "merge_vars": merge_vars }],
                "errors": [],
            })))
            .mount(&self.provider)
            .await;
    }

    /// The `lists/subscribe` calls the provider received, as json
    pub async fn subscribe_requests(&self) -> Vec<Value> {
        self.provider
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/lists/subscribe.json")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// The provider's json for a single merge variable
pub fn merge_var(
    tag: &str,
    field_type: &str,
    name: &str,
    required: bool,
) -> Value {
    json!({
        "tag": tag,
        "field_type": field_type,
        "name": name,
        "req": required,
        "show": true,
        "default": "",
        "helptext": "",
        "public": true,
    })
}

pub fn provider_error(
    name: &str,
    code: i64,
    error: &str,
) -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_json(json!({
        "status": "error",
        "code": code,
        "name": name,
        "error": error,
    }))
}

/// Spawn the app on a random port, configured to talk to a fresh mock
/// provider.
pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let provider = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().expect("read configuration");
        // port 0 is reserved by the OS; the server is spawned on a random
        // available port
        cfg.application.port = 0;
        cfg.mailing_list.base_url = provider.uri();
        cfg.mailing_list.timeout_milliseconds = 500;
        cfg
    };

    let app = Application::build(cfg).expect("build application");
    let addr = format!("http://localhost:{}", app.get_port());
    tokio::spawn(app.run_until_stopped());

    TestApp { addr, provider }
}
