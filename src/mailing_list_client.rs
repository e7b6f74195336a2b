use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::de::DeserializeOwned;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::domain::MergeVariable;
use crate::domain::SubscriptionRequest;
use crate::utils::error_chain_fmt;

/// Error names the provider uses for the failures we handle specifically
const ALREADY_SUBSCRIBED: &str = "List_AlreadySubscribed";
const VALIDATION_ERROR: &str = "ValidationError";
const LIST_DOES_NOT_EXIST: &str = "List_DoesNotExist";

/// Summary of a mailing list, as shown on the index page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailingList {
    pub id: String,
    pub name: String,
}

/// How a call to the provider can fail. The first three are answers from the
/// provider itself and end up as form errors; `Unexpected` covers everything
/// where we never got an answer (network, timeout, garbage response) and is
/// fatal for the request.
#[derive(thiserror::Error)]
pub enum ListApiError {
    #[error("This email is already subscribed!")]
    AlreadySubscribed,
    #[error("{0}")]
    Validation(String),
    #[error("Unknown error! {name}")]
    Other {
        name: String,
        code: i64,
        message: String,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl Debug for ListApiError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Body of every non-2xx response
#[derive(Deserialize)]
struct ApiErrorBody {
    code: i64,
    name: String,
    error: String,
}

impl From<ApiErrorBody> for ListApiError {
    fn from(body: ApiErrorBody) -> Self {
        match body.name.as_str() {
            ALREADY_SUBSCRIBED => Self::AlreadySubscribed,
            VALIDATION_ERROR => Self::Validation(body.error),
            _ => Self::Other {
                name: body.name,
                code: body.code,
                message: body.error,
            },
        }
    }
}

#[derive(Deserialize)]
struct ListsResponse {
    data: Vec<MailingList>,
}

#[derive(Deserialize)]
struct MergeVarsResponse {
    data: Vec<ListMergeVars>,
    #[serde(default)]
    errors: Vec<MergeVarsFailure>,
}

#[derive(Deserialize)]
struct ListMergeVars {
    merge_vars: Vec<MergeVariable>,
}

#[derive(Deserialize)]
struct MergeVarsFailure {
    code: i64,
    error: String,
}

/// Thin client for the provider's v2 JSON api. Every call is a `POST` to
/// `{base_url}/{section}/{method}.json` with the api key in the body.
///
/// Like any `reqwest::Client`, this should be built once and shared, so that
/// connections are reused.
pub struct MailingListClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl MailingListClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// All lists on the account, or only the one with `list_id`. An unknown
    /// `list_id` gives an empty `Vec`, not an error.
    #[tracing::instrument(name = "Fetching mailing lists", skip(self))]
    pub async fn lists(
        &self,
        list_id: Option<&str>,
    ) -> Result<Vec<MailingList>, ListApiError> {
        let body = match list_id {
            Some(id) => json!({
                "apikey": self.api_key.expose_secret(),
                "filters": { "list_id": id },
            }),
            None => json!({
                "apikey": self.api_key.expose_secret(),
                "limit": 100,
            }),
        };
        let resp: ListsResponse = self.call("lists/list", &body).await?;
        Ok(resp.data)
    }

    /// The list's merge variables, in the order the provider returns them.
    #[tracing::instrument(name = "Fetching merge variables", skip(self))]
    pub async fn fetch_merge_variables(
        &self,
        list_id: &str,
    ) -> Result<Vec<MergeVariable>, ListApiError> {
        let body = json!({
            "apikey": self.api_key.expose_secret(),
            "id": [list_id],
        });
        let resp: MergeVarsResponse = self.call("lists/merge-vars", &body).await?;

        match resp.data.into_iter().next() {
            Some(list) => Ok(list.merge_vars),
            // per-list failures come back with a 200 and an `errors` entry
            None => {
                let failure = resp.errors.into_iter().next();
                Err(ListApiError::Other {
                    name: LIST_DOES_NOT_EXIST.to_string(),
                    code: failure.as_ref().map_or(200, |f| f.code),
                    message: failure.map_or_else(|| format!("no list {list_id}"), |f| f.error),
                })
            }
        }
    }

    /// A single attempt; nothing is retried.
    #[tracing::instrument(
        name = "Subscribing to mailing list",
        skip(self, request),
        fields(double_optin = request.double_optin)
    )]
    pub async fn subscribe(
        &self,
        list_id: &str,
        request: &SubscriptionRequest,
    ) -> Result<(), ListApiError> {
        let merge_vars: BTreeMap<String, String> = request.merge_vars();
        let body = json!({
            "apikey": self.api_key.expose_secret(),
            "id": list_id,
            "email": { "email": request.email.as_ref() },
            "merge_vars": merge_vars,
            "double_optin": request.double_optin,
        });
        let _: IgnoredAny = self.call("lists/subscribe", &body).await?;
        Ok(())
    }

    async fn call<B, R>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R, ListApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}/{method}.json", self.base_url);
        let resp = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("could not reach the provider for {method}"))?;

        let status = resp.status();
        if status.is_success() {
            let parsed = resp
                .json::<R>()
                .await
                .with_context(|| format!("invalid {method} response"))?;
            return Ok(parsed);
        }

        let failure = resp
            .json::<ApiErrorBody>()
            .await
            .with_context(|| format!("{method} failed with {status} and no error body"))?;
        tracing::warn!(
            error.name = %failure.name,
            error.code = failure.code,
            error.message = %failure.error,
            "provider rejected {method}"
        );
        Err(failure.into())
    }
}
