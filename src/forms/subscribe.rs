use std::collections::BTreeMap;
use std::collections::HashMap;
use std::net::IpAddr;

use anyhow::Context;

use super::FieldSet;
use super::FormField;
use crate::domain::MergeVariable;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionRequest;
use crate::mailing_list_client::ListApiError;
use crate::mailing_list_client::MailingListClient;

/// Merge variable every list has, holding the subscriber's address
pub const EMAIL_TAG: &str = "EMAIL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// A form is submitted at most once; after that its outcome is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Unsubmitted,
    Submitted(Outcome),
}

/// The subscribe form of one mailing list.
///
/// Validation happens in two phases: the fields are checked locally, and only
/// if they all pass is the subscription sent to the provider. The provider
/// may still reject it (already subscribed, its own validation), in which
/// case the form is invalid all the same, with the provider's complaint as a
/// form-wide error. This is why submitting is part of `is_valid`, and not
/// something done after it.
#[derive(Debug)]
pub struct SubscribeForm {
    list_id: String,
    fields: FieldSet,
    subscriber_ip: Option<IpAddr>,
    double_optin: bool,
    /// Raw submitted values; `None` until `bind` is called
    data: Option<HashMap<String, String>>,
    field_errors: BTreeMap<String, String>,
    non_field_errors: Vec<String>,
    /// Only set on success
    submitted_merge_vars: Option<BTreeMap<String, String>>,
    state: SubmissionState,
}

impl SubscribeForm {
    /// `merge_vars` must already be fetched; the form never talks to the
    /// provider to describe itself.
    pub fn new(
        list_id: &str,
        merge_vars: &[MergeVariable],
    ) -> Self {
        Self {
            list_id: list_id.to_string(),
            fields: FieldSet::from_merge_variables(merge_vars),
            subscriber_ip: None,
            double_optin: true,
            data: None,
            field_errors: BTreeMap::new(),
            non_field_errors: vec![],
            submitted_merge_vars: None,
            state: SubmissionState::Unsubmitted,
        }
    }

    pub fn with_subscriber_ip(
        mut self,
        ip: Option<IpAddr>,
    ) -> Self {
        self.subscriber_ip = ip;
        self
    }

    pub fn with_double_optin(
        mut self,
        double_optin: bool,
    ) -> Self {
        self.double_optin = double_optin;
        self
    }

    /// Attach submitted values. An unbound form is never valid.
    pub fn bind(
        mut self,
        data: HashMap<String, String>,
    ) -> Self {
        self.data = Some(data);
        self
    }

    pub fn list_id(&self) -> &str { &self.list_id }

    pub fn fields(&self) -> &FieldSet { &self.fields }

    pub fn state(&self) -> SubmissionState { self.state }

    /// What to put in a field's input: the submitted value if there is one,
    /// otherwise its initial value.
    pub fn value(
        &self,
        field: &FormField,
    ) -> Option<String> {
        match &self.data {
            Some(data) => data.get(&field.tag).cloned(),
            None => field.initial.clone(),
        }
    }

    pub fn field_error(
        &self,
        tag: &str,
    ) -> Option<&str> {
        self.field_errors.get(tag).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> { &self.field_errors }

    pub fn non_field_errors(&self) -> &[String] { &self.non_field_errors }

    /// The `merge_vars` that were accepted by the provider
    pub fn submitted_merge_vars(&self) -> Option<&BTreeMap<String, String>> {
        self.submitted_merge_vars.as_ref()
    }

    /// Validate locally, then subscribe. The provider is called at most once
    /// per form; asking again just returns the recorded outcome.
    ///
    /// Provider rejections make the form invalid. Failing to get an answer at
    /// all (network, timeout) is an `Err`, and leaves the form unsubmitted.
    #[tracing::instrument(
        name = "Validating subscribe form",
        skip(self, client),
        fields(list_id = %self.list_id)
    )]
    pub async fn is_valid(
        &mut self,
        client: &MailingListClient,
    ) -> Result<bool, anyhow::Error> {
        if let SubmissionState::Submitted(outcome) = self.state {
            return Ok(outcome == Outcome::Success);
        }
        let Some(data) = &self.data else {
            return Ok(false);
        };

        let cleaned = match clean_fields(&self.fields, data) {
            Ok(cleaned) => cleaned,
            Err(errors) => {
                tracing::debug!(?errors, "form invalid before submission");
                self.field_errors = errors;
                return Ok(self.finish(Outcome::Failure));
            }
        };

        let request = self.subscription_request(cleaned)?;
        match client.subscribe(&self.list_id, &request).await {
            Ok(()) => {
                self.submitted_merge_vars = Some(request.merge_vars());
                Ok(self.finish(Outcome::Success))
            }
            Err(ListApiError::Unexpected(e)) => Err(e),
            Err(e) => {
                tracing::debug!(error = ?e, "form invalid after submission");
                self.non_field_errors.push(e.to_string());
                Ok(self.finish(Outcome::Failure))
            }
        }
    }

    fn finish(
        &mut self,
        outcome: Outcome,
    ) -> bool {
        self.state = SubmissionState::Submitted(outcome);
        outcome == Outcome::Success
    }

    fn subscription_request(
        &self,
        values: BTreeMap<String, String>,
    ) -> Result<SubscriptionRequest, anyhow::Error> {
        let email = values
            .get(EMAIL_TAG)
            .with_context(|| format!("list {} has no {EMAIL_TAG} field", self.list_id))?;
        let email = SubscriberEmail::parse(email.clone()).map_err(anyhow::Error::msg)?;
        Ok(SubscriptionRequest::new(
            email,
            values,
            self.subscriber_ip,
            self.double_optin,
        ))
    }
}

/// Clean every field, collecting all errors rather than stopping at the
/// first one.
fn clean_fields(
    fields: &FieldSet,
    data: &HashMap<String, String>,
) -> Result<BTreeMap<String, String>, BTreeMap<String, String>> {
    let mut cleaned = BTreeMap::new();
    let mut errors = BTreeMap::new();
    for field in fields.iter() {
        match field.clean(data.get(&field.tag).map(String::as_str)) {
            Ok(value) => {
                cleaned.insert(field.tag.clone(), value);
            }
            Err(e) => {
                errors.insert(field.tag.clone(), e);
            }
        }
    }
    match errors.is_empty() {
        true => Ok(cleaned),
        false => Err(errors),
    }
}
