mod get;
mod post;
pub use get::*;
pub use post::*;

use std::net::IpAddr;
use std::net::SocketAddr;

use actix_web::http::header::ContentType;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use anyhow::Context;
use serde::Serialize;
use tera::Tera;

use super::PageError;
use crate::forms::FieldKind;
use crate::forms::FormField;
use crate::forms::SubscribeForm;
use crate::forms::Widget;
use crate::forms::EMAIL_TAG;
use crate::mailing_list_client::MailingList;
use crate::mailing_list_client::MailingListClient;

/// Wrapper for the configured double opt-in flag (a bare `bool` in `Data`
/// would be too easy to mix up)
#[derive(Clone, Copy)]
pub struct DoubleOptin(pub bool);

/// Look up the routed list, so that a bad id is a 404 instead of a provider
/// error further down.
async fn find_list(
    client: &MailingListClient,
    list_id: &str,
) -> Result<MailingList, PageError> {
    client
        .lists(Some(list_id))
        .await
        .with_context(|| format!("could not fetch list {list_id}"))?
        .into_iter()
        .find(|l| l.id == list_id)
        .ok_or_else(|| PageError::UnknownList(list_id.to_string()))
}

/// The requester's address, if it is one worth telling the provider about.
/// Proxy headers (`Forwarded`, `X-Forwarded-For`) win over the peer address.
fn subscriber_ip(req: &HttpRequest) -> Option<IpAddr> {
    let raw = req.connection_info().realip_remote_addr()?.to_string();
    let raw = raw.trim_matches('"');
    let ip = raw
        .parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| raw.trim_start_matches('[').trim_end_matches(']').parse())
        .ok()?;
    is_public(&ip).then_some(ip)
}

/// Loopback, private and link-local addresses say nothing about the
/// subscriber.
fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            let unique_local = first & 0xfe00 == 0xfc00;
            let link_local = first & 0xffc0 == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}

/// What the template needs to know about one field
#[derive(Serialize)]
struct FieldView<'a> {
    name: &'a str,
    label: &'a str,
    help_text: &'a str,
    required: bool,
    input_type: &'static str,
    value: String,
    choices: &'a [String],
    max_length: Option<usize>,
    error: Option<&'a str>,
}

impl<'a> FieldView<'a> {
    fn new(
        form: &'a SubscribeForm,
        field: &'a FormField,
    ) -> Self {
        let input_type = match (&field.widget, &field.kind) {
            (Widget::Hidden, _) => "hidden",
            (_, FieldKind::Email) => "email",
            (_, FieldKind::Number) => "number",
            (_, FieldKind::Phone) => "tel",
            (_, FieldKind::Dropdown(_)) => "select",
            (_, FieldKind::Text | FieldKind::Zip | FieldKind::Date) => "text",
        };
        let choices = match &field.kind {
            FieldKind::Dropdown(choices) => choices.as_slice(),
            _ => &[],
        };
        Self {
            name: &field.tag,
            label: &field.label,
            help_text: &field.help_text,
            required: field.required,
            input_type,
            value: form.value(field).unwrap_or_default(),
            choices,
            max_length: field.max_length(),
            error: form.field_error(&field.tag),
        }
    }
}

/// Form-wide errors, preceded by the errors of hidden fields, which have
/// nowhere else to be shown.
fn page_errors(form: &SubscribeForm) -> Vec<String> {
    form.fields()
        .iter()
        .filter(|f| f.widget == Widget::Hidden)
        .filter_map(|f| {
            form.field_error(&f.tag)
                .map(|e| format!("(Hidden field {}) {e}", f.label))
        })
        .chain(form.non_field_errors().iter().cloned())
        .collect()
}

/// Render either the form (fresh, or with errors and the submitted values) or,
/// when `success` is set, the confirmation page.
fn render_form(
    templates: &Tera,
    list: &MailingList,
    form: &SubscribeForm,
    success: bool,
    double_optin: bool,
) -> Result<HttpResponse, PageError> {
    let fields: Vec<FieldView> = form.fields().iter().map(|f| FieldView::new(form, f)).collect();
    let email = form
        .submitted_merge_vars()
        .and_then(|m| m.get(EMAIL_TAG))
        .cloned()
        .unwrap_or_default();

    let mut context = tera::Context::new();
    context.insert("list", list);
    context.insert("fields", &fields);
    context.insert("non_field_errors", &page_errors(form));
    context.insert("success", &success);
    context.insert("double_optin", &double_optin);
    context.insert("email", &email);

    let body = templates
        .render("subscribe.html", &context)
        .with_context(|| format!("could not render subscribe form for {}", list.id))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
