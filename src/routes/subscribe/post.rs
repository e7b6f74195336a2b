use std::collections::HashMap;

use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use anyhow::Context;
use tera::Tera;

use super::find_list;
use super::render_form;
use super::subscriber_ip;
use super::DoubleOptin;
use crate::forms::SubscribeForm;
use crate::mailing_list_client::MailingListClient;
use crate::routes::PageError;

/// `POST /{list_id}/subscribe/`
///
/// The body is the form's inputs, keyed by merge variable tag, e.g.
///
/// ```sh
///     curl --data 'EMAIL=user%40example.com&FNAME=Jo' http://127.0.0.1:8000/abc123/subscribe/
/// ```
///
/// Invalid input (ours or the provider's verdict) re-renders the form with
/// the errors and the submitted values; a 500 is reserved for not being able
/// to reach the provider at all.
#[tracing::instrument(
    name = "Subscribing",
    skip(req, path, form, client, templates, double_optin),
    fields(
        list_id = %path,
        subscriber_ip = tracing::field::Empty,
    )
)]
pub async fn subscribe(
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
    client: web::Data<MailingListClient>,
    templates: web::Data<Tera>,
    double_optin: web::Data<DoubleOptin>,
) -> Result<HttpResponse, PageError> {
    let ip = subscriber_ip(&req);
    if let Some(ip) = ip {
        tracing::Span::current().record("subscriber_ip", tracing::field::display(ip));
    }

    let list = find_list(&client, &path).await?;
    // fetched again rather than trusting anything the browser sent back
    let merge_vars = client
        .fetch_merge_variables(&list.id)
        .await
        .with_context(|| format!("could not fetch merge variables of {}", list.id))?;

    let mut subscribe_form = SubscribeForm::new(&list.id, &merge_vars)
        .with_subscriber_ip(ip)
        .with_double_optin(double_optin.0)
        .bind(form.into_inner());

    let valid = subscribe_form.is_valid(&client).await?;
    match valid {
        true => tracing::info!("new subscription"),
        false => tracing::info!(
            field_errors = ?subscribe_form.field_errors(),
            non_field_errors = ?subscribe_form.non_field_errors(),
            "subscription rejected"
        ),
    }

    render_form(&templates, &list, &subscribe_form, valid, double_optin.0)
}
