use actix_web::web;
use actix_web::HttpResponse;
use anyhow::Context;
use tera::Tera;

use super::find_list;
use super::render_form;
use super::DoubleOptin;
use crate::forms::SubscribeForm;
use crate::mailing_list_client::MailingListClient;
use crate::routes::PageError;

/// `GET /{list_id}/subscribe/`
///
/// An empty form, with the list's default values filled in (hidden, if the
/// list says they shouldn't be shown).
#[tracing::instrument(
    name = "Showing subscribe form",
    skip(path, client, templates, double_optin),
    fields(list_id = %path)
)]
pub async fn subscribe_form(
    path: web::Path<String>,
    client: web::Data<MailingListClient>,
    templates: web::Data<Tera>,
    double_optin: web::Data<DoubleOptin>,
) -> Result<HttpResponse, PageError> {
    let list = find_list(&client, &path).await?;
    let merge_vars = client
        .fetch_merge_variables(&list.id)
        .await
        .with_context(|| format!("could not fetch merge variables of {}", list.id))?;

    let form = SubscribeForm::new(&list.id, &merge_vars);
    render_form(&templates, &list, &form, false, double_optin.0)
}
