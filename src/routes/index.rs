use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;
use anyhow::Context;
use tera::Tera;

use super::PageError;
use crate::mailing_list_client::MailingListClient;

/// `GET /`
///
/// Every list on the account, each linking to its subscribe form. There is
/// nothing to show without the provider, so failing to reach it is a 500.
#[tracing::instrument(name = "Listing mailing lists", skip(client, templates))]
pub async fn list_index(
    client: web::Data<MailingListClient>,
    templates: web::Data<Tera>,
) -> Result<HttpResponse, PageError> {
    let lists = client
        .lists(None)
        .await
        .context("could not fetch mailing lists")?;

    let mut context = tera::Context::new();
    context.insert("lists", &lists);
    let body = templates
        .render("index.html", &context)
        .context("could not render list index")?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
