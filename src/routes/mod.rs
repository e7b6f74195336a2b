mod health_check;
mod index;
mod subscribe;
pub use health_check::*;
pub use index::*;
pub use subscribe::*;

use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::ResponseError;
use tera::Tera;

use crate::utils::error_chain_fmt;

/// Compiled into the binary, so a missing template is a build error rather
/// than a runtime one. Names ending in `.html` are autoescaped.
pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", include_str!("./templates/index.html")),
        ("subscribe.html", include_str!("./templates/subscribe.html")),
    ])?;
    Ok(tera)
}

/// Why a page could not be shown at all. Anything the user can fix is a form
/// error instead, and is rendered as part of the page.
#[derive(thiserror::Error)]
pub enum PageError {
    #[error("There is no mailing list with id {0}")]
    UnknownList(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for PageError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownList(_) => StatusCode::NOT_FOUND,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
