//! Signup forms for mailing lists hosted by a remote provider.
//!
//! Each list's form is built from the provider's merge variables (`forms`),
//! checked locally, then submitted to the provider, whose rejections are shown
//! as form errors.

pub mod configuration;
pub mod domain;
pub mod forms;
pub mod mailing_list_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
