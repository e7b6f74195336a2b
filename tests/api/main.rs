// all integration tests live in a single binary; linking is the slow part of
// building them, and each tests/*.rs file would otherwise be its own binary
mod health_check;
mod helpers;
mod list_index;
mod subscribe_form;
