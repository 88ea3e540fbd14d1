//! Client for the code-jam staff editor.
//!
//! Two flows are exposed: [`application::preview::PreviewRefresher`] renders
//! the editor contents through the site's render endpoint and reflects the
//! result on the page, and [`application::actions::ActionClient`] sends
//! CSRF-authenticated actions to the staff action endpoint.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use jamdesk_api_types as api;
