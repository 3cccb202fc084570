//! Form store implementations.
//!
//! `HttpFormStore` talks to the web application's `/api/forms/:id`
//! endpoint; `FileFormStore` reads records from a local directory and also
//! provides the loader used for standalone config files.

pub mod file;
pub mod http;

pub use file::{FileFormStore, FormFile, load_form_file};
pub use http::HttpFormStore;
