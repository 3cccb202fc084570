//! Quotation generation clients.

pub mod http;

pub use http::HttpQuotationClient;
