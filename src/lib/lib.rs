#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email relay library: validates JSON send requests and hands them to an SMTP transport.

pub mod domain;
pub mod infrastructure;
