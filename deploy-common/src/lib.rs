//! Common types shared between the deploy scripts and the integration tooling

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod constants;
pub mod types;
