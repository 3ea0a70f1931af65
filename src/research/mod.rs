//! Article text and illustrations from Wikipedia.

pub(crate) mod cache;
pub(crate) mod filter;
pub(crate) mod wikipedia;
