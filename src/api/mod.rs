mod client;

pub use client::{BODY_PREVIEW_CHARS, CatalogApi};
