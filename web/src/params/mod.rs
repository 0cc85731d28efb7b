//! This module holds typed parameters for endpoint inputs and the JSON shapes the
//! endpoints answer with.
//!
//! Request bodies are deserialized leniently: fields the dashboard may leave out are
//! `Option`s, and the controllers decide which ones are required so the caller gets the
//! same `{success: false, error}` body for a missing field as for any other rejection.

pub(crate) mod chat;
pub(crate) mod conversation;
pub(crate) mod email;
pub(crate) mod image;
pub(crate) mod ringcentral;
pub(crate) mod summary;
pub(crate) mod video;
pub(crate) mod whatsapp;

/// Treats an absent, empty or whitespace-only field as missing.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
