pub mod access;
pub mod ballot;
pub mod election;
pub mod event;
pub mod registration;

/// An opaque reference to externally stored content (full descriptions,
/// verification documents, candidate details). The engine stores and
/// compares these, never interprets them.
pub type ContentRef = String;
