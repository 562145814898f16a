//! Services the widget talks to: the collection API and the diagnostic sink.

mod diagnostics;
mod fetch_service;

#[cfg(test)]
pub use diagnostics::MockDiagnosticSink;
pub use diagnostics::{DiagnosticSink, FetchFailure, TracingSink};
pub use fetch_service::{CollectionFetcher, FetchError, FetchOrdering, HttpFetcher};
