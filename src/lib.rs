//! Search widget for the Juju interfaces index.
//!
//! A search input filters the interface and layer collections served by the
//! index API. Each collection fetches independently whenever the query
//! changes and renders its rows as HTML.

pub mod app;
pub mod domain;
pub mod services;
pub mod ui;

#[cfg(test)]
mod testing;
