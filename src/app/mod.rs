//! Application shell around the widget.
//!
//! This module contains:
//! - Configuration loading (config.rs)
//! - Optional query debouncing (debounce.rs)
//! - The line-driven host loop: each input line replaces the search field,
//!   and the collections are printed whenever a response lands

pub mod config;
pub mod debounce;

pub use config::{ConfigError, WidgetConfig};
pub use debounce::QueryDebouncer;

use std::sync::Arc;

use anyhow::{Context, Result};
use maud::Render;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::{EntityId, EntityKind};
use crate::services::{CollectionFetcher, HttpFetcher, TracingSink};
use crate::ui::{CollectionView, FetchContext, InputEdit, SearchRoot};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New contents of the search field.
    Edit(String),
    Clear,
    Show { kind: EntityKind, id: EntityId },
    Quit,
}

/// Errors parsing a `:` command.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command :{0}")]
    Unknown(String),
    #[error("unknown kind {0:?}, expected interface or layer")]
    UnknownKind(String),
    #[error("usage: :show <interface|layer> <id>")]
    ShowUsage,
}

impl Command {
    /// Lines starting with `:` are commands, everything else is field text.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Command::Edit(line.to_string()));
        };
        let mut words = command.split_whitespace();
        match words.next().unwrap_or_default() {
            "clear" => Ok(Command::Clear),
            "quit" | "q" => Ok(Command::Quit),
            "show" => {
                let (Some(kind), Some(id), None) = (words.next(), words.next(), words.next())
                else {
                    return Err(CommandError::ShowUsage);
                };
                let kind = EntityKind::from_label(kind)
                    .ok_or_else(|| CommandError::UnknownKind(kind.to_string()))?;
                Ok(Command::Show {
                    kind,
                    id: EntityId::from(id),
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Line-driven host for one widget.
pub struct App {
    config: WidgetConfig,
    html: bool,
}

impl App {
    /// Create an app for `config`.
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            html: false,
        }
    }

    /// Print full markup instead of a text listing.
    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Runs until `:quit` or end of input, then prints the settled state.
    pub async fn run<R, W>(&self, input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let base = self.config.base_url()?;
        let fetcher = Arc::new(
            HttpFetcher::new(self.config.request_timeout()).context("building http client")?,
        );
        let ctx = FetchContext::new(Arc::clone(&fetcher), Arc::new(TracingSink))
            .with_ordering(self.config.ordering);
        let mut root = SearchRoot::with_default_collections(&base, self.config.logged_in, ctx)
            .context("binding collection endpoints")?;
        let mut revision = root.subscribe();
        let mut debouncer = QueryDebouncer::new(self.config.debounce());
        let mut lines = input.lines();

        tracing::info!(base = %base, logged_in = self.config.logged_in, "search widget mounted");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("reading input")? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Command::Edit(text)) => {
                            let query = root.edit_input(InputEdit::Replace(text));
                            if let Some(query) = debouncer.push(query) {
                                root.commit(query);
                            }
                        }
                        Ok(Command::Clear) => {
                            debouncer.cancel();
                            root.clear();
                        }
                        Ok(Command::Show { kind, id }) => {
                            let text = match fetcher.fetch_entity(&base, kind, &id).await {
                                Ok(entity) => serde_json::to_string_pretty(&entity)?,
                                Err(err) => format!("{kind} {id}: {err}"),
                            };
                            write_line(&mut out, &text).await?;
                        }
                        Ok(Command::Quit) => break,
                        Err(err) => write_line(&mut out, &err.to_string()).await?,
                    }
                }
                query = debouncer.ready(), if debouncer.has_pending() => {
                    root.commit(query);
                }
                Ok(()) = revision.changed() => {
                    self.print(&root, &mut out).await?;
                }
            }
        }

        if debouncer.has_pending() {
            let query = debouncer.ready().await;
            root.commit(query);
        }
        root.settle().await;
        self.print(&root, &mut out).await?;
        root.unmount();
        Ok(())
    }

    async fn print<F, W>(&self, root: &SearchRoot<F>, out: &mut W) -> Result<()>
    where
        F: CollectionFetcher + ?Sized + 'static,
        W: AsyncWrite + Unpin,
    {
        let text = if self.html {
            root.render().into_string()
        } else {
            render_text(root, self.config.logged_in)
        };
        write_line(out, &text).await
    }
}

/// Plain-text listing of every collection.
pub fn render_text<F>(root: &SearchRoot<F>, logged_in: bool) -> String
where
    F: CollectionFetcher + ?Sized + 'static,
{
    let mut text = format!("search: {:?}\n", root.query().as_str());
    for view in root.views() {
        text.push_str(&collection_text(view, logged_in));
    }
    text
}

fn collection_text<F>(view: &CollectionView<F>, logged_in: bool) -> String
where
    F: CollectionFetcher + ?Sized + 'static,
{
    let kind = view.kind();
    let mut text = if logged_in {
        format!("{kind}: + {}\n", kind.create_path())
    } else {
        format!("{kind}:\n")
    };
    for entity in view.entities().iter() {
        text.push_str(&format!(
            "  {} {} {}\n",
            entity.name,
            kind.detail_path(&entity.id),
            entity.summary
        ));
    }
    text
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        out.write_all(b"\n").await?;
    }
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_edits() {
        assert_eq!(Command::parse("netw"), Ok(Command::Edit("netw".into())));
        assert_eq!(Command::parse("  "), Ok(Command::Edit("  ".into())));
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(":clear"), Ok(Command::Clear));
        assert_eq!(Command::parse(":quit"), Ok(Command::Quit));
        assert_eq!(
            Command::parse(":show layer basic"),
            Ok(Command::Show {
                kind: EntityKind::Layer,
                id: EntityId::from("basic"),
            })
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            Command::parse(":show bundle x"),
            Err(CommandError::UnknownKind("bundle".into()))
        );
        assert_eq!(Command::parse(":show layer"), Err(CommandError::ShowUsage));
        assert_eq!(
            Command::parse(":show layer a b"),
            Err(CommandError::ShowUsage)
        );
        assert_eq!(
            Command::parse(":reload"),
            Err(CommandError::Unknown("reload".into()))
        );
    }
}
