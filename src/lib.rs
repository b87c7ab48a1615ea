use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod logs;
pub mod model;
pub mod presenter;
pub mod templates;
pub mod util;
pub mod view;
pub mod widget;

#[cfg(test)]
mod test_support;

pub use error::{Result, SuggestError};
pub use model::{Candidate, Query, RequestToken};
pub use view::{Entry, EntryHandle, HtmlView, View};
pub use widget::SuggestWidget;

use crate::fetch::SuggestionFetcher;
use crate::logs::SessionLogger;

/// Prints the result list every time the widget renders.
#[derive(Default)]
struct TerminalView(HtmlView);

impl View for TerminalView {
    fn show_entries(&mut self, entries: &[Entry]) {
        self.0.show_entries(entries);
        if entries.is_empty() {
            println!("(no suggestions)");
        } else {
            print!("{}", self.0.markup);
        }
    }

    fn set_input(&mut self, value: &str) {
        self.0.set_input(value);
        println!("input = {value}");
    }

    fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.0.set_coordinates(latitude, longitude);
        println!("latitude = {latitude}, longitude = {longitude}");
    }

    fn focus_input(&mut self) {
        self.0.focus_input();
    }
}

/// Drives one widget from stdin: each line is the input's new value,
/// `:select N` clicks entry N, `:quit` exits.
pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let config = config::load_config();
    let logger = SessionLogger::new(&config.log_dir()).await;
    let log = logger.as_ref().map(|l| l.sender());

    let kind = args.first().map(String::as_str).unwrap_or("location");
    match kind {
        "location" => drive(SuggestWidget::location(&config, TerminalView::default(), log)?).await?,
        "search" => drive(SuggestWidget::search(&config, TerminalView::default(), log)?).await?,
        "local" => {
            drive(SuggestWidget::local_search(&config, TerminalView::default(), log)?).await?
        }
        other => anyhow::bail!("unknown widget kind `{other}` (expected location, search or local)"),
    }

    if let Some(logger) = logger {
        // Requests still in flight hold log senders until they time out.
        let _ = tokio::time::timeout(Duration::from_secs(2), logger.close()).await;
    }
    Ok(())
}

async fn drive<F: SuggestionFetcher>(widget: SuggestWidget<F, TerminalView>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line == ":quit" {
            break;
        }
        if let Some(arg) = line.strip_prefix(":select") {
            let Ok(index) = arg.trim().parse::<usize>() else {
                eprintln!("usage: :select <index>");
                continue;
            };
            let entries = widget.entries().await;
            match entries.get(index) {
                Some(entry) => {
                    widget.select(entry.handle).await;
                }
                None => eprintln!("no entry {index}"),
            }
            continue;
        }
        widget.on_input(&line).await;
    }

    widget.cancel_pending();
    Ok(())
}
