//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

use agora_core::{Collection, Cursor, ListRequest, SortDirection, SortKey};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name (discussions, responses, users, reports)
    pub collection: Collection,

    /// Field to filter on (equality)
    #[arg(long, requires = "filter_value")]
    pub filter_field: Option<String>,

    /// Value to match; parsed as JSON when possible, otherwise a string
    #[arg(long, requires = "filter_field")]
    pub filter_value: Option<String>,

    /// Sort key: created-at, updated-at, popularity, or any field name
    #[arg(long, default_value = "created-at")]
    pub sort: SortKey,

    /// Sort direction
    #[arg(long, default_value = "desc")]
    pub direction: SortDirection,

    /// Page size for unfiltered listings
    #[arg(long)]
    pub limit: Option<u32>,

    /// Pagination cursor from a previous listing
    #[arg(long)]
    pub cursor: Option<String>,

    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// `42` and `true` filter as numbers and booleans, anything unparseable as text.
fn filter_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl ListArgs {
    fn request(&self) -> ListRequest {
        let mut request = ListRequest::new()
            .sort(self.sort.clone(), self.direction)
            .after(self.cursor.clone().map(Cursor::from));
        if let (Some(field), Some(value)) = (&self.filter_field, &self.filter_value) {
            request = request.filter(field.as_str(), filter_value(value));
        }
        if let Some(limit) = self.limit {
            request = request.page_size(limit);
        }
        if let Some(term) = &self.search {
            request = request.search(term.as_str());
        }
        request
    }
}

pub async fn run(args: ListArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    let page = facade
        .list(args.collection, &args.request())
        .await
        .context("Failed to list records")?;

    if page.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
    }

    for doc in &page.items {
        output::document(doc, args.pretty)?;
    }

    if let Some(cursor) = &page.next_cursor {
        eprintln!();
        eprintln!("{}: {}", "Next cursor".dimmed(), cursor);
    }

    Ok(())
}
