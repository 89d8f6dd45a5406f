use anyhow::{Context, Result};
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use inboxguard_dashboard::gateway::DataGateway;
use inboxguard_dashboard::pagination::{PageRequest, RowLimit};
use inboxguard_dashboard::records::{
    AuditEntry, Campaign, Domain, Lead, Mailbox, Page, Resource,
};

use crate::utils::{self, format::TableRow, Session};

pub async fn execute(
    config_path: Option<&Path>,
    verbose: bool,
    resource: Resource,
    page: u32,
    limit: Option<RowLimit>,
    json: bool,
) -> Result<()> {
    let session = Session::open(config_path, verbose)?;
    let request = PageRequest::new(page, session.row_limit(limit)?);

    match resource {
        Resource::Mailboxes => list::<Mailbox>(&session, resource, request, json).await,
        Resource::Domains => list::<Domain>(&session, resource, request, json).await,
        Resource::Campaigns => list::<Campaign>(&session, resource, request, json).await,
        Resource::Leads => list::<Lead>(&session, resource, request, json).await,
        Resource::AuditLog => list::<AuditEntry>(&session, resource, request, json).await,
    }
}

async fn list<T>(session: &Session, resource: Resource, request: PageRequest, json: bool) -> Result<()>
where
    T: TableRow + Serialize + DeserializeOwned + Send,
{
    let page: Page<T> = if json {
        session.client.fetch_page::<T>(resource, request).await?
    } else {
        utils::with_spinner(
            format!("Loading {}...", resource.label().to_lowercase()),
            session.client.fetch_page::<T>(resource, request),
        )
        .await?
    };

    if json {
        let out = serde_json::to_string_pretty(&page).context("Failed to encode page as JSON")?;
        println!("{}", out);
        return Ok(());
    }

    print_page(resource, &page);
    Ok(())
}

fn print_page<T: TableRow>(resource: Resource, page: &Page<T>) {
    utils::section(resource.label());

    if page.items.is_empty() {
        utils::info("No rows on this page");
    } else {
        let rows: Vec<Vec<String>> = page.items.iter().map(TableRow::cells).collect();
        print!("{}", utils::format::render_table(T::headers(), &rows));
    }

    println!("\n{}", page.meta.to_string().dimmed());

    if page.meta.page > page.meta.total_pages {
        utils::warning(&format!(
            "Page {} is past the last page ({})",
            page.meta.page, page.meta.total_pages
        ));
    }
}
