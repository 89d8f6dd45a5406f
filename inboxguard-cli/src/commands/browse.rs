use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect, Select};
use serde::de::DeserializeOwned;
use std::path::Path;

use inboxguard_dashboard::controller::Identified;
use inboxguard_dashboard::error::Error as DashboardError;
use inboxguard_dashboard::gateway::ApiClient;
use inboxguard_dashboard::pagination::RowLimit;
use inboxguard_dashboard::records::{
    AuditEntry, BulkAction, Campaign, Domain, Lead, Mailbox, Resource,
};
use inboxguard_dashboard::TableView;

use crate::utils::{self, format, format::TableRow, Session};

/// Entries of the browse menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    NextPage,
    PrevPage,
    PickRows,
    SelectPage,
    DeselectPage,
    ClearSelection,
    BulkAction,
    ChangeLimit,
    Refresh,
    Quit,
}

impl MenuItem {
    fn label(self, selected: usize) -> String {
        match self {
            Self::NextPage => "Next page".to_string(),
            Self::PrevPage => "Previous page".to_string(),
            Self::PickRows => "Pick rows on this page".to_string(),
            Self::SelectPage => "Select all on this page".to_string(),
            Self::DeselectPage => "Deselect all on this page".to_string(),
            Self::ClearSelection => format!("Clear selection ({} rows)", selected),
            Self::BulkAction => format!("Apply action to {} selected", selected),
            Self::ChangeLimit => "Change rows per page".to_string(),
            Self::Refresh => "Refresh".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

/// What the current view allows
#[derive(Debug, Clone, Copy, Default)]
struct MenuState {
    has_prev: bool,
    has_next: bool,
    has_rows: bool,
    page_selected: bool,
    selected: usize,
}

impl MenuState {
    fn of<T>(view: &TableView<ApiClient, T>) -> Self
    where
        T: Identified + DeserializeOwned + Send,
    {
        Self {
            has_prev: view.meta().has_prev(),
            has_next: view.meta().has_next(),
            has_rows: !view.items().is_empty(),
            page_selected: view.all_visible_selected(),
            selected: view.controller().selected_count(),
        }
    }

    fn items(&self) -> Vec<MenuItem> {
        let mut items = Vec::new();
        if self.has_next {
            items.push(MenuItem::NextPage);
        }
        if self.has_prev {
            items.push(MenuItem::PrevPage);
        }
        if self.has_rows {
            items.push(MenuItem::PickRows);
            items.push(if self.page_selected {
                MenuItem::DeselectPage
            } else {
                MenuItem::SelectPage
            });
        }
        if self.selected > 0 {
            items.push(MenuItem::BulkAction);
            items.push(MenuItem::ClearSelection);
        }
        items.push(MenuItem::ChangeLimit);
        items.push(MenuItem::Refresh);
        items.push(MenuItem::Quit);
        items
    }
}

pub async fn execute(
    config_path: Option<&Path>,
    verbose: bool,
    resource: Resource,
    limit: Option<RowLimit>,
) -> Result<()> {
    let session = Session::open(config_path, verbose)?;

    match resource {
        Resource::Mailboxes => browse::<Mailbox>(&session, resource, limit).await,
        Resource::Domains => browse::<Domain>(&session, resource, limit).await,
        Resource::Campaigns => browse::<Campaign>(&session, resource, limit).await,
        Resource::Leads => browse::<Lead>(&session, resource, limit).await,
        Resource::AuditLog => browse::<AuditEntry>(&session, resource, limit).await,
    }
}

async fn browse<T>(session: &Session, resource: Resource, limit: Option<RowLimit>) -> Result<()>
where
    T: TableRow + Identified + DeserializeOwned + Send,
{
    let theme = ColorfulTheme::default();
    let mut view: TableView<ApiClient, T> = TableView::new(
        session.client.clone(),
        resource,
        session.config.table.default_page,
        session.row_limit(limit)?,
    );

    let first_page = view.meta().page;
    report(utils::with_spinner("Loading...", view.load(first_page)).await)?;

    loop {
        print_view(&view);

        let state = MenuState::of(&view);
        let menu = state.items();
        let labels: Vec<String> = menu.iter().map(|item| item.label(state.selected)).collect();

        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        match menu.get(choice).copied().unwrap_or(MenuItem::Quit) {
            MenuItem::NextPage => {
                report(utils::with_spinner("Loading next page...", view.next_page()).await)?;
            }
            MenuItem::PrevPage => {
                report(utils::with_spinner("Loading previous page...", view.prev_page()).await)?;
            }
            MenuItem::PickRows => pick_rows(&theme, &mut view)?,
            MenuItem::SelectPage | MenuItem::DeselectPage => view.toggle_all_visible(),
            MenuItem::ClearSelection => {
                view.clear_selection();
                utils::info("Selection cleared");
            }
            MenuItem::BulkAction => bulk_action(&theme, &mut view).await?,
            MenuItem::ChangeLimit => {
                let limits: Vec<String> =
                    RowLimit::ALL.iter().map(|limit| format!("{} rows", limit)).collect();
                let current = RowLimit::ALL
                    .iter()
                    .position(|limit| *limit == view.limit())
                    .unwrap_or(0);
                let idx = Select::with_theme(&theme)
                    .with_prompt("Rows per page")
                    .items(&limits)
                    .default(current)
                    .interact()?;
                if let Some(limit) = RowLimit::ALL.get(idx).copied() {
                    report(utils::with_spinner("Loading...", view.set_limit(limit)).await)?;
                }
            }
            MenuItem::Refresh => {
                report(utils::with_spinner("Refreshing...", view.refresh()).await)?;
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

fn print_view<T>(view: &TableView<ApiClient, T>)
where
    T: TableRow + Identified + DeserializeOwned + Send,
{
    utils::section(&format!("{} - {}", view.resource().label(), view.meta()));

    if view.items().is_empty() {
        utils::info("No rows on this page");
    } else {
        let mut headers = vec![""];
        headers.extend_from_slice(T::headers());

        let rows: Vec<Vec<String>> = view
            .items()
            .iter()
            .map(|item| {
                let selected = view.controller().is_selected(item.id());
                let mut cells = vec![format::checkbox(selected).to_string()];
                cells.extend(item.cells());
                cells
            })
            .collect();
        print!("{}", format::render_table(&headers, &rows));
    }

    let selected = view.controller().selected_count();
    if selected > 0 {
        println!(
            "\n{} selected across all pages, {} on this page",
            selected.to_string().green().bold(),
            view.visible_selected_count()
        );
    }
}

fn pick_rows<T>(theme: &ColorfulTheme, view: &mut TableView<ApiClient, T>) -> Result<()>
where
    T: TableRow + Identified + DeserializeOwned + Send,
{
    let ids: Vec<String> = view.items().iter().map(|item| item.id().to_string()).collect();
    let labels: Vec<String> = view.items().iter().map(format::row_label).collect();
    let checked: Vec<bool> = ids
        .iter()
        .map(|id| view.controller().is_selected(id))
        .collect();

    let chosen = MultiSelect::with_theme(theme)
        .with_prompt("Rows (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    for (idx, id) in ids.iter().enumerate() {
        if chosen.contains(&idx) != checked[idx] {
            view.toggle(id);
        }
    }
    Ok(())
}

async fn bulk_action<T>(theme: &ColorfulTheme, view: &mut TableView<ApiClient, T>) -> Result<()>
where
    T: TableRow + Identified + DeserializeOwned + Send,
{
    let selected = view.controller().selected_count();
    let actions: Vec<String> = BulkAction::ALL.iter().map(ToString::to_string).collect();
    let idx = Select::with_theme(theme)
        .with_prompt(format!("Action for {} selected rows", selected))
        .items(&actions)
        .default(0)
        .interact()?;
    let Some(action) = BulkAction::ALL.get(idx).copied() else {
        return Ok(());
    };

    if action.is_destructive() {
        utils::warning(&format!("{} cannot be undone from the dashboard", action));
    }

    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("Apply {} to {} rows?", action, selected))
        .default(false)
        .interact()?;
    if !confirmed {
        utils::info("Cancelled, selection kept");
        return Ok(());
    }

    let result = utils::with_spinner(
        format!("Applying {}...", action),
        view.apply_bulk_action(action),
    )
    .await;

    match result {
        Ok(result) => {
            utils::success(&format!("{} applied to {} rows", action, result.affected));
            Ok(())
        }
        Err(e @ DashboardError::Unauthorized { .. }) => Err(e.into()),
        Err(e) => {
            utils::error(&e.user_message());
            utils::info("Selection kept, you can retry");
            Ok(())
        }
    }
}

/// Print a failed request and keep browsing; a 401 ends the session
fn report<T>(result: inboxguard_dashboard::error::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e @ DashboardError::Unauthorized { .. }) => Err(e.into()),
        Err(e) => {
            utils::error(&e.user_message());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_on_single_empty_page() {
        let state = MenuState::default();
        assert_eq!(
            state.items(),
            vec![MenuItem::ChangeLimit, MenuItem::Refresh, MenuItem::Quit]
        );
    }

    #[test]
    fn test_menu_offers_navigation_and_bulk_when_selected() {
        let state = MenuState {
            has_prev: true,
            has_next: true,
            has_rows: true,
            page_selected: false,
            selected: 3,
        };
        let items = state.items();

        assert_eq!(items[0], MenuItem::NextPage);
        assert_eq!(items[1], MenuItem::PrevPage);
        assert!(items.contains(&MenuItem::SelectPage));
        assert!(!items.contains(&MenuItem::DeselectPage));
        assert!(items.contains(&MenuItem::BulkAction));
        assert!(items.contains(&MenuItem::ClearSelection));
        assert_eq!(items.last(), Some(&MenuItem::Quit));
    }

    #[test]
    fn test_menu_deselect_when_page_fully_selected() {
        let state = MenuState {
            has_rows: true,
            page_selected: true,
            selected: 20,
            ..MenuState::default()
        };
        let items = state.items();

        assert!(items.contains(&MenuItem::DeselectPage));
        assert!(!items.contains(&MenuItem::SelectPage));
        assert!(!items.contains(&MenuItem::NextPage));
    }

    #[test]
    fn test_menu_labels_show_selection_count() {
        assert_eq!(MenuItem::BulkAction.label(7), "Apply action to 7 selected");
        assert_eq!(MenuItem::ClearSelection.label(7), "Clear selection (7 rows)");
    }

    #[test]
    fn test_report_keeps_going_on_api_error() {
        let result: inboxguard_dashboard::error::Result<()> = Err(DashboardError::Api {
            status: 422,
            message: "Mailbox is locked".to_string(),
        });
        assert!(report(result).is_ok());
    }

    #[test]
    fn test_report_stops_on_unauthorized() {
        let result: inboxguard_dashboard::error::Result<bool> = Err(DashboardError::Unauthorized {
            login_url: "http://localhost:3000/login".to_string(),
        });
        let err = report(result).unwrap_err();
        assert!(err.downcast_ref::<DashboardError>().unwrap().is_unauthorized());
    }
}
