use inboxguard_dashboard::records::{AuditEntry, Campaign, Domain, Lead, Mailbox};

/// A record that can be printed as one table row
pub trait TableRow {
    /// Column headings
    fn headers() -> &'static [&'static str];

    /// Cell text, one per heading
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Mailbox {
    fn headers() -> &'static [&'static str] {
        &["ID", "EMAIL", "STATUS", "BOUNCE", "MODE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.email.clone(),
            or_dash(&self.status),
            percent(self.bounce_rate),
            optional(self.mode),
        ]
    }
}

impl TableRow for Domain {
    fn headers() -> &'static [&'static str] {
        &["ID", "DOMAIN", "HEALTH", "MODE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            optional(self.health_score),
            optional(self.mode),
        ]
    }
}

impl TableRow for Campaign {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "STATUS", "SENT", "BOUNCE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(&self.status),
            optional(self.sent),
            percent(self.bounce_rate),
        ]
    }
}

impl TableRow for Lead {
    fn headers() -> &'static [&'static str] {
        &["ID", "EMAIL", "STATUS", "CAMPAIGN"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.email.clone(),
            optional(self.status.as_deref()),
            optional(self.campaign_id.as_deref()),
        ]
    }
}

impl TableRow for AuditEntry {
    fn headers() -> &'static [&'static str] {
        &["ID", "ACTION", "ACTOR", "AT"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.action.clone(),
            optional(self.actor.as_deref()),
            optional(
                self.created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
        ]
    }
}

/// Render rows under `headers` with space-padded columns
///
/// The last column is not padded.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let pad = widths[i].saturating_sub(cell.chars().count());
            out.push_str(cell);
            out.push_str(&" ".repeat(pad + 2));
        }
    }
    out.push('\n');
}

/// One-line label used in row pickers
pub fn row_label<T: TableRow>(row: &T) -> String {
    row.cells().join("  ")
}

/// Checkbox marker for a selected or unselected row
pub fn checkbox(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Fraction rendered as a percentage with one decimal
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "-".to_string(),
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inboxguard_dashboard::records::SystemMode;

    fn mailbox(id: &str, email: &str) -> Mailbox {
        Mailbox {
            id: id.to_string(),
            email: email.to_string(),
            status: "active".to_string(),
            bounce_rate: Some(0.032),
            mode: Some(SystemMode::Enforce),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(Some(0.032)), "3.2%");
        assert_eq!(percent(Some(0.0)), "0.0%");
        assert_eq!(percent(None), "-");
    }

    #[test]
    fn test_mailbox_cells() {
        let cells = mailbox("mb_1", "ops@example.com").cells();
        assert_eq!(cells, vec!["mb_1", "ops@example.com", "active", "3.2%", "enforce"]);
        assert_eq!(cells.len(), Mailbox::headers().len());
    }

    #[test]
    fn test_missing_fields_render_as_dash() {
        let lead = Lead {
            id: "ld_1".to_string(),
            email: "a@b.test".to_string(),
            status: None,
            campaign_id: None,
            extra: Default::default(),
        };
        assert_eq!(lead.cells(), vec!["ld_1", "a@b.test", "-", "-"]);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            mailbox("mb_1", "a@example.com").cells(),
            mailbox("mb_22", "longer@example.com").cells(),
        ];
        let table = render_table(Mailbox::headers(), &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID     EMAIL"));
        assert!(lines[1].starts_with("mb_1   a@example.com       active"));
        assert!(lines[2].starts_with("mb_22  longer@example.com  active"));
        assert!(lines[0].ends_with("MODE"));
    }

    #[test]
    fn test_render_table_without_rows() {
        assert_eq!(render_table(&["ID", "NAME"], &[]), "ID  NAME\n");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }
}
