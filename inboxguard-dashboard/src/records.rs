//! Row types for the dashboard tables
//!
//! Only `id` matters to the selection controller. The remaining fields are what
//! the tables display. Fields the backend adds later are kept in `extra` so a
//! record survives a round trip unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controller::Identified;
use crate::error::Error;
use crate::pagination::PaginationMeta;

/// Fields not modelled explicitly
pub type Extra = BTreeMap<String, serde_json::Value>;

/// Dashboard list resources backed by a paged endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Campaign leads
    Leads,
    /// Sending mailboxes
    Mailboxes,
    /// Sending domains
    Domains,
    /// Email campaigns
    Campaigns,
    /// Audit log entries
    AuditLog,
}

impl Resource {
    /// All resources, in navigation order
    pub const ALL: [Resource; 5] = [
        Resource::Campaigns,
        Resource::Mailboxes,
        Resource::Domains,
        Resource::Leads,
        Resource::AuditLog,
    ];

    /// Relative API path of the list endpoint
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Leads => "/leads",
            Self::Mailboxes => "/mailboxes",
            Self::Domains => "/domains",
            Self::Campaigns => "/campaigns",
            Self::AuditLog => "/audit-log",
        }
    }

    /// Relative API path of the bulk-action endpoint
    #[must_use]
    pub fn bulk_path(self) -> String {
        format!("{}/bulk", self.path())
    }

    /// Heading shown above the table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Leads => "Leads",
            Self::Mailboxes => "Mailboxes",
            Self::Domains => "Domains",
            Self::Campaigns => "Campaigns",
            Self::AuditLog => "Audit log",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::Mailboxes => "mailboxes",
            Self::Domains => "domains",
            Self::Campaigns => "campaigns",
            Self::AuditLog => "audit-log",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.name() == s)
            .ok_or_else(|| Error::InvalidResource(s.to_string()))
    }
}

/// Protection mode of a mailbox or domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMode {
    /// Watch and report only
    Observe,
    /// Recommend actions to the operator
    Suggest,
    /// Pause sending automatically when thresholds trip
    Enforce,
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observe => write!(f, "observe"),
            Self::Suggest => write!(f, "suggest"),
            Self::Enforce => write!(f, "enforce"),
        }
    }
}

/// Sending mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub status: String,
    /// Bounced share of sent messages, from 0.0 to 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SystemMode>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Sending domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub name: String,
    /// Health score from 0 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SystemMode>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Email campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Campaign lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Generic row for tables without a dedicated type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_identified!(Mailbox, Domain, Campaign, Lead, AuditEntry, Record);

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

/// Actions that can be applied to a set of selected rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Pause,
    Resume,
    Archive,
    Delete,
}

impl BulkAction {
    pub const ALL: [BulkAction; 4] = [
        BulkAction::Pause,
        BulkAction::Resume,
        BulkAction::Archive,
        BulkAction::Delete,
    ];

    /// Whether the action cannot be undone from the dashboard
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Archive => "archive",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BulkAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| Error::InvalidBulkAction(s.to_string()))
    }
}

/// Body of a bulk-action request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    pub action: BulkAction,
    pub ids: Vec<String>,
}

/// Outcome of a bulk action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionResult {
    /// Number of rows the backend changed
    #[serde(default)]
    pub affected: u64,
}
