use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
    Download,
    Upload,
    Share,
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditResourceType {
    User,
    Company,
    Asset,
    Approval,
}

/// One row of the append-only ledger. No field changes after creation
/// except `resource_id`, which the storage layer nulls when the referenced
/// resource is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,

    pub action: AuditAction,
    pub resource_type: AuditResourceType,
    pub resource_id: Option<Uuid>,

    // Opaque JSON; the ledger never validates its shape
    pub metadata: serde_json::Value,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    pub user_id: Uuid,
    pub action: AuditAction,
    pub resource_type: AuditResourceType,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewAuditLogEntry {
    pub fn new(user_id: Uuid, action: AuditAction, resource_type: AuditResourceType) -> Self {
        Self {
            user_id,
            action,
            resource_type,
            resource_id: None,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn resource(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn context(mut self, ctx: &RequestContext) -> Self {
        self.ip_address = ctx.ip_address.clone();
        self.user_agent = ctx.user_agent.clone();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<AuditResourceType>,
    pub resource_id: Option<Uuid>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

/// Caller context captured for audit rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
