use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a Favro organization
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub organization_id: String,
    pub name: String,
    #[serde(default)]
    pub shared_to_users: Vec<Value>,
}

/// Collection (dashboard) grouping widgets
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub collection_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub widget_common_ids: Vec<String>,
}

/// Widget: a board or a backlog
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub widget_common_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub widget_type: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// Column on a widget
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub widget_common_id: String,
    pub name: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub card_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAssignment {
    pub user_id: String,
    #[serde(default)]
    pub completed: bool,
}

/// Favro card
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_id: String,
    pub card_common_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub widget_common_id: Option<String>,
    #[serde(default)]
    pub column_id: Option<String>,
    #[serde(default)]
    pub lane_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sequential_id: Option<u64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignments: Vec<CardAssignment>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub tasks_done: u64,
    #[serde(default)]
    pub tasks_total: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization_role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub card_common_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Filters for the card listing endpoint
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    pub widget_common_id: Option<String>,
    pub column_id: Option<String>,
    pub sequential_id: Option<u64>,
}

impl CardQuery {
    pub fn for_widget(widget_common_id: impl Into<String>) -> Self {
        Self {
            widget_common_id: Some(widget_common_id.into()),
            ..Default::default()
        }
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("unique".to_string(), "true".to_string())];
        if let Some(widget) = &self.widget_common_id {
            params.push(("widgetCommonId".to_string(), widget.clone()));
        }
        if let Some(column) = &self.column_id {
            params.push(("columnId".to_string(), column.clone()));
        }
        if let Some(seq) = self.sequential_id {
            params.push(("cardSequentialId".to_string(), seq.to_string()));
        }
        params
    }
}

/// Request body for creating a column
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub widget_common_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Request body for renaming or moving a column
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Request body for creating a card
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub name: String,
    pub widget_common_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    #[serde(rename = "addTags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "addAssignmentIds", skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Request body for updating a card; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_common_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(rename = "archive", skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(rename = "addTagIds", skip_serializing_if = "Vec::is_empty")]
    pub add_tags: Vec<String>,
    #[serde(rename = "removeTagIds", skip_serializing_if = "Vec::is_empty")]
    pub remove_tags: Vec<String>,
    #[serde(rename = "addAssignmentIds", skip_serializing_if = "Vec::is_empty")]
    pub add_assignments: Vec<String>,
    #[serde(rename = "removeAssignmentIds", skip_serializing_if = "Vec::is_empty")]
    pub remove_assignments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub card_common_id: String,
    pub comment: String,
}
