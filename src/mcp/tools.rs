//! Tool parameter types and the JSON views returned to MCP clients.
//!
//! Parameters derive `JsonSchema` so the tool router can advertise them.
//! Identifiers for boards, columns, cards, tags and users accept either an id
//! or a name.

use crate::favro::error::FavroError;
use crate::favro::types::{Card, Collection, Column, Comment, Organization, Tag, User, Widget};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==================== Parameters ====================

/// Parameters for tools that only need an organization scope
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OrganizationScopeParams {
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SetOrganizationParams {
    #[schemars(description = "Organization ID or name to make current")]
    pub organization: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListBoardsParams {
    #[serde(default)]
    #[schemars(description = "Only list boards in this collection")]
    pub collection_id: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

/// Parameters for tools scoped to one board
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BoardScopeParams {
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SetBoardParams {
    #[schemars(description = "Board ID or name to make current")]
    pub board: String,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateColumnParams {
    #[schemars(description = "Column name")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "Position index (0-based); appended at the end when omitted")]
    pub position: Option<i64>,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RenameColumnParams {
    #[schemars(description = "Column ID or name")]
    pub column: String,
    #[schemars(description = "New column name")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MoveColumnParams {
    #[schemars(description = "Column ID or name")]
    pub column: String,
    #[schemars(description = "New position index (0-based)")]
    pub position: i64,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ColumnParams {
    #[schemars(description = "Column ID or name")]
    pub column: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListCardsParams {
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Only list cards in this column (ID or name)")]
    pub column: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

/// Parameters for tools acting on a single card
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateCardParams {
    #[schemars(description = "Card title")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Column ID or name to place the card in")]
    pub column: Option<String>,
    #[serde(default)]
    #[schemars(description = "Detailed description (markdown)")]
    pub description: Option<String>,
    #[serde(default)]
    #[schemars(description = "Tag IDs or names")]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schemars(description = "User IDs, names or emails to assign")]
    pub assignees: Vec<String>,
    #[serde(default)]
    #[schemars(description = "Start date (YYYY-MM-DD or RFC 3339)")]
    pub start_date: Option<String>,
    #[serde(default)]
    #[schemars(description = "Due date (YYYY-MM-DD or RFC 3339)")]
    pub due_date: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateCardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "New card title")]
    pub name: Option<String>,
    #[serde(default)]
    #[schemars(description = "New detailed description")]
    pub description: Option<String>,
    #[serde(default)]
    #[schemars(description = "Archive (true) or unarchive (false) the card")]
    pub archived: Option<bool>,
    #[serde(default)]
    #[schemars(description = "Start date (YYYY-MM-DD or RFC 3339)")]
    pub start_date: Option<String>,
    #[serde(default)]
    #[schemars(description = "Due date (YYYY-MM-DD or RFC 3339)")]
    pub due_date: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MoveCardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[schemars(description = "Target column ID or name")]
    pub column: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name (defaults to the current board, then the card's board)")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AssignCardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[schemars(description = "User ID, name or email")]
    pub user: String,
    #[serde(default)]
    #[schemars(description = "Remove the assignment instead of adding it")]
    pub remove: bool,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TagCardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[schemars(description = "Tag ID or name")]
    pub tag: String,
    #[serde(default)]
    #[schemars(description = "Remove the tag instead of adding it")]
    pub remove: bool,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeleteCardParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[serde(default)]
    #[schemars(description = "Delete the card from every board, not only this one")]
    pub everywhere: bool,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentParams {
    #[schemars(description = "Card ID, sequential ID (#123) or name")]
    pub card: String,
    #[schemars(description = "Comment text")]
    pub comment: String,
    #[serde(default)]
    #[schemars(description = "Board ID or name, needed for sequential ID and name lookups")]
    pub board: Option<String>,
    #[serde(default)]
    #[schemars(description = "Organization ID (defaults to the current organization)")]
    pub organization_id: Option<String>,
}

/// Normalize a user-supplied date to the RFC 3339 form Favro accepts
pub fn parse_date(field: &str, raw: &str) -> Result<String, FavroError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    Err(FavroError::InvalidArgument(format!(
        "{} '{}' is not a date (expected YYYY-MM-DD or RFC 3339)",
        field, raw
    )))
}

// ==================== Views ====================

#[derive(Debug, Serialize)]
pub struct OrganizationView {
    pub organization_id: String,
    pub name: String,
}

impl From<Organization> for OrganizationView {
    fn from(org: Organization) -> Self {
        Self {
            organization_id: org.organization_id,
            name: org.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub board_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub board_type: Option<String>,
    pub collection_ids: Vec<String>,
    pub archived: bool,
}

impl From<Widget> for BoardView {
    fn from(widget: Widget) -> Self {
        Self {
            board_id: widget.widget_common_id,
            name: widget.name,
            board_type: widget.widget_type,
            collection_ids: widget.collection_ids,
            archived: widget.archived,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionView {
    pub collection_id: String,
    pub name: String,
    pub board_ids: Vec<String>,
}

impl From<Collection> for CollectionView {
    fn from(collection: Collection) -> Self {
        Self {
            collection_id: collection.collection_id,
            name: collection.name,
            board_ids: collection.widget_common_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub column_id: String,
    pub board_id: String,
    pub name: String,
    pub position: f64,
    pub card_count: u64,
}

impl From<Column> for ColumnView {
    fn from(column: Column) -> Self {
        Self {
            column_id: column.column_id,
            board_id: column.widget_common_id,
            name: column.name,
            position: column.position,
            card_count: column.card_count,
        }
    }
}

/// Compact card row for listings
#[derive(Debug, Serialize)]
pub struct CardSummary {
    pub card_id: String,
    pub sequential_id: Option<u64>,
    pub name: String,
    pub column_id: Option<String>,
    pub tags: Vec<String>,
    pub archived: bool,
}

impl From<Card> for CardSummary {
    fn from(card: Card) -> Self {
        Self {
            card_id: card.card_id,
            sequential_id: card.sequential_id,
            name: card.name,
            column_id: card.column_id,
            tags: card.tags,
            archived: card.archived,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentView {
    pub user_id: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub comment_id: String,
    pub user_id: Option<String>,
    pub comment: String,
    pub created: Option<String>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            comment_id: comment.comment_id,
            user_id: comment.user_id,
            comment: comment.comment,
            created: comment.created.map(|c| c.to_rfc3339()),
        }
    }
}

/// Full card, optionally with its comments
#[derive(Debug, Serialize)]
pub struct CardView {
    pub card_id: String,
    pub card_common_id: String,
    pub sequential_id: Option<u64>,
    pub name: String,
    pub detailed_description: Option<String>,
    pub board_id: Option<String>,
    pub column_id: Option<String>,
    pub lane_id: Option<String>,
    pub tags: Vec<String>,
    pub assignments: Vec<AssignmentView>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub archived: bool,
    pub tasks_done: u64,
    pub tasks_total: u64,
    pub num_comments: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

impl CardView {
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments.into_iter().map(CommentView::from).collect());
        self
    }
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        Self {
            card_id: card.card_id,
            card_common_id: card.card_common_id,
            sequential_id: card.sequential_id,
            name: card.name,
            detailed_description: card.detailed_description,
            board_id: card.widget_common_id,
            column_id: card.column_id,
            lane_id: card.lane_id,
            tags: card.tags,
            assignments: card
                .assignments
                .into_iter()
                .map(|a| AssignmentView {
                    user_id: a.user_id,
                    completed: a.completed,
                })
                .collect(),
            start_date: card.start_date.map(|d| d.to_rfc3339()),
            due_date: card.due_date.map(|d| d.to_rfc3339()),
            archived: card.archived,
            tasks_done: card.tasks_done,
            tasks_total: card.tasks_total,
            num_comments: card.num_comments,
            comments: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagView {
    pub tag_id: String,
    pub name: String,
    pub color: Option<String>,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            tag_id: tag.tag_id,
            name: tag.name,
            color: tag.color,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.organization_role,
        }
    }
}

/// `{"<key>": [...], "count": n}` listing envelope
pub fn listing<T, V>(key: &str, items: Vec<T>) -> Result<Value, FavroError>
where
    V: Serialize + From<T>,
{
    let views: Vec<V> = items.into_iter().map(V::from).collect();
    let mut body = Map::new();
    body.insert("count".to_string(), Value::from(views.len()));
    body.insert(key.to_string(), serde_json::to_value(views)?);
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_plain_day() {
        assert_eq!(
            parse_date("due_date", "2026-03-01").unwrap(),
            "2026-03-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_parse_date_rfc3339_normalized_to_utc() {
        assert_eq!(
            parse_date("start_date", "2026-03-01T10:30:00+02:00").unwrap(),
            "2026-03-01T08:30:00.000Z"
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("due_date", "next friday").unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
        assert!(err.to_string().contains("due_date"));
    }

    #[test]
    fn test_listing_envelope() {
        let tags = vec![Tag {
            tag_id: "t-1".to_string(),
            name: "Bug".to_string(),
            color: Some("red".to_string()),
        }];
        let value = listing::<Tag, TagView>("tags", tags).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["tags"][0]["tag_id"], "t-1");
        assert_eq!(value["tags"][0]["name"], "Bug");
    }

    #[test]
    fn test_card_params_schema_defaults() {
        let params: CardParams = serde_json::from_str(r##"{"card": "#12"}"##).unwrap();
        assert_eq!(params.card, "#12");
        assert!(params.board.is_none());
        assert!(params.organization_id.is_none());
    }

    #[test]
    fn test_board_view_renames_type() {
        let widget: Widget =
            serde_json::from_str(r#"{"widgetCommonId":"w-1","name":"Roadmap","type":"board"}"#)
                .unwrap();
        let value = serde_json::to_value(BoardView::from(widget)).unwrap();
        assert_eq!(value["board_id"], "w-1");
        assert_eq!(value["type"], "board");
    }
}
