use crate::config::Config;
use crate::favro::client::FavroClient;
use crate::favro::error::FavroError;
use crate::favro::resolvers::Resolver;
use crate::favro::types::{
    Card, CardQuery, Collection, Column, CreateCardRequest, CreateColumnRequest, Organization,
    Tag, UpdateCardRequest, UpdateColumnRequest, User, Widget,
};
use crate::mcp::resources::{self, FavroResource};
use crate::mcp::tools::{
    listing, parse_date, AddCommentParams, AssignCardParams, BoardScopeParams, BoardView,
    CardParams, CardSummary, CardView, CollectionView, ColumnParams, ColumnView,
    CreateCardParams, CreateColumnParams, DeleteCardParams, ListBoardsParams, ListCardsParams,
    MoveCardParams, MoveColumnParams, OrganizationScopeParams, OrganizationView,
    RenameColumnParams, SetBoardParams, SetOrganizationParams, TagCardParams, TagView,
    UpdateCardParams, UserView,
};
use crate::session::SessionContext;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ListResourceTemplatesResult,
        ListResourcesResult, PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

impl From<FavroError> for McpError {
    fn from(err: FavroError) -> Self {
        let data = Some(json!({ "kind": err.kind() }));
        if err.is_caller_error() {
            McpError::invalid_params(err.to_string(), data)
        } else {
            warn!(kind = err.kind(), error = %err, "Favro operation failed");
            McpError::internal_error(err.to_string(), data)
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(FavroError::from)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// MCP server for Favro.
///
/// Clones share the same client and session, so every transport session of
/// one process sees the same organization and board selection.
#[derive(Clone)]
pub struct FavroMcpServer {
    client: Arc<FavroClient>,
    session: Arc<SessionContext>,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl FavroMcpServer {
    pub fn new(client: Arc<FavroClient>, session: Arc<SessionContext>) -> Self {
        Self {
            client,
            session,
            tool_router: Self::tool_router(),
        }
    }

    /// Build the client and session from configuration
    pub fn from_config(config: &Config) -> Result<Self, FavroError> {
        let client = Arc::new(FavroClient::from_config(config)?);
        let session = Arc::new(SessionContext::new(
            client
                .credentials()
                .default_organization_id()
                .map(str::to_string),
            config.board_id.clone(),
        ));
        Ok(Self::new(client, session))
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    async fn organization(&self, explicit: Option<&str>) -> Result<String, FavroError> {
        self.session.resolve_organization(explicit).await
    }

    /// Board id for a board-scoped call. An explicit argument may be a name and
    /// is resolved upstream; session and default values are used as-is.
    async fn board(&self, org: &str, explicit: Option<&str>) -> Result<String, FavroError> {
        match non_blank(explicit) {
            Some(board) => Ok(Resolver::new(&self.client, org)
                .board(board)
                .await?
                .widget_common_id),
            None => self.session.resolve_board(None).await,
        }
    }

    async fn widget(&self, org: &str, explicit: Option<&str>) -> Result<Widget, FavroError> {
        match non_blank(explicit) {
            Some(board) => Resolver::new(&self.client, org).board(board).await,
            None => {
                let board_id = self.session.resolve_board(None).await?;
                self.client.get_widget(org, &board_id).await
            }
        }
    }

    /// Board used to look up cards by sequential id or name, when one is known
    async fn board_hint(
        &self,
        org: &str,
        explicit: Option<&str>,
    ) -> Result<Option<String>, FavroError> {
        match non_blank(explicit) {
            Some(_) => self.board(org, explicit).await.map(Some),
            None => Ok(self.session.board_hint(None).await),
        }
    }

    async fn card(
        &self,
        org: &str,
        card: &str,
        board: Option<&str>,
    ) -> Result<(Card, Option<String>), FavroError> {
        let board_id = self.board_hint(org, board).await?;
        let card = Resolver::new(&self.client, org)
            .card(card, board_id.as_deref())
            .await?;
        Ok((card, board_id))
    }

    async fn board_with_columns(&self, org: &str, widget: Widget) -> Result<Value, FavroError> {
        let columns = self.client.list_columns(org, &widget.widget_common_id).await?;
        let columns: Vec<ColumnView> = columns.into_iter().map(ColumnView::from).collect();
        Ok(json!({
            "board": BoardView::from(widget),
            "columns": columns,
        }))
    }

    async fn card_with_comments(&self, org: &str, card: Card) -> Result<CardView, FavroError> {
        let comments = self.client.list_comments(org, &card.card_common_id).await?;
        Ok(CardView::from(card).with_comments(comments))
    }

    async fn read(&self, resource: &FavroResource) -> Result<Value, FavroError> {
        match resource {
            FavroResource::Organizations => {
                let orgs = self.client.list_organizations().await?;
                listing::<Organization, OrganizationView>("organizations", orgs)
            }
            FavroResource::CurrentOrganization => {
                let org = self.organization(None).await?;
                let org = self.client.get_organization(&org).await?;
                Ok(serde_json::to_value(OrganizationView::from(org))?)
            }
            FavroResource::Boards => {
                let org = self.organization(None).await?;
                let widgets = self.client.list_widgets(&org, None).await?;
                listing::<Widget, BoardView>("boards", widgets)
            }
            FavroResource::CurrentBoard => {
                let org = self.organization(None).await?;
                let widget = self.widget(&org, None).await?;
                self.board_with_columns(&org, widget).await
            }
            FavroResource::Board(board_id) => {
                let org = self.organization(None).await?;
                let widget = self.client.get_widget(&org, board_id).await?;
                Ok(serde_json::to_value(BoardView::from(widget))?)
            }
            FavroResource::BoardColumns(board_id) => {
                let org = self.organization(None).await?;
                let columns = self.client.list_columns(&org, board_id).await?;
                listing::<Column, ColumnView>("columns", columns)
            }
            FavroResource::BoardCards(board_id) => {
                let org = self.organization(None).await?;
                let cards = self
                    .client
                    .list_cards(&org, &CardQuery::for_widget(board_id.as_str()))
                    .await?;
                listing::<Card, CardSummary>("cards", cards)
            }
            FavroResource::Card(card_id) => {
                let org = self.organization(None).await?;
                let card = self.client.get_card(&org, card_id).await?;
                Ok(serde_json::to_value(self.card_with_comments(&org, card).await?)?)
            }
        }
    }
}

#[tool_router]
impl FavroMcpServer {
    // ==================== Organizations ====================

    #[tool(description = "List all Favro organizations the configured account can access")]
    pub async fn list_organizations(&self) -> Result<CallToolResult, McpError> {
        let orgs = self.client.list_organizations().await?;
        json_result(&listing::<Organization, OrganizationView>(
            "organizations",
            orgs,
        )?)
    }

    #[tool(description = "Show the organization selected for this session")]
    pub async fn get_current_organization(&self) -> Result<CallToolResult, McpError> {
        let org_id = self.organization(None).await?;
        let org = self.client.get_organization(&org_id).await?;
        json_result(&OrganizationView::from(org))
    }

    #[tool(
        description = "Select the organization used by later calls. Accepts an organization ID or name. Clears the current board when the organization changes."
    )]
    pub async fn set_organization(
        &self,
        Parameters(params): Parameters<SetOrganizationParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = Resolver::organization(&self.client, &params.organization).await?;
        self.session
            .set_organization(org.organization_id.as_str())
            .await;

        info!(
            tool = "set_organization",
            organization_id = %org.organization_id,
            "Organization selected"
        );
        json_result(&json!({
            "message": format!("Selected organization: {}", org.name),
            "organization": OrganizationView::from(org),
        }))
    }

    // ==================== Boards ====================

    #[tool(description = "List boards in the organization, optionally only those in one collection")]
    pub async fn list_boards(
        &self,
        Parameters(params): Parameters<ListBoardsParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let widgets = self
            .client
            .list_widgets(&org, non_blank(params.collection_id.as_deref()))
            .await?;
        json_result(&listing::<Widget, BoardView>("boards", widgets)?)
    }

    #[tool(description = "Get a board and its columns. Accepts a board ID or name; defaults to the current board.")]
    pub async fn get_board(
        &self,
        Parameters(params): Parameters<BoardScopeParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let widget = self.widget(&org, params.board.as_deref()).await?;
        json_result(&self.board_with_columns(&org, widget).await?)
    }

    #[tool(description = "Show the board selected for this session, with its columns")]
    pub async fn get_current_board(&self) -> Result<CallToolResult, McpError> {
        let org = self.organization(None).await?;
        let widget = self.widget(&org, None).await?;
        json_result(&self.board_with_columns(&org, widget).await?)
    }

    #[tool(description = "Select the board used by later calls. Accepts a board ID or name.")]
    pub async fn set_board(
        &self,
        Parameters(params): Parameters<SetBoardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let widget = Resolver::new(&self.client, &org).board(&params.board).await?;

        if non_blank(params.organization_id.as_deref()).is_some() {
            self.session.set_organization(org.as_str()).await;
        }
        self.session
            .set_board(widget.widget_common_id.as_str())
            .await;

        info!(
            tool = "set_board",
            organization_id = %org,
            board_id = %widget.widget_common_id,
            "Board selected"
        );
        json_result(&json!({
            "message": format!("Selected board: {}", widget.name),
            "board": BoardView::from(widget),
        }))
    }

    #[tool(description = "List collections (dashboards) in the organization")]
    pub async fn list_collections(
        &self,
        Parameters(params): Parameters<OrganizationScopeParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let collections = self.client.list_collections(&org).await?;
        json_result(&listing::<Collection, CollectionView>(
            "collections",
            collections,
        )?)
    }

    // ==================== Columns ====================

    #[tool(description = "List a board's columns ordered by position")]
    pub async fn list_columns(
        &self,
        Parameters(params): Parameters<BoardScopeParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;
        let columns = self.client.list_columns(&org, &board_id).await?;
        json_result(&listing::<Column, ColumnView>("columns", columns)?)
    }

    #[tool(description = "Create a column on a board")]
    pub async fn create_column(
        &self,
        Parameters(params): Parameters<CreateColumnParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;

        let column = self
            .client
            .create_column(
                &org,
                &CreateColumnRequest {
                    widget_common_id: board_id,
                    name: params.name,
                    position: params.position,
                },
            )
            .await?;

        info!(tool = "create_column", column_id = %column.column_id, "Column created");
        json_result(&json!({
            "message": format!("Created column: {}", column.name),
            "column": ColumnView::from(column),
        }))
    }

    #[tool(description = "Rename a column. Accepts a column ID or name.")]
    pub async fn rename_column(
        &self,
        Parameters(params): Parameters<RenameColumnParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;
        let column = Resolver::new(&self.client, &org)
            .column(&params.column, &board_id)
            .await?;

        let updated = self
            .client
            .update_column(
                &org,
                &column.column_id,
                &UpdateColumnRequest {
                    name: Some(params.name),
                    ..Default::default()
                },
            )
            .await?;

        json_result(&json!({
            "message": format!("Renamed column '{}' to '{}'", column.name, updated.name),
            "column": ColumnView::from(updated),
        }))
    }

    #[tool(description = "Move a column to a new position (0-based)")]
    pub async fn move_column(
        &self,
        Parameters(params): Parameters<MoveColumnParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;
        let column = Resolver::new(&self.client, &org)
            .column(&params.column, &board_id)
            .await?;

        let updated = self
            .client
            .update_column(
                &org,
                &column.column_id,
                &UpdateColumnRequest {
                    position: Some(params.position),
                    ..Default::default()
                },
            )
            .await?;

        json_result(&json!({
            "message": format!("Moved column '{}' to position {}", updated.name, params.position),
            "column": ColumnView::from(updated),
        }))
    }

    #[tool(description = "Delete a column. Cards in the column are deleted with it.")]
    pub async fn delete_column(
        &self,
        Parameters(params): Parameters<ColumnParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;
        let column = Resolver::new(&self.client, &org)
            .column(&params.column, &board_id)
            .await?;

        self.client.delete_column(&org, &column.column_id).await?;

        info!(tool = "delete_column", column_id = %column.column_id, "Column deleted");
        json_result(&json!({
            "message": format!("Deleted column: {}", column.name),
            "column_id": column.column_id,
        }))
    }

    // ==================== Cards ====================

    #[tool(description = "List every card on a board, optionally only those in one column")]
    pub async fn list_cards(
        &self,
        Parameters(params): Parameters<ListCardsParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;

        let column_id = match non_blank(params.column.as_deref()) {
            Some(column) => Some(
                Resolver::new(&self.client, &org)
                    .column(column, &board_id)
                    .await?
                    .column_id,
            ),
            None => None,
        };

        let query = CardQuery {
            column_id,
            ..CardQuery::for_widget(board_id)
        };
        let cards = self.client.list_cards(&org, &query).await?;
        json_result(&listing::<Card, CardSummary>("cards", cards)?)
    }

    #[tool(description = "Get a card with its description, assignments, dates and comments")]
    pub async fn get_card_details(
        &self,
        Parameters(params): Parameters<CardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;
        json_result(&self.card_with_comments(&org, card).await?)
    }

    #[tool(description = "Create a card on a board, optionally in a column with tags and assignees")]
    pub async fn create_card(
        &self,
        Parameters(params): Parameters<CreateCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let start_date = params
            .start_date
            .as_deref()
            .map(|d| parse_date("start_date", d))
            .transpose()?;
        let due_date = params
            .due_date
            .as_deref()
            .map(|d| parse_date("due_date", d))
            .transpose()?;

        let org = self.organization(params.organization_id.as_deref()).await?;
        let board_id = self.board(&org, params.board.as_deref()).await?;
        let resolver = Resolver::new(&self.client, &org);

        let column_id = match non_blank(params.column.as_deref()) {
            Some(column) => Some(resolver.column(column, &board_id).await?.column_id),
            None => None,
        };

        let mut tags = Vec::with_capacity(params.tags.len());
        for tag in &params.tags {
            tags.push(resolver.tag(tag).await?.tag_id);
        }
        let mut assignments = Vec::with_capacity(params.assignees.len());
        for user in &params.assignees {
            assignments.push(resolver.user(user).await?.user_id);
        }

        let card = self
            .client
            .create_card(
                &org,
                &CreateCardRequest {
                    name: params.name,
                    widget_common_id: board_id,
                    column_id,
                    detailed_description: params.description,
                    tags,
                    assignments,
                    start_date,
                    due_date,
                },
            )
            .await?;

        info!(tool = "create_card", card_id = %card.card_id, "Card created");
        json_result(&json!({
            "message": format!("Created card: {}", card.name),
            "card": CardSummary::from(card),
        }))
    }

    #[tool(description = "Update a card's title, description, dates or archived state")]
    pub async fn update_card(
        &self,
        Parameters(params): Parameters<UpdateCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let start_date = params
            .start_date
            .as_deref()
            .map(|d| parse_date("start_date", d))
            .transpose()?;
        let due_date = params
            .due_date
            .as_deref()
            .map(|d| parse_date("due_date", d))
            .transpose()?;

        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;

        let updated = self
            .client
            .update_card(
                &org,
                &card.card_id,
                &UpdateCardRequest {
                    name: params.name,
                    detailed_description: params.description,
                    archived: params.archived,
                    start_date,
                    due_date,
                    ..Default::default()
                },
            )
            .await?;

        json_result(&json!({
            "message": format!("Updated card: {}", updated.name),
            "card": CardSummary::from(updated),
        }))
    }

    #[tool(description = "Move a card to another column. Accepts column ID or name.")]
    pub async fn move_card(
        &self,
        Parameters(params): Parameters<MoveCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, board_id) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;

        let target_board = board_id
            .or_else(|| card.widget_common_id.clone())
            .ok_or(FavroError::MissingIdentifier { kind: "board" })?;
        let column = Resolver::new(&self.client, &org)
            .column(&params.column, &target_board)
            .await?;

        let updated = self
            .client
            .update_card(
                &org,
                &card.card_id,
                &UpdateCardRequest {
                    widget_common_id: Some(column.widget_common_id.clone()),
                    column_id: Some(column.column_id.clone()),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            tool = "move_card",
            card_id = %updated.card_id,
            column_id = %column.column_id,
            "Card moved"
        );
        json_result(&json!({
            "message": format!("Moved card '{}' to column '{}'", updated.name, column.name),
            "card_id": updated.card_id,
            "column_id": column.column_id,
            "column_name": column.name,
        }))
    }

    #[tool(description = "Assign a user to a card, or remove the assignment. Accepts user ID, name or email.")]
    pub async fn assign_card(
        &self,
        Parameters(params): Parameters<AssignCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;
        let user = Resolver::new(&self.client, &org).user(&params.user).await?;

        let mut update = UpdateCardRequest::default();
        let message = if params.remove {
            update.remove_assignments = vec![user.user_id.clone()];
            format!("Unassigned {} from card '{}'", user.name, card.name)
        } else {
            update.add_assignments = vec![user.user_id.clone()];
            format!("Assigned {} to card '{}'", user.name, card.name)
        };

        let updated = self.client.update_card(&org, &card.card_id, &update).await?;
        json_result(&json!({
            "message": message,
            "card_id": updated.card_id,
            "user": UserView::from(user),
        }))
    }

    #[tool(description = "Add a tag to a card, or remove it. Accepts tag ID or name.")]
    pub async fn tag_card(
        &self,
        Parameters(params): Parameters<TagCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;
        let tag = Resolver::new(&self.client, &org).tag(&params.tag).await?;

        let mut update = UpdateCardRequest::default();
        let message = if params.remove {
            update.remove_tags = vec![tag.tag_id.clone()];
            format!("Removed tag '{}' from card '{}'", tag.name, card.name)
        } else {
            update.add_tags = vec![tag.tag_id.clone()];
            format!("Added tag '{}' to card '{}'", tag.name, card.name)
        };

        let updated = self.client.update_card(&org, &card.card_id, &update).await?;
        json_result(&json!({
            "message": message,
            "card_id": updated.card_id,
            "tag": TagView::from(tag),
        }))
    }

    #[tool(description = "Delete a card from its board, or from every board with everywhere=true")]
    pub async fn delete_card(
        &self,
        Parameters(params): Parameters<DeleteCardParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;

        self.client
            .delete_card(&org, &card.card_id, params.everywhere)
            .await?;

        info!(
            tool = "delete_card",
            card_id = %card.card_id,
            everywhere = params.everywhere,
            "Card deleted"
        );
        json_result(&json!({
            "message": format!("Deleted card: {}", card.name),
            "card_id": card.card_id,
        }))
    }

    #[tool(description = "Add a comment to a card")]
    pub async fn add_comment(
        &self,
        Parameters(params): Parameters<AddCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.comment.trim().is_empty() {
            return Err(FavroError::InvalidArgument("comment must not be empty".to_string()).into());
        }

        let org = self.organization(params.organization_id.as_deref()).await?;
        let (card, _) = self
            .card(&org, &params.card, params.board.as_deref())
            .await?;

        let comment = self
            .client
            .create_comment(&org, &card.card_common_id, &params.comment)
            .await?;

        json_result(&json!({
            "message": format!("Commented on card: {}", card.name),
            "card_id": card.card_id,
            "comment_id": comment.comment_id,
        }))
    }

    // ==================== Tags & users ====================

    #[tool(description = "List tags defined in the organization")]
    pub async fn list_tags(
        &self,
        Parameters(params): Parameters<OrganizationScopeParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let tags = self.client.list_tags(&org).await?;
        json_result(&listing::<Tag, TagView>("tags", tags)?)
    }

    #[tool(description = "List members of the organization")]
    pub async fn list_users(
        &self,
        Parameters(params): Parameters<OrganizationScopeParams>,
    ) -> Result<CallToolResult, McpError> {
        let org = self.organization(params.organization_id.as_deref()).await?;
        let users = self.client.list_users(&org).await?;
        json_result(&listing::<User, UserView>("users", users)?)
    }
}

#[tool_handler]
impl ServerHandler for FavroMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "favro-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Favro project management. Pick an organization with set_organization and a \
                 board with set_board; later calls default to them. Boards, columns, cards, \
                 tags and users can be named by ID or by name; cards also by #sequential-id."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let items = resources::static_resources()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ListResourcesResult::with_all_items(items))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let items = resources::resource_templates()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ListResourceTemplatesResult::with_all_items(items))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let resource = FavroResource::parse(&request.uri).ok_or_else(|| {
            McpError::resource_not_found(format!("Unknown resource: {}", request.uri), None)
        })?;

        let value = match self.read(&resource).await {
            Ok(value) => value,
            Err(err @ FavroError::NotFound { .. }) => {
                return Err(McpError::resource_not_found(
                    err.to_string(),
                    Some(json!({ "kind": err.kind() })),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
