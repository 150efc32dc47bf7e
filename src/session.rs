//! Per-process selection of the current organization and board.
//!
//! Tools that omit an organization or board fall back to this selection, then
//! to the configured defaults. Each accessor takes the lock once; a sequence of
//! calls is not atomic as a whole.

use crate::favro::error::FavroError;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
struct SessionState {
    organization_id: Option<String>,
    board_id: Option<String>,
}

/// Shared mutable session, created at startup and dropped at exit
#[derive(Debug, Default)]
pub struct SessionContext {
    state: Mutex<SessionState>,
    default_organization_id: Option<String>,
    default_board_id: Option<String>,
}

impl SessionContext {
    pub fn new(default_organization_id: Option<String>, default_board_id: Option<String>) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            default_organization_id: non_empty(default_organization_id),
            default_board_id: non_empty(default_board_id),
        }
    }

    /// Select an organization. Switching to a different organization clears the
    /// board selection, since boards belong to one organization.
    pub async fn set_organization(&self, organization_id: impl Into<String>) {
        let organization_id = organization_id.into();
        let mut state = self.state.lock().await;

        if state.organization_id.as_deref() != Some(organization_id.as_str()) {
            state.board_id = None;
        }
        info!(organization_id = %organization_id, "Session organization selected");
        state.organization_id = Some(organization_id);
    }

    pub async fn set_board(&self, board_id: impl Into<String>) {
        let board_id = board_id.into();
        info!(board_id = %board_id, "Session board selected");
        self.state.lock().await.board_id = Some(board_id);
    }

    pub async fn current_organization(&self) -> Option<String> {
        self.state.lock().await.organization_id.clone()
    }

    pub async fn current_board(&self) -> Option<String> {
        self.state.lock().await.board_id.clone()
    }

    /// Organization for an organization-scoped call: explicit argument, then
    /// session selection, then configured default.
    pub async fn resolve_organization(&self, explicit: Option<&str>) -> Result<String, FavroError> {
        if let Some(id) = explicit.filter(|id| !id.trim().is_empty()) {
            return Ok(id.to_string());
        }
        if let Some(id) = self.current_organization().await {
            return Ok(id);
        }
        self.default_organization_id
            .clone()
            .ok_or(FavroError::MissingIdentifier {
                kind: "organization",
            })
    }

    /// Board for a board-scoped call, in the same order as organizations
    pub async fn resolve_board(&self, explicit: Option<&str>) -> Result<String, FavroError> {
        if let Some(id) = explicit.filter(|id| !id.trim().is_empty()) {
            return Ok(id.to_string());
        }
        if let Some(id) = self.current_board().await {
            return Ok(id);
        }
        self.default_board_id
            .clone()
            .ok_or(FavroError::MissingIdentifier { kind: "board" })
    }

    /// Board if one can be resolved, without failing
    pub async fn board_hint(&self, explicit: Option<&str>) -> Option<String> {
        self.resolve_board(explicit).await.ok()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_organization_resolution_order() {
        let session = SessionContext::new(Some("org-default".to_string()), None);

        assert_eq!(
            session.resolve_organization(None).await.unwrap(),
            "org-default"
        );

        session.set_organization("org-session").await;
        assert_eq!(
            session.resolve_organization(None).await.unwrap(),
            "org-session"
        );
        assert_eq!(
            session.resolve_organization(Some("org-explicit")).await.unwrap(),
            "org-explicit"
        );
    }

    #[tokio::test]
    async fn test_missing_organization() {
        let session = SessionContext::new(None, None);
        let err = session.resolve_organization(None).await.unwrap_err();
        assert!(matches!(
            err,
            FavroError::MissingIdentifier {
                kind: "organization"
            }
        ));
    }

    #[tokio::test]
    async fn test_blank_explicit_falls_through() {
        let session = SessionContext::new(None, Some("w-default".to_string()));
        assert_eq!(session.resolve_board(Some("  ")).await.unwrap(), "w-default");
    }

    #[tokio::test]
    async fn test_board_resolution_and_missing() {
        let session = SessionContext::new(None, None);
        assert!(matches!(
            session.resolve_board(None).await,
            Err(FavroError::MissingIdentifier { kind: "board" })
        ));
        assert!(session.board_hint(None).await.is_none());

        session.set_board("w-1").await;
        assert_eq!(session.resolve_board(None).await.unwrap(), "w-1");
        assert_eq!(session.board_hint(Some("w-2")).await.as_deref(), Some("w-2"));
    }

    #[tokio::test]
    async fn test_switching_organization_clears_board() {
        let session = SessionContext::new(None, None);
        session.set_organization("org-1").await;
        session.set_board("w-1").await;

        // Re-selecting the same organization keeps the board
        session.set_organization("org-1").await;
        assert_eq!(session.current_board().await.as_deref(), Some("w-1"));

        session.set_organization("org-2").await;
        assert_eq!(session.current_organization().await.as_deref(), Some("org-2"));
        assert!(session.current_board().await.is_none());
    }
}
