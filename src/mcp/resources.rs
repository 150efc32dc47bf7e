//! Read-only `favro://` resources.

use rmcp::model::{Resource, ResourceTemplate};
use serde_json::json;

pub const MIME_JSON: &str = "application/json";

/// A parsed resource URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavroResource {
    Organizations,
    CurrentOrganization,
    Boards,
    CurrentBoard,
    Board(String),
    BoardColumns(String),
    BoardCards(String),
    Card(String),
}

impl FavroResource {
    pub fn parse(uri: &str) -> Option<Self> {
        let path = uri.strip_prefix("favro://")?;
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        let resource = match segments.as_slice() {
            ["organizations"] => Self::Organizations,
            ["organization", "current"] => Self::CurrentOrganization,
            ["boards"] => Self::Boards,
            ["board", "current"] => Self::CurrentBoard,
            ["boards", id] if !id.is_empty() => Self::Board(id.to_string()),
            ["boards", id, "columns"] if !id.is_empty() => Self::BoardColumns(id.to_string()),
            ["boards", id, "cards"] if !id.is_empty() => Self::BoardCards(id.to_string()),
            ["cards", id] if !id.is_empty() => Self::Card(id.to_string()),
            _ => return None,
        };
        Some(resource)
    }
}

const STATIC_RESOURCES: &[(&str, &str, &str)] = &[
    (
        "favro://organizations",
        "organizations",
        "All organizations visible to the configured account",
    ),
    (
        "favro://organization/current",
        "current-organization",
        "The organization selected for this session",
    ),
    (
        "favro://boards",
        "boards",
        "Boards in the current organization",
    ),
    (
        "favro://board/current",
        "current-board",
        "The board selected for this session, with its columns",
    ),
];

const RESOURCE_TEMPLATES: &[(&str, &str, &str)] = &[
    ("favro://boards/{board_id}", "board", "A single board"),
    (
        "favro://boards/{board_id}/columns",
        "board-columns",
        "Columns of a board, ordered by position",
    ),
    (
        "favro://boards/{board_id}/cards",
        "board-cards",
        "All cards on a board",
    ),
    (
        "favro://cards/{card_id}",
        "card",
        "A single card with its comments",
    ),
];

/// Fixed-URI resources advertised by `resources/list`
pub fn static_resources() -> Result<Vec<Resource>, serde_json::Error> {
    STATIC_RESOURCES
        .iter()
        .map(|(uri, name, description)| {
            serde_json::from_value(json!({
                "uri": uri,
                "name": name,
                "description": description,
                "mimeType": MIME_JSON,
            }))
        })
        .collect()
}

/// Parameterised resources advertised by `resources/templates/list`
pub fn resource_templates() -> Result<Vec<ResourceTemplate>, serde_json::Error> {
    RESOURCE_TEMPLATES
        .iter()
        .map(|(uri_template, name, description)| {
            serde_json::from_value(json!({
                "uriTemplate": uri_template,
                "name": name,
                "description": description,
                "mimeType": MIME_JSON,
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_uris() {
        assert_eq!(
            FavroResource::parse("favro://organizations"),
            Some(FavroResource::Organizations)
        );
        assert_eq!(
            FavroResource::parse("favro://organization/current"),
            Some(FavroResource::CurrentOrganization)
        );
        assert_eq!(
            FavroResource::parse("favro://board/current"),
            Some(FavroResource::CurrentBoard)
        );
    }

    #[test]
    fn test_parse_templated_uris() {
        assert_eq!(
            FavroResource::parse("favro://boards/w-1"),
            Some(FavroResource::Board("w-1".to_string()))
        );
        assert_eq!(
            FavroResource::parse("favro://boards/w-1/columns"),
            Some(FavroResource::BoardColumns("w-1".to_string()))
        );
        assert_eq!(
            FavroResource::parse("favro://boards/w-1/cards/"),
            Some(FavroResource::BoardCards("w-1".to_string()))
        );
        assert_eq!(
            FavroResource::parse("favro://cards/c-9"),
            Some(FavroResource::Card("c-9".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(FavroResource::parse("https://favro.com/boards"), None);
        assert_eq!(FavroResource::parse("favro://boards//cards"), None);
        assert_eq!(FavroResource::parse("favro://tags"), None);
        assert_eq!(FavroResource::parse("favro://boards/w-1/lanes"), None);
    }

    #[test]
    fn test_catalogue_builds() {
        let resources = static_resources().unwrap();
        assert_eq!(resources.len(), 4);
        assert_eq!(resources[0].uri, "favro://organizations");

        let templates = resource_templates().unwrap();
        assert_eq!(templates.len(), 4);
        assert_eq!(templates[3].uri_template, "favro://cards/{card_id}");
    }
}
