//! Resolve caller-supplied identifiers that may be either an id or a name.
//!
//! An identifier is first tried as an id. When the upstream says it does not
//! exist, the entity list is fetched and searched by case-insensitive name.

use crate::favro::client::FavroClient;
use crate::favro::error::FavroError;
use crate::favro::types::{Card, CardQuery, Column, Organization, Tag, User, Widget};
use tracing::debug;

/// Resolver bound to one organization
pub struct Resolver<'a> {
    client: &'a FavroClient,
    org: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a FavroClient, org: &'a str) -> Self {
        Self { client, org }
    }

    /// Organizations are resolved without an organization scope
    pub async fn organization(
        client: &FavroClient,
        identifier: &str,
    ) -> Result<Organization, FavroError> {
        if let Some(org) = by_id(client.get_organization(identifier).await)? {
            return Ok(org);
        }
        let all = client.list_organizations().await?;
        match_by_name(
            "organization",
            identifier,
            all,
            |o| o.organization_id.as_str(),
            |o| o.name.as_str(),
        )
    }

    pub async fn board(&self, identifier: &str) -> Result<Widget, FavroError> {
        if let Some(widget) = by_id(self.client.get_widget(self.org, identifier).await)? {
            return Ok(widget);
        }
        let all = self.client.list_widgets(self.org, None).await?;
        match_by_name(
            "board",
            identifier,
            all,
            |w| w.widget_common_id.as_str(),
            |w| w.name.as_str(),
        )
    }

    /// Column names are only unique within a board
    pub async fn column(&self, identifier: &str, board_id: &str) -> Result<Column, FavroError> {
        if let Some(column) = by_id(self.client.get_column(self.org, identifier).await)? {
            return Ok(column);
        }
        let all = self.client.list_columns(self.org, board_id).await?;
        match_by_name(
            "column",
            identifier,
            all,
            |c| c.column_id.as_str(),
            |c| c.name.as_str(),
        )
    }

    pub async fn tag(&self, identifier: &str) -> Result<Tag, FavroError> {
        if let Some(tag) = by_id(self.client.get_tag(self.org, identifier).await)? {
            return Ok(tag);
        }
        let all = self.client.list_tags(self.org).await?;
        match_by_name(
            "tag",
            identifier,
            all,
            |t| t.tag_id.as_str(),
            |t| t.name.as_str(),
        )
    }

    /// Users match by id, then name, then email
    pub async fn user(&self, identifier: &str) -> Result<User, FavroError> {
        if let Some(user) = by_id(self.client.get_user(identifier).await)? {
            return Ok(user);
        }
        let all = self.client.list_users(self.org).await?;
        let by_name = match_by_name(
            "user",
            identifier,
            all.clone(),
            |u| u.user_id.as_str(),
            |u| u.name.as_str(),
        );
        match by_name {
            Err(FavroError::NoMatch { .. }) => match_by_name(
                "user",
                identifier,
                all,
                |u| u.user_id.as_str(),
                |u| u.email.as_deref().unwrap_or_default(),
            ),
            other => other,
        }
    }

    /// Cards match by sequential id (`#123` or `123`), card id, or name.
    /// Sequential ids and names need a board.
    pub async fn card(&self, identifier: &str, board_id: Option<&str>) -> Result<Card, FavroError> {
        if let Some(seq) = parse_sequential_id(identifier) {
            let board_id = board_id.ok_or_else(|| {
                FavroError::InvalidArgument(format!(
                    "looking up card #{} by sequential id requires a board",
                    seq
                ))
            })?;
            let query = CardQuery {
                sequential_id: Some(seq),
                ..CardQuery::for_widget(board_id)
            };
            let mut cards: Vec<Card> = self
                .client
                .list_cards(self.org, &query)
                .await?
                .into_iter()
                .filter(|c| c.sequential_id == Some(seq))
                .collect();

            return match cards.len() {
                0 => Err(FavroError::NoMatch {
                    kind: "card",
                    identifier: identifier.to_string(),
                }),
                1 => Ok(cards.remove(0)),
                _ => Err(FavroError::AmbiguousMatch {
                    kind: "card",
                    identifier: identifier.to_string(),
                    matches: cards
                        .iter()
                        .map(|c| (c.card_id.clone(), format!("#{}: {}", seq, c.name)))
                        .collect(),
                }),
            };
        }

        if let Some(card) = by_id(self.client.get_card(self.org, identifier).await)? {
            return Ok(card);
        }

        let board_id = board_id.ok_or_else(|| {
            FavroError::InvalidArgument(format!(
                "card '{}' not found by id; provide a board to search by name",
                identifier
            ))
        })?;
        let all = self
            .client
            .list_cards(self.org, &CardQuery::for_widget(board_id))
            .await?;
        match_by_name("card", identifier, all, |c| c.card_id.as_str(), |c| c.name.as_str())
    }
}

/// Treat "does not exist" answers from an id lookup as a miss, not a failure
fn by_id<T>(result: Result<T, FavroError>) -> Result<Option<T>, FavroError> {
    match result {
        Ok(entity) => Ok(Some(entity)),
        Err(FavroError::NotFound { .. }) => Ok(None),
        Err(FavroError::Api { status, .. }) if (400..500).contains(&status) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Pick the single entity whose name equals `identifier`, ignoring case
pub fn match_by_name<T>(
    kind: &'static str,
    identifier: &str,
    entities: Vec<T>,
    id_of: impl Fn(&T) -> &str,
    name_of: impl Fn(&T) -> &str,
) -> Result<T, FavroError> {
    let needle = identifier.trim().to_lowercase();
    let mut matches: Vec<T> = entities
        .into_iter()
        .filter(|e| name_of(e).to_lowercase() == needle)
        .collect();

    debug!(kind, identifier, count = matches.len(), "Resolved by name");

    match matches.len() {
        0 => Err(FavroError::NoMatch {
            kind,
            identifier: identifier.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(FavroError::AmbiguousMatch {
            kind,
            identifier: identifier.to_string(),
            matches: matches
                .iter()
                .map(|e| (id_of(e).to_string(), name_of(e).to_string()))
                .collect(),
        }),
    }
}

/// Parse `#123` or `123` as a card sequential id
pub fn parse_sequential_id(identifier: &str) -> Option<u64> {
    let digits = identifier.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Named {
        id: String,
        name: String,
    }

    fn named(id: &str, name: &str) -> Named {
        Named {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn by_name(
        kind: &'static str,
        identifier: &str,
        items: Vec<Named>,
    ) -> Result<Named, FavroError> {
        match_by_name(kind, identifier, items, |n| n.id.as_str(), |n| n.name.as_str())
    }

    #[test]
    fn test_match_by_name_case_insensitive() {
        let items = vec![named("1", "Backlog"), named("2", "In Progress")];
        let found = by_name("column", "in progress", items).unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn test_match_by_name_no_match() {
        let items = vec![named("1", "Backlog")];
        let err = by_name("column", "Done", items).unwrap_err();
        assert!(matches!(err, FavroError::NoMatch { kind: "column", .. }));
    }

    #[test]
    fn test_match_by_name_ambiguous() {
        let items = vec![named("1", "Sprint"), named("2", "SPRINT"), named("3", "Other")];
        let err = by_name("board", "sprint", items).unwrap_err();
        match err {
            FavroError::AmbiguousMatch { matches, .. } => {
                assert_eq!(
                    matches,
                    vec![
                        ("1".to_string(), "Sprint".to_string()),
                        ("2".to_string(), "SPRINT".to_string()),
                    ]
                );
            }
            other => panic!("Expected AmbiguousMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sequential_id() {
        assert_eq!(parse_sequential_id("#123"), Some(123));
        assert_eq!(parse_sequential_id("42"), Some(42));
        assert_eq!(parse_sequential_id(" #7 "), Some(7));
        assert_eq!(parse_sequential_id("#"), None);
        assert_eq!(parse_sequential_id("abc123"), None);
        assert_eq!(parse_sequential_id("12a"), None);
    }

    #[test]
    fn test_by_id_maps_not_found_to_none() {
        let result: Result<u8, FavroError> = Err(FavroError::NotFound {
            message: "gone".to_string(),
        });
        assert!(by_id(result).unwrap().is_none());

        let result: Result<u8, FavroError> = Err(FavroError::Authentication {
            status: 401,
            message: "bad".to_string(),
        });
        assert!(by_id(result).is_err());
    }
}
