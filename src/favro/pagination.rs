//! Paginated collection fetching.
//!
//! Favro list endpoints return `{limit, page, pages, requestId, entities}`.
//! Every page after the first must echo the `requestId` of the first page.

use crate::favro::error::FavroError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// One page of a paginated Favro response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    /// A response without `pages` is a single page
    #[serde(default = "single_page")]
    pub pages: u32,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
}

fn single_page() -> u32 {
    1
}

/// Position within a paginated query, sent with each page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub request_id: Option<String>,
    pub page: u32,
}

impl PageCursor {
    pub fn first() -> Self {
        Self::default()
    }

    /// Query parameters for this page; the first page sends none
    pub fn query_params(&self) -> Vec<(String, String)> {
        match &self.request_id {
            Some(request_id) => vec![
                ("requestId".to_string(), request_id.clone()),
                ("page".to_string(), self.page.to_string()),
            ],
            None => Vec::new(),
        }
    }
}

/// Fetch every page and return the entities in server order.
///
/// `fetch_page` is called once per page. A failure at any page aborts the
/// whole fetch; nothing partial is returned.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, FavroError>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Page<T>, FavroError>>,
{
    let first = fetch_page(PageCursor::first()).await?;
    let total_pages = first.pages;

    if total_pages == 0 || first.entities.is_empty() {
        return Ok(Vec::new());
    }

    let mut entities = first.entities;
    if total_pages == 1 {
        return Ok(entities);
    }

    let request_id = first.request_id.ok_or_else(|| {
        FavroError::ProtocolAnomaly(format!(
            "response reports {} pages but carries no requestId",
            total_pages
        ))
    })?;

    for page in 1..total_pages {
        let cursor = PageCursor {
            request_id: Some(request_id.clone()),
            page,
        };
        let next = fetch_page(cursor).await?;

        if next.request_id.as_deref() != Some(request_id.as_str()) {
            return Err(FavroError::ProtocolAnomaly(format!(
                "page {} returned requestId {:?}, expected {:?}",
                page, next.request_id, request_id
            )));
        }

        debug!(page, total_pages, count = next.entities.len(), "Fetched page");
        entities.extend(next.entities);
    }

    Ok(entities)
}
