//! Cursor query parameters and the paginated response envelope.

use actix_web::HttpRequest;
use pagination::{MAX_LIMIT, Page, PageRequest, PaginationLinks};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::Error;
use crate::inbound::http::validation::{FieldName, invalid_field_error};

/// `?cursor=&limit=` for keyset-paginated listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Opaque cursor from a previous page's `nextCursor`.
    pub cursor: Option<String>,
    /// Page size, 1 to 100; defaults to 20.
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Convert into a [`PageRequest`], rejecting a zero or oversized limit.
    pub fn into_request(self) -> Result<PageRequest, Error> {
        if self
            .limit
            .is_some_and(|limit| !(1..=MAX_LIMIT).contains(&limit))
        {
            return Err(invalid_field_error(
                FieldName::new("limit"),
                format!("limit must be between 1 and {MAX_LIMIT}"),
            ));
        }
        Ok(PageRequest::new(self.cursor, self.limit))
    }
}

/// A page of items with `self`/`next` links.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub links: PaginationLinks,
}

impl<T> PagedResponse<T> {
    pub fn new(page: Page<T>, request: &HttpRequest, limit: usize) -> Self {
        let links = PaginationLinks::build(&request.full_url(), limit, page.next_cursor.as_deref());
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
            links,
        }
    }
}
