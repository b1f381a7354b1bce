//! Opaque cursor and page envelope primitives shared by list endpoints.
//!
//! Keyset pagination keeps list endpoints stable while rows are inserted:
//! callers hand back the opaque cursor from the previous page and the
//! repository resumes strictly after the encoded key.
//!
//! - [`Cursor`] wraps an ordering key and encodes it as URL-safe base64 JSON.
//! - [`PageRequest`] normalises the caller's `cursor` and `limit` inputs.
//! - [`Page`] trims an over-fetched result set and derives the next cursor.
//! - [`PaginationLinks`] renders `self`/`next` links for HTTP envelopes.

mod cursor;
mod links;
mod page;

pub use cursor::{Cursor, CursorError};
pub use links::PaginationLinks;
pub use page::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageRequest};
