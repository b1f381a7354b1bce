//! Page request normalisation and result trimming.

use serde::Serialize;

use crate::cursor::{Cursor, CursorError};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: usize = 100;

/// Normalised pagination input.
///
/// `limit` is clamped to `1..=MAX_LIMIT`; a missing limit becomes
/// [`DEFAULT_LIMIT`]. Blank cursors are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<String>,
    limit: usize,
}

impl PageRequest {
    /// Build a request from raw query values.
    #[must_use]
    pub fn new(cursor: Option<String>, limit: Option<usize>) -> Self {
        let cursor = cursor.filter(|token| !token.trim().is_empty());
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { cursor, limit }
    }

    /// First page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(None, None)
    }

    /// Raw cursor token, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Decode the cursor into its ordering key.
    ///
    /// # Errors
    /// Propagates [`CursorError`] for malformed tokens.
    pub fn decode_cursor<K>(&self) -> Result<Option<K>, CursorError>
    where
        K: serde::de::DeserializeOwned,
    {
        self.cursor
            .as_deref()
            .map(|token| Cursor::<K>::decode(token).map(Cursor::into_key))
            .transpose()
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of rows repositories should fetch: one extra row signals that
    /// another page exists.
    #[must_use]
    pub const fn fetch_limit(&self) -> usize {
        self.limit + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results plus the cursor for the following page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in endpoint order.
    pub items: Vec<T>,
    /// Cursor resuming after the last item, when more rows exist.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Trim rows fetched with [`PageRequest::fetch_limit`] down to `limit`
    /// and derive the next cursor from the last retained row.
    ///
    /// # Errors
    /// Propagates [`CursorError::Encode`] if the key cannot be serialised.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(None, Some(2));
    /// let page = Page::from_overfetched(vec![1, 2, 3], &request, |n| *n).unwrap();
    /// assert_eq!(page.items, vec![1, 2]);
    /// assert!(page.next_cursor.is_some());
    /// ```
    pub fn from_overfetched<K, F>(
        mut rows: Vec<T>,
        request: &PageRequest,
        key_of: F,
    ) -> Result<Self, CursorError>
    where
        K: Serialize,
        F: Fn(&T) -> K,
    {
        let has_more = rows.len() > request.limit();
        rows.truncate(request.limit());
        let next_cursor = match rows.last() {
            Some(last) if has_more => Some(Cursor::new(key_of(last)).encode()?),
            _ => None,
        };
        Ok(Self {
            items: rows,
            next_cursor,
        })
    }

    /// Transform every item while keeping the cursor.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
