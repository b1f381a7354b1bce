//! Hypermedia links for paginated HTTP envelopes.

use serde::Serialize;
use url::Url;

/// `self` and `next` links for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    /// Link to the current page.
    #[serde(rename = "self")]
    pub self_link: String,
    /// Link to the following page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PaginationLinks {
    /// Build links from the request URL, replacing `cursor` and `limit`
    /// query parameters while keeping all others.
    ///
    /// # Examples
    /// ```
    /// use pagination::PaginationLinks;
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost/api/v1/posts?cursor=old").unwrap();
    /// let links = PaginationLinks::build(&base, 10, Some("abc"));
    /// assert_eq!(links.next.as_deref(), Some("http://localhost/api/v1/posts?limit=10&cursor=abc"));
    /// ```
    #[must_use]
    pub fn build(request_url: &Url, limit: usize, next_cursor: Option<&str>) -> Self {
        let retained: Vec<(String, String)> = request_url
            .query_pairs()
            .filter(|(name, _)| name != "cursor" && name != "limit")
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        let with_params = |cursor: Option<&str>| {
            let mut url = request_url.clone();
            {
                let mut pairs = url.query_pairs_mut();
                pairs.clear();
                for (name, value) in &retained {
                    pairs.append_pair(name, value);
                }
                pairs.append_pair("limit", &limit.to_string());
                if let Some(token) = cursor {
                    pairs.append_pair("cursor", token);
                }
            }
            url.to_string()
        };

        let current = request_url
            .query_pairs()
            .find(|(name, _)| name == "cursor")
            .map(|(_, value)| value.into_owned());

        Self {
            self_link: with_params(current.as_deref()),
            next: next_cursor.map(|token| with_params(Some(token))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keeps_unrelated_query_parameters() {
        let base = Url::parse("http://localhost/feed?authorId=7&limit=3").expect("url");
        let links = PaginationLinks::build(&base, 3, None);
        assert_eq!(links.self_link, "http://localhost/feed?authorId=7&limit=3");
        assert!(links.next.is_none());
    }
}
