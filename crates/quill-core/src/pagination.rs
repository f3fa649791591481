//! Page-based pagination with sorting and RFC 5988 `Link` headers.
//!
//! List endpoints accept `page`, `size`, and `sort` query parameters:
//!
//! - `page`: 1-based page number (default: 1)
//! - `size`: items per page, 1-100 (default: 20)
//! - `sort`: `field,direction` where direction is `asc` or `desc`
//!   (default: `createdAt,desc`)
//!
//! A malformed `sort` never fails the request; it silently falls back to the
//! default ordering. Out-of-range `page` or `size` values are rejected as
//! validation errors.
//!
//! After the repository has filled in the total count, [`Pageable::headers`]
//! renders `Link`, `X-Total-Count`, `X-Total-Page`, and `X-Has-Next`.
//!
//! # Example
//!
//! ```ignore
//! async fn list_posts(
//!     State(state): State<AppState>,
//!     OriginalUri(uri): OriginalUri,
//!     mut pageable: Pageable,
//! ) -> Result<(HeaderMap, Json<Vec<PostResponse>>), AppError> {
//!     let posts = state.posts.reads(&mut pageable).await?;
//!     Ok((pageable.headers(&uri), Json(posts)))
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use axum::extract::{FromRequestParts, Query};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri, header, request::Parts};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::AppError;
use crate::serde::{deserialize_optional_i64, deserialize_optional_string};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SIZE: i64 = 20;
pub const MAX_SIZE: i64 = 100;
/// Largest page whose offset `(page - 1) * MAX_SIZE` still fits in an i64.
pub const MAX_PAGE: i64 = i64::MAX / MAX_SIZE;
pub const DEFAULT_SORT_FIELD: &str = "createdAt";
pub const DEFAULT_SORT: &str = "createdAt,desc";

pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_TOTAL_PAGE: HeaderName = HeaderName::from_static("x-total-page");
pub const X_HAS_NEXT: HeaderName = HeaderName::from_static("x-has-next");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Raw pagination query parameters, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageableQuery {
    /// Page number (1-based, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 1, max = MAX_PAGE, message = "page must be between 1 and 92233720368547758"))]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: Option<i64>,
    /// Sort expression `field,direction` (default: `createdAt,desc`)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    page: i64,
    size: i64,
    sort: String,
    total_count: i64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            sort: DEFAULT_SORT.to_string(),
            total_count: 0,
        }
    }
}

impl TryFrom<PageableQuery> for Pageable {
    type Error = AppError;

    fn try_from(query: PageableQuery) -> Result<Self, Self::Error> {
        query
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(Self {
            page: query.page.unwrap_or(DEFAULT_PAGE),
            size: query.size.unwrap_or(DEFAULT_SIZE),
            sort: query.sort.unwrap_or_else(|| DEFAULT_SORT.to_string()),
            total_count: 0,
        })
    }
}

impl Pageable {
    /// Builds a pageable from optional inputs, applying defaults and range checks.
    pub fn parse(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<String>,
    ) -> Result<Self, AppError> {
        Self::try_from(PageableQuery { page, size, sort })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn sort(&self) -> &str {
        &self.sort
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn set_total_count(&mut self, total_count: i64) {
        self.total_count = total_count.max(0);
    }

    /// Splits `sort` into field and direction. Anything other than exactly
    /// `field,asc` or `field,desc` yields `createdAt` descending.
    pub fn order(&self) -> (&str, SortDirection) {
        let mut parts = self.sort.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some("asc"), None) if !field.is_empty() => (field, SortDirection::Asc),
            (Some(field), Some("desc"), None) if !field.is_empty() => {
                (field, SortDirection::Desc)
            }
            _ => (DEFAULT_SORT_FIELD, SortDirection::Desc),
        }
    }

    /// Renders an `ORDER BY` body against a whitelist of snake_case columns.
    /// Unknown fields order by `created_at`; `id` breaks ties.
    pub fn order_by(&self, columns: &[&str]) -> String {
        let (field, direction) = self.order();
        let column = to_snake_case(field);
        let column = if columns.contains(&column.as_str()) {
            column
        } else {
            "created_at".to_string()
        };
        let direction = direction.as_sql();

        format!("{} {}, id {}", column, direction, direction)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn total_pages(&self) -> i64 {
        if self.total_count <= 0 {
            return 0;
        }
        self.total_count / self.size + i64::from(self.total_count % self.size != 0)
    }

    /// `page < total_pages - 1`. This is stricter than "a next page exists":
    /// on the second-to-last page it is already `false`.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages() - 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }

    /// Response headers for the current page of `uri`.
    pub fn headers(&self, uri: &Uri) -> HeaderMap {
        let mut links = vec![self.link(uri, 1, "first")];
        if !self.is_last_page() {
            links.push(self.link(uri, self.page + 1, "next"));
        }
        if self.page > 1 {
            links.push(self.link(uri, self.page - 1, "prev"));
        }
        links.push(self.link(uri, self.total_pages().max(1), "last"));

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&links.join(", ")) {
            headers.insert(header::LINK, value);
        }
        headers.insert(X_TOTAL_COUNT, HeaderValue::from(self.total_count));
        headers.insert(X_TOTAL_PAGE, HeaderValue::from(self.total_pages()));
        headers.insert(
            X_HAS_NEXT,
            HeaderValue::from_static(if self.has_next() { "true" } else { "false" }),
        );
        headers
    }

    fn link(&self, uri: &Uri, page: i64, rel: &str) -> String {
        let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(raw) = uri.query() {
            for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
                query
                    .entry(key.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }

        let (field, direction) = self.order();
        query.insert("page".to_string(), vec![page.to_string()]);
        query.insert("size".to_string(), vec![self.size.to_string()]);
        query.insert("sort".to_string(), vec![format!("{},{}", field, direction)]);

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &query {
            for value in values {
                serializer.append_pair(key, value);
            }
        }

        format!("<{}?{}>; rel=\"{}\"", uri.path(), serializer.finish(), rel)
    }
}

impl<S> FromRequestParts<S> for Pageable
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageableQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::binding(rejection.body_text()))?;

        Pageable::try_from(query)
    }
}

/// Runs the count and the page fetch concurrently and waits for both.
///
/// The count error wins when both fail. On success the total is stored on
/// `pageable` so headers can be rendered afterwards.
pub async fn fetch_page<T, C, F>(
    pageable: &mut Pageable,
    count: C,
    fetch: F,
) -> Result<Vec<T>, AppError>
where
    C: Future<Output = Result<i64, AppError>>,
    F: Future<Output = Result<Vec<T>, AppError>>,
{
    let (total, rows) = tokio::join!(count, fetch);
    let total = total?;
    let rows = rows?;

    pageable.set_total_count(total);
    Ok(rows)
}

fn to_snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, ch) in field.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use assert_matches::assert_matches;

    fn pageable(page: i64, size: i64, sort: &str, total: i64) -> Pageable {
        let mut p = Pageable::parse(Some(page), Some(size), Some(sort.to_string())).unwrap();
        p.set_total_count(total);
        p
    }

    #[test]
    fn test_defaults() {
        let p = Pageable::parse(None, None, None).unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.size(), 20);
        assert_eq!(p.sort(), "createdAt,desc");
        assert_eq!(p, Pageable::default());
    }

    #[test]
    fn test_out_of_range_inputs_are_validation_errors() {
        let err = Pageable::parse(Some(0), None, None).unwrap_err();
        assert_matches!(
            err.kind,
            ErrorKind::ValidationFailed(ref v) if v.len() == 1 && v[0].field == "page"
        );

        let err = Pageable::parse(None, Some(101), None).unwrap_err();
        assert_matches!(err.kind, ErrorKind::ValidationFailed(ref v) if v[0].field == "size");

        let err = Pageable::parse(Some(-1), Some(0), None).unwrap_err();
        assert_matches!(err.kind, ErrorKind::ValidationFailed(ref v) if v.len() == 2);
    }

    #[test]
    fn test_page_upper_bound_keeps_offset_in_range() {
        let err = Pageable::parse(Some(i64::MAX), Some(100), None).unwrap_err();
        assert_matches!(err.kind, ErrorKind::ValidationFailed(ref v) if v[0].field == "page");
        assert!(Pageable::parse(Some(MAX_PAGE + 1), None, None).is_err());

        let mut last = pageable(MAX_PAGE, MAX_SIZE, DEFAULT_SORT, 0);
        assert_eq!(last.offset(), (MAX_PAGE - 1) * MAX_SIZE);
        assert!(last.offset() > 0);

        last.set_total_count(i64::MAX);
        assert_eq!(last.total_pages(), MAX_PAGE + 1);
        let headers = last.headers(&"/v1/posts".parse().unwrap());
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();
        assert!(link.contains(&format!("page={}&size=100", MAX_PAGE + 1)));
    }

    #[test]
    fn test_size_bounds_are_inclusive() {
        assert!(Pageable::parse(None, Some(1), None).is_ok());
        assert!(Pageable::parse(None, Some(100), None).is_ok());
    }

    #[test]
    fn test_order_accepts_lowercase_directions_only() {
        assert_eq!(
            pageable(1, 20, "title,asc", 0).order(),
            ("title", SortDirection::Asc)
        );
        assert_eq!(
            pageable(1, 20, "username,desc", 0).order(),
            ("username", SortDirection::Desc)
        );

        for malformed in ["createdAt,ASC", "title", "title,up", "a,asc,b", ",asc", ""] {
            assert_eq!(
                pageable(1, 20, malformed, 0).order(),
                ("createdAt", SortDirection::Desc),
                "sort {:?}",
                malformed
            );
        }
    }

    #[test]
    fn test_order_by_uses_whitelisted_snake_case_column() {
        let columns = ["id", "created_at", "updated_at", "title"];
        assert_eq!(
            pageable(1, 20, "updatedAt,asc", 0).order_by(&columns),
            "updated_at ASC, id ASC"
        );
        assert_eq!(
            pageable(1, 20, "password,asc", 0).order_by(&columns),
            "created_at ASC, id ASC"
        );
        assert_eq!(
            pageable(1, 20, "title;drop table posts,desc", 0).order_by(&columns),
            "created_at DESC, id DESC"
        );
    }

    #[test]
    fn test_offset_limit_and_total_pages() {
        let p = pageable(4, 5, "createdAt,asc", 30);
        assert_eq!(p.offset(), 15);
        assert_eq!(p.limit(), 5);
        assert_eq!(p.total_pages(), 6);

        assert_eq!(pageable(1, 20, DEFAULT_SORT, 30).total_pages(), 2);
        assert_eq!(pageable(1, 20, DEFAULT_SORT, 40).total_pages(), 2);
        assert_eq!(pageable(1, 20, DEFAULT_SORT, 41).total_pages(), 3);
        assert_eq!(pageable(1, 20, DEFAULT_SORT, 0).total_pages(), 0);
        assert_eq!(pageable(1, 1, DEFAULT_SORT, 0).offset(), 0);
    }

    #[test]
    fn test_has_next_follows_literal_formula() {
        // Two pages, on the first: a next page exists but has_next is false.
        assert!(!pageable(1, 20, DEFAULT_SORT, 30).has_next());
        assert!(pageable(1, 5, DEFAULT_SORT, 30).has_next());
        assert!(pageable(4, 5, DEFAULT_SORT, 30).has_next());
        assert!(!pageable(5, 5, DEFAULT_SORT, 30).has_next());
        assert!(!pageable(6, 5, DEFAULT_SORT, 30).has_next());
    }

    #[test]
    fn test_headers_middle_page() {
        let uri: Uri = "/v1/posts?page=4&size=5&sort=createdAt,asc".parse().unwrap();
        let headers = pageable(4, 5, "createdAt,asc", 30).headers(&uri);

        assert_eq!(
            headers.get(header::LINK).unwrap(),
            "</v1/posts?page=1&size=5&sort=createdAt%2Casc>; rel=\"first\", \
             </v1/posts?page=5&size=5&sort=createdAt%2Casc>; rel=\"next\", \
             </v1/posts?page=3&size=5&sort=createdAt%2Casc>; rel=\"prev\", \
             </v1/posts?page=6&size=5&sort=createdAt%2Casc>; rel=\"last\""
        );
        assert_eq!(headers.get("X-Total-Count").unwrap(), "30");
        assert_eq!(headers.get("X-Total-Page").unwrap(), "6");
        assert_eq!(headers.get("X-Has-Next").unwrap(), "true");
    }

    #[test]
    fn test_headers_first_and_last_page() {
        let uri: Uri = "/v1/users".parse().unwrap();

        let first = pageable(1, 20, "createdAt,asc", 30).headers(&uri);
        let link = first.get(header::LINK).unwrap().to_str().unwrap();
        assert!(link.contains("page=2&size=20&sort=createdAt%2Casc>; rel=\"next\""));
        assert!(!link.contains("rel=\"prev\""));
        assert_eq!(first.get("X-Has-Next").unwrap(), "false");

        let last = pageable(2, 20, "createdAt,asc", 30).headers(&uri);
        let link = last.get(header::LINK).unwrap().to_str().unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("page=1&size=20&sort=createdAt%2Casc>; rel=\"prev\""));
    }

    #[test]
    fn test_headers_keep_unrelated_query_params_and_normalise_sort() {
        let uri: Uri = "/v1/comments/7?author=bob&sort=bogus".parse().unwrap();
        let headers = pageable(1, 10, "bogus", 5).headers(&uri);
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();

        assert!(link.starts_with(
            "</v1/comments/7?author=bob&page=1&size=10&sort=createdAt%2Cdesc>; rel=\"first\""
        ));
    }

    #[test]
    fn test_headers_empty_collection() {
        let uri: Uri = "/v1/posts".parse().unwrap();
        let headers = pageable(1, 20, DEFAULT_SORT, 0).headers(&uri);
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();

        assert!(!link.contains("rel=\"next\""));
        assert!(link.ends_with("</v1/posts?page=1&size=20&sort=createdAt%2Cdesc>; rel=\"last\""));
        assert_eq!(headers.get("X-Total-Page").unwrap(), "0");
    }

    #[tokio::test]
    async fn test_fetch_page_sets_total() {
        let mut p = pageable(1, 2, DEFAULT_SORT, 0);
        let rows = fetch_page(
            &mut p,
            async { Ok::<_, AppError>(7) },
            async { Ok::<_, AppError>(vec![1, 2]) },
        )
        .await
        .unwrap();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(p.total_count(), 7);
    }

    #[tokio::test]
    async fn test_fetch_page_fails_when_either_side_fails() {
        let mut p = Pageable::default();
        let result = fetch_page(
            &mut p,
            async { Err::<i64, _>(AppError::internal(anyhow::anyhow!("count"))) },
            async { Ok::<_, AppError>(vec![1]) },
        )
        .await;
        assert!(result.is_err());

        let result = fetch_page(&mut p, async { Ok::<_, AppError>(3) }, async {
            Err::<Vec<i32>, _>(AppError::internal(anyhow::anyhow!("fetch")))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(p.total_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_page_both_failing_surfaces_an_error() {
        let mut p = Pageable::default();
        let result = fetch_page(
            &mut p,
            async { Err::<i64, _>(AppError::internal(anyhow::anyhow!("count"))) },
            async { Err::<Vec<i32>, _>(AppError::internal(anyhow::anyhow!("fetch"))) },
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unexpected);
        assert_eq!(err.error.to_string(), "count");
    }
}
