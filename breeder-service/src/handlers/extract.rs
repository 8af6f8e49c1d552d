//! Request extractors whose rejections render as [`Error`] bodies

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::repository::{BreederFilter, Pagination};

/// JSON body extractor
///
/// Malformed JSON is a 400, a missing `application/json` content type a 415
/// and well-formed JSON of the wrong shape a 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// Query string extractor; malformed parameters are a 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// Path parameter extractor; malformed segments are a 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// Query parameters of the breeder list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page size; all remaining records when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Records to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Exact city match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeder_city: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.offset.unwrap_or(0), self.limit)
    }

    /// An empty `breeder_city` means no filter
    pub fn filter(&self) -> BreederFilter {
        match self.breeder_city.as_deref() {
            Some(city) if !city.is_empty() => BreederFilter::by_city(city),
            _ => BreederFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = parse_query("");
        assert_eq!(query.pagination(), Pagination::new(0, None));
        assert_eq!(query.filter(), BreederFilter::default());
    }

    #[test]
    fn test_list_query_with_filter() {
        let query: ListQuery = parse_query("limit=2&offset=4&breeder_city=Oslo");
        assert_eq!(query.pagination(), Pagination::new(4, Some(2)));
        assert_eq!(query.filter(), BreederFilter::by_city("Oslo"));
    }

    #[test]
    fn test_empty_city_is_no_filter() {
        let query: ListQuery = parse_query("breeder_city=");
        assert_eq!(query.filter(), BreederFilter::default());
    }

    fn parse_query(query: &str) -> ListQuery {
        let uri: http::Uri = format!("http://localhost/breeders/?{query}").parse().unwrap();
        axum::extract::Query::try_from_uri(&uri).unwrap().0
    }
}
