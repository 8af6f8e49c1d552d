//! Hypermedia links and the representations that carry them
//!
//! Every breeder representation embeds `self` and `collection` links built
//! from the configured base URL. Lists add a `next` link when a page size was
//! requested, and delayed submissions add a `status` link to poll.
//!
//! ```rust
//! use breeder_service::links::LinkBuilder;
//!
//! let links = LinkBuilder::new("http://localhost:8080/api/v1/");
//! assert_eq!(links.collection(), "http://localhost:8080/api/v1/breeders/");
//! assert_eq!(
//!     links.next_page(2, 0, None),
//!     "http://localhost:8080/api/v1/breeders/?limit=2&offset=2"
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::BreederId;
use crate::models::{Breeder, NewBreeder, PriceLevel};
use crate::repository::{BreederFilter, Pagination};

/// Relation of a link to the resource that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRel {
    #[serde(rename = "self")]
    SelfRef,
    Collection,
    Next,
    Status,
}

impl LinkRel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfRef => "self",
            Self::Collection => "collection",
            Self::Next => "next",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for LinkRel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigation link embedded in a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: LinkRel,
    pub href: String,
}

impl Link {
    pub fn new(rel: LinkRel, href: impl Into<String>) -> Self {
        Self {
            rel,
            href: href.into(),
        }
    }
}

/// Render links as an RFC 8288 `Link` header value.
pub fn link_header(links: &[Link]) -> String {
    links
        .iter()
        .map(|link| format!("<{}>; rel=\"{}\"", link.href, link.rel))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds absolute URLs for breeder resources under one base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    /// `base_url` is the API root, e.g. `http://host/api/v1`; a trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/breeders/{id}/`
    pub fn breeder(&self, id: &BreederId) -> String {
        format!("{}/breeders/{}/", self.base_url, id)
    }

    /// `{base}/breeders/`
    pub fn collection(&self) -> String {
        format!("{}/breeders/", self.base_url)
    }

    /// `{base}/task-status/{id}/`
    pub fn task_status(&self, task_id: &BreederId) -> String {
        format!("{}/task-status/{}/", self.base_url, task_id)
    }

    /// Link to the page after `offset`. Does not check that the page has records.
    pub fn next_page(&self, limit: u64, offset: u64, breeder_city: Option<&str>) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.saturating_add(limit).to_string());
        if let Some(city) = breeder_city {
            query.append_pair("breeder_city", city);
        }
        format!("{}?{}", self.collection(), query.finish())
    }

    /// `self` and `collection` links for one record
    pub fn item_links(&self, id: &BreederId) -> Vec<Link> {
        vec![
            Link::new(LinkRel::SelfRef, self.breeder(id)),
            Link::new(LinkRel::Collection, self.collection()),
        ]
    }

    /// Links for a list page; `next` only when a non-zero limit was requested.
    pub fn list_links(&self, pagination: &Pagination, filter: &BreederFilter) -> Vec<Link> {
        let mut links = vec![
            Link::new(LinkRel::SelfRef, self.collection()),
            Link::new(LinkRel::Collection, self.collection()),
        ];
        if let Some(limit) = pagination.limit.filter(|limit| *limit > 0) {
            links.push(Link::new(
                LinkRel::Next,
                self.next_page(limit, pagination.offset, filter.breeder_city.as_deref()),
            ));
        }
        links
    }

    /// `self` (the future record) and `status` links for a delayed submission
    pub fn delay_links(&self, task_id: &BreederId) -> Vec<Link> {
        vec![
            Link::new(LinkRel::SelfRef, self.breeder(task_id)),
            Link::new(LinkRel::Status, self.task_status(task_id)),
        ]
    }

    pub fn breeder_out(&self, breeder: Breeder) -> BreederOut {
        let links = self.item_links(&breeder.id);
        BreederOut { breeder, links }
    }

    pub fn breeder_list(
        &self,
        records: Vec<Breeder>,
        pagination: &Pagination,
        filter: &BreederFilter,
    ) -> BreederListResponse {
        BreederListResponse {
            data: records.into_iter().map(|b| self.breeder_out(b)).collect(),
            links: self.list_links(pagination, filter),
        }
    }

    pub fn delay_response(&self, task_id: &BreederId, payload: &NewBreeder) -> BreederDelayResponse {
        BreederDelayResponse {
            task_id: task_id.clone(),
            name: payload.name.clone(),
            breeder_city: payload.breeder_city.clone(),
            breeder_country: payload.breeder_country.clone(),
            price_level: payload.price_level,
            breeder_address: payload.breeder_address.clone(),
            status_url: self.task_status(task_id),
            links: self.delay_links(task_id),
        }
    }
}

/// A breeder record with its navigation links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederOut {
    #[serde(flatten)]
    pub breeder: Breeder,
    pub links: Vec<Link>,
}

/// One page of breeders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederListResponse {
    pub data: Vec<BreederOut>,
    pub links: Vec<Link>,
}

/// Acknowledgement of a delayed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederDelayResponse {
    pub task_id: BreederId,
    pub name: String,
    pub breeder_city: String,
    pub breeder_country: String,
    pub price_level: PriceLevel,
    pub breeder_address: String,
    pub status_url: String,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> LinkBuilder {
        LinkBuilder::new("http://example.test/api/v1")
    }

    fn breeder(id: &str) -> Breeder {
        Breeder {
            id: BreederId::from(id),
            name: "Acme".into(),
            breeder_city: "Oslo".into(),
            breeder_country: "Norway".into(),
            price_level: PriceLevel::try_from(2).unwrap(),
            breeder_address: "Karl Johans gate 1".into(),
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let links = LinkBuilder::new("http://example.test/api/v1///");
        assert_eq!(links.base_url(), "http://example.test/api/v1");
    }

    #[test]
    fn test_item_links() {
        let links = builder().item_links(&BreederId::from("b-1"));
        assert_eq!(
            links,
            vec![
                Link::new(LinkRel::SelfRef, "http://example.test/api/v1/breeders/b-1/"),
                Link::new(LinkRel::Collection, "http://example.test/api/v1/breeders/"),
            ]
        );
    }

    #[test]
    fn test_list_without_limit_has_no_next() {
        let links = builder().list_links(&Pagination::default(), &BreederFilter::default());
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.rel != LinkRel::Next));
    }

    #[test]
    fn test_zero_limit_has_no_next() {
        let links = builder().list_links(&Pagination::new(3, Some(0)), &BreederFilter::default());
        assert!(links.iter().all(|l| l.rel != LinkRel::Next));
    }

    #[test]
    fn test_next_link_advances_offset() {
        let pagination = Pagination::new(4, Some(2));
        let links = builder().list_links(&pagination, &BreederFilter::default());
        let next = links.iter().find(|l| l.rel == LinkRel::Next).unwrap();
        assert_eq!(
            next.href,
            "http://example.test/api/v1/breeders/?limit=2&offset=6"
        );
    }

    #[test]
    fn test_next_link_keeps_encoded_city_filter() {
        let filter = BreederFilter {
            breeder_city: Some("São Paulo".into()),
        };
        let links = builder().list_links(&Pagination::new(0, Some(10)), &filter);
        let next = links.iter().find(|l| l.rel == LinkRel::Next).unwrap();
        assert!(next.href.ends_with("?limit=10&offset=10&breeder_city=S%C3%A3o+Paulo"));
    }

    #[test]
    fn test_link_header_format() {
        let header = link_header(&builder().item_links(&BreederId::from("b-1")));
        assert_eq!(
            header,
            "<http://example.test/api/v1/breeders/b-1/>; rel=\"self\", \
             <http://example.test/api/v1/breeders/>; rel=\"collection\""
        );
    }

    #[test]
    fn test_breeder_out_serializes_flat_with_links() {
        let value = serde_json::to_value(builder().breeder_out(breeder("b-9"))).unwrap();
        assert_eq!(value["id"], "b-9");
        assert_eq!(value["price_level"], 2);
        assert_eq!(value["links"][0]["rel"], "self");
        assert_eq!(
            value["links"][0]["href"],
            "http://example.test/api/v1/breeders/b-9/"
        );
    }

    #[test]
    fn test_delay_response_points_at_status() {
        let id = BreederId::from("t-1");
        let payload = NewBreeder {
            name: "Acme".into(),
            breeder_city: "Oslo".into(),
            breeder_country: "Norway".into(),
            price_level: PriceLevel::try_from(2).unwrap(),
            breeder_address: "Karl Johans gate 1".into(),
        };
        let response = builder().delay_response(&id, &payload);
        assert_eq!(
            response.status_url,
            "http://example.test/api/v1/task-status/t-1/"
        );
        assert_eq!(response.links[1].rel, LinkRel::Status);
        assert_eq!(response.links[1].href, response.status_url);
    }
}
