//! Query-string binding for paging, sorting and workload inventory filters.
//!
//! The query string is decoded once into ordered key/value pairs, so
//! repeated filter keys survive, and bound on demand.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};

use crate::error::{AppError, AppResult};
use crate::models::{PageBean, SortBean, WorkloadInventoryFilterBean};

/// Decoded query-string pairs, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> AppResult<Self> {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map_err(|e| AppError::InvalidInput(format!("Malformed query string: {}", e)))?
            .into_inner();
        Ok(Self { pairs })
    }

    /// Every value of `key`, in request order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The last non-empty value of `key`.
    pub fn last(&self, key: &str) -> Option<&str> {
        self.get_all(key).filter(|v| !v.is_empty()).last()
    }

    fn parse_u32(&self, key: &str) -> AppResult<Option<u32>> {
        self.last(key)
            .map(|v| {
                v.trim().parse::<u32>().map_err(|_| {
                    AppError::InvalidInput(format!("'{}' must be a non-negative integer", key))
                })
            })
            .transpose()
    }

    /// `page` and `size`, falling back to `default` for absent keys.
    pub fn page(&self, default: PageBean) -> AppResult<PageBean> {
        let page = self.parse_u32("page")?.unwrap_or(default.page);
        let size = self.parse_u32("size")?.unwrap_or(default.size);
        if size == 0 {
            return Err(AppError::InvalidInput(
                "'size' must be greater than zero".to_string(),
            ));
        }
        Ok(PageBean::new(page, size))
    }

    /// `orderBy` and `orderAsc`, falling back to `default` for absent keys.
    pub fn sort(&self, default: SortBean) -> AppResult<SortBean> {
        let order_asc = match self.last("orderAsc") {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(_) => {
                return Err(AppError::InvalidInput(
                    "'orderAsc' must be true or false".to_string(),
                ));
            }
            None => default.order_asc,
        };

        let order_by = match self.last("orderBy") {
            Some(v) => Some(v.to_string()),
            None => default.order_by,
        };

        Ok(SortBean {
            order_by,
            order_asc,
        })
    }

    /// Workload inventory filter sets; repeated keys accumulate.
    pub fn workload_inventory_filter(&self) -> WorkloadInventoryFilterBean {
        let mut filter = WorkloadInventoryFilterBean::default();
        for (key, value) in &self.pairs {
            if value.is_empty() {
                continue;
            }
            if let Some(set) = filter.field_mut(key) {
                set.insert(value.clone());
            }
        }
        filter
    }
}

impl FromRequest for QueryParams {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::parse(req.query_string()))
    }
}
