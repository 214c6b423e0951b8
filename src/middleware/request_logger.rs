//! Per-request logging under the `api` target.
//!
//! Each request is logged with its route template, the analysis it
//! addresses and the owner it is scoped to. The raw identity header and the
//! query string are never logged.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::auth::decode_identity;
use crate::config::{API_SCOPE, IDENTITY_HEADER};

/// What a request is about, as far as the logs are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    /// Path below the API scope with the analysis id replaced by `{id}`,
    /// e.g. `/report/{id}/workload-inventory/csv`.
    pub route: String,
    pub analysis_id: Option<i64>,
    /// Username from the identity header, `None` when absent or undecodable.
    pub owner: Option<String>,
}

impl RequestContext {
    pub fn new(method: &str, path: &str, identity: Option<&str>) -> Self {
        let (route, analysis_id) = route_template(path);
        Self {
            method: method.to_string(),
            route,
            analysis_id,
            owner: identity.and_then(decode_identity).map(|i| i.username),
        }
    }

    fn from_request(req: &ServiceRequest) -> Self {
        let identity = req
            .headers()
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok());
        Self::new(req.method().as_str(), req.path(), identity)
    }

    fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or("-")
    }

    fn log_completion(&self, status: StatusCode, elapsed: Duration) {
        let status = status.as_u16();
        let duration_ms = elapsed.as_millis() as u64;

        match status {
            200..=399 => info!(
                target: "api",
                method = %self.method,
                route = %self.route,
                analysis_id = ?self.analysis_id,
                owner = %self.owner(),
                status,
                duration_ms,
                "Report request served"
            ),
            400..=499 => warn!(
                target: "api",
                method = %self.method,
                route = %self.route,
                analysis_id = ?self.analysis_id,
                owner = %self.owner(),
                status,
                duration_ms,
                "Report request rejected"
            ),
            _ => error!(
                target: "api",
                method = %self.method,
                route = %self.route,
                analysis_id = ?self.analysis_id,
                owner = %self.owner(),
                status,
                duration_ms,
                "Report request failed"
            ),
        }
    }
}

/// Strip the API scope and swap the `/report/{id}` segment for a placeholder.
fn route_template(path: &str) -> (String, Option<i64>) {
    let relative = path.strip_prefix(API_SCOPE).unwrap_or(path);
    let mut analysis_id = None;
    let mut previous = "";
    let mut route = String::with_capacity(relative.len());

    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        route.push('/');
        match segment.parse::<i64>() {
            Ok(id) if previous == "report" && analysis_id.is_none() => {
                analysis_id = Some(id);
                route.push_str("{id}");
            }
            _ => route.push_str(segment),
        }
        previous = segment;
    }

    if route.is_empty() {
        route.push('/');
    }
    (route, analysis_id)
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let context = RequestContext::from_request(&req);

        debug!(
            target: "api",
            method = %context.method,
            route = %context.route,
            owner = %context.owner(),
            "Report request received"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            context.log_completion(res.status(), start.elapsed());
            Ok(res)
        })
    }
}
