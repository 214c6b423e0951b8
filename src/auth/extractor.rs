//! Actix-web extractors for the caller identity.
//!
//! Both extractors reject the request before the handler runs, so a caller
//! without a valid identity never reaches a report service.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};
use tracing::debug;

use super::decode_identity;
use crate::config::{AdminUsers, IDENTITY_HEADER};
use crate::error::AppError;

/// Authenticated caller.
///
/// ```ignore
/// async fn handler(identity: Identity) -> AppResult<HttpResponse> {
///     // identity.username owns the analyses this caller can see
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub account_number: Option<String>,
    pub org_id: Option<String>,
}

impl Identity {
    fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let header = req
            .headers()
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                debug!("Request to {} without identity header", req.path());
                AppError::Forbidden
            })?;

        decode_identity(header).ok_or_else(|| {
            debug!("Request to {} with undecodable identity header", req.path());
            AppError::Forbidden
        })
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}

/// Authenticated caller listed in the configured admin users.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = match Identity::from_headers(req) {
            Ok(identity) => identity,
            Err(e) => return ready(Err(e)),
        };

        let admin_users = match req.app_data::<web::Data<AdminUsers>>() {
            Some(admin_users) => admin_users,
            None => {
                return ready(Err(AppError::Internal(
                    "Admin users not configured".to_string(),
                )));
            }
        };

        if admin_users.contains(&identity.username) {
            ready(Ok(AdminIdentity(identity)))
        } else {
            debug!("User {} is not an administrator", identity.username);
            ready(Err(AppError::Forbidden))
        }
    }
}
