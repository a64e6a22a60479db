//! Caller identity. The authenticating proxy in front of the service sets
//! `x-opd-user` to the account name and `x-opd-admin: true` for administrators.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use super::error::ApiError;
use crate::domain::access::{Caller, CallerRole};
use crate::AppState;

pub const USER_HEADER: &str = "x-opd-user";
pub const ADMIN_HEADER: &str = "x-opd-admin";

/// The caller of a request together with their resolved role
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    pub caller: Caller,
    pub role: CallerRole,
}

fn caller_from_parts(parts: &Parts) -> Option<Caller> {
    let account = parts
        .headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;
    let is_admin = parts
        .headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Some(Caller {
        account: account.to_string(),
        is_admin,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = caller_from_parts(parts).ok_or_else(|| {
            warn!("Rejected {} {}: no {} header", parts.method, parts.uri.path(), USER_HEADER);
            ApiError::unauthorized("Authentication required")
        })?;

        let role = state.directory_service.resolve_role(&caller).await?;
        debug!("Caller {} resolved to {:?}", caller.account, role);
        Ok(Self { caller, role })
    }
}
