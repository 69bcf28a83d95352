//! Bearer-token middleware. Resolves the caller from the `Authorization`
//! header or the auth cookie and enforces the public / customer / admin split.

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use service::auth::{domain::Claims, service::decode_token};

use crate::{errors::JsonApiError, state::ServerState};

/// Catalog collections: readable by anyone, writable by admins.
pub const CATALOG_PREFIXES: [&str; 10] = [
    "/Product", "/Category", "/Brand", "/Currency", "/Weight", "/ProductPrice", "/Sku", "/Inventory", "/Country", "/State",
];

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).map_or(false, |rest| rest.starts_with('/'))
}

fn is_catalog(path: &str) -> bool {
    CATALOG_PREFIXES.iter().any(|p| under(path, p))
}

pub fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || path == "/health" || under(path, "/docs") || under(path, "/api-docs") {
        return true;
    }
    if method == Method::POST && matches!(path, "/Auth/login" | "/Auth/register" | "/Auth/logout" | "/Analytics") {
        return true;
    }
    method == Method::GET && is_catalog(path)
}

pub fn is_admin_only(method: &Method, path: &str) -> bool {
    under(path, "/Admin")
        || (method != Method::GET && is_catalog(path))
        || (method == Method::POST && under(path, "/Shipment"))
}

/// Token from `Authorization: Bearer ...`, else from the auth cookie.
fn bearer_token(req: &Request, cookie_name: &str) -> Result<Option<String>, JsonApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
        return match value.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(JsonApiError::unauthorized("expected a Bearer token")),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(cookie_name).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let method = req.method().clone();
    // nested routers see a stripped uri
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|u| u.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let public = is_public(&method, &path);

    let token = match bearer_token(&req, &state.cfg.auth.cookie_name) {
        Ok(t) => t,
        Err(_) if public => {
            debug!(%path, "ignoring malformed credentials on public route");
            None
        }
        Err(e) => return e.into_response(),
    };

    let claims: Option<Claims> = match token {
        Some(t) => match decode_token(&t, &state.cfg.auth.jwt_secret) {
            Ok(c) => Some(c),
            Err(e) if public => {
                debug!(%path, error = %e, "invalid token on public route");
                None
            }
            Err(e) => {
                warn!(%path, error = %e, "token validation failed");
                return JsonApiError::unauthorized("invalid or expired token").into_response();
            }
        },
        None => None,
    };

    if !public {
        let Some(c) = &claims else {
            warn!(%path, %method, "missing credentials");
            return JsonApiError::unauthorized("authentication required").into_response();
        };
        if is_admin_only(&method, &path) && !c.is_admin() {
            warn!(%path, uid = %c.uid, role = %c.role, "admin route refused");
            return JsonApiError::forbidden().into_response();
        }
    }
    if let Some(c) = claims {
        req.extensions_mut().insert(c);
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_reads_are_public_writes_are_admin() {
        assert!(is_public(&Method::GET, "/Product"));
        assert!(is_public(&Method::GET, "/Product/featured"));
        assert!(is_public(&Method::GET, "/ProductPrice/1b7e"));
        assert!(!is_public(&Method::POST, "/Product"));
        assert!(is_admin_only(&Method::POST, "/Product"));
        assert!(is_admin_only(&Method::DELETE, "/Weight/1b7e"));
        assert!(!is_admin_only(&Method::GET, "/Product"));
    }

    #[test]
    fn prefixes_match_whole_segments() {
        assert!(!is_public(&Method::GET, "/Products"));
        assert!(!is_public(&Method::GET, "/Cart"));
        assert!(is_admin_only(&Method::GET, "/Admin/orders"));
        assert!(!is_admin_only(&Method::GET, "/Administrator"));
    }

    #[test]
    fn auth_entry_points_are_public() {
        assert!(is_public(&Method::POST, "/Auth/login"));
        assert!(is_public(&Method::POST, "/Auth/register"));
        assert!(!is_public(&Method::GET, "/Auth/user-profile"));
        assert!(is_public(&Method::POST, "/Analytics"));
        assert!(is_public(&Method::GET, "/docs/index.html"));
    }
}
