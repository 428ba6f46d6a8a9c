use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use greenroom_types::api::Claims;

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the bearer JWT from the Authorization header.
/// Identity and role arrive in the claims; the portal's auth service issues
/// the tokens, we only verify them.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Scheduling operations are HR-only; everyone else only reads their own.
pub fn require_hr(claims: &Claims) -> Result<(), ApiError> {
    if claims.role.is_privileged() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "insufficient permissions for scheduling".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_types::models::Role;
    use uuid::Uuid;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            role,
            exp: 0,
        }
    }

    #[test]
    fn only_hr_passes_the_scheduling_gate() {
        assert!(require_hr(&claims(Role::Hr)).is_ok());
        assert!(require_hr(&claims(Role::Admin)).is_err());
        assert!(require_hr(&claims(Role::Employee)).is_err());
        assert!(require_hr(&claims(Role::Candidate)).is_err());
    }
}
