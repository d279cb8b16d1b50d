use crate::auth::jwt::JwtService;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pixlift_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtService>,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    match auth_state.jwt.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
            });
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
