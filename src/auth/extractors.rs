use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::{AuthService, Claims};
use crate::error::AppError;
use crate::models::User;

/// The identity behind the request's bearer token.
///
/// Reads the `Claims` that `AuthMiddleware` stored and loads the matching user
/// through the `AuthService`. Handlers take this as the owner for every task
/// operation.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let auth = req.app_data::<web::Data<AuthService>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                AppError::Unauthorized(
                    "Token claims not found in request. Ensure AuthMiddleware is active.".into(),
                )
            })?;
            let auth = auth.ok_or_else(|| {
                AppError::ConfigurationError("AuthService is not registered as app data".into())
            })?;

            let user = auth.find_by_username(&claims.username).await?;
            Ok::<_, ActixError>(AuthenticatedUser(user))
        })
    }
}
