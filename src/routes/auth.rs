use crate::{
    auth::{AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Stores the account under a freshly salted password hash. Signing in is a
/// separate call.
///
/// ## Responses:
/// - `201 Created`: Empty body.
/// - `409 Conflict`: The username or email is already registered.
/// - `422 Unprocessable Entity`: Input validation failed.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().finish())
}

/// Sign in
///
/// Returns the user summary and a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{ "user": { "id", "username", "email" }, "token" }`.
/// - `401 Unauthorized`: `Invalid credentials`, for an unknown email and a wrong password alike.
/// - `422 Unprocessable Entity`: Input validation failed.
#[post("/signin")]
pub async fn signin(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let response = auth.authenticate(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
