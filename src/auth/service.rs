use std::sync::Arc;

use actix_web::web;

use crate::auth::password::{dummy_verify, generate_salt, hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{AppError, INVALID_CREDENTIALS};
use crate::models::{NewUser, User, UserSummary};
use crate::store::{UserLookup, UserStore};

/// Registration, sign-in and token resolution over a `UserStore`.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Stores a new identity under a fresh salt.
    ///
    /// Fails with `AppError::AlreadyExists` when the username or email is taken.
    pub async fn register(&self, input: RegisterRequest) -> Result<(), AppError> {
        let cost = self.bcrypt_cost;
        let password = input.password;
        let (salt, password_hash) = web::block(move || {
            let salt = generate_salt();
            hash_password(&password, &salt, cost).map(|hash| (salt, hash))
        })
        .await??;

        let user = self
            .users
            .insert(NewUser {
                username: input.username,
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                password_hash,
                salt,
            })
            .await
            .map_err(|e| {
                if let AppError::AlreadyExists(_) = e {
                    log::info!("Registration rejected: username or email already in use");
                }
                e
            })?;

        log::info!("Registered user {} (id {})", user.username, user.id);
        Ok(())
    }

    /// Checks an email/password pair. `None` covers both an unknown email and a
    /// wrong password.
    ///
    /// bcrypt runs on the blocking pool so a sign-in never stalls the worker.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let password = password.to_string();
        match self.users.find_one(UserLookup::Email(email)).await? {
            Some(user) => {
                let salt = user.salt.clone();
                let stored_hash = user.password_hash.clone();
                let matched =
                    web::block(move || verify_password(&password, &salt, &stored_hash)).await??;
                Ok(matched.then_some(user))
            }
            None => {
                let cost = self.bcrypt_cost;
                web::block(move || dummy_verify(&password, cost)).await?;
                Ok(None)
            }
        }
    }

    /// Signs a user in, returning their summary and a bearer token.
    pub async fn authenticate(&self, input: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = match self.verify_credentials(&input.email, &input.password).await? {
            Some(user) => user,
            None => {
                log::warn!("Failed sign-in attempt");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        let token = self.tokens.issue(&user)?;
        log::info!("User {} signed in", user.username);

        Ok(AuthResponse {
            user: UserSummary::from(&user),
            token,
        })
    }

    /// Resolves a bearer token to the identity it was issued for.
    pub async fn identify(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.verify(token)?;
        self.find_by_username(&claims.username).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_one(UserLookup::Username(username))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".into()))
    }
}
