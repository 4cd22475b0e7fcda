use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use bcrypt::{hash, verify};
use chrono::Utc;
use log::{error, info, warn};

use super::auth_models::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};
use crate::config::AppConfig;
use crate::error::{internal, required, ApiError};
use crate::models::session::{Session, SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::models::user::{normalize_email, PublicUser};
use crate::store::{NewUser, Store, StoreError};

// One message for every credential failure so callers can't probe for accounts.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(production)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .finish()
}

fn removal_cookie(production: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), production);
    cookie.make_removal();
    cookie
}

// Persist a fresh session for the user and return the matching cookie
async fn start_session(
    store: &dyn Store,
    user_id: i32,
    production: bool,
) -> Result<Cookie<'static>, ApiError> {
    let session = Session::issue(user_id);
    store
        .insert_session(&session)
        .await
        .map_err(|e| internal("Failed to create session", e))?;
    Ok(session_cookie(session.session_token, production))
}

// register user to DB
pub async fn register(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let missing = "Name, email, and password are required";
    let name = required(&req.name, missing)?.trim();
    let email = normalize_email(required(&req.email, missing)?);
    let email = email.as_str();
    let password = required(&req.password, missing)?.to_string();
    info!("Received request to register user: {}", email);

    let existing = store
        .find_user_by_email(email)
        .await
        .map_err(|e| internal("Failed to look up user", e))?;
    if existing.is_some() {
        info!("Email {} is already registered", email);
        return Err(ApiError::Conflict("User already exists".into()));
    }

    // Encrypt password with bcrypt
    let cost = config.bcrypt_cost;
    let password_hash = web::block(move || hash(password, cost))
        .await
        .map_err(|e| internal("Password hashing task failed", e))?
        .map_err(|e| internal("Failed to hash password", e))?;

    let user = match store
        .insert_user(NewUser {
            name,
            email,
            password_hash: &password_hash,
        })
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent registration of the same email
        Err(StoreError::Duplicate) => {
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(internal("Failed to register user", e)),
    };

    let cookie = start_session(store.get_ref(), user.user_id, config.production).await?;

    info!("User {} registered successfully", email);
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}

// login logic
pub async fn login(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let missing = "Email and password are required";
    let email = normalize_email(required(&req.email, missing)?);
    let email = email.as_str();
    let password = required(&req.password, missing)?.to_string();
    info!("Received login request for user: {}", email);

    let user = store
        .find_user_by_email(email)
        .await
        .map_err(|e| internal("Failed to look up user", e))?;

    let Some((user, password_hash)) = user.and_then(|u| {
        let h = u.password_hash.clone().filter(|h| !h.is_empty())?;
        Some((u, h))
    }) else {
        info!("Login rejected for {}: unknown account or no password", email);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    // Validate hashed password in DB and given password
    let valid = match web::block(move || verify(password, &password_hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            warn!("Stored hash for {} could not be checked: {}", email, e);
            false
        }
        Err(e) => return Err(internal("Password check task failed", e)),
    };
    if !valid {
        info!("Invalid password for user: {}", email);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let cookie = start_session(store.get_ref(), user.user_id, config.production).await?;

    info!("User {} logged in successfully", email);
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}

pub async fn logout(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    req: HttpRequest,
) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let token = cookie.value();
        info!("Received logout request");
        match store.delete_sessions_by_token(token).await {
            Ok(count) => info!("Removed {} session(s) on logout", count),
            // Logout always succeeds for the caller
            Err(e) => error!("Failed to delete session on logout: {}", e),
        }
    } else {
        info!("Logout without a session cookie");
    }

    HttpResponse::Ok()
        .cookie(removal_cookie(config.production))
        .json(LogoutResponse { success: true })
}

// Resolve the session cookie to its user
pub async fn me(
    store: web::Data<dyn Store>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let not_authenticated = || ApiError::Unauthorized("Not authenticated".into());

    let token = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Err(not_authenticated()),
    };

    let session = store
        .find_session(&token)
        .await
        .map_err(|e| internal("Failed to look up session", e))?
        .ok_or_else(not_authenticated)?;

    if session.is_expired(Utc::now()) {
        // Remove expired session
        if let Err(e) = store.delete_sessions_by_token(&token).await {
            error!("Failed to delete expired session: {}", e);
        }
        info!("Session expired for user {}", session.user_id);
        return Err(not_authenticated());
    }

    let user = store
        .find_user_by_id(session.user_id)
        .await
        .map_err(|e| internal("Failed to fetch user information", e))?
        .ok_or_else(not_authenticated)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}
