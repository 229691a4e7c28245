use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::dto::{
    is_valid_email, ChangePasswordRequest, LoginRequest, PublicChef, RegisterRequest,
};
use super::extractors::{Principal, AUTH_COOKIE, REFRESH_COOKIE};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::Chef;
use crate::error::{conflict_on_unique, ApiError};
use crate::response::{ok, Envelope};
use crate::state::AppState;

fn build_cookie(name: &'static str, value: String, ttl: std::time::Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}

fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

fn set_auth_cookies(jar: CookieJar, keys: &JwtKeys, chef: &Chef) -> anyhow::Result<CookieJar> {
    let access = keys.sign_access(chef.id, chef.role())?;
    let refresh = keys.sign_refresh(chef.id, chef.role())?;
    Ok(jar
        .add(build_cookie(AUTH_COOKIE, access, keys.access_ttl))
        .add(build_cookie(REFRESH_COOKIE, refresh, keys.refresh_ttl)))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<Envelope<PublicChef>>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    // Email and phone pair must both be free
    if Chef::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }
    if Chef::find_by_phone(&state.db, &payload.phone_prefix, &payload.phone_number)
        .await?
        .is_some()
    {
        warn!("phone number already registered");
        return Err(ApiError::Conflict("Phone number already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let chef = Chef::create(
        &state.db,
        payload.first_name.trim(),
        payload.last_name.trim(),
        &payload.country_code,
        &payload.phone_prefix,
        &payload.phone_number,
        &payload.email,
        &hash,
    )
    .await
    .map_err(|e| conflict_on_unique(e, "Email or phone number already registered"))?;

    let keys = JwtKeys::from_ref(&state);
    let jar = set_auth_cookies(jar, &keys, &chef)?;

    info!(chef_id = %chef.id, email = %chef.email, "chef registered");
    Ok((StatusCode::CREATED, jar, ok(PublicChef::from(&chef))))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Envelope<PublicChef>>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let chef = Chef::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Invalid credentials".into())
        })?;

    if !verify_password(&payload.password, &chef.password_hash)? {
        warn!(chef_id = %chef.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let jar = set_auth_cookies(jar, &keys, &chef)?;

    info!(chef_id = %chef.id, email = %chef.email, "chef logged in");
    Ok((jar, ok(PublicChef::from(&chef))))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Envelope<serde_json::Value>>) {
    let jar = jar
        .remove(clear_cookie(AUTH_COOKIE))
        .remove(clear_cookie(REFRESH_COOKIE));
    (jar, ok(serde_json::json!({ "message": "Logged out" })))
}

#[instrument(skip(state, jar))]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Envelope<PublicChef>>), ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Missing refresh token".into()))?;
    let claims = keys
        .verify_refresh(&token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".into()))?;

    let chef = Chef::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Chef not found".into()))?;

    let jar = set_auth_cookies(jar, &keys, &chef)?;
    Ok((jar, ok(PublicChef::from(&chef))))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Envelope<PublicChef>>, ApiError> {
    let chef = Chef::find_by_id(&state.db, principal.chef_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Chef not found".into()))?;
    Ok(ok(PublicChef::from(&chef)))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    payload.validate()?;

    if payload.new_password == payload.old_password {
        return Err(ApiError::BadRequest(
            "New password must be different from the current one".into(),
        ));
    }

    let chef = Chef::find_by_id(&state.db, principal.chef_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Chef not found".into()))?;

    if !verify_password(&payload.old_password, &chef.password_hash)? {
        warn!(chef_id = %chef.id, "change password with wrong current password");
        return Err(ApiError::Unauthorized("Current password is incorrect".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    Chef::update_password(&state.db, chef.id, &hash).await?;

    info!(chef_id = %chef.id, "password changed");
    Ok(ok(serde_json::json!({ "message": "Password updated" })))
}
