use crate::utils::error::AppError;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

pub const TOKEN_COOKIE: &str = "token";

const TOKEN_LIFETIME_DAYS: i64 = 365;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
}

fn get_jwt_secret() -> String {
    env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn is_production() -> bool {
    env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false)
}

/// Signs a session token for the given identity, expiring in 365 days.
pub fn issue_token(email: &str, role: Option<&str>) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize;

    let claims = Claims {
        sub: email.to_string(),
        role: role.map(String::from),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
}

/// Validates signature and expiry. Any failure collapses into the same
/// Unauthorized response the frontend expects.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("unauthorized access".to_string()))
}

/// HTTP-only session cookie. Production runs cross-site over TLS, so it needs
/// Secure + SameSite=None; development stays non-secure with SameSite=Strict.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let production = is_production();
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Strict
        })
        .max_age(CookieDuration::days(TOKEN_LIFETIME_DAYS))
        .finish()
}

/// Clears the session cookie. Revocation is client-side only: an already
/// issued token stays verifiable until its natural expiry.
pub fn expired_cookie() -> Cookie<'static> {
    let production = is_production();
    Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Strict
        })
        .max_age(CookieDuration::seconds(0))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrip() {
        let token = issue_token("a@x.com", Some("HR")).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role.as_deref(), Some("HR"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn roundtrip_without_role() {
        let token = issue_token("b@x.com", None).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "b@x.com");
        assert!(claims.role.is_none());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = issue_token("a@x.com", None).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], parts[1], "notasignature");
        assert!(verify_token(&forged).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: "a@x.com".to_string(),
            role: None,
            iat: (Utc::now() - Duration::days(2)).timestamp() as usize,
            exp: (Utc::now() - Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("tok".to_string());
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn expired_cookie_has_zero_max_age() {
        let cookie = expired_cookie();
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(0)));
        assert_eq!(cookie.value(), "");
    }
}
