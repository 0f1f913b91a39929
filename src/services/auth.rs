// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        text::{pick_unique_slug, slugify},
    },
    db::UserRepository,
    models::auth::{Claims, RegisterUserPayload, UpdateProfilePayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_days: i64, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, jwt_expiration_days, pool }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<(String, User), AppError> {
        // 1. Hashing fora da transação (não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        // 2. Slug público a partir do nome ("Dra. Ana" -> "dra-ana", "dra-ana-2"...)
        let mut base = slugify(&payload.name);
        if base.is_empty() {
            base = "medico".to_string();
        }
        let taken = self.user_repo.slugs_like(&mut *tx, &base).await?;
        let slug = pick_unique_slug(&base, &taken);

        // 3. Cria o usuário
        let new_user = self
            .user_repo
            .create_user(
                &mut *tx,
                payload.name.trim(),
                payload.email.trim(),
                &hashed_password,
                &slug,
                payload.specialty.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Novo usuário registrado: {} ({})", new_user.id, new_user.slug);

        let token = self.create_token(new_user.id)?;
        Ok((token, new_user))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_profile(&self, user_id: Uuid, payload: &UpdateProfilePayload) -> Result<User, AppError> {
        self.user_repo
            .update_profile(
                &self.pool,
                user_id,
                payload.name.as_deref().map(str::trim),
                payload.specialty.as_deref(),
                payload.image.as_deref(),
                payload.slug.as_deref(),
            )
            .await
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        encode_token(user_id, &self.jwt_secret, self.jwt_expiration_days)
    }
}

fn encode_token(user_id: Uuid, secret: &str, expiration_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(expiration_days);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

// Assinatura e expiração. Qualquer falha vira InvalidToken (401).
fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_the_user_id() {
        let user_id = Uuid::new_v4();
        let token = encode_token(user_id, "segredo", 7).unwrap();

        let claims = decode_token(&token, "segredo").unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = encode_token(Uuid::new_v4(), "segredo", 7).unwrap();

        assert!(matches!(decode_token(&token, "outro"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_token(Uuid::new_v4(), "segredo", -2).unwrap();

        assert!(matches!(decode_token(&token, "segredo"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode_token("nao-e-um-jwt", "segredo"), Err(AppError::InvalidToken)));
    }
}
