// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::text::validate_slug;

// Mapeia o CREATE TYPE user_plan do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserPlan {
    Free,
    Premium,
}

// Representa um médico vindo do banco de dados (dono de todos os seus dados)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Dra. Ana Souza")]
    pub name: String,
    #[schema(example = "ana@clinica.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // Handle público usado nos links (ex: /dra-ana/consulta)
    #[schema(example = "dra-ana")]
    pub slug: String,
    #[schema(example = "Dermatologia")]
    pub specialty: Option<String>,
    pub image: Option<String>,
    pub plan: UserPlan,
    pub plan_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_premium_at(&self, now: DateTime<Utc>) -> bool {
        match (self.plan, self.plan_expires_at) {
            (UserPlan::Free, _) => false,
            (UserPlan::Premium, None) => true,
            (UserPlan::Premium, Some(expires_at)) => expires_at > now,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.is_premium_at(Utc::now())
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Dra. Ana Souza")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    pub specialty: Option<String>,
}

// Dados para login (web e mobile)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Resposta do GET /api/mobile/auth/verify
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: User,
}

// Atualização parcial do perfil
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub image: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    #[schema(example = "dra-ana")]
    pub slug: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(plan: UserPlan, plan_expires_at: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Dra. Ana".into(),
            email: "ana@clinica.com".into(),
            password_hash: "hash".into(),
            slug: "dra-ana".into(),
            specialty: None,
            image: None,
            plan,
            plan_expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn premium_depends_on_expiry() {
        let now = Utc::now();
        assert!(!user(UserPlan::Free, None).is_premium_at(now));
        assert!(user(UserPlan::Premium, None).is_premium_at(now));
        assert!(user(UserPlan::Premium, Some(now + Duration::days(1))).is_premium_at(now));
        assert!(!user(UserPlan::Premium, Some(now - Duration::days(1))).is_premium_at(now));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user(UserPlan::Free, None)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["slug"], "dra-ana");
        assert_eq!(json["plan"], "free");
    }
}
