// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        CycleRepository, DreRepository, EventRepository, IndicationRepository, InterestRepository,
        LeadRepository, OutboundRepository, PageRepository, QuizRepository, UserRepository,
    },
    services::{
        auth::AuthService, cycle_service::CycleService, dre_service::DreService,
        indication_service::IndicationService, lead_service::LeadService,
        outbound_service::OutboundService, page_service::PageService, quiz_service::QuizService,
    },
};

// Configuração lida do ambiente (.env carregado no main)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    // Base dos links públicos (NEXT_PUBLIC_APP_URL no frontend)
    pub app_url: String,
    pub server_addr: String,
    pub jwt_expiration_days: i64,
    pub free_plan_max_indications: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET não pode ser vazio");
        }

        let app_url = lookup("APP_URL")
            .or_else(|| lookup("NEXT_PUBLIC_APP_URL"))
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let jwt_expiration_days = match lookup("JWT_EXPIRATION_DAYS") {
            Some(raw) => raw.parse().context("JWT_EXPIRATION_DAYS deve ser um número")?,
            None => 7,
        };

        let free_plan_max_indications = match lookup("FREE_PLAN_MAX_INDICATIONS") {
            Some(raw) => raw.parse().context("FREE_PLAN_MAX_INDICATIONS deve ser um número")?,
            None => 3,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            app_url,
            server_addr,
            jwt_expiration_days,
            free_plan_max_indications,
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,

    pub interest_repo: InterestRepository,
    pub event_repo: EventRepository,

    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub indication_service: IndicationService,
    pub page_service: PageService,
    pub quiz_service: QuizService,
    pub outbound_service: OutboundService,
    pub cycle_service: CycleService,
    pub dre_service: DreService,
}

impl AppState {
    pub fn build(config: Config, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let page_repo = PageRepository::new(db_pool.clone());
        let quiz_repo = QuizRepository::new(db_pool.clone());
        let indication_repo = IndicationRepository::new(db_pool.clone());
        let outbound_repo = OutboundRepository::new(db_pool.clone());
        let interest_repo = InterestRepository::new(db_pool.clone());
        let cycle_repo = CycleRepository::new(db_pool.clone());
        let dre_repo = DreRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            config.jwt_expiration_days,
            db_pool.clone(),
        );
        let lead_service = LeadService::new(lead_repo.clone(), event_repo.clone(), indication_repo.clone());
        let indication_service = IndicationService::new(
            indication_repo.clone(),
            quiz_repo.clone(),
            page_repo.clone(),
            event_repo.clone(),
            lead_service.clone(),
            config.app_url.clone(),
            config.free_plan_max_indications,
        );
        let page_service = PageService::new(page_repo, config.app_url.clone());
        let quiz_service =
            QuizService::new(quiz_repo, indication_repo, lead_service.clone(), config.app_url.clone());
        let outbound_service = OutboundService::new(outbound_repo);
        let cycle_service = CycleService::new(cycle_repo);
        let dre_service = DreService::new(dre_repo);

        Ok(Self {
            db_pool,
            i18n_store,
            interest_repo,
            event_repo,
            auth_service,
            lead_service,
            indication_service,
            page_service,
            quiz_service,
            outbound_service,
            cycle_service,
            dre_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.app_url, "http://localhost:3000");
        assert_eq!(config.server_addr, "0.0.0.0:3000");
        assert_eq!(config.jwt_expiration_days, 7);
        assert_eq!(config.free_plan_max_indications, 3);
    }

    #[test]
    fn public_app_url_is_accepted_and_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("JWT_SECRET", "segredo"),
            ("NEXT_PUBLIC_APP_URL", "https://app.clinica.com/"),
        ]))
        .unwrap();

        assert_eq!(config.app_url, "https://app.clinica.com");
    }

    #[test]
    fn missing_secret_fails() {
        let result = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/clinic")]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("JWT_SECRET", "segredo"),
            ("JWT_EXPIRATION_DAYS", "sete"),
        ]));
        assert!(result.is_err());
    }
}
