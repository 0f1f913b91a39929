// src/services/indication_service.rs

use std::collections::HashMap;

use qrcode::{render::svg, QrCode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        text::{pick_unique_slug, slugify},
    },
    db::{EventRepository, IndicationRepository, PageRepository, QuizRepository},
    models::{
        auth::User,
        event::{EventType, NewEvent},
        indication::{CreateIndicationPayload, Indication, IndicationKind, IndicationWithStats, PublicIndication, UpdateIndicationPayload},
        lead::{CreateLeadPayload, LeadUpsertResponse, NewLead, Utm},
    },
    services::lead_service::{build_new_lead, LeadService},
};

#[derive(Clone)]
pub struct IndicationService {
    indication_repo: IndicationRepository,
    quiz_repo: QuizRepository,
    page_repo: PageRepository,
    event_repo: EventRepository,
    lead_service: LeadService,
    app_url: String,
    free_plan_max_indications: i64,
}

impl IndicationService {
    pub fn new(
        indication_repo: IndicationRepository,
        quiz_repo: QuizRepository,
        page_repo: PageRepository,
        event_repo: EventRepository,
        lead_service: LeadService,
        app_url: String,
        free_plan_max_indications: i64,
    ) -> Self {
        Self {
            indication_repo,
            quiz_repo,
            page_repo,
            event_repo,
            lead_service,
            app_url,
            free_plan_max_indications,
        }
    }

    /// `{APP_URL}/{slug do médico}/{slug da indicação}`
    pub fn public_url(&self, owner_slug: &str, indication_slug: &str) -> String {
        format!("{}/{}/{}", self.app_url, owner_slug, indication_slug)
    }

    pub async fn list(&self, user: &User) -> Result<Vec<IndicationWithStats>, AppError> {
        let mut rows = self.indication_repo.list_with_stats(user.id).await?;
        for row in rows.iter_mut() {
            row.public_url = self.public_url(&user.slug, &row.indication.slug);
        }
        Ok(rows)
    }

    pub async fn get_owned(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Indication, AppError> {
        let indication = self
            .indication_repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound("indication"))?;

        if indication.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(indication)
    }

    pub async fn create(&self, pool: &PgPool, user: &User, payload: &CreateIndicationPayload) -> Result<Indication, AppError> {
        let mut tx = pool.begin().await?;

        // 1. Limite do plano gratuito (médico travado até o commit)
        if !user.is_premium() {
            self.indication_repo.lock_owner(&mut *tx, user.id).await?;
            let total = self.indication_repo.count_by_user(&mut *tx, user.id).await?;
            ensure_within_plan(total, self.free_plan_max_indications)?;
        }

        // 2. Destino coerente com o tipo (quiz/página do próprio médico)
        let (quiz_id, page_id) = resolve_target(payload.kind, payload.quiz_id, payload.page_id)?;
        self.ensure_target_owned(pool, user.id, quiz_id, page_id).await?;

        // 3. Slug informado ou derivado do nome
        let slug = match payload.slug.as_deref() {
            Some(slug) => slug.to_string(),
            None => {
                let base = slugify(&payload.name);
                let base = if base.is_empty() { "link".to_string() } else { base };
                let taken = self.indication_repo.slugs_like(&mut *tx, &base).await?;
                pick_unique_slug(&base, &taken)
            }
        };

        let indication = self
            .indication_repo
            .insert(&mut *tx, user.id, &slug, payload.name.trim(), payload.kind, quiz_id, page_id)
            .await?;

        tx.commit().await?;
        Ok(indication)
    }

    pub async fn update(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateIndicationPayload,
    ) -> Result<Indication, AppError> {
        let mut indication = self.get_owned(pool, user_id, id).await?;

        if let Some(name) = payload.name.as_deref() {
            indication.name = name.trim().to_string();
        }
        if let Some(slug) = payload.slug.as_deref() {
            indication.slug = slug.to_string();
        }
        let kind = payload.kind.unwrap_or(indication.kind);
        let (quiz_id, page_id) = resolve_target(
            kind,
            payload.quiz_id.or(indication.quiz_id),
            payload.page_id.or(indication.page_id),
        )?;
        self.ensure_target_owned(pool, user_id, quiz_id, page_id).await?;

        indication.kind = kind;
        indication.quiz_id = quiz_id;
        indication.page_id = page_id;

        self.indication_repo.update(pool, &indication).await
    }

    pub async fn delete(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get_owned(pool, user_id, id).await?;
        self.indication_repo.delete(pool, id).await?;
        Ok(())
    }

    /// QR code (SVG) do link público.
    pub async fn qrcode_svg(&self, pool: &PgPool, user: &User, id: Uuid) -> Result<String, AppError> {
        let indication = self.get_owned(pool, user.id, id).await?;
        render_qrcode_svg(&self.public_url(&user.slug, &indication.slug))
    }

    /// Registra o clique e devolve a URL de destino.
    pub async fn click(&self, pool: &PgPool, slug: &str, utm: &Utm) -> Result<String, AppError> {
        let public = self
            .indication_repo
            .find_public_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("indication"))?;

        self.event_repo
            .insert(
                pool,
                &NewEvent {
                    user_id: public.indication.user_id,
                    indication_id: Some(public.indication.id),
                    lead_id: None,
                    event_type: EventType::Click,
                    utm: utm.clone(),
                },
            )
            .await?;

        Ok(redirect_target(&self.app_url, &public))
    }

    /// Formulário público de captura: o lead entra no médico dono do link.
    pub async fn capture_lead(
        &self,
        pool: &PgPool,
        slug: &str,
        payload: &CreateLeadPayload,
    ) -> Result<LeadUpsertResponse, AppError> {
        let public = self
            .indication_repo
            .find_public_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("indication"))?;

        let new_lead = public_lead(&public.indication, payload)?;

        let mut tx = pool.begin().await?;
        let (lead, created) = self.lead_service.upsert_in_tx(&mut tx, &new_lead).await?;
        tx.commit().await?;

        Ok(LeadUpsertResponse { lead, created })
    }

    async fn ensure_target_owned(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        quiz_id: Option<Uuid>,
        page_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(quiz_id) = quiz_id {
            let quiz = self.quiz_repo.find_by_id(pool, quiz_id).await?.ok_or(AppError::NotFound("quiz"))?;
            if quiz.user_id != user_id {
                return Err(AppError::Forbidden);
            }
        }
        if let Some(page_id) = page_id {
            let page = self.page_repo.find_by_id(pool, page_id).await?.ok_or(AppError::NotFound("page"))?;
            if page.user_id != user_id {
                return Err(AppError::Forbidden);
            }
        }
        Ok(())
    }
}

fn ensure_within_plan(current_total: i64, limit: i64) -> Result<(), AppError> {
    if current_total >= limit {
        return Err(AppError::PlanLimitReached(limit));
    }
    Ok(())
}

// Tipo quiz exige quiz_id; tipo page exige page_id; os demais não guardam destino.
fn resolve_target(
    kind: IndicationKind,
    quiz_id: Option<Uuid>,
    page_id: Option<Uuid>,
) -> Result<(Option<Uuid>, Option<Uuid>), AppError> {
    let missing = |field: &str| {
        let mut errors = HashMap::new();
        errors.insert(field.to_string(), "missing_target".to_string());
        AppError::FieldErrors(errors)
    };

    match kind {
        IndicationKind::Quiz => Ok((Some(quiz_id.ok_or_else(|| missing("quizId"))?), None)),
        IndicationKind::Page => Ok((None, Some(page_id.ok_or_else(|| missing("pageId"))?))),
        IndicationKind::Link | IndicationKind::Chatbot => Ok((None, None)),
    }
}

fn redirect_target(app_url: &str, public: &PublicIndication) -> String {
    let indication = &public.indication;
    match (indication.kind, public.quiz_slug.as_deref(), public.page_slug.as_deref()) {
        (IndicationKind::Quiz, Some(quiz_slug), _) => format!("{}/quiz/{}?ref={}", app_url, quiz_slug, indication.slug),
        (IndicationKind::Page, _, Some(page_slug)) => format!("{}/p/{}?ref={}", app_url, page_slug, indication.slug),
        (IndicationKind::Chatbot, _, _) => format!("{}/{}/{}/chat", app_url, public.owner_slug, indication.slug),
        // Link simples (ou destino apagado): formulário de captura
        _ => format!("{}/{}/{}/form", app_url, public.owner_slug, indication.slug),
    }
}

pub fn render_qrcode_svg(url: &str) -> Result<String, AppError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| anyhow::anyhow!("Falha ao gerar QR code: {}", e))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Lead vindo do formulário público. O visitante só informa contato,
/// interesse e UTMs: status, notas clínicas, consulta e indicação ficam
/// com o médico (o lead sempre entra no link que recebeu o formulário).
pub fn public_lead(indication: &Indication, payload: &CreateLeadPayload) -> Result<NewLead, AppError> {
    let mut new_lead = build_new_lead(indication.user_id, payload)?;
    new_lead.indication_id = Some(indication.id);
    new_lead.status = None;
    new_lead.medical_notes = None;
    new_lead.appointment_date = None;
    Ok(new_lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn public(kind: IndicationKind, quiz_slug: Option<&str>, page_slug: Option<&str>) -> PublicIndication {
        PublicIndication {
            indication: Indication {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                slug: "instagram".to_string(),
                name: "Instagram".to_string(),
                kind,
                quiz_id: None,
                page_id: None,
                created_at: Utc::now(),
            },
            owner_slug: "dra-ana".to_string(),
            quiz_slug: quiz_slug.map(str::to_string),
            page_slug: page_slug.map(str::to_string),
        }
    }

    #[test]
    fn free_plan_stops_at_the_limit() {
        assert!(ensure_within_plan(2, 3).is_ok());
        assert!(matches!(ensure_within_plan(3, 3), Err(AppError::PlanLimitReached(3))));
    }

    #[test]
    fn quiz_kind_requires_a_quiz() {
        let quiz_id = Uuid::new_v4();

        assert_eq!(resolve_target(IndicationKind::Quiz, Some(quiz_id), None).unwrap(), (Some(quiz_id), None));
        assert!(matches!(
            resolve_target(IndicationKind::Quiz, None, Some(Uuid::new_v4())),
            Err(AppError::FieldErrors(errors)) if errors.contains_key("quizId")
        ));
    }

    #[test]
    fn plain_links_drop_targets() {
        let result = resolve_target(IndicationKind::Link, Some(Uuid::new_v4()), Some(Uuid::new_v4())).unwrap();
        assert_eq!(result, (None, None));
    }

    #[test]
    fn redirect_follows_the_kind() {
        let base = "https://app.clinica.com";

        assert_eq!(
            redirect_target(base, &public(IndicationKind::Quiz, Some("pele"), None)),
            "https://app.clinica.com/quiz/pele?ref=instagram"
        );
        assert_eq!(
            redirect_target(base, &public(IndicationKind::Page, None, Some("ana"))),
            "https://app.clinica.com/p/ana?ref=instagram"
        );
        assert_eq!(
            redirect_target(base, &public(IndicationKind::Chatbot, None, None)),
            "https://app.clinica.com/dra-ana/instagram/chat"
        );
        assert_eq!(
            redirect_target(base, &public(IndicationKind::Link, None, None)),
            "https://app.clinica.com/dra-ana/instagram/form"
        );
    }

    #[test]
    fn qrcode_is_svg() {
        let svg = render_qrcode_svg("https://app.clinica.com/dra-ana/instagram").unwrap();
        assert!(svg.contains("<svg"));
    }

    fn visitor_payload() -> CreateLeadPayload {
        CreateLeadPayload {
            name: "Maria".to_string(),
            phone: "(11) 98888-7777".to_string(),
            interest: Some("Botox".to_string()),
            status: Some("Fechado".to_string()),
            appointment_date: Some(Utc::now()),
            medical_notes: Some("texto do visitante".to_string()),
            indication_id: Some(Uuid::new_v4()),
            utm: Utm { utm_source: Some("instagram".to_string()), ..Default::default() },
        }
    }

    #[test]
    fn public_form_only_carries_contact_fields() {
        let link = public(IndicationKind::Link, None, None).indication;

        let lead = public_lead(&link, &visitor_payload()).unwrap();

        assert_eq!(lead.user_id, link.user_id);
        assert_eq!(lead.indication_id, Some(link.id));
        assert_eq!(lead.phone, "11988887777");
        assert_eq!(lead.interest.as_deref(), Some("Botox"));
        assert_eq!(lead.utm.utm_source.as_deref(), Some("instagram"));
        assert_eq!(lead.status, None);
        assert_eq!(lead.medical_notes, None);
        assert_eq!(lead.appointment_date, None);
    }

    fn service_on(pool: &PgPool, free_plan_max_indications: i64) -> IndicationService {
        let lead_service = LeadService::new(
            crate::db::LeadRepository::new(pool.clone()),
            EventRepository::new(pool.clone()),
            IndicationRepository::new(pool.clone()),
        );
        IndicationService::new(
            IndicationRepository::new(pool.clone()),
            QuizRepository::new(pool.clone()),
            PageRepository::new(pool.clone()),
            EventRepository::new(pool.clone()),
            lead_service,
            "https://app.clinica.com".to_string(),
            free_plan_max_indications,
        )
    }

    #[tokio::test]
    async fn public_capture_keeps_the_doctors_notes() {
        let Some(pool) = crate::db::test_support::database().await else { return };
        let doctor = crate::db::test_support::new_user(&pool).await;
        let service = service_on(&pool, 3);
        let link = service
            .create(
                &pool,
                &doctor,
                &CreateIndicationPayload {
                    name: "Bio".to_string(),
                    slug: Some(format!("bio-{}", doctor.id.simple())),
                    kind: IndicationKind::Link,
                    quiz_id: None,
                    page_id: None,
                },
            )
            .await
            .unwrap();

        let mut own = visitor_payload();
        own.indication_id = None;
        own.status = None;
        own.medical_notes = Some("alergia a penicilina".to_string());
        own.appointment_date = Some("2026-03-10T14:00:00Z".parse().unwrap());
        service.lead_service.create_or_update(&pool, doctor.id, &own).await.unwrap();

        let captured = service.capture_lead(&pool, &link.slug, &visitor_payload()).await.unwrap();

        assert!(!captured.created);
        assert_eq!(captured.lead.medical_notes.as_deref(), Some("alergia a penicilina"));
        assert_eq!(captured.lead.appointment_date, own.appointment_date);
        assert_eq!(captured.lead.indication_id, Some(link.id));
    }

    #[tokio::test]
    async fn concurrent_creates_respect_the_free_plan_limit() {
        let Some(pool) = crate::db::test_support::database().await else { return };
        let doctor = crate::db::test_support::new_user(&pool).await;
        let service = service_on(&pool, 2);

        let attempts = (0..5).map(|i| {
            let (service, pool, doctor) = (service.clone(), pool.clone(), doctor.clone());
            tokio::spawn(async move {
                let payload = CreateIndicationPayload {
                    name: format!("Link {i}"),
                    slug: Some(format!("l{i}-{}", doctor.id.simple())),
                    kind: IndicationKind::Link,
                    quiz_id: None,
                    page_id: None,
                };
                service.create(&pool, &doctor, &payload).await
            })
        });

        let mut created = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::PlanLimitReached(2)) => {}
                Err(other) => panic!("erro inesperado: {other:?}"),
            }
        }
        assert_eq!(created, 2);
    }
}
