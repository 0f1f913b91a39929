// src/services/lead_service.rs

use std::collections::HashMap;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        text::{non_blank, normalize_phone},
    },
    db::{EventRepository, IndicationRepository, LeadRepository},
    models::{
        event::{EventType, NewEvent},
        indication::Indication,
        lead::{CreateLeadPayload, Lead, LeadBoardColumn, LeadFilter, LeadStatus, LeadUpsertResponse, NewLead, UpdateLeadPayload, Utm},
        pipeline::{MoveCardPayload, MoveResult, PipelineStatus},
    },
    services::pipeline::{group_into_columns, move_card, move_to_column, MoveOutcome},
};

// Telefone com menos dígitos que isso não identifica ninguém
const MIN_PHONE_DIGITS: usize = 8;

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    event_repo: EventRepository,
    indication_repo: IndicationRepository,
}

impl LeadService {
    pub fn new(lead_repo: LeadRepository, event_repo: EventRepository, indication_repo: IndicationRepository) -> Self {
        Self { lead_repo, event_repo, indication_repo }
    }

    pub async fn list(&self, executor: &sqlx::PgPool, user_id: Uuid, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let status = match non_blank(filter.status.clone()) {
            Some(raw) => Some(LeadStatus::parse_label(&raw)?),
            None => None,
        };
        let search = non_blank(filter.search.clone());

        self.lead_repo.list(executor, user_id, status, search.as_deref()).await
    }

    /// Busca o lead e confere o dono: inexistente é 404, de outro médico é 403.
    pub async fn get_owned(&self, executor: &sqlx::PgPool, user_id: Uuid, lead_id: Uuid) -> Result<Lead, AppError> {
        let lead = self
            .lead_repo
            .find_by_id(executor, lead_id)
            .await?
            .ok_or(AppError::NotFound("lead"))?;

        if lead.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(lead)
    }

    /// Cria o lead ou atualiza o que já tem este telefone (nunca duplica).
    pub async fn create_or_update(
        &self,
        pool: &sqlx::PgPool,
        user_id: Uuid,
        payload: &CreateLeadPayload,
    ) -> Result<LeadUpsertResponse, AppError> {
        let new_lead = build_new_lead(user_id, payload)?;

        if let Some(indication_id) = new_lead.indication_id {
            let indication = self.indication_repo.find_by_id(pool, indication_id).await?;
            ensure_indication_owner(indication.as_ref(), user_id)?;
        }

        let mut tx = pool.begin().await?;
        let (lead, created) = self.upsert_in_tx(&mut tx, &new_lead).await?;
        tx.commit().await?;

        Ok(LeadUpsertResponse { lead, created })
    }

    /// Upsert + evento, dentro de uma transação aberta por quem chama
    /// (formulário público, quiz).
    pub async fn upsert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        new_lead: &NewLead,
    ) -> Result<(Lead, bool), AppError> {
        let (lead, created) = self.lead_repo.upsert_by_phone(&mut **tx, new_lead).await?;

        let event_type = if created { EventType::LeadCreate } else { EventType::LeadUpdate };
        self.event_repo
            .insert(
                &mut **tx,
                &NewEvent {
                    user_id: lead.user_id,
                    indication_id: lead.indication_id,
                    lead_id: Some(lead.id),
                    event_type,
                    utm: new_lead.utm.clone(),
                },
            )
            .await?;

        if created {
            tracing::info!("📥 Novo lead {} para o usuário {}", lead.id, lead.user_id);
        }

        Ok((lead, created))
    }

    pub async fn update(
        &self,
        pool: &sqlx::PgPool,
        user_id: Uuid,
        lead_id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        self.get_owned(pool, user_id, lead_id).await?;

        let status = match non_blank(payload.status.clone()) {
            Some(raw) => Some(LeadStatus::parse_label(&raw)?),
            None => None,
        };
        let phone = match payload.phone.as_deref() {
            Some(raw) => Some(checked_phone(raw)?),
            None => None,
        };

        let mut tx = pool.begin().await?;
        let lead = self
            .lead_repo
            .update(
                &mut *tx,
                lead_id,
                payload.name.as_deref().map(str::trim),
                phone.as_deref(),
                payload.interest.as_deref(),
                status,
                payload.appointment_date,
                payload.medical_notes.as_deref(),
            )
            .await?;
        self.record_update(&mut tx, &lead).await?;
        tx.commit().await?;

        Ok(lead)
    }

    pub async fn delete(&self, pool: &sqlx::PgPool, user_id: Uuid, lead_id: Uuid) -> Result<(), AppError> {
        self.get_owned(pool, user_id, lead_id).await?;
        self.lead_repo.delete(pool, lead_id).await?;
        Ok(())
    }

    pub async fn board(&self, pool: &sqlx::PgPool, user_id: Uuid) -> Result<Vec<LeadBoardColumn>, AppError> {
        let leads = self.lead_repo.list(pool, user_id, None, None).await?;

        Ok(group_into_columns(leads, |lead| lead.status)
            .into_iter()
            .map(|(index, status, leads)| LeadBoardColumn { index, status, leads })
            .collect())
    }

    // PATCH /leads/{id}/status
    pub async fn set_status(
        &self,
        pool: &sqlx::PgPool,
        user_id: Uuid,
        lead_id: Uuid,
        raw_status: &str,
    ) -> Result<MoveResult, AppError> {
        let target = LeadStatus::parse_label(raw_status)?;
        self.get_owned(pool, user_id, lead_id).await?;

        let outcome = move_card(&self.lead_repo, user_id, lead_id, target).await?;
        self.after_move(pool, user_id, lead_id, outcome).await
    }

    // POST /leads/board/move
    pub async fn move_on_board(
        &self,
        pool: &sqlx::PgPool,
        user_id: Uuid,
        payload: &MoveCardPayload,
    ) -> Result<MoveResult, AppError> {
        self.get_owned(pool, user_id, payload.card_id).await?;

        let outcome = move_to_column(&self.lead_repo, user_id, payload.card_id, payload.to_column).await?;
        self.after_move(pool, user_id, payload.card_id, outcome).await
    }

    async fn after_move(
        &self,
        pool: &sqlx::PgPool,
        user_id: Uuid,
        lead_id: Uuid,
        outcome: MoveOutcome<LeadStatus>,
    ) -> Result<MoveResult, AppError> {
        if let MoveOutcome::Moved { .. } = outcome {
            self.event_repo
                .insert(
                    pool,
                    &NewEvent {
                        user_id,
                        indication_id: None,
                        lead_id: Some(lead_id),
                        event_type: EventType::LeadUpdate,
                        utm: Utm::default(),
                    },
                )
                .await?;
        }
        Ok(outcome.into_result(lead_id))
    }

    async fn record_update(&self, tx: &mut Transaction<'_, Postgres>, lead: &Lead) -> Result<(), AppError> {
        self.event_repo
            .insert(
                &mut **tx,
                &NewEvent {
                    user_id: lead.user_id,
                    indication_id: lead.indication_id,
                    lead_id: Some(lead.id),
                    event_type: EventType::LeadUpdate,
                    utm: Utm::default(),
                },
            )
            .await
    }
}

/// Normaliza o payload de criação (telefone só com dígitos, status validado).
pub fn build_new_lead(user_id: Uuid, payload: &CreateLeadPayload) -> Result<NewLead, AppError> {
    let status = match non_blank(payload.status.clone()) {
        Some(raw) => Some(LeadStatus::parse_label(&raw)?),
        None => None,
    };

    Ok(NewLead {
        user_id,
        indication_id: payload.indication_id,
        name: payload.name.trim().to_string(),
        phone: checked_phone(&payload.phone)?,
        interest: non_blank(payload.interest.clone()),
        status,
        appointment_date: payload.appointment_date,
        medical_notes: non_blank(payload.medical_notes.clone()),
        utm: payload.utm.clone(),
    })
}

/// Só o dono do link pode atrelar leads a ele.
pub fn ensure_indication_owner(indication: Option<&Indication>, user_id: Uuid) -> Result<(), AppError> {
    match indication {
        None => Err(AppError::NotFound("indication")),
        Some(indication) if indication.user_id != user_id => Err(AppError::Forbidden),
        Some(_) => Ok(()),
    }
}

fn checked_phone(raw: &str) -> Result<String, AppError> {
    checked_phone_for(raw, "phone")
}

/// Telefone só com dígitos, com o mínimo exigido; `field` é a chave do erro.
pub(crate) fn checked_phone_for(raw: &str, field: &str) -> Result<String, AppError> {
    let phone = normalize_phone(raw);
    if phone.len() < MIN_PHONE_DIGITS {
        let mut errors = HashMap::new();
        errors.insert(field.to_string(), "required".to_string());
        return Err(AppError::FieldErrors(errors));
    }
    Ok(phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::test_support::{database, new_user},
        models::indication::IndicationKind,
    };
    use chrono::Utc;

    fn payload(phone: &str, status: Option<&str>) -> CreateLeadPayload {
        CreateLeadPayload {
            name: "  Maria da Silva ".to_string(),
            phone: phone.to_string(),
            interest: Some("   ".to_string()),
            status: status.map(str::to_string),
            appointment_date: None,
            medical_notes: None,
            indication_id: None,
            utm: Utm::default(),
        }
    }

    #[test]
    fn new_lead_is_normalized() {
        let user_id = Uuid::new_v4();
        let lead = build_new_lead(user_id, &payload("(11) 99999-8888", None)).unwrap();

        assert_eq!(lead.user_id, user_id);
        assert_eq!(lead.name, "Maria da Silva");
        assert_eq!(lead.phone, "11999998888");
        assert_eq!(lead.interest, None);
        // Sem status: o banco decide (Novo para lead novo, mantém para existente)
        assert_eq!(lead.status, None);
    }

    #[test]
    fn same_phone_in_different_formats_normalizes_equally() {
        let user_id = Uuid::new_v4();
        let a = build_new_lead(user_id, &payload("+55 (11) 99999-8888", None)).unwrap();
        let b = build_new_lead(user_id, &payload("5511999998888", None)).unwrap();

        assert_eq!(a.phone, b.phone);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = build_new_lead(Uuid::new_v4(), &payload("11999998888", Some("Perdido")));

        assert!(matches!(result, Err(AppError::InvalidStatus(s)) if s == "Perdido"));
    }

    #[test]
    fn status_label_is_parsed() {
        let lead = build_new_lead(Uuid::new_v4(), &payload("11999998888", Some("não veio"))).unwrap();

        assert_eq!(lead.status, Some(LeadStatus::NaoVeio));
    }

    #[test]
    fn phone_without_enough_digits_is_rejected() {
        let result = build_new_lead(Uuid::new_v4(), &payload("telefone: 123", None));

        assert!(matches!(result, Err(AppError::FieldErrors(errors)) if errors.contains_key("phone")));
    }

    fn indication_of(user_id: Uuid) -> Indication {
        Indication {
            id: Uuid::new_v4(),
            user_id,
            slug: "instagram-bio".to_string(),
            name: "Bio do Instagram".to_string(),
            kind: IndicationKind::Link,
            quiz_id: None,
            page_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn indication_of_another_doctor_is_forbidden() {
        let owner = Uuid::new_v4();
        let indication = indication_of(owner);

        assert!(ensure_indication_owner(Some(&indication), owner).is_ok());
        assert!(matches!(
            ensure_indication_owner(Some(&indication), Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            ensure_indication_owner(None, owner),
            Err(AppError::NotFound("indication"))
        ));
    }

    #[test]
    fn short_phone_error_uses_the_given_field() {
        let result = checked_phone_for("12", "contact.phone");

        assert!(matches!(result, Err(AppError::FieldErrors(errors)) if errors.contains_key("contact.phone")));
    }

    fn service(pool: &sqlx::PgPool) -> LeadService {
        LeadService::new(
            LeadRepository::new(pool.clone()),
            EventRepository::new(pool.clone()),
            IndicationRepository::new(pool.clone()),
        )
    }

    #[tokio::test]
    async fn duplicate_phone_updates_the_existing_lead() {
        let Some(pool) = database().await else { return };
        let user = new_user(&pool).await;
        let leads = service(&pool);

        let first = leads.create_or_update(&pool, user.id, &payload("(11) 98888-7777", None)).await.unwrap();
        assert!(first.created);
        assert_eq!(first.lead.status, LeadStatus::Novo);

        let mut again = payload("11 98888-7777", Some("Agendado"));
        again.medical_notes = Some("retorno em 30 dias".to_string());
        let second = leads.create_or_update(&pool, user.id, &again).await.unwrap();

        assert!(!second.created);
        assert_eq!(second.lead.id, first.lead.id);
        assert_eq!(second.lead.status, LeadStatus::Agendado);
        assert_eq!(second.lead.medical_notes.as_deref(), Some("retorno em 30 dias"));

        let all = leads.list(&pool, user.id, &LeadFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn lead_cannot_use_another_doctors_indication() {
        let Some(pool) = database().await else { return };
        let doctor_a = new_user(&pool).await;
        let doctor_b = new_user(&pool).await;
        let link_of_b = IndicationRepository::new(pool.clone())
            .insert(&pool, doctor_b.id, &format!("link-{}", doctor_b.id.simple()), "Bio", IndicationKind::Link, None, None)
            .await
            .unwrap();
        let leads = service(&pool);

        let mut stolen = payload("11977776666", None);
        stolen.indication_id = Some(link_of_b.id);
        let result = leads.create_or_update(&pool, doctor_a.id, &stolen).await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        stolen.indication_id = Some(Uuid::new_v4());
        let result = leads.create_or_update(&pool, doctor_a.id, &stolen).await;
        assert!(matches!(result, Err(AppError::NotFound("indication"))));

        stolen.indication_id = Some(link_of_b.id);
        let own = leads.create_or_update(&pool, doctor_b.id, &stolen).await.unwrap();
        assert_eq!(own.lead.indication_id, Some(link_of_b.id));
    }
}
