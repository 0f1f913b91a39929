// src/services/pipeline.rs
// Quadro kanban genérico: colunas fixas, uma por status.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pipeline::{MoveResult, PipelineStatus},
};

/// Onde o status de cada card é lido e gravado.
#[async_trait]
pub trait StatusStore<S: PipelineStatus>: Send + Sync {
    async fn current_status(&self, owner_id: Uuid, card_id: Uuid) -> Result<Option<S>, AppError>;
    async fn set_status(&self, owner_id: Uuid, card_id: Uuid, status: S) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome<S> {
    Unchanged(S),
    Moved { from: S, to: S },
}

impl<S: PipelineStatus> MoveOutcome<S> {
    pub fn into_result(self, card_id: Uuid) -> MoveResult {
        match self {
            MoveOutcome::Unchanged(status) => MoveResult {
                card_id,
                from: status.label().to_string(),
                to: status.label().to_string(),
                changed: false,
            },
            MoveOutcome::Moved { from, to } => MoveResult {
                card_id,
                from: from.label().to_string(),
                to: to.label().to_string(),
                changed: true,
            },
        }
    }
}

/// Move um card para `target`. Grava no máximo um status, e só deste card.
pub async fn move_card<S, T>(store: &T, owner_id: Uuid, card_id: Uuid, target: S) -> Result<MoveOutcome<S>, AppError>
where
    S: PipelineStatus,
    T: StatusStore<S> + ?Sized,
{
    let current = store
        .current_status(owner_id, card_id)
        .await?
        .ok_or(AppError::NotFound("card"))?;

    if current == target {
        return Ok(MoveOutcome::Unchanged(current));
    }

    store.set_status(owner_id, card_id, target).await?;
    tracing::debug!("Card {} movido: {:?} -> {:?}", card_id, current, target);

    Ok(MoveOutcome::Moved { from: current, to: target })
}

// Fim do arraste: a coluna de destino define o status
pub async fn move_to_column<S, T>(
    store: &T,
    owner_id: Uuid,
    card_id: Uuid,
    column_index: usize,
) -> Result<MoveOutcome<S>, AppError>
where
    S: PipelineStatus,
    T: StatusStore<S> + ?Sized,
{
    let target = S::from_column(column_index).ok_or(AppError::InvalidColumn(column_index))?;
    move_card(store, owner_id, card_id, target).await
}

/// Distribui os cards nas colunas, na ordem do quadro. Colunas vazias aparecem.
pub fn group_into_columns<S, C>(cards: Vec<C>, status_of: impl Fn(&C) -> S) -> Vec<(usize, S, Vec<C>)>
where
    S: PipelineStatus,
{
    let mut columns: Vec<(usize, S, Vec<C>)> = S::COLUMNS
        .iter()
        .enumerate()
        .map(|(index, status)| (index, *status, Vec::new()))
        .collect();

    for card in cards {
        let index = status_of(&card).column_index();
        columns[index].2.push(card);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{lead::LeadStatus, outbound::OutboundStatus};
    use std::{collections::HashMap, sync::Mutex};

    // Store em memória que registra cada gravação
    struct MemoryStore<S> {
        owner_id: Uuid,
        cards: Mutex<HashMap<Uuid, S>>,
        writes: Mutex<Vec<(Uuid, S)>>,
    }

    impl<S: PipelineStatus> MemoryStore<S> {
        fn new(owner_id: Uuid, cards: &[(Uuid, S)]) -> Self {
            Self {
                owner_id,
                cards: Mutex::new(cards.iter().copied().collect()),
                writes: Mutex::new(Vec::new()),
            }
        }

        fn status(&self, card_id: Uuid) -> Option<S> {
            self.cards.lock().unwrap().get(&card_id).copied()
        }

        fn writes(&self) -> Vec<(Uuid, S)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl<S: PipelineStatus> StatusStore<S> for MemoryStore<S> {
        async fn current_status(&self, owner_id: Uuid, card_id: Uuid) -> Result<Option<S>, AppError> {
            if owner_id != self.owner_id {
                return Ok(None);
            }
            Ok(self.status(card_id))
        }

        async fn set_status(&self, _owner_id: Uuid, card_id: Uuid, status: S) -> Result<(), AppError> {
            self.cards.lock().unwrap().insert(card_id, status);
            self.writes.lock().unwrap().push((card_id, status));
            Ok(())
        }
    }

    #[tokio::test]
    async fn move_writes_exactly_one_status_for_the_moved_card() {
        let owner = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new(
            owner,
            &[(a, LeadStatus::Novo), (b, LeadStatus::Novo), (c, LeadStatus::Agendado)],
        );

        let outcome = move_to_column(&store, owner, a, 3).await.unwrap();

        assert_eq!(outcome, MoveOutcome::Moved { from: LeadStatus::Novo, to: LeadStatus::Fechado });
        assert_eq!(store.writes(), vec![(a, LeadStatus::Fechado)]);
        assert_eq!(store.status(b), Some(LeadStatus::Novo));
        assert_eq!(store.status(c), Some(LeadStatus::Agendado));
    }

    #[tokio::test]
    async fn move_to_same_column_writes_nothing() {
        let owner = Uuid::new_v4();
        let card = Uuid::new_v4();
        let store = MemoryStore::new(owner, &[(card, OutboundStatus::Respondeu)]);

        let outcome = move_to_column(&store, owner, card, 2).await.unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged(OutboundStatus::Respondeu));
        assert!(store.writes().is_empty());
        assert!(!outcome.into_result(card).changed);
    }

    #[tokio::test]
    async fn column_out_of_range_is_rejected() {
        let owner = Uuid::new_v4();
        let card = Uuid::new_v4();
        let store = MemoryStore::new(owner, &[(card, LeadStatus::Novo)]);

        let result = move_to_column::<LeadStatus, _>(&store, owner, card, 5).await;

        assert!(matches!(result, Err(AppError::InvalidColumn(5))));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn card_of_another_owner_is_not_found() {
        let card = Uuid::new_v4();
        let store = MemoryStore::new(Uuid::new_v4(), &[(card, LeadStatus::Novo)]);

        let result = move_card(&store, Uuid::new_v4(), card, LeadStatus::Agendado).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn board_has_every_column_in_order() {
        let cards = vec![("a", LeadStatus::Fechado), ("b", LeadStatus::Novo), ("c", LeadStatus::Fechado)];

        let columns = group_into_columns(cards, |card| card.1);

        assert_eq!(columns.len(), LeadStatus::COLUMNS.len());
        assert_eq!(columns[0].1, LeadStatus::Novo);
        assert_eq!(columns[0].2.len(), 1);
        assert!(columns[1].2.is_empty());
        assert_eq!(columns[3].2.iter().map(|c| c.0).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(columns[4].0, 4);
    }
}
