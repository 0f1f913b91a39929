// src/services/cycle_service.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CycleRepository,
    models::cycle::{CreateCyclePayload, Cycle, CycleCheckin, CycleProgress, HabitProgress, ToggleCheckinPayload, ToggleCheckinResponse},
};

#[derive(Clone)]
pub struct CycleService {
    cycle_repo: CycleRepository,
}

impl CycleService {
    pub fn new(cycle_repo: CycleRepository) -> Self {
        Self { cycle_repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Cycle>, AppError> {
        self.cycle_repo.list(user_id).await
    }

    pub async fn get_owned(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Cycle, AppError> {
        let cycle = self
            .cycle_repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound("cycle"))?;

        if cycle.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(cycle)
    }

    pub async fn create(&self, user_id: Uuid, payload: &CreateCyclePayload) -> Result<Cycle, AppError> {
        ensure_date_range(payload.start_date, payload.end_date)?;
        let habits = clean_habits(&payload.habits);

        self.cycle_repo
            .insert(user_id, payload.name.trim(), payload.start_date, payload.end_date, &habits)
            .await
    }

    pub async fn delete(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get_owned(pool, user_id, id).await?;
        self.cycle_repo.delete(pool, id).await?;
        Ok(())
    }

    pub async fn checkins(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Vec<CycleCheckin>, AppError> {
        self.get_owned(pool, user_id, id).await?;
        self.cycle_repo.list_checkins(pool, id).await
    }

    /// Marca/desmarca um hábito num dia do ciclo.
    pub async fn toggle(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &ToggleCheckinPayload,
    ) -> Result<ToggleCheckinResponse, AppError> {
        let cycle = self.get_owned(pool, user_id, id).await?;
        let habit = validate_checkin(&cycle, &payload.habit, payload.day)?;

        let mut tx = pool.begin().await?;
        let done = self.cycle_repo.toggle_checkin(&mut tx, id, &habit, payload.day).await?;
        tx.commit().await?;

        Ok(ToggleCheckinResponse { habit, day: payload.day, done })
    }

    pub async fn progress(&self, pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<CycleProgress, AppError> {
        let cycle = self.get_owned(pool, user_id, id).await?;
        let checkins = self.cycle_repo.list_checkins(pool, id).await?;
        Ok(compute_progress(&cycle, &checkins))
    }
}

pub fn ensure_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::InvalidDateRange);
    }
    Ok(())
}

// Sem vazios e sem repetidos, na ordem informada
fn clean_habits(habits: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(habits.len());
    for habit in habits.iter().map(|h| h.trim()).filter(|h| !h.is_empty()) {
        if !cleaned.iter().any(|c| c == habit) {
            cleaned.push(habit.to_string());
        }
    }
    cleaned
}

fn validate_checkin(cycle: &Cycle, habit: &str, day: NaiveDate) -> Result<String, AppError> {
    let mut errors = HashMap::new();

    let habit = habit.trim();
    if !cycle.habits.iter().any(|h| h == habit) {
        errors.insert("habit".to_string(), "unknown_habit".to_string());
    }
    if day < cycle.start_date || day > cycle.end_date {
        errors.insert("day".to_string(), "day_out_of_cycle".to_string());
    }

    if errors.is_empty() { Ok(habit.to_string()) } else { Err(AppError::FieldErrors(errors)) }
}

fn percent(done: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (done as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Dias do ciclo contam início e fim.
pub fn compute_progress(cycle: &Cycle, checkins: &[CycleCheckin]) -> CycleProgress {
    let total_days = (cycle.end_date - cycle.start_date).num_days() + 1;

    let habits: Vec<HabitProgress> = cycle
        .habits
        .iter()
        .map(|habit| {
            let done_days = checkins
                .iter()
                .filter(|c| &c.habit == habit && c.day >= cycle.start_date && c.day <= cycle.end_date)
                .count() as i64;
            HabitProgress {
                habit: habit.clone(),
                done_days,
                total_days,
                percent: percent(done_days, total_days),
            }
        })
        .collect();

    let done_total: i64 = habits.iter().map(|h| h.done_days).sum();
    let overall_percent = percent(done_total, total_days * habits.len() as i64);

    CycleProgress {
        cycle_id: cycle.id,
        total_days,
        habits,
        overall_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle() -> Cycle {
        Cycle {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Março saudável".to_string(),
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 10),
            habits: vec!["Água".to_string(), "Caminhada".to_string()],
            created_at: Utc::now(),
        }
    }

    fn checkin(cycle: &Cycle, habit: &str, day: NaiveDate) -> CycleCheckin {
        CycleCheckin { cycle_id: cycle.id, habit: habit.to_string(), day }
    }

    #[test]
    fn end_must_be_after_start() {
        assert!(ensure_date_range(date(2025, 3, 1), date(2025, 3, 2)).is_ok());
        assert!(matches!(ensure_date_range(date(2025, 3, 1), date(2025, 3, 1)), Err(AppError::InvalidDateRange)));
        assert!(matches!(ensure_date_range(date(2025, 3, 2), date(2025, 3, 1)), Err(AppError::InvalidDateRange)));
    }

    #[test]
    fn habits_are_trimmed_and_deduplicated() {
        let habits = vec![" Água ".to_string(), "".to_string(), "Água".to_string(), "Leitura".to_string()];
        assert_eq!(clean_habits(&habits), vec!["Água", "Leitura"]);
    }

    #[test]
    fn checkin_must_match_a_habit_and_a_day_of_the_cycle() {
        let cycle = cycle();
        assert_eq!(validate_checkin(&cycle, " Água ", date(2025, 3, 5)).unwrap(), "Água");

        let Err(AppError::FieldErrors(errors)) = validate_checkin(&cycle, "Yoga", date(2025, 4, 1)) else {
            panic!("esperava erros de campo");
        };
        assert_eq!(errors.get("habit").map(String::as_str), Some("unknown_habit"));
        assert_eq!(errors.get("day").map(String::as_str), Some("day_out_of_cycle"));
    }

    #[test]
    fn progress_counts_days_per_habit() {
        let cycle = cycle();
        let checkins = vec![
            checkin(&cycle, "Água", date(2025, 3, 1)),
            checkin(&cycle, "Água", date(2025, 3, 2)),
            checkin(&cycle, "Água", date(2025, 3, 10)),
            checkin(&cycle, "Caminhada", date(2025, 3, 3)),
            // Fora do ciclo não conta
            checkin(&cycle, "Caminhada", date(2025, 3, 11)),
        ];

        let progress = compute_progress(&cycle, &checkins);

        assert_eq!(progress.total_days, 10);
        assert_eq!(progress.habits[0].done_days, 3);
        assert_eq!(progress.habits[0].percent, 30.0);
        assert_eq!(progress.habits[1].done_days, 1);
        assert_eq!(progress.overall_percent, 20.0);
    }

    #[test]
    fn cycle_without_habits_has_zero_progress() {
        let mut cycle = cycle();
        cycle.habits.clear();

        let progress = compute_progress(&cycle, &[]);

        assert!(progress.habits.is_empty());
        assert_eq!(progress.overall_percent, 0.0);
    }
}
