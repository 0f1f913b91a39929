// src/services/dre_service.rs
// Importação de planilhas e o resumo do DRE.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        text::{parse_br_decimal, slugify},
    },
    db::DreRepository,
    models::dre::{
        CategoryTotal, ColumnMapping, DreEntry, DreImportPayload, DreImportReport, DreKind, DrePeriodQuery, DreSummary,
        NewDreEntry, SkippedRow,
    },
};

const DEFAULT_CATEGORY: &str = "Sem categoria";

#[derive(Clone)]
pub struct DreService {
    dre_repo: DreRepository,
}

impl DreService {
    pub fn new(dre_repo: DreRepository) -> Self {
        Self { dre_repo }
    }

    /// Importa as linhas válidas numa transação; as inválidas voltam no relatório.
    pub async fn import(&self, pool: &PgPool, user_id: Uuid, payload: &DreImportPayload) -> Result<DreImportReport, AppError> {
        let mapping = payload.mapping.clone().unwrap_or_else(|| infer_mapping(&payload.headers));

        let missing = missing_columns(&mapping);
        if !missing.is_empty() {
            return Err(AppError::ImportMappingIncomplete(missing));
        }

        let (entries, skipped) = parse_rows(&payload.rows, &mapping);

        let mut tx = pool.begin().await?;
        let imported = self.dre_repo.insert_many(&mut tx, user_id, &entries).await?;
        tx.commit().await?;

        tracing::info!(
            "📊 DRE importado para o usuário {}: {} linhas, {} ignoradas",
            user_id,
            imported,
            skipped.len()
        );

        Ok(DreImportReport { mapping, imported, skipped })
    }

    pub async fn entries(&self, user_id: Uuid, period: &DrePeriodQuery) -> Result<Vec<DreEntry>, AppError> {
        ensure_period(period)?;
        self.dre_repo.list(user_id, period).await
    }

    pub async fn summary(&self, user_id: Uuid, period: &DrePeriodQuery) -> Result<DreSummary, AppError> {
        ensure_period(period)?;
        let totals = self.dre_repo.totals_by_category(user_id, period).await?;
        Ok(summarize(totals))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.dre_repo.delete(user_id, id).await
    }
}

fn ensure_period(period: &DrePeriodQuery) -> Result<(), AppError> {
    match (period.from, period.to) {
        (Some(from), Some(to)) if from > to => Err(AppError::InvalidDateRange),
        _ => Ok(()),
    }
}

/// Deduz as colunas pelo texto do cabeçalho ("Data", "Descrição", "Valor (R$)"...).
pub fn infer_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (index, header) in headers.iter().enumerate() {
        let key = slugify(header);
        let slot = if key.contains("data") || key == "date" {
            &mut mapping.date
        } else if key.contains("descri") || key.contains("historico") {
            &mut mapping.description
        } else if key.contains("categoria") || key == "category" || key.contains("conta") {
            &mut mapping.category
        } else if key.contains("valor") || key.contains("montante") || key == "amount" {
            &mut mapping.amount
        } else if key.contains("tipo") || key.contains("natureza") || key == "type" {
            &mut mapping.kind
        } else {
            continue;
        };

        // A primeira coluna que casar fica
        if slot.is_none() {
            *slot = Some(index);
        }
    }

    mapping
}

pub fn missing_columns(mapping: &ColumnMapping) -> Vec<String> {
    [
        ("date", mapping.date),
        ("description", mapping.description),
        ("amount", mapping.amount),
    ]
    .into_iter()
    .filter(|(_, index)| index.is_none())
    .map(|(name, _)| name.to_string())
    .collect()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

// Coluna de tipo explícita vence; sem ela, valor negativo é despesa.
fn parse_kind(raw: Option<&str>, amount: Decimal) -> DreKind {
    let key = raw.map(slugify).unwrap_or_default();
    if ["receita", "entrada", "revenue", "credito"].iter().any(|w| key.starts_with(w)) {
        DreKind::Revenue
    } else if ["despesa", "saida", "expense", "debito", "custo"].iter().any(|w| key.starts_with(w)) {
        DreKind::Expense
    } else if amount.is_sign_negative() {
        DreKind::Expense
    } else {
        DreKind::Revenue
    }
}

fn cell(row: &[String], index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| row.get(i))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Converte as linhas da planilha. Linhas em branco são ignoradas sem aviso.
pub fn parse_rows(rows: &[Vec<String>], mapping: &ColumnMapping) -> (Vec<NewDreEntry>, Vec<SkippedRow>) {
    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let skip = |reason: &str| SkippedRow { row: i + 1, reason: reason.to_string() };

        let Some(entry_date) = cell(row, mapping.date).and_then(parse_date) else {
            skipped.push(skip("invalid_date"));
            continue;
        };
        let Some(description) = cell(row, mapping.description) else {
            skipped.push(skip("required"));
            continue;
        };
        let Some(amount) = cell(row, mapping.amount).and_then(parse_br_decimal) else {
            skipped.push(skip("invalid_number"));
            continue;
        };

        entries.push(NewDreEntry {
            entry_date,
            description: description.to_string(),
            category: cell(row, mapping.category).unwrap_or(DEFAULT_CATEGORY).to_string(),
            kind: parse_kind(cell(row, mapping.kind), amount),
            // O sinal fica no `kind`
            amount: amount.abs(),
        });
    }

    (entries, skipped)
}

pub fn summarize(by_category: Vec<CategoryTotal>) -> DreSummary {
    let total_of = |kind: DreKind| {
        by_category
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.total)
            .sum::<Decimal>()
    };

    let revenue = total_of(DreKind::Revenue);
    let expenses = total_of(DreKind::Expense);
    let net_result = revenue - expenses;
    let margin_percent = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        (net_result / revenue * Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    DreSummary {
        revenue,
        expenses,
        net_result,
        margin_percent,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn mapping_is_inferred_from_portuguese_headers() {
        let headers = strings(&["Data", "Descrição", "Categoria", "Valor (R$)", "Tipo"]);

        let mapping = infer_mapping(&headers);

        assert_eq!(
            mapping,
            ColumnMapping {
                date: Some(0),
                description: Some(1),
                category: Some(2),
                amount: Some(3),
                kind: Some(4),
            }
        );
        assert!(missing_columns(&mapping).is_empty());
    }

    #[test]
    fn missing_required_columns_are_reported() {
        let mapping = infer_mapping(&strings(&["Histórico", "Observação"]));

        assert_eq!(missing_columns(&mapping), vec!["date", "amount"]);
    }

    #[test]
    fn dates_in_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 15);
        assert_eq!(parse_date("15/03/2025"), expected);
        assert_eq!(parse_date("2025-03-15"), expected);
        assert_eq!(parse_date("15-03-2025"), expected);
        assert_eq!(parse_date("31/02/2025"), None);
    }

    #[test]
    fn rows_are_parsed_and_bad_ones_skipped() {
        let mapping = infer_mapping(&strings(&["Data", "Descrição", "Categoria", "Valor"]));
        let rows = vec![
            strings(&["01/03/2025", "Consulta", "Consultas", "R$ 350,00"]),
            strings(&["02/03/2025", "Aluguel", "Fixas", "-2.500,00"]),
            strings(&["", "", "", ""]),
            strings(&["ontem", "Café", "Copa", "10,00"]),
            strings(&["03/03/2025", "Sem valor", "", "abc"]),
            strings(&["04/03/2025", "Sem categoria", ""]),
        ];

        let (entries, skipped) = parse_rows(&rows, &mapping);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, DreKind::Revenue);
        assert_eq!(entries[0].amount, Decimal::new(35000, 2));
        assert_eq!(entries[1].kind, DreKind::Expense);
        assert_eq!(entries[1].amount, Decimal::new(250000, 2));
        assert_eq!(
            skipped,
            vec![
                SkippedRow { row: 4, reason: "invalid_date".to_string() },
                SkippedRow { row: 5, reason: "invalid_number".to_string() },
                SkippedRow { row: 6, reason: "invalid_number".to_string() },
            ]
        );
    }

    #[test]
    fn kind_column_wins_over_sign() {
        assert_eq!(parse_kind(Some("Despesa"), Decimal::new(100, 0)), DreKind::Expense);
        assert_eq!(parse_kind(Some("Receita"), Decimal::new(-100, 0)), DreKind::Revenue);
        assert_eq!(parse_kind(None, Decimal::new(-1, 0)), DreKind::Expense);
        assert_eq!(parse_kind(Some("???"), Decimal::new(1, 0)), DreKind::Revenue);
    }

    #[test]
    fn missing_category_gets_a_default() {
        let mapping = infer_mapping(&strings(&["Data", "Descrição", "Categoria", "Valor"]));
        let rows = vec![strings(&["01/03/2025", "Consulta", " ", "100"])];

        let (entries, _) = parse_rows(&rows, &mapping);

        assert_eq!(entries[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn summary_computes_net_result_and_margin() {
        let totals = vec![
            CategoryTotal { category: "Consultas".into(), kind: DreKind::Revenue, total: Decimal::new(1000000, 2) },
            CategoryTotal { category: "Procedimentos".into(), kind: DreKind::Revenue, total: Decimal::new(500000, 2) },
            CategoryTotal { category: "Aluguel".into(), kind: DreKind::Expense, total: Decimal::new(400000, 2) },
        ];

        let summary = summarize(totals);

        assert_eq!(summary.revenue, Decimal::new(1500000, 2));
        assert_eq!(summary.expenses, Decimal::new(400000, 2));
        assert_eq!(summary.net_result, Decimal::new(1100000, 2));
        assert_eq!(summary.margin_percent, Decimal::new(7333, 2));
    }

    #[test]
    fn summary_without_revenue_has_zero_margin() {
        let totals = vec![CategoryTotal { category: "Aluguel".into(), kind: DreKind::Expense, total: Decimal::new(100, 0) }];

        let summary = summarize(totals);

        assert_eq!(summary.net_result, Decimal::new(-100, 0));
        assert_eq!(summary.margin_percent, Decimal::ZERO);
    }

    #[test]
    fn inverted_period_is_rejected() {
        let period = DrePeriodQuery {
            from: NaiveDate::from_ymd_opt(2025, 4, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 1),
        };
        assert!(matches!(ensure_period(&period), Err(AppError::InvalidDateRange)));
    }
}
