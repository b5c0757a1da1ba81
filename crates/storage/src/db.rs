use bolso_core::{Money, TransactionKind, TransactionRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub type DbPool = Pool<Sqlite>;

/// The durable transaction entity. Identity, the "not reconciled" default
/// and insertion ordering all live here, not in the import pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub category: String,
    pub reconciled: bool,
    pub created_at: String,
}

/// Monthly spending ceiling for one category. The category string is the
/// same namespace the classifier produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    pub monthly_limit: Money,
}

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            kind TEXT NOT NULL,
            category TEXT NOT NULL,
            reconciled INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS budget_limits (
            category TEXT PRIMARY KEY,
            monthly_limit_cents INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn row_to_transaction(r: (i64, String, String, i64, String, String, i64, String)) -> StoredTransaction {
    StoredTransaction {
        id: r.0,
        date: NaiveDate::parse_from_str(&r.1, "%Y-%m-%d").unwrap_or_default(),
        description: r.2,
        amount: Money::from_cents(r.3),
        kind: r.4.parse().unwrap_or(TransactionKind::Expense),
        category: r.5,
        reconciled: r.6 != 0,
        created_at: r.7,
    }
}

pub async fn insert_transaction(
    pool: &DbPool,
    record: &TransactionRecord,
) -> Result<StoredTransaction, sqlx::Error> {
    let row = sqlx::query(
        "INSERT INTO transactions (date, description, amount_cents, kind, category) \
         VALUES (?, ?, ?, ?, ?) RETURNING id, created_at",
    )
    .bind(record.date.to_string())
    .bind(&record.description)
    .bind(record.amount.to_cents())
    .bind(record.kind.as_str())
    .bind(&record.category)
    .fetch_one(pool)
    .await?;

    Ok(StoredTransaction {
        id: row.get("id"),
        date: record.date,
        description: record.description.clone(),
        amount: record.amount,
        kind: record.kind,
        category: record.category.clone(),
        reconciled: false,
        created_at: row.get("created_at"),
    })
}

/// Inserts a whole statement batch inside one database transaction; a
/// storage failure discards the batch rather than committing a prefix.
pub async fn insert_statement_batch(
    pool: &DbPool,
    records: &[TransactionRecord],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    for record in records {
        sqlx::query(
            "INSERT INTO transactions (date, description, amount_cents, kind, category) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.date.to_string())
        .bind(&record.description)
        .bind(record.amount.to_cents())
        .bind(record.kind.as_str())
        .bind(&record.category)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(records.len() as u64)
}

pub async fn list_transactions(
    pool: &DbPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<StoredTransaction>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64, String, String, i64, String)>(
        "SELECT id, date, description, amount_cents, kind, category, reconciled, created_at \
         FROM transactions ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_transaction).collect())
}

pub async fn delete_transaction(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn upsert_budget_limit(pool: &DbPool, limit: &BudgetLimit) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO budget_limits (category, monthly_limit_cents) VALUES (?, ?) \
         ON CONFLICT(category) DO UPDATE SET monthly_limit_cents = excluded.monthly_limit_cents",
    )
    .bind(&limit.category)
    .bind(limit.monthly_limit.to_cents())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_budget_limits(pool: &DbPool) -> Result<Vec<BudgetLimit>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, monthly_limit_cents FROM budget_limits ORDER BY category",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(category, cents)| BudgetLimit {
            category,
            monthly_limit: Money::from_cents(cents),
        })
        .collect())
}

pub async fn delete_budget_limit(pool: &DbPool, category: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM budget_limits WHERE category = ?")
        .bind(category)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_db(&dir.path().join("test.db")).await.unwrap();
        (dir, pool)
    }

    fn record(description: &str, cents: i64, kind: TransactionKind, category: &str) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2026, 2, 24).unwrap(),
            description: description.to_string(),
            amount: Money::from_cents(cents),
            kind,
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let (_dir, pool) = test_db().await;

        let stored = insert_transaction(
            &pool,
            &record("SUPERMERCADO", 15230, TransactionKind::Expense, "Alimentação"),
        )
        .await
        .unwrap();
        assert_eq!(stored.id, 1);
        assert!(!stored.reconciled);

        let all = list_transactions(&pool, 0, 100).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "SUPERMERCADO");
        assert_eq!(all[0].amount.to_cents(), 15230);
        assert_eq!(all[0].kind, TransactionKind::Expense);
        assert_eq!(all[0].category, "Alimentação");
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2026, 2, 24).unwrap());
    }

    #[tokio::test]
    async fn list_pagination() {
        let (_dir, pool) = test_db().await;
        for i in 0..5 {
            insert_transaction(
                &pool,
                &record(&format!("TX {i}"), 100, TransactionKind::Expense, "Consumo Diversos"),
            )
            .await
            .unwrap();
        }

        let page = list_transactions(&pool, 2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].description, "TX 2");
        assert_eq!(page[1].description, "TX 3");
    }

    #[tokio::test]
    async fn batch_insert_commits_all() {
        let (_dir, pool) = test_db().await;
        let records = vec![
            record("A", 100, TransactionKind::Expense, "Consumo Diversos"),
            record("B", 200, TransactionKind::Income, "Reembolso"),
        ];
        let inserted = insert_statement_batch(&pool, &records).await.unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(list_transactions(&pool, 0, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let (_dir, pool) = test_db().await;
        let stored = insert_transaction(
            &pool,
            &record("X", 100, TransactionKind::Expense, "Consumo Diversos"),
        )
        .await
        .unwrap();

        assert!(delete_transaction(&pool, stored.id).await.unwrap());
        assert!(!delete_transaction(&pool, stored.id).await.unwrap());
        assert!(!delete_transaction(&pool, 9999).await.unwrap());
    }

    #[tokio::test]
    async fn budget_limit_upsert_replaces() {
        let (_dir, pool) = test_db().await;

        upsert_budget_limit(
            &pool,
            &BudgetLimit {
                category: "Alimentação".to_string(),
                monthly_limit: Money::from_cents(80000),
            },
        )
        .await
        .unwrap();
        upsert_budget_limit(
            &pool,
            &BudgetLimit {
                category: "Alimentação".to_string(),
                monthly_limit: Money::from_cents(90000),
            },
        )
        .await
        .unwrap();

        let limits = list_budget_limits(&pool).await.unwrap();
        assert_eq!(limits.len(), 1);
        assert_eq!(limits[0].monthly_limit.to_cents(), 90000);
    }

    #[tokio::test]
    async fn budget_limit_delete() {
        let (_dir, pool) = test_db().await;
        upsert_budget_limit(
            &pool,
            &BudgetLimit {
                category: "Tabaco".to_string(),
                monthly_limit: Money::from_cents(10000),
            },
        )
        .await
        .unwrap();

        assert!(delete_budget_limit(&pool, "Tabaco").await.unwrap());
        assert!(!delete_budget_limit(&pool, "Tabaco").await.unwrap());
        assert!(list_budget_limits(&pool).await.unwrap().is_empty());
    }
}
