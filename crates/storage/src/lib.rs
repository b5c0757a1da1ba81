pub mod db;

pub use db::{
    create_db, delete_budget_limit, delete_transaction, insert_statement_batch,
    insert_transaction, list_budget_limits, list_transactions, upsert_budget_limit,
    BudgetLimit, DbPool, StoredTransaction,
};
