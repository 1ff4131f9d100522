//! SQLite persistence layer for sweep results.
//!
//! RULE: Only store.rs talks to the database.
//! The engine hands finished runs to the store; nothing else executes SQL.

use crate::{
    combination::ParameterCombination,
    error::SimResult,
    rng::SeedMode,
    simulation::{MonthOutcome, RunOutcome},
    types::{CombinationId, Seed},
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open (or create) the result database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only applies to real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../migrations/001_results.sql"))?;
        Ok(())
    }

    // ── Sweep run ──────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: Seed,
        seed_mode: SeedMode,
        iterations: u32,
        version: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO sweep_run (run_id, seed, seed_mode, iterations, version, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                seed as i64,
                seed_mode.as_str(),
                iterations,
                version,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Combinations ───────────────────────────────────────────

    /// Persist a completed run: the combination row and every month.
    pub fn record_completed(
        &self,
        run_id: &str,
        id: CombinationId,
        combination: &ParameterCombination,
        seed: Seed,
        outcome: &RunOutcome,
    ) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_combination(&tx, run_id, id, combination, seed, "completed", Some(outcome.final_amount), None)?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO month_outcome (run_id, combination_id, iteration, profit, clients, successes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (iteration, month) in outcome.series.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    id.0 as i64,
                    iteration as i64,
                    month.profit,
                    month.clients,
                    month.successes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Persist a combination whose run was rejected.
    pub fn record_failed(
        &self,
        run_id: &str,
        id: CombinationId,
        combination: &ParameterCombination,
        seed: Seed,
        reason: &str,
    ) -> SimResult<()> {
        insert_combination(&self.conn, run_id, id, combination, seed, "failed", None, Some(reason))
    }

    pub fn combination_count(&self, run_id: &str) -> SimResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM combination WHERE run_id = ?1",
            params![run_id],
            |r| r.get(0),
        )?)
    }

    pub fn failed_count(&self, run_id: &str) -> SimResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM combination WHERE run_id = ?1 AND status = 'failed'",
            params![run_id],
            |r| r.get(0),
        )?)
    }

    pub fn load_combination(
        &self,
        run_id: &str,
        id: CombinationId,
    ) -> SimResult<Option<ParameterCombination>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT combination_json FROM combination WHERE run_id = ?1 AND combination_id = ?2",
                params![run_id, id.0 as i64],
                |r| r.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// The stored series of a completed run, None if the run failed or
    /// was never recorded.
    pub fn load_outcome(&self, run_id: &str, id: CombinationId) -> SimResult<Option<RunOutcome>> {
        let final_amount: Option<Option<f64>> = self
            .conn
            .query_row(
                "SELECT final_amount FROM combination WHERE run_id = ?1 AND combination_id = ?2",
                params![run_id, id.0 as i64],
                |r| r.get(0),
            )
            .optional()?;
        let Some(Some(final_amount)) = final_amount else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT profit, clients, successes FROM month_outcome
             WHERE run_id = ?1 AND combination_id = ?2
             ORDER BY iteration ASC",
        )?;
        let series = stmt
            .query_map(params![run_id, id.0 as i64], |r| {
                Ok(MonthOutcome {
                    profit: r.get(0)?,
                    clients: r.get(1)?,
                    successes: r.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(RunOutcome { final_amount, series }))
    }
}

#[allow(clippy::too_many_arguments)]
fn insert_combination(
    conn: &Connection,
    run_id: &str,
    id: CombinationId,
    c: &ParameterCombination,
    seed: Seed,
    status: &str,
    final_amount: Option<f64>,
    failure_reason: Option<&str>,
) -> SimResult<()> {
    conn.execute(
        "INSERT INTO combination (
             run_id, combination_id, employees, salary, average_clients,
             mean_order_cost, order_std_dev, alpha, beta, seed,
             status, final_amount, failure_reason, combination_json
         ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
        params![
            run_id,
            id.0 as i64,
            c.employees,
            c.salary,
            c.average_clients,
            c.mean_order_cost,
            c.order_std_dev,
            c.alpha,
            c.beta,
            seed as i64,
            status,
            final_amount,
            failure_reason,
            serde_json::to_string(c)?,
        ],
    )?;
    Ok(())
}
