// src/services/store.rs

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{EosbRecord, EosbStatus, PayrollRecord, PayrollStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{collections::HashMap, time::Duration};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// The external entity store that calculated records are written to.
///
/// EOSB records are unique per (employee, termination date) and payroll records
/// per (employee, pay period); a second insert for the same key fails with
/// `EosbAlreadyRecorded` / `PayrollAlreadyRecorded`.
///
/// Status updates are compare-and-set: they only apply while the stored status
/// still equals `from`, and return `None` otherwise.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;

    async fn insert_eosb(&self, record: EosbRecord) -> AppResult<EosbRecord>;
    async fn get_eosb(&self, id: Uuid) -> AppResult<Option<EosbRecord>>;
    async fn list_eosb(&self, employee_id: Option<Uuid>) -> AppResult<Vec<EosbRecord>>;
    async fn set_eosb_status(
        &self,
        id: Uuid,
        from: EosbStatus,
        to: EosbStatus,
    ) -> AppResult<Option<EosbRecord>>;

    async fn insert_payroll(&self, record: PayrollRecord) -> AppResult<PayrollRecord>;
    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>>;
    async fn list_payroll(
        &self,
        employee_id: Option<Uuid>,
        pay_period: Option<String>,
    ) -> AppResult<Vec<PayrollRecord>>;
    async fn set_payroll_status(
        &self,
        id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> AppResult<Option<PayrollRecord>>;
}

// ─── Postgres ─────────────────────────────────────────────────────────────────

pub struct PgStore {
    db: PgPool,
}

fn duplicate_or_database(err: sqlx::Error, duplicate: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate,
        _ => AppError::Database(err),
    }
}

impl PgStore {
    pub async fn connect(database_url: &str, config: &Config) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;

        info!("Database connected and migrations applied ✓");
        Ok(Self { db })
    }
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.db).await?;
        Ok(())
    }

    async fn insert_eosb(&self, record: EosbRecord) -> AppResult<EosbRecord> {
        sqlx::query_as::<_, EosbRecord>(
            r#"INSERT INTO eosb_records (
                id, employee_id, hire_date, termination_date, termination_type,
                years_of_service, months_of_service, days_of_service,
                calculation_base, eosb_amount_0_to_5, eosb_amount_5_to_10, eosb_amount_above_10,
                partial_year_amount, total_eosb_amount, deductions, net_eosb_amount,
                status, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19)
            RETURNING *"#,
        )
        .bind(record.id)
        .bind(record.employee_id)
        .bind(record.hire_date)
        .bind(record.termination_date)
        .bind(record.termination_type)
        .bind(record.years_of_service)
        .bind(record.months_of_service)
        .bind(record.days_of_service)
        .bind(record.calculation_base)
        .bind(record.eosb_amount_0_to_5)
        .bind(record.eosb_amount_5_to_10)
        .bind(record.eosb_amount_above_10)
        .bind(record.partial_year_amount)
        .bind(record.total_eosb_amount)
        .bind(record.deductions)
        .bind(record.net_eosb_amount)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| duplicate_or_database(e, AppError::EosbAlreadyRecorded))
    }

    async fn get_eosb(&self, id: Uuid) -> AppResult<Option<EosbRecord>> {
        let record = sqlx::query_as::<_, EosbRecord>("SELECT * FROM eosb_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(record)
    }

    async fn list_eosb(&self, employee_id: Option<Uuid>) -> AppResult<Vec<EosbRecord>> {
        let records = sqlx::query_as::<_, EosbRecord>(
            r#"SELECT * FROM eosb_records
               WHERE ($1::uuid IS NULL OR employee_id = $1)
               ORDER BY created_at DESC"#,
        )
        .bind(employee_id)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn set_eosb_status(
        &self,
        id: Uuid,
        from: EosbStatus,
        to: EosbStatus,
    ) -> AppResult<Option<EosbRecord>> {
        let record = sqlx::query_as::<_, EosbRecord>(
            r#"UPDATE eosb_records SET status = $1, updated_at = NOW()
               WHERE id = $2 AND status = $3
               RETURNING *"#,
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }

    async fn insert_payroll(&self, record: PayrollRecord) -> AppResult<PayrollRecord> {
        sqlx::query_as::<_, PayrollRecord>(
            r#"INSERT INTO payroll_records (
                id, employee_id, pay_period,
                basic_salary, housing_allowance, transport_allowance, other_allowances,
                overtime_hours, overtime_pay, bonus, gross_salary,
                gosi_employee, gosi_employer, loan_deduction, absence_deduction,
                other_deductions, total_deductions, net_salary,
                status, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21)
            RETURNING *"#,
        )
        .bind(record.id)
        .bind(record.employee_id)
        .bind(&record.pay_period)
        .bind(record.basic_salary)
        .bind(record.housing_allowance)
        .bind(record.transport_allowance)
        .bind(record.other_allowances)
        .bind(record.overtime_hours)
        .bind(record.overtime_pay)
        .bind(record.bonus)
        .bind(record.gross_salary)
        .bind(record.gosi_employee)
        .bind(record.gosi_employer)
        .bind(record.loan_deduction)
        .bind(record.absence_deduction)
        .bind(record.other_deductions)
        .bind(record.total_deductions)
        .bind(record.net_salary)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| duplicate_or_database(e, AppError::PayrollAlreadyRecorded))
    }

    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>> {
        let record =
            sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(record)
    }

    async fn list_payroll(
        &self,
        employee_id: Option<Uuid>,
        pay_period: Option<String>,
    ) -> AppResult<Vec<PayrollRecord>> {
        let records = sqlx::query_as::<_, PayrollRecord>(
            r#"SELECT * FROM payroll_records
               WHERE ($1::uuid IS NULL OR employee_id = $1)
                 AND ($2::text IS NULL OR pay_period = $2)
               ORDER BY created_at DESC"#,
        )
        .bind(employee_id)
        .bind(pay_period)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn set_payroll_status(
        &self,
        id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> AppResult<Option<PayrollRecord>> {
        let record = sqlx::query_as::<_, PayrollRecord>(
            r#"UPDATE payroll_records SET status = $1, updated_at = NOW()
               WHERE id = $2 AND status = $3
               RETURNING *"#,
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }
}

// ─── In-memory ────────────────────────────────────────────────────────────────

/// Process-local store used when no DATABASE_URL is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    eosb: RwLock<HashMap<Uuid, EosbRecord>>,
    payroll: RwLock<HashMap<Uuid, PayrollRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(mut records: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    records.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    records
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_eosb(&self, record: EosbRecord) -> AppResult<EosbRecord> {
        let mut records = self.eosb.write().await;
        let duplicate = records.values().any(|r| {
            r.employee_id == record.employee_id && r.termination_date == record.termination_date
        });
        if duplicate {
            return Err(AppError::EosbAlreadyRecorded);
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_eosb(&self, id: Uuid) -> AppResult<Option<EosbRecord>> {
        Ok(self.eosb.read().await.get(&id).cloned())
    }

    async fn list_eosb(&self, employee_id: Option<Uuid>) -> AppResult<Vec<EosbRecord>> {
        let records: Vec<EosbRecord> = self
            .eosb
            .read()
            .await
            .values()
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .cloned()
            .collect();
        Ok(newest_first(records, |r: &EosbRecord| r.created_at))
    }

    async fn set_eosb_status(
        &self,
        id: Uuid,
        from: EosbStatus,
        to: EosbStatus,
    ) -> AppResult<Option<EosbRecord>> {
        let mut records = self.eosb.write().await;
        Ok(records
            .get_mut(&id)
            .filter(|r| r.status == from)
            .map(|r| {
                r.status = to;
                r.updated_at = Utc::now();
                r.clone()
            }))
    }

    async fn insert_payroll(&self, record: PayrollRecord) -> AppResult<PayrollRecord> {
        let mut records = self.payroll.write().await;
        let duplicate = records
            .values()
            .any(|r| r.employee_id == record.employee_id && r.pay_period == record.pay_period);
        if duplicate {
            return Err(AppError::PayrollAlreadyRecorded);
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>> {
        Ok(self.payroll.read().await.get(&id).cloned())
    }

    async fn list_payroll(
        &self,
        employee_id: Option<Uuid>,
        pay_period: Option<String>,
    ) -> AppResult<Vec<PayrollRecord>> {
        let records: Vec<PayrollRecord> = self
            .payroll
            .read()
            .await
            .values()
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| pay_period.as_deref().is_none_or(|p| r.pay_period == p))
            .cloned()
            .collect();
        Ok(newest_first(records, |r: &PayrollRecord| r.created_at))
    }

    async fn set_payroll_status(
        &self,
        id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> AppResult<Option<PayrollRecord>> {
        let mut records = self.payroll.write().await;
        Ok(records
            .get_mut(&id)
            .filter(|r| r.status == from)
            .map(|r| {
                r.status = to;
                r.updated_at = Utc::now();
                r.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{EosbInput, Nationality, PayrollInput, TerminationType, default_working_days},
        services::{eosb::EosbService, payroll::PayrollService},
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn payroll_record(employee_id: Uuid, pay_period: &str) -> PayrollRecord {
        let calc = PayrollService::calculate(&PayrollInput {
            pay_period: pay_period.to_string(),
            basic_salary: dec!(8000),
            housing_allowance: dec!(2000),
            transport_allowance: Decimal::ZERO,
            other_allowances: Decimal::ZERO,
            nationality: Nationality::Saudi,
            gosi_applicable: true,
            overtime_hours: Decimal::ZERO,
            working_days_in_month: default_working_days(),
            bonus: Decimal::ZERO,
            loan_deduction: Decimal::ZERO,
            absent_days: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
        })
        .unwrap();
        PayrollService::new_record(employee_id, calc)
    }

    fn eosb_record(employee_id: Uuid) -> EosbRecord {
        let input = EosbInput {
            hire_date: NaiveDate::from_ymd_opt(2018, 1, 1),
            termination_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            termination_type: TerminationType::ContractEnd,
            last_basic_salary: dec!(9000),
            housing_allowance: Decimal::ZERO,
            include_housing_allowance: false,
            deductions: Decimal::ZERO,
        };
        let result = EosbService::calculate(&input).unwrap();
        EosbService::new_record(employee_id, &input, &result).unwrap()
    }

    #[tokio::test]
    async fn payroll_insert_is_idempotent_per_period() {
        let store = MemoryStore::new();
        let employee_id = Uuid::new_v4();

        store
            .insert_payroll(payroll_record(employee_id, "2026-09"))
            .await
            .unwrap();
        let err = store
            .insert_payroll(payroll_record(employee_id, "2026-09"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayrollAlreadyRecorded));

        store
            .insert_payroll(payroll_record(employee_id, "2026-10"))
            .await
            .unwrap();
        store
            .insert_payroll(payroll_record(Uuid::new_v4(), "2026-09"))
            .await
            .unwrap();

        assert_eq!(store.list_payroll(None, None).await.unwrap().len(), 3);
        assert_eq!(
            store
                .list_payroll(Some(employee_id), None)
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            store
                .list_payroll(None, Some("2026-09".to_string()))
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn eosb_insert_is_idempotent_per_termination_date() {
        let store = MemoryStore::new();
        let employee_id = Uuid::new_v4();

        let saved = store.insert_eosb(eosb_record(employee_id)).await.unwrap();
        assert_eq!(
            store.get_eosb(saved.id).await.unwrap().as_ref(),
            Some(&saved)
        );
        assert!(matches!(
            store.insert_eosb(eosb_record(employee_id)).await,
            Err(AppError::EosbAlreadyRecorded)
        ));
    }

    #[tokio::test]
    async fn status_update_is_compare_and_set() {
        let store = MemoryStore::new();
        let record = store
            .insert_payroll(payroll_record(Uuid::new_v4(), "2026-09"))
            .await
            .unwrap();

        let approved = store
            .set_payroll_status(record.id, PayrollStatus::Calculated, PayrollStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approved.status, PayrollStatus::Approved);

        // Stale expectation loses
        let stale = store
            .set_payroll_status(record.id, PayrollStatus::Calculated, PayrollStatus::Approved)
            .await
            .unwrap();
        assert!(stale.is_none());

        let missing = store
            .set_payroll_status(Uuid::new_v4(), PayrollStatus::Approved, PayrollStatus::Processed)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
