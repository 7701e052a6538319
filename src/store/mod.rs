//! SQLite-backed persistence for readings and persons.
//!
//! The schema is two flat tables keyed by reading date and person name.
//! Dates are stored as ISO-8601 text. The computational core never touches
//! SQLite directly; it consumes the [`Repository`] trait, implemented here
//! by [`MeterStore`] and by the test-friendly [`MemoryStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::info;

use crate::error::{MeterError, Result};
use crate::model::{Person, Reading, ATTRIBUTE_COUNT};

/// Read-only data access as consumed by the invoice orchestrator.
pub trait Repository {
    /// Readings with `lo ≤ date ≤ hi` and persons whose occupancy could
    /// overlap the range (`move_in ≤ hi OR move_out ≥ lo`).
    fn data_between(&self, lo: NaiveDate, hi: NaiveDate) -> Result<(Vec<Reading>, Vec<Person>)>;
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS readings (
        date        TEXT PRIMARY KEY,
        electricity REAL,
        gas         REAL,
        water       REAL
    );
    CREATE TABLE IF NOT EXISTS persons (
        nameID   TEXT PRIMARY KEY,
        move_in  TEXT,
        move_out TEXT
    );
";

/// SQLite store for meter readings and occupancy records.
#[derive(Debug)]
pub struct MeterStore {
    conn: Connection,
}

impl MeterStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| MeterError::store(format!("failed to open database {}", path.display()), e))?;
        Self::with_connection(conn)
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| MeterError::store("failed to open in-memory database", e))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| MeterError::store("failed to create schema", e))?;
        Ok(Self { conn })
    }

    /// Insert or replace the reading for its date.
    pub fn add_reading(&self, reading: &Reading) -> Result<()> {
        debug_assert_eq!(reading.attributes.len(), ATTRIBUTE_COUNT);

        self.conn
            .execute(
                "INSERT OR REPLACE INTO readings (date, electricity, gas, water)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    reading.date.to_string(),
                    reading.attributes[0],
                    reading.attributes[1],
                    reading.attributes[2],
                ],
            )
            .map_err(|e| MeterError::store(format!("failed to store reading {}", reading.date), e))?;

        info!(date = %reading.date, "stored reading");
        Ok(())
    }

    /// Delete the reading at `date`. Missing dates are not an error.
    pub fn remove_reading(&self, date: NaiveDate) -> Result<usize> {
        self.remove_readings_between(date, date)
    }

    /// Delete all readings with `lo ≤ date ≤ hi`; returns the deleted count.
    pub fn remove_readings_between(&self, lo: NaiveDate, hi: NaiveDate) -> Result<usize> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM readings WHERE date BETWEEN ?1 AND ?2",
                params![lo.to_string(), hi.to_string()],
            )
            .map_err(|e| MeterError::store("failed to delete readings", e))?;

        info!(%lo, %hi, removed, "removed readings");
        Ok(removed)
    }

    /// Insert or replace the person record keyed by name.
    pub fn add_person(&self, person: &Person) -> Result<()> {
        person.validate()?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO persons (nameID, move_in, move_out)
                 VALUES (?1, ?2, ?3)",
                params![
                    person.name,
                    person.move_in.map(|d| d.to_string()),
                    person.move_out.map(|d| d.to_string()),
                ],
            )
            .map_err(|e| MeterError::store(format!("failed to store person '{}'", person.name), e))?;

        info!(name = %person.name, "stored person");
        Ok(())
    }

    /// Delete the person with the given name; returns the deleted count.
    pub fn remove_person(&self, name: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM persons WHERE nameID = ?1", params![name])
            .map_err(|e| MeterError::store(format!("failed to delete person '{name}'"), e))?;

        info!(name, removed, "removed person");
        Ok(removed)
    }

    /// All readings, date ascending.
    pub fn all_readings(&self) -> Result<Vec<Reading>> {
        self.query_readings("SELECT date, electricity, gas, water FROM readings ORDER BY date", [])
    }

    /// Readings with `lo ≤ date ≤ hi`, date ascending.
    pub fn readings_between(&self, lo: NaiveDate, hi: NaiveDate) -> Result<Vec<Reading>> {
        self.query_readings(
            "SELECT date, electricity, gas, water FROM readings
             WHERE date BETWEEN ?1 AND ?2 ORDER BY date",
            params![lo.to_string(), hi.to_string()],
        )
    }

    /// All persons, move-in ascending.
    pub fn all_persons(&self) -> Result<Vec<Person>> {
        self.query_persons("SELECT nameID, move_in, move_out FROM persons ORDER BY move_in", [])
    }

    fn query_readings<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Reading>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| MeterError::store("failed to prepare readings query", e))?;

        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    [
                        row.get::<_, Option<f64>>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                    ],
                ))
            })
            .map_err(|e| MeterError::store("failed to query readings", e))?;

        let mut readings = Vec::new();
        for row in rows {
            let (date, attributes) =
                row.map_err(|e| MeterError::store("failed to read readings row", e))?;
            readings.push(Reading::new(parse_date(&date)?, attributes));
        }
        Ok(readings)
    }

    fn query_persons<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| MeterError::store("failed to prepare persons query", e))?;

        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(|e| MeterError::store("failed to query persons", e))?;

        let mut persons = Vec::new();
        for row in rows {
            let (name, move_in, move_out) =
                row.map_err(|e| MeterError::store("failed to read persons row", e))?;
            persons.push(Person::new(
                name,
                move_in.as_deref().map(parse_date).transpose()?,
                move_out.as_deref().map(parse_date).transpose()?,
            ));
        }
        Ok(persons)
    }
}

impl Repository for MeterStore {
    fn data_between(&self, lo: NaiveDate, hi: NaiveDate) -> Result<(Vec<Reading>, Vec<Person>)> {
        let readings = self.readings_between(lo, hi)?;
        let persons = self.query_persons(
            "SELECT nameID, move_in, move_out FROM persons
             WHERE move_in <= ?1 OR move_out >= ?2 ORDER BY move_in",
            params![hi.to_string(), lo.to_string()],
        )?;
        Ok((readings, persons))
    }
}

/// In-memory repository with the same query semantics as [`MeterStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored readings.
    pub readings: Vec<Reading>,
    /// Stored persons.
    pub persons: Vec<Person>,
}

impl MemoryStore {
    /// Create a store over the given collections.
    #[must_use]
    pub fn new(readings: Vec<Reading>, persons: Vec<Person>) -> Self {
        Self { readings, persons }
    }
}

impl Repository for MemoryStore {
    fn data_between(&self, lo: NaiveDate, hi: NaiveDate) -> Result<(Vec<Reading>, Vec<Person>)> {
        let readings = self
            .readings
            .iter()
            .filter(|r| lo <= r.date && r.date <= hi)
            .cloned()
            .collect();
        let persons = self
            .persons
            .iter()
            .filter(|p| {
                p.move_in.is_some_and(|d| d <= hi) || p.move_out.is_some_and(|d| d >= lo)
            })
            .cloned()
            .collect();
        Ok((readings, persons))
    }
}

/// Parse an ISO-8601 date stored in the database.
fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| MeterError::InvalidDate {
        value: value.to_string(),
        source,
    })
}
