//! SQLite-backed ticket store implementation.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, OptionalExtension, Params, Row, Transaction};
use tracing::{debug, info};

use super::{
    normalize, CreateTicketRequest, Priority, Ticket, TicketChanges, TicketConfig, TicketError,
    TicketStatus, TicketStore, TicketUpdate, UnknownValue, UpdatedTicket, Vocabulary,
};
use crate::db::Database;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id TEXT PRIMARY KEY NOT NULL,
        user TEXT NOT NULL,
        subject TEXT NOT NULL,
        description TEXT NOT NULL,
        priority TEXT NOT NULL DEFAULT 'medium'
            CHECK (priority IN ('low', 'medium', 'high', 'urgent')),
        status TEXT NOT NULL DEFAULT 'open'
            CHECK (status IN ('open', 'in_progress', 'resolved', 'closed')),
        assigned_to TEXT,
        category TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        closed_at TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_tickets_user_created ON tickets(user, created_at DESC);
    CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets(created_at DESC);
"#;

const TICKET_COLUMNS: &str = "id, user, subject, description, priority, status, assigned_to, \
                              category, created_at, updated_at, closed_at";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    db: Arc<Database>,
    config: TicketConfig,
}

impl SqliteTicketStore {
    /// Create a ticket store on top of `db`, creating the table if needed.
    pub fn new(db: Arc<Database>, config: TicketConfig) -> Result<Self, TicketError> {
        db.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })?;
        Ok(Self { db, config })
    }

    /// Create a store over a private in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        Self::new(Arc::new(Database::in_memory()?), TicketConfig::default())
    }
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// Fixed-width UTC text, so lexical order is chronological order.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    let closed_at: Option<String> = row.get(10)?;

    Ok(Ticket {
        id: row.get(0)?,
        user: row.get(1)?,
        subject: row.get(2)?,
        description: row.get(3)?,
        priority: row.get(4)?,
        status: row.get(5)?,
        assigned_to: row.get(6)?,
        category: row.get(7)?,
        created_at: parse_timestamp(8, &created_at)?,
        updated_at: parse_timestamp(9, &updated_at)?,
        closed_at: closed_at
            .map(|text| parse_timestamp(10, &text))
            .transpose()?,
    })
}

fn fetch(tx: &Transaction<'_>, id: &str) -> Result<Option<Ticket>, TicketError> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1");
    Ok(tx.query_row(&sql, params![id], row_to_ticket).optional()?)
}

fn fetch_all<P: Params>(
    tx: &Transaction<'_>,
    sql: &str,
    params: P,
) -> Result<Vec<Ticket>, TicketError> {
    let mut stmt = tx.prepare(sql)?;
    let tickets = stmt
        .query_map(params, row_to_ticket)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tickets)
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

macro_rules! sql_vocabulary {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.name()))
            }
        }

        // Stored values are symbolic names only; labels never reach the table.
        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                <$ty as Vocabulary>::MEMBERS
                    .iter()
                    .copied()
                    .find(|member| member.name() == text)
                    .ok_or_else(|| {
                        FromSqlError::Other(Box::new(UnknownValue {
                            kind: <$ty as Vocabulary>::KIND,
                            value: text.to_string(),
                        }))
                    })
            }
        }
    };
}

sql_vocabulary!(Priority);
sql_vocabulary!(TicketStatus);

impl TicketStore for SqliteTicketStore {
    fn create(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError> {
        self.db.transaction(|tx| -> Result<Ticket, TicketError> {
            let user = request.user.trim();
            let subject = request.subject.trim();
            let description = request.description.trim();

            let missing: Vec<&'static str> = [
                ("user", user),
                ("subject", subject),
                ("description", description),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
            if !missing.is_empty() {
                return Err(TicketError::MissingFields(missing));
            }

            let priority = self
                .config
                .create_priority
                .resolve(request.priority.as_deref(), Priority::default())?;

            let created_at = now();
            let ticket = Ticket {
                id: uuid::Uuid::new_v4().to_string(),
                user: user.to_string(),
                subject: subject.to_string(),
                description: description.to_string(),
                priority,
                status: TicketStatus::default(),
                assigned_to: None,
                category: trimmed_or_none(request.category.as_deref()),
                created_at,
                updated_at: created_at,
                closed_at: None,
            };

            let sql = format!(
                "INSERT INTO tickets ({TICKET_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            );
            tx.execute(
                &sql,
                params![
                    ticket.id,
                    ticket.user,
                    ticket.subject,
                    ticket.description,
                    ticket.priority,
                    ticket.status,
                    ticket.assigned_to,
                    ticket.category,
                    timestamp(&ticket.created_at),
                    timestamp(&ticket.updated_at),
                    ticket.closed_at.as_ref().map(timestamp),
                ],
            )?;

            info!(
                ticket_id = %ticket.id,
                user = %ticket.user,
                priority = ticket.priority.name(),
                "Ticket created"
            );
            Ok(ticket)
        })
    }

    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError> {
        self.db
            .transaction(|tx| -> Result<Option<Ticket>, TicketError> { fetch(tx, id) })
    }

    fn update(&self, id: &str, update: TicketUpdate) -> Result<UpdatedTicket, TicketError> {
        self.db.transaction(|tx| -> Result<UpdatedTicket, TicketError> {
            let mut ticket =
                fetch(tx, id)?.ok_or_else(|| TicketError::NotFound(id.to_string()))?;

            // Everything is normalized before anything is written.
            let changes = TicketChanges {
                status: update
                    .status
                    .as_deref()
                    .map(normalize::<TicketStatus>)
                    .transpose()?,
                priority: update
                    .priority
                    .as_deref()
                    .map(normalize::<Priority>)
                    .transpose()?,
                assigned_to: update
                    .assigned_to
                    .as_deref()
                    .map(|assignee| trimmed_or_none(Some(assignee))),
            };
            if changes.is_empty() {
                return Err(TicketError::NothingToUpdate);
            }

            let previous_status = ticket.status;
            let changed = ticket.apply(&changes, now());

            tx.execute(
                "UPDATE tickets SET priority = ?1, status = ?2, assigned_to = ?3, \
                 updated_at = ?4, closed_at = ?5 WHERE id = ?6",
                params![
                    ticket.priority,
                    ticket.status,
                    ticket.assigned_to,
                    timestamp(&ticket.updated_at),
                    ticket.closed_at.as_ref().map(timestamp),
                    ticket.id,
                ],
            )?;

            if previous_status != ticket.status {
                info!(
                    ticket_id = %ticket.id,
                    from = previous_status.name(),
                    to = ticket.status.name(),
                    closed = ticket.is_closed(),
                    "Ticket status changed"
                );
            }
            debug!(
                ticket_id = %ticket.id,
                fields = ?changed.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                "Ticket updated"
            );

            Ok(UpdatedTicket { ticket, changed })
        })
    }

    fn delete(&self, id: &str) -> Result<Ticket, TicketError> {
        self.db.transaction(|tx| -> Result<Ticket, TicketError> {
            let ticket = fetch(tx, id)?.ok_or_else(|| TicketError::NotFound(id.to_string()))?;
            tx.execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
            info!(ticket_id = %id, "Ticket deleted");
            Ok(ticket)
        })
    }

    fn list_for_user(&self, user: &str, limit: i64) -> Result<Vec<Ticket>, TicketError> {
        let Some(limit) = self.config.effective_limit(limit) else {
            return Ok(Vec::new());
        };
        let user = user.trim();

        self.db.transaction(|tx| -> Result<Vec<Ticket>, TicketError> {
            let sql = format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE user = ?1 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            );
            let tickets = fetch_all(tx, &sql, params![user, limit])?;
            debug!(user, limit, found = tickets.len(), "Listed tickets");
            Ok(tickets)
        })
    }

    fn search(&self, query: &str, limit: i64) -> Result<Vec<Ticket>, TicketError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TicketError::EmptyQuery);
        }
        let Some(limit) = self.config.effective_limit(limit) else {
            return Ok(Vec::new());
        };

        self.db.transaction(|tx| -> Result<Vec<Ticket>, TicketError> {
            // LIKE ignores case for ASCII letters.
            let sql = format!(
                "SELECT {TICKET_COLUMNS} FROM tickets \
                 WHERE subject LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\' \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            );
            let tickets = fetch_all(tx, &sql, params![like_pattern(query), limit])?;
            debug!(query, limit, found = tickets.len(), "Searched tickets");
            Ok(tickets)
        })
    }

    fn count(&self) -> Result<i64, TicketError> {
        self.db.transaction(|tx| -> Result<i64, TicketError> {
            Ok(tx.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?)
        })
    }
}
