//! SQLite-backed record store
//!
//! Owner-scoped persistence for users, auth tokens, tasks, events, and mood
//! entries. Every read and write on an owned record is filtered by the owning
//! user id; a record that exists but belongs to someone else is
//! indistinguishable from a missing one.
//!
//! Timestamps are stored as unix milliseconds, activity tags as a JSON array
//! in a TEXT column.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    DateRange, Event, EventFilter, Mood, MoodFilter, Priority, RecordId, Role, Task, TaskFilter,
    User, UserId,
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS user (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS auth_token (
        value TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS task (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        due_date INTEGER,
        completed INTEGER NOT NULL,
        priority TEXT NOT NULL,
        category TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS event (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        start_at INTEGER NOT NULL,
        end_at INTEGER NOT NULL,
        all_day INTEGER NOT NULL,
        location TEXT,
        category TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS mood (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        mood TEXT NOT NULL,
        intensity INTEGER NOT NULL,
        note TEXT,
        date INTEGER NOT NULL,
        activities TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS task_user_index ON task (user_id, due_date)",
    "CREATE INDEX IF NOT EXISTS event_user_index ON event (user_id, start_at)",
    "CREATE INDEX IF NOT EXISTS mood_user_index ON mood (user_id, date DESC)",
];

/// Owner-scoped record persistence over SQLite
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (or create) the store at the given file path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        tracing::info!(path = %path.display(), "Record store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store, for tests
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for statement in SCHEMA {
            conn.execute(statement, [])?;
        }
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ========================================
    // Users and credentials
    // ========================================

    /// Create a user with a hashed password. Fails with `Conflict` when the
    /// email is already registered.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<User> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO user (name, email, role, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, email, role.as_str(), password_hash, millis(now)],
        );
        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::Conflict(format!(
                    "User with email {} already exists",
                    email
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: now,
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, role, created_at FROM user WHERE email = ?1",
        )?;
        let mut rows = stmt.query_map(params![email], row_to_user)?;
        rows.next().transpose().map_err(Into::into)
    }

    pub fn get_user(&self, id: UserId) -> StoreResult<User> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, email, role, created_at FROM user WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], row_to_user)?;
        rows.next()
            .transpose()?
            .ok_or(StoreError::NotFound { kind: "User", id })
    }

    /// All registered users, oldest first
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, email, role, created_at FROM user ORDER BY created_at")?;
        let rows = stmt.query_map([], row_to_user)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Persist changes to a user's name, email, and role. Fails with
    /// `Conflict` when the new email is already registered elsewhere.
    pub fn update_user(&self, user: &User) -> StoreResult<()> {
        let result = self.conn().execute(
            "UPDATE user SET name = ?1, email = ?2, role = ?3 WHERE id = ?4",
            params![user.name, user.email, user.role.as_str(), user.id],
        );
        let changed = match result {
            Ok(changed) => changed,
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::Conflict(format!(
                    "User with email {} already exists",
                    user.email
                )));
            }
            Err(e) => return Err(e.into()),
        };
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "User",
                id: user.id,
            });
        }
        Ok(())
    }

    /// Replace a user's stored password hash
    pub fn set_password_hash(&self, user_id: UserId, hash: &str) -> StoreResult<()> {
        let changed = self.conn().execute(
            "UPDATE user SET password_hash = ?1 WHERE id = ?2",
            params![hash, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "User",
                id: user_id,
            });
        }
        Ok(())
    }

    /// Delete a user and, via cascade, everything they own
    pub fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM user WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "User", id });
        }
        Ok(())
    }

    /// Stored password hash for an account
    pub fn password_hash_for(&self, user_id: UserId) -> StoreResult<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT password_hash FROM user WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
        rows.next().transpose().map_err(Into::into)
    }

    // ========================================
    // Auth tokens
    // ========================================

    pub fn insert_token(
        &self,
        user_id: UserId,
        value: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.conn().execute(
            "INSERT INTO auth_token (value, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![value, user_id, millis(now)],
        )?;
        Ok(())
    }

    /// Resolve a bearer token to its owning user
    pub fn user_for_token(&self, value: &str) -> StoreResult<Option<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, u.role, u.created_at
             FROM auth_token t JOIN user u ON u.id = t.user_id
             WHERE t.value = ?1",
        )?;
        let mut rows = stmt.query_map(params![value], row_to_user)?;
        rows.next().transpose().map_err(Into::into)
    }

    /// Delete a token; returns whether it existed
    pub fn delete_token(&self, value: &str) -> StoreResult<bool> {
        let changed = self
            .conn()
            .execute("DELETE FROM auth_token WHERE value = ?1", params![value])?;
        Ok(changed > 0)
    }

    // ========================================
    // Tasks
    // ========================================

    /// Insert a task, returning it with the assigned id
    pub fn insert_task(&self, mut task: Task) -> StoreResult<Task> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO task (user_id, title, description, due_date, completed, priority, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.user_id,
                task.title,
                task.description,
                task.due_date.map(millis),
                task.completed,
                task.priority.as_str(),
                task.category,
                millis(task.created_at),
            ],
        )?;
        task.id = conn.last_insert_rowid();
        Ok(task)
    }

    /// List a user's tasks, sorted by due date (tasks without one last)
    pub fn list_tasks(&self, user_id: UserId, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut sql = String::from(
            "SELECT id, user_id, title, description, due_date, completed, priority, category, created_at
             FROM task WHERE user_id = ?",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(completed) = filter.completed {
            sql.push_str(" AND completed = ?");
            args.push(Box::new(completed));
        }
        if let Some(day) = filter.due_on {
            let range = DateRange::new(Some(day), Some(day));
            sql.push_str(" AND due_date >= ? AND due_date < ?");
            args.push(Box::new(range.start_instant().map(millis)));
            args.push(Box::new(range.end_instant_exclusive().map(millis)));
        }
        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            args.push(Box::new(category.clone()));
        }
        sql.push_str(" ORDER BY due_date IS NULL, due_date, id");

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter().map(|a| a.as_ref())), row_to_task)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_task(&self, user_id: UserId, id: RecordId) -> StoreResult<Task> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, due_date, completed, priority, category, created_at
             FROM task WHERE id = ?1 AND user_id = ?2",
        )?;
        let mut rows = stmt.query_map(params![id, user_id], row_to_task)?;
        rows.next()
            .transpose()?
            .ok_or(StoreError::NotFound { kind: "Task", id })
    }

    /// Persist changes to an owned task
    pub fn update_task(&self, task: &Task) -> StoreResult<()> {
        let changed = self.conn().execute(
            "UPDATE task SET title = ?1, description = ?2, due_date = ?3, completed = ?4,
                 priority = ?5, category = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                task.title,
                task.description,
                task.due_date.map(millis),
                task.completed,
                task.priority.as_str(),
                task.category,
                task.id,
                task.user_id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "Task",
                id: task.id,
            });
        }
        Ok(())
    }

    pub fn delete_task(&self, user_id: UserId, id: RecordId) -> StoreResult<()> {
        let changed = self.conn().execute(
            "DELETE FROM task WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "Task", id });
        }
        Ok(())
    }

    // ========================================
    // Events
    // ========================================

    pub fn insert_event(&self, mut event: Event) -> StoreResult<Event> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO event (user_id, title, description, start_at, end_at, all_day, location, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                event.user_id,
                event.title,
                event.description,
                millis(event.start),
                millis(event.end),
                event.all_day,
                event.location,
                event.category,
                millis(event.created_at),
            ],
        )?;
        event.id = conn.last_insert_rowid();
        Ok(event)
    }

    /// List a user's events sorted by start time
    pub fn list_events(&self, user_id: UserId, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let mut sql = String::from(
            "SELECT id, user_id, title, description, start_at, end_at, all_day, location, category, created_at
             FROM event WHERE user_id = ?",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(start) = filter.start {
            sql.push_str(" AND start_at >= ?");
            args.push(Box::new(millis(start)));
        }
        if let Some(end) = filter.end {
            sql.push_str(" AND end_at <= ?");
            args.push(Box::new(millis(end)));
        }
        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            args.push(Box::new(category.clone()));
        }
        sql.push_str(" ORDER BY start_at, id");

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows =
            stmt.query_map(params_from_iter(args.iter().map(|a| a.as_ref())), row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_event(&self, user_id: UserId, id: RecordId) -> StoreResult<Event> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, start_at, end_at, all_day, location, category, created_at
             FROM event WHERE id = ?1 AND user_id = ?2",
        )?;
        let mut rows = stmt.query_map(params![id, user_id], row_to_event)?;
        rows.next()
            .transpose()?
            .ok_or(StoreError::NotFound { kind: "Event", id })
    }

    pub fn update_event(&self, event: &Event) -> StoreResult<()> {
        let changed = self.conn().execute(
            "UPDATE event SET title = ?1, description = ?2, start_at = ?3, end_at = ?4,
                 all_day = ?5, location = ?6, category = ?7
             WHERE id = ?8 AND user_id = ?9",
            params![
                event.title,
                event.description,
                millis(event.start),
                millis(event.end),
                event.all_day,
                event.location,
                event.category,
                event.id,
                event.user_id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "Event",
                id: event.id,
            });
        }
        Ok(())
    }

    pub fn delete_event(&self, user_id: UserId, id: RecordId) -> StoreResult<()> {
        let changed = self.conn().execute(
            "DELETE FROM event WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "Event", id });
        }
        Ok(())
    }

    /// List events overlapping the given window, sorted by start time
    ///
    /// An event overlaps when it starts within the window, ends within it,
    /// or spans it entirely; with `end >= start` on every event the three
    /// cases collapse to `start_at <= window_end AND end_at >= window_start`.
    pub fn events_overlapping(
        &self,
        user_id: UserId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> StoreResult<Vec<Event>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, start_at, end_at, all_day, location, category, created_at
             FROM event WHERE user_id = ?1 AND start_at <= ?2 AND end_at >= ?3
             ORDER BY start_at, id",
        )?;
        let rows = stmt.query_map(
            params![user_id, millis(window_end), millis(window_start)],
            row_to_event,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count events starting at or after the given instant
    pub fn count_upcoming_events(&self, user_id: UserId, now: DateTime<Utc>) -> StoreResult<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM event WHERE user_id = ?1 AND start_at >= ?2",
            params![user_id, millis(now)],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ========================================
    // Mood entries
    // ========================================

    pub fn insert_mood(&self, mut mood: Mood) -> StoreResult<Mood> {
        let activities = serde_json::to_string(&mood.activities)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO mood (user_id, mood, intensity, note, date, activities)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                mood.user_id,
                mood.mood.as_str(),
                mood.intensity,
                mood.note,
                millis(mood.date),
                activities,
            ],
        )?;
        mood.id = conn.last_insert_rowid();
        Ok(mood)
    }

    /// List a user's mood entries, newest first
    pub fn list_moods(&self, user_id: UserId, filter: &MoodFilter) -> StoreResult<Vec<Mood>> {
        let mut sql = String::from(
            "SELECT id, user_id, mood, intensity, note, date, activities
             FROM mood WHERE user_id = ?",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(start) = filter.range.start_instant() {
            sql.push_str(" AND date >= ?");
            args.push(Box::new(millis(start)));
        }
        if let Some(end) = filter.range.end_instant_exclusive() {
            sql.push_str(" AND date < ?");
            args.push(Box::new(millis(end)));
        }
        if let Some(mood) = filter.mood {
            sql.push_str(" AND mood = ?");
            args.push(Box::new(mood.as_str()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows =
            stmt.query_map(params_from_iter(args.iter().map(|a| a.as_ref())), row_to_mood)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_mood(&self, user_id: UserId, id: RecordId) -> StoreResult<Mood> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, mood, intensity, note, date, activities
             FROM mood WHERE id = ?1 AND user_id = ?2",
        )?;
        let mut rows = stmt.query_map(params![id, user_id], row_to_mood)?;
        rows.next().transpose()?.ok_or(StoreError::NotFound {
            kind: "Mood entry",
            id,
        })
    }

    pub fn update_mood(&self, mood: &Mood) -> StoreResult<()> {
        let activities = serde_json::to_string(&mood.activities)?;
        let changed = self.conn().execute(
            "UPDATE mood SET mood = ?1, intensity = ?2, note = ?3, date = ?4, activities = ?5
             WHERE id = ?6 AND user_id = ?7",
            params![
                mood.mood.as_str(),
                mood.intensity,
                mood.note,
                millis(mood.date),
                activities,
                mood.id,
                mood.user_id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "Mood entry",
                id: mood.id,
            });
        }
        Ok(())
    }

    pub fn delete_mood(&self, user_id: UserId, id: RecordId) -> StoreResult<()> {
        let changed = self.conn().execute(
            "DELETE FROM mood WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "Mood entry",
                id,
            });
        }
        Ok(())
    }

    /// Most recent mood entries, newest first, capped at `limit`
    pub fn recent_moods(&self, user_id: UserId, limit: u32) -> StoreResult<Vec<Mood>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, mood, intensity, note, date, activities
             FROM mood WHERE user_id = ?1
             ORDER BY date DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit], row_to_mood)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mood entries on a single calendar day, newest first
    pub fn moods_on_date(&self, user_id: UserId, day: NaiveDate) -> StoreResult<Vec<Mood>> {
        let filter = MoodFilter {
            range: DateRange::new(Some(day), Some(day)),
            mood: None,
        };
        self.list_moods(user_id, &filter)
    }
}

/// Unix milliseconds for storage
fn millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// Decode failure in a stored column, surfaced as a rusqlite error so it can
/// flow out of `query_map` closures
#[derive(Debug)]
struct ColumnDecodeError(String);

impl std::fmt::Display for ColumnDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ColumnDecodeError {}

fn decode_err(idx: usize, msg: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(ColumnDecodeError(msg.into())),
    )
}

fn instant_from_millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| decode_err(idx, format!("timestamp out of range: {}", ms)))
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: role.parse().map_err(|e: String| decode_err(3, e))?,
        created_at: instant_from_millis(4, row.get(4)?)?,
    })
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(6)?;
    let due_date: Option<i64> = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: due_date.map(|ms| instant_from_millis(4, ms)).transpose()?,
        completed: row.get(5)?,
        priority: priority.parse().map_err(|e: String| decode_err(6, e))?,
        category: row.get(7)?,
        created_at: instant_from_millis(8, row.get(8)?)?,
    })
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start: instant_from_millis(4, row.get(4)?)?,
        end: instant_from_millis(5, row.get(5)?)?,
        all_day: row.get(6)?,
        location: row.get(7)?,
        category: row.get(8)?,
        created_at: instant_from_millis(9, row.get(9)?)?,
    })
}

fn row_to_mood(row: &Row<'_>) -> rusqlite::Result<Mood> {
    let symbol: String = row.get(2)?;
    let activities: String = row.get(6)?;
    Ok(Mood {
        id: row.get(0)?,
        user_id: row.get(1)?,
        mood: symbol.parse().map_err(|e: String| decode_err(2, e))?,
        intensity: row.get(3)?,
        note: row.get(4)?,
        date: instant_from_millis(5, row.get(5)?)?,
        activities: serde_json::from_str(&activities)
            .map_err(|e| decode_err(6, e.to_string()))?,
    })
}
