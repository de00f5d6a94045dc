//! Content repository contracts and backing implementations.
//!
//! # Responsibility
//! - Define the write-through backend contract used by `ContentStore`.
//! - Provide a no-op backend for purely in-memory stores.
//! - Provide a SQLite backend that keeps rows and tag links in sync.
//!
//! # Invariants
//! - Backends never assign ids or timestamps; the store owns both.
//! - `load_all` returns items in insertion order.
//! - Tag links for one item are replaced inside a single transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::content::{ContentId, ContentItem, ContentValidationError};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTENT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    excerpt,
    published,
    created_at,
    updated_at
FROM contents";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "contents",
        &[
            "seq",
            "uuid",
            "title",
            "content",
            "excerpt",
            "published",
            "created_at",
            "updated_at",
        ],
    ),
    ("tags", &["id", "name"]),
    ("content_tags", &["content_uuid", "tag_id"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Backend error for content persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target row does not exist in the backend.
    NotFound(ContentId),
    /// Persisted row cannot be converted into a valid item.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "content row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted content: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "content repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "content repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "content repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ContentValidationError> for RepoError {
    fn from(value: ContentValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Write-through backend used by the content store.
///
/// Every method is called after the store has staged a mutation and before
/// it commits it to memory; an `Err` aborts the mutation.
pub trait ContentRepository {
    /// Loads every persisted item in insertion order.
    fn load_all(&self) -> RepoResult<Vec<ContentItem>>;
    /// Persists a newly created item.
    fn insert(&mut self, item: &ContentItem) -> RepoResult<()>;
    /// Overwrites the mutable fields of an existing item.
    fn update(&mut self, item: &ContentItem) -> RepoResult<()>;
    /// Removes an item and its tag links.
    fn delete(&mut self, id: ContentId) -> RepoResult<()>;
}

/// Backend that persists nothing. The in-memory collection is the only copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralRepository;

impl ContentRepository for EphemeralRepository {
    fn load_all(&self) -> RepoResult<Vec<ContentItem>> {
        Ok(Vec::new())
    }

    fn insert(&mut self, _item: &ContentItem) -> RepoResult<()> {
        Ok(())
    }

    fn update(&mut self, _item: &ContentItem) -> RepoResult<()> {
        Ok(())
    }

    fn delete(&mut self, _id: ContentId) -> RepoResult<()> {
        Ok(())
    }
}

/// SQLite-backed content repository.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for partial schemas.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ContentRepository for SqliteContentRepository<'_> {
    fn load_all(&self) -> RepoResult<Vec<ContentItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTENT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let mut item = parse_content_row(row)?;
            item.tags = load_tags(self.conn, &item.id.to_string())?;
            item.validate()?;
            items.push(item);
        }
        Ok(items)
    }

    fn insert(&mut self, item: &ContentItem) -> RepoResult<()> {
        let uuid = item.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO contents (
                uuid,
                title,
                content,
                excerpt,
                published,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                uuid.as_str(),
                item.title.as_str(),
                item.content.as_str(),
                item.excerpt.as_str(),
                bool_to_int(item.published),
                item.created_at,
                item.updated_at,
            ],
        )?;
        replace_tags_in_tx(&tx, uuid.as_str(), &item.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn update(&mut self, item: &ContentItem) -> RepoResult<()> {
        let uuid = item.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE contents
             SET
                title = ?2,
                content = ?3,
                excerpt = ?4,
                published = ?5,
                updated_at = ?6
             WHERE uuid = ?1;",
            params![
                uuid.as_str(),
                item.title.as_str(),
                item.content.as_str(),
                item.excerpt.as_str(),
                bool_to_int(item.published),
                item.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }
        replace_tags_in_tx(&tx, uuid.as_str(), &item.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, id: ContentId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM contents WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        purge_orphan_tags_in_tx(&tx)?;
        tx.commit()?;
        Ok(())
    }
}

fn parse_content_row(row: &Row<'_>) -> RepoResult<ContentItem> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contents.uuid"))
    })?;

    let published = match row.get::<_, i64>("published")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid published value `{other}` in contents.published"
            )));
        }
    };

    Ok(ContentItem {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        excerpt: row.get("excerpt")?,
        published,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags: Vec::new(),
    })
}

fn load_tags(conn: &Connection, content_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM content_tags ct
         INNER JOIN tags t ON t.id = ct.tag_id
         WHERE ct.content_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([content_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn replace_tags_in_tx(tx: &Transaction<'_>, content_uuid: &str, tags: &[String]) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM content_tags WHERE content_uuid = ?1;",
        [content_uuid],
    )?;
    for tag in tags {
        tx.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        tx.execute(
            "INSERT INTO content_tags (content_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![content_uuid, tag.as_str()],
        )?;
    }
    purge_orphan_tags_in_tx(tx)
}

// Link rows cascade with their content; tag names do not.
fn purge_orphan_tags_in_tx(tx: &Transaction<'_>) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM tags WHERE id NOT IN (SELECT tag_id FROM content_tags);",
        [],
    )?;
    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
