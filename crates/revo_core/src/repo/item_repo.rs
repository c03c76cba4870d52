//! Item source contract and its SQLite implementation.
//!
//! # Responsibility
//! - Return filtered items in carousel order.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Results are ordered by `recorded_at ASC, id ASC`.
//! - Writes call `Item::validate()` before touching SQL.
//! - Reads reject malformed rows instead of masking them.

use crate::db::DbError;
use crate::model::item::{normalize_keywords, Emotion, Item, ItemId, ItemValidationError};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    emotion,
    recorded_at,
    district,
    keywords
FROM recordings";

pub type RepoResult<T> = Result<T, RepoError>;

/// Item persistence and query failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    Duplicate(ItemId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "recording not found: {id}"),
            Self::Duplicate(id) => write!(f, "recording already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted recording: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

/// Time window of an archive tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewPeriod {
    Monthly { year: i32, month: u32 },
    #[default]
    All,
}

impl ViewPeriod {
    /// Month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Monthly {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Half-open `[start, end)` bounds; `None` for `All` or an invalid month.
    pub fn bounds(self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let Self::Monthly { year, month } = self else {
            return None;
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some((start.and_hms_opt(0, 0, 0)?, end.and_hms_opt(0, 0, 0)?))
    }

    pub fn contains(self, at: NaiveDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Monthly { .. } => self
                .bounds()
                .is_some_and(|(start, end)| start <= at && at < end),
        }
    }
}

/// Filters for one item fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemQuery {
    pub emotion: Option<Emotion>,
    pub district: Option<String>,
    pub period: ViewPeriod,
    pub limit: Option<u32>,
}

impl ItemQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_emotion(emotion: Emotion) -> Self {
        Self {
            emotion: Some(emotion),
            ..Self::default()
        }
    }

    pub fn for_district(district: impl Into<String>) -> Self {
        Self {
            district: Some(district.into()),
            ..Self::default()
        }
    }

    pub fn with_period(mut self, period: ViewPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// In-memory equivalent of the SQL filter, limit excluded.
    pub fn matches(&self, item: &Item) -> bool {
        self.emotion.map_or(true, |emotion| item.emotion == emotion)
            && self
                .district
                .as_deref()
                .map_or(true, |district| item.district.as_deref() == Some(district.trim()))
            && self.period.contains(item.recorded_at)
    }
}

/// Collaborator that supplies carousel items.
pub trait ItemSource {
    fn fetch_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>>;
}

impl ItemSource for [Item] {
    fn fetch_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        let mut items = self
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.cmp(&b.id)));
        if let Some(limit) = query.limit {
            items.truncate(limit as usize);
        }
        Ok(items)
    }
}

impl ItemSource for Vec<Item> {
    fn fetch_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        self.as_slice().fetch_items(query)
    }
}

/// Writable item store.
pub trait ItemRepository: ItemSource {
    /// Stores a new recording.
    ///
    /// # Errors
    /// - `Validation` for invalid items.
    /// - `Duplicate` when `item.id` is already stored.
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId>;

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;

    /// Removes a recording. Callers rebuild carousels from a fresh fetch.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed recordings repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn exists(&self, id: ItemId) -> RepoResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(1) FROM recordings WHERE id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;
        if self.exists(item.id)? {
            return Err(RepoError::Duplicate(item.id));
        }

        self.conn.execute(
            "INSERT INTO recordings (id, emotion, recorded_at, district, keywords)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.id,
                item.emotion.as_str(),
                item.recorded_at.format(RECORDED_AT_FORMAT).to_string(),
                item.district.as_deref(),
                item.keywords.join(","),
            ],
        )?;
        debug!(
            "event=item_insert module=repo status=ok item_id={} emotion={}",
            item.id, item.emotion
        );
        Ok(item.id)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recordings WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        debug!("event=item_delete module=repo status=ok item_id={id}");
        Ok(())
    }
}

impl ItemSource for SqliteItemRepository<'_> {
    fn fetch_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(emotion) = query.emotion {
            sql.push_str(" AND emotion = ?");
            bind_values.push(Value::Text(emotion.as_str().to_string()));
        }
        if let Some(district) = &query.district {
            sql.push_str(" AND district = ?");
            bind_values.push(Value::Text(district.trim().to_string()));
        }
        if let ViewPeriod::Monthly { year, month } = query.period {
            let (start, end) = query.period.bounds().ok_or_else(|| {
                RepoError::InvalidData(format!("invalid month filter {year}-{month}"))
            })?;
            sql.push_str(" AND recorded_at >= ? AND recorded_at < ?");
            bind_values.push(Value::Text(start.format(RECORDED_AT_FORMAT).to_string()));
            bind_values.push(Value::Text(end.format(RECORDED_AT_FORMAT).to_string()));
        }

        sql.push_str(" ORDER BY recorded_at ASC, id ASC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            match parse_item_row(row) {
                Ok(item) => items.push(item),
                Err(err) => {
                    error!("event=item_fetch module=repo status=error error={err}");
                    return Err(err);
                }
            }
        }

        debug!(
            "event=item_fetch module=repo status=ok count={}",
            items.len()
        );
        Ok(items)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;

    let emotion_text: String = row.get("emotion")?;
    let emotion = Emotion::parse(&emotion_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid emotion `{emotion_text}` in recordings.emotion"
        ))
    })?;

    let recorded_text: String = row.get("recorded_at")?;
    let recorded_at = NaiveDateTime::parse_from_str(&recorded_text, RECORDED_AT_FORMAT)
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{recorded_text}` in recordings.recorded_at"
            ))
        })?;

    let keywords: String = row.get("keywords")?;
    let item = Item {
        id,
        emotion,
        recorded_at,
        district: row.get("district")?,
        keywords: normalize_keywords(&keywords),
    };
    item.validate()?;
    Ok(item)
}
