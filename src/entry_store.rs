use crate::db::{self, StoreError};
use crate::entry::*;
use crate::settings;
use crate::summarizer::{RuleBasedSummarizer, SummarizeError, SummaryConfig, SummaryEngine};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

const ENTRY_COLUMNS: &str =
    "id, date, body, summary, summary_status, created_at, updated_at";

/// Entry Store
///
/// 负责条目的增删改查，以及摘要状态的流转：
/// 保存时标记 pending → 调用摘要引擎 → 写入 done 或 failed；
/// 摘要功能关闭时直接标记 disabled，不调用引擎。
/// 每一步都是一次独立的 UPDATE，中途崩溃的条目会停留在 pending，不会自动重试
pub struct EntryStore {
    conn: Connection,
    engine: Option<Box<dyn SummaryEngine>>,
}

impl EntryStore {
    /// 打开（或创建）数据库文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::from_connection(db::init_db(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(db::init_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self { conn, engine: None }
    }

    /// 使用自定义摘要引擎
    ///
    /// 未指定时每次按设置中的摘要配置构建规则摘要器
    pub fn with_engine(mut self, engine: Box<dyn SummaryEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// 新建条目
    ///
    /// 正文去除首尾空白后保存，空正文返回 `StoreError::EmptyBody`
    pub fn create_entry(&self, params: CreateEntryParams) -> Result<Entry, StoreError> {
        let body = normalize_body(&params.body)?;
        let enabled = self.is_summary_enabled()?;
        let now = Utc::now().timestamp_millis();
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            date: params.date,
            body,
            summary: None,
            summary_status: if enabled {
                SummaryStatus::Pending
            } else {
                SummaryStatus::Disabled
            },
            created_at: now,
            updated_at: now,
        };

        insert_entry(&self.conn, &entry)?;
        log::info!("新建条目 {} ({})", entry.id, entry.summary_status);

        if enabled {
            self.run_summary(&entry.id, &entry.body)?;
        }

        self.require_entry(&entry.id)
    }

    /// 获取条目
    pub fn get_entry(&self, id: &str) -> Result<Option<Entry>, StoreError> {
        let sql = format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS);
        let entry = self
            .conn
            .query_row(&sql, [id], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// 某月的条目（`YYYY-MM`，日期降序）
    pub fn list_entries_by_month(&self, month: &str) -> Result<Vec<Entry>, StoreError> {
        let sql = format!(
            "SELECT {} FROM entries WHERE date LIKE ?1 || '-%' ORDER BY date DESC, created_at DESC",
            ENTRY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([month], entry_from_row)?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    /// 全部条目（日期降序，同日按创建时间降序）
    pub fn list_entries_by_date_desc(&self) -> Result<Vec<Entry>, StoreError> {
        let sql = format!(
            "SELECT {} FROM entries ORDER BY date DESC, created_at DESC",
            ENTRY_COLUMNS
        );
        self.query_entries(&sql)
    }

    /// 停留在 pending 的条目（上次保存中途中断）
    pub fn pending_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let sql = format!(
            "SELECT {} FROM entries WHERE summary_status = 'pending' ORDER BY created_at",
            ENTRY_COLUMNS
        );
        self.query_entries(&sql)
    }

    /// 更新条目
    ///
    /// 正文变化（或上次摘要未完成）且摘要开启时重新生成摘要；
    /// 摘要关闭时清空摘要并标记 disabled
    pub fn update_entry(&self, id: &str, patch: UpdateEntryParams) -> Result<Entry, StoreError> {
        let current = self.require_entry(id)?;
        let date = patch.date.unwrap_or(current.date);
        let body = match patch.body {
            Some(ref body) => normalize_body(body)?,
            None => current.body.clone(),
        };
        let now = Utc::now().timestamp_millis();

        if !self.is_summary_enabled()? {
            self.conn.execute(
                "UPDATE entries SET date = ?1, body = ?2, summary = NULL, summary_status = ?3, updated_at = ?4
                 WHERE id = ?5",
                (&date, &body, SummaryStatus::Disabled, now, id),
            )?;
            return self.require_entry(id);
        }

        let needs_summary = body != current.body || current.summary_status != SummaryStatus::Done;
        if !needs_summary {
            self.conn.execute(
                "UPDATE entries SET date = ?1, updated_at = ?2 WHERE id = ?3",
                (&date, now, id),
            )?;
            return self.require_entry(id);
        }

        self.conn.execute(
            "UPDATE entries SET date = ?1, body = ?2, summary_status = ?3, updated_at = ?4 WHERE id = ?5",
            (&date, &body, SummaryStatus::Pending, now, id),
        )?;
        self.run_summary(id, &body)?;
        self.require_entry(id)
    }

    /// 重新生成摘要（供调用方自行实现重试）
    pub fn resummarize(&self, id: &str) -> Result<Entry, StoreError> {
        let entry = self.require_entry(id)?;
        if !self.is_summary_enabled()? {
            return Ok(entry);
        }
        self.set_status(id, SummaryStatus::Pending)?;
        self.run_summary(id, &entry.body)?;
        self.require_entry(id)
    }

    /// 删除条目
    pub fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
        Ok(())
    }

    /// 删除全部条目
    pub fn clear_entries(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM entries", [])?;
        Ok(())
    }

    pub fn is_summary_enabled(&self) -> Result<bool, StoreError> {
        settings::is_summary_enabled(&self.conn)
    }

    pub fn set_summary_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        settings::set_summary_enabled(&self.conn, enabled)
    }

    pub fn summary_config(&self) -> Result<SummaryConfig, StoreError> {
        settings::summary_config(&self.conn)
    }

    pub fn set_summary_config(&self, config: &SummaryConfig) -> Result<(), StoreError> {
        settings::set_summary_config(&self.conn, config)
    }

    /// 调用摘要引擎并写入结果
    fn run_summary(&self, id: &str, body: &str) -> Result<SummaryStatus, StoreError> {
        let result = match self.engine {
            Some(ref engine) => engine.try_summarize(body.trim()),
            // 摘要配置无法读取时同样记为 failed，不让条目停留在 pending
            None => match self.summary_config() {
                Ok(config) => RuleBasedSummarizer::new(config).try_summarize(body.trim()),
                Err(e) => Err(SummarizeError::Failed(format!("摘要配置无法读取: {}", e))),
            },
        };

        let now = Utc::now().timestamp_millis();
        match result {
            Ok(summary) => {
                self.conn.execute(
                    "UPDATE entries SET summary = ?1, summary_status = ?2, updated_at = ?3 WHERE id = ?4",
                    (&summary, SummaryStatus::Done, now, id),
                )?;
                log::info!("条目 {} 摘要完成", id);
                Ok(SummaryStatus::Done)
            }
            Err(e) => {
                self.conn.execute(
                    "UPDATE entries SET summary_status = ?1, updated_at = ?2 WHERE id = ?3",
                    (SummaryStatus::Failed, now, id),
                )?;
                log::warn!("条目 {} 摘要失败: {}", id, e);
                Ok(SummaryStatus::Failed)
            }
        }
    }

    fn set_status(&self, id: &str, status: SummaryStatus) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE entries SET summary_status = ?1, updated_at = ?2 WHERE id = ?3",
            (status, Utc::now().timestamp_millis(), id),
        )?;
        Ok(())
    }

    fn require_entry(&self, id: &str) -> Result<Entry, StoreError> {
        self.get_entry(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn query_entries(&self, sql: &str) -> Result<Vec<Entry>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], entry_from_row)?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

fn normalize_body(body: &str) -> Result<String, StoreError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyBody);
    }
    Ok(trimmed.to_string())
}

/// 原样写入条目（新建与备份恢复共用）
pub(crate) fn insert_entry(conn: &Connection, entry: &Entry) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO entries (id, date, body, summary, summary_status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            &entry.id,
            &entry.date,
            &entry.body,
            &entry.summary,
            entry.summary_status,
            entry.created_at,
            entry.updated_at,
        ),
    )?;
    Ok(())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        date: row.get(1)?,
        body: row.get(2)?,
        summary: row.get(3)?,
        summary_status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
