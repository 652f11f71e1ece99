use crate::db::StoreError;
use crate::summarizer::SummaryConfig;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 设置键
pub const SUMMARY_ENABLED: &str = "summaryEnabled";
pub const SUMMARY_CONFIG: &str = "summaryConfig";

/// 设置项（备份时原样导出）
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SettingRecord {
    pub key: String,
    pub value: serde_json::Value,
}

/// 读取设置值，不存在时返回默认值
pub fn get_setting<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
    default: T,
) -> Result<T, StoreError> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;

    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(default),
    }
}

/// 保存设置值
pub fn set_setting<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, &json),
    )?;
    Ok(())
}

/// 摘要功能是否开启（默认开启）
pub fn is_summary_enabled(conn: &Connection) -> Result<bool, StoreError> {
    get_setting(conn, SUMMARY_ENABLED, true)
}

pub fn set_summary_enabled(conn: &Connection, enabled: bool) -> Result<(), StoreError> {
    set_setting(conn, SUMMARY_ENABLED, &enabled)
}

/// 当前摘要配置（未保存时为默认配置）
pub fn summary_config(conn: &Connection) -> Result<SummaryConfig, StoreError> {
    get_setting(conn, SUMMARY_CONFIG, SummaryConfig::default())
}

pub fn set_summary_config(conn: &Connection, config: &SummaryConfig) -> Result<(), StoreError> {
    set_setting(conn, SUMMARY_CONFIG, config)
}

/// 全部设置项
pub fn list_settings(conn: &Connection) -> Result<Vec<SettingRecord>, StoreError> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut settings = Vec::new();
    for row in rows {
        let (key, json) = row?;
        settings.push(SettingRecord {
            key,
            value: serde_json::from_str(&json)?,
        });
    }
    Ok(settings)
}

/// 用给定设置项整体替换（需在调用方事务内执行）
pub(crate) fn replace_settings(conn: &Connection, settings: &[SettingRecord]) -> Result<(), StoreError> {
    conn.execute("DELETE FROM settings", [])?;
    for setting in settings {
        set_setting(conn, &setting.key, &setting.value)?;
    }
    Ok(())
}
