use crate::db::StoreError;
use crate::encryption::{self, EncryptionError};
use crate::entry::Entry;
use crate::entry_store::{insert_entry, EntryStore};
use crate::settings::{self, SettingRecord};
use crate::summarizer::SummaryConfig;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const BACKUP_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("JSON解析失败: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("不支持的备份版本: {0}")]
    UnsupportedVersion(u32),
    #[error("备份数据格式不正确: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Encryption(#[from] EncryptionError),
}

impl From<rusqlite::Error> for BackupError {
    fn from(e: rusqlite::Error) -> Self {
        BackupError::Store(StoreError::Database(e))
    }
}

/// 备份数据
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub version: u32,
    pub exported_at: String,
    pub entries: Vec<Entry>,
    pub settings: Vec<SettingRecord>,
}

/// 导出全部数据为 JSON
pub fn export_data(store: &EntryStore) -> Result<String, BackupError> {
    let backup = BackupData {
        version: BACKUP_VERSION,
        exported_at: Utc::now().to_rfc3339(),
        entries: store.list_entries_by_date_desc()?,
        settings: settings::list_settings(store.conn())?,
    };

    log::info!("导出备份：{} 个条目", backup.entries.len());
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// 备份数据格式检查
pub fn validate_backup_data(data: &BackupData) -> Result<(), BackupError> {
    if data.version != BACKUP_VERSION {
        return Err(BackupError::UnsupportedVersion(data.version));
    }

    let mut ids = HashSet::new();
    for entry in &data.entries {
        if entry.id.is_empty() {
            return Err(BackupError::InvalidData("条目 ID 为空".to_string()));
        }
        if !ids.insert(entry.id.as_str()) {
            return Err(BackupError::InvalidData(format!("条目 ID 重复: {}", entry.id)));
        }
    }

    let mut keys = HashSet::new();
    for setting in &data.settings {
        if !keys.insert(setting.key.as_str()) {
            return Err(BackupError::InvalidData(format!("设置项重复: {}", setting.key)));
        }
        validate_setting(setting)?;
    }

    Ok(())
}

/// 已知设置项的值类型检查
fn validate_setting(setting: &SettingRecord) -> Result<(), BackupError> {
    match setting.key.as_str() {
        settings::SUMMARY_ENABLED if !setting.value.is_boolean() => Err(BackupError::InvalidData(
            format!("{} 必须是布尔值", settings::SUMMARY_ENABLED),
        )),
        settings::SUMMARY_CONFIG => serde_json::from_value::<SummaryConfig>(setting.value.clone())
            .map(|_| ())
            .map_err(|e| {
                BackupError::InvalidData(format!("{} 格式不正确: {}", settings::SUMMARY_CONFIG, e))
            }),
        _ => Ok(()),
    }
}

/// 从 JSON 恢复（覆盖现有数据）
///
/// 在一个事务内完成，任何一步失败都不会改动现有数据
pub fn import_data(store: &EntryStore, json: &str) -> Result<(), BackupError> {
    let data: BackupData = serde_json::from_str(json)?;
    validate_backup_data(&data)?;

    let tx = store.conn().unchecked_transaction()?;
    tx.execute("DELETE FROM entries", [])?;
    for entry in &data.entries {
        insert_entry(&tx, entry)?;
    }
    settings::replace_settings(&tx, &data.settings)?;
    tx.commit()?;

    log::info!("导入备份：{} 个条目", data.entries.len());
    Ok(())
}

/// 导出并用口令加密
pub fn export_encrypted(store: &EntryStore, passphrase: &str) -> Result<String, BackupError> {
    let json = export_data(store)?;
    Ok(encryption::encrypt_with_passphrase(&json, passphrase)?)
}

/// 解密并恢复
pub fn import_encrypted(store: &EntryStore, payload: &str, passphrase: &str) -> Result<(), BackupError> {
    let json = encryption::decrypt_with_passphrase(payload, passphrase)?;
    import_data(store, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{CreateEntryParams, SummaryStatus};

    fn seeded_store() -> EntryStore {
        let store = EntryStore::open_in_memory().unwrap();
        store
            .create_entry(CreateEntryParams {
                date: "2026-10-18".to_string(),
                body: "昨日は雨だった。".to_string(),
            })
            .unwrap();
        store
            .create_entry(CreateEntryParams {
                date: "2026-10-19".to_string(),
                body: "今日は晴れた。".to_string(),
            })
            .unwrap();
        settings::set_setting(store.conn(), "theme", &"dark").unwrap();
        store
    }

    #[test]
    fn test_export_format() {
        let store = seeded_store();
        let json = export_data(&store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert!(value["exportedAt"].is_string());
        assert_eq!(value["entries"].as_array().unwrap().len(), 2);
        assert_eq!(value["entries"][0]["summaryStatus"], "done");
        assert_eq!(value["settings"][0]["key"], "theme");
    }

    #[test]
    fn test_export_import_restores_everything() {
        let source = seeded_store();
        let json = export_data(&source).unwrap();

        let target = EntryStore::open_in_memory().unwrap();
        target.set_summary_enabled(false).unwrap();
        import_data(&target, &json).unwrap();

        assert_eq!(
            target.list_entries_by_date_desc().unwrap(),
            source.list_entries_by_date_desc().unwrap()
        );
        // summaryEnabled 不在备份中，被整体替换掉后回到默认值
        assert!(target.is_summary_enabled().unwrap());
        assert_eq!(
            settings::get_setting(target.conn(), "theme", String::new()).unwrap(),
            "dark"
        );
    }

    #[test]
    fn test_import_legacy_status() {
        let json = r#"{
            "version": 1,
            "exportedAt": "2026-01-01T00:00:00Z",
            "entries": [{
                "id": "legacy-1", "date": "2026-01-01", "body": "本文",
                "summaryStatus": "none", "createdAt": 1, "updatedAt": 1
            }],
            "settings": [{"key": "summaryEnabled", "value": false}]
        }"#;
        let store = EntryStore::open_in_memory().unwrap();
        import_data(&store, json).unwrap();

        let entry = store.get_entry("legacy-1").unwrap().unwrap();
        assert_eq!(entry.summary_status, SummaryStatus::Disabled);
        assert!(!store.is_summary_enabled().unwrap());
    }

    #[test]
    fn test_invalid_json_keeps_data() {
        let store = seeded_store();
        let result = import_data(&store, "{broken");

        assert!(matches!(result, Err(BackupError::InvalidJson(_))));
        assert_eq!(store.list_entries_by_date_desc().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let store = EntryStore::open_in_memory().unwrap();
        let json = r#"{"version": 1, "exportedAt": "", "entries": [{"id": "x"}], "settings": []}"#;
        assert!(matches!(import_data(&store, json), Err(BackupError::InvalidJson(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let store = EntryStore::open_in_memory().unwrap();
        let json = r#"{"version": 2, "exportedAt": "", "entries": [], "settings": []}"#;
        assert!(matches!(
            import_data(&store, json),
            Err(BackupError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected_without_changes() {
        let store = seeded_store();
        let json = r#"{
            "version": 1, "exportedAt": "",
            "entries": [
                {"id": "a", "date": "2026-01-01", "body": "一", "summaryStatus": "done", "createdAt": 1, "updatedAt": 1},
                {"id": "a", "date": "2026-01-02", "body": "二", "summaryStatus": "done", "createdAt": 2, "updatedAt": 2}
            ],
            "settings": []
        }"#;

        assert!(matches!(import_data(&store, json), Err(BackupError::InvalidData(_))));
        assert_eq!(store.list_entries_by_date_desc().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_summary_settings_rejected() {
        let store = seeded_store();
        let bad_config = r#"{
            "version": 1, "exportedAt": "", "entries": [],
            "settings": [{"key": "summaryConfig", "value": {"max_length": "oops"}}]
        }"#;
        let bad_flag = r#"{
            "version": 1, "exportedAt": "", "entries": [],
            "settings": [{"key": "summaryEnabled", "value": "yes"}]
        }"#;

        assert!(matches!(import_data(&store, bad_config), Err(BackupError::InvalidData(_))));
        assert!(matches!(import_data(&store, bad_flag), Err(BackupError::InvalidData(_))));
        assert_eq!(store.list_entries_by_date_desc().unwrap().len(), 2);

        // 新条目仍能正常完成摘要
        let entry = store
            .create_entry(CreateEntryParams {
                date: "2026-10-20".to_string(),
                body: "明日も早起きする。".to_string(),
            })
            .unwrap();
        assert_eq!(entry.summary_status, SummaryStatus::Done);
    }

    #[test]
    fn test_valid_summary_config_imported() {
        let store = EntryStore::open_in_memory().unwrap();
        let json = r#"{
            "version": 1, "exportedAt": "", "entries": [],
            "settings": [{"key": "summaryConfig", "value": {"max_length": 50}}]
        }"#;
        import_data(&store, json).unwrap();
        assert_eq!(store.summary_config().unwrap().max_length, 50);
    }

    #[test]
    fn test_encrypted_round_trip() {
        let source = seeded_store();
        let payload = export_encrypted(&source, "passphrase").unwrap();
        assert!(!payload.contains("今日"));

        let target = EntryStore::open_in_memory().unwrap();
        import_encrypted(&target, &payload, "passphrase").unwrap();
        assert_eq!(target.list_entries_by_date_desc().unwrap().len(), 2);
    }

    #[test]
    fn test_encrypted_wrong_passphrase() {
        let source = seeded_store();
        let payload = export_encrypted(&source, "passphrase").unwrap();

        let target = EntryStore::open_in_memory().unwrap();
        let result = import_encrypted(&target, &payload, "other");
        assert!(matches!(result, Err(BackupError::Encryption(_))));
        assert!(target.list_entries_by_date_desc().unwrap().is_empty());
    }
}
