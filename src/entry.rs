use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 摘要状态
///
/// 由 Entry Store 维护，摘要引擎本身不感知
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    /// 已保存，等待摘要
    Pending,
    /// 摘要已生成
    Done,
    /// 摘要失败
    Failed,
    /// 摘要功能关闭，不生成摘要
    #[serde(alias = "none")]
    Disabled,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Pending => "pending",
            SummaryStatus::Done => "done",
            SummaryStatus::Failed => "failed",
            SummaryStatus::Disabled => "disabled",
        }
    }
}

#[derive(Error, Debug)]
#[error("未知的摘要状态: {0}")]
pub struct ParseStatusError(String);

impl FromStr for SummaryStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SummaryStatus::Pending),
            "done" => Ok(SummaryStatus::Done),
            "failed" => Ok(SummaryStatus::Failed),
            "disabled" | "none" => Ok(SummaryStatus::Disabled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for SummaryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SummaryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// 日记条目
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,         // UUID v4
    pub date: String,       // YYYY-MM-DD
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub summary_status: SummaryStatus,
    pub created_at: i64,    // Unix 毫秒
    pub updated_at: i64,
}

/// 新建条目参数
#[derive(Clone, Debug)]
pub struct CreateEntryParams {
    pub date: String,
    pub body: String,
}

/// 更新条目参数
#[derive(Clone, Debug, Default)]
pub struct UpdateEntryParams {
    pub date: Option<String>,
    pub body: Option<String>,
}
