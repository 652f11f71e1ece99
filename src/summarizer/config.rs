use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

pub const DEFAULT_MIN_LENGTH: usize = 140;
pub const DEFAULT_MAX_LENGTH: usize = 200;
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// 默认关键词（日记常见的重要性提示词）
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "今日", "明日", "重要", "大事", "決めた", "目標", "予定", "約束",
    "初めて", "気づいた", "学んだ", "嬉しい", "感謝", "締め切り",
];

/// 语言配置
/// 句末符号、问号以及“本地文字”的判定范围，换语言时整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageProfile {
    pub sentence_terminals: Vec<char>,
    pub question_marks: Vec<char>,
    pub time_separators: Vec<char>,
    pub native_script_ranges: Vec<(char, char)>,
}

impl LanguageProfile {
    /// 日语配置
    pub fn japanese() -> Self {
        Self {
            sentence_terminals: vec!['。', '！', '？'],
            question_marks: vec!['?', '？'],
            time_separators: vec![':', '：', '時'],
            native_script_ranges: vec![
                ('\u{3040}', '\u{309F}'), // 平假名
                ('\u{30A0}', '\u{30FF}'), // 片假名
                ('\u{3400}', '\u{4DBF}'), // CJK 扩展 A
                ('\u{4E00}', '\u{9FFF}'), // CJK 统一汉字
                ('\u{FF66}', '\u{FF9F}'), // 半角片假名
            ],
        }
    }

    pub fn is_terminal(&self, ch: char) -> bool {
        self.sentence_terminals.contains(&ch)
    }

    pub fn is_native_script(&self, ch: char) -> bool {
        self.native_script_ranges
            .iter()
            .any(|&(start, end)| (start..=end).contains(&ch))
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::japanese()
    }
}

/// 摘要配置
/// 所有阈值与词表都通过它传入，引擎内部不持有模块级常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub max_sentences: usize,
    pub keywords: Vec<String>,
    pub language: LanguageProfile,
}

impl SummaryConfig {
    /// 从 JSON 字符串加载，缺失字段使用默认值
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 实际生效的短文阈值
    ///
    /// 不超过 `max_length`，否则短路返回的原文会突破长度上限
    pub fn effective_min_length(&self) -> usize {
        self.min_length.min(self.max_length)
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language(mut self, language: LanguageProfile) -> Self {
        self.language = language;
        self
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            max_sentences: DEFAULT_MAX_SENTENCES,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            language: LanguageProfile::default(),
        }
    }
}
