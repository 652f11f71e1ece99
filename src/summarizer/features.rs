use crate::summarizer::config::{LanguageProfile, SummaryConfig};
use crate::summarizer::types::SentenceRecord;
use regex::Regex;

/// 句子特征
/// 每个特征只看单个句子记录，相互独立，结果直接相加
pub trait SentenceFeature: Send + Sync {
    /// 特征名（用于 Debug 评分输出）
    fn name(&self) -> &'static str;

    /// 计算该特征的加减分
    fn evaluate(&self, record: &SentenceRecord) -> f64;
}

/// 长度区间分（只命中一个区间）
pub struct LengthBandFeature;

impl SentenceFeature for LengthBandFeature {
    fn name(&self) -> &'static str {
        "length_band"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        match record.char_len() {
            15..=60 => 3.0,  // 长度适中，最适合做摘要
            10..=80 => 1.0,
            0..=4 => -2.0,   // 过短，通常是感叹或附和
            101.. => -1.0,   // 过长
            _ => 0.0,
        }
    }
}

/// 关键词分
/// 每个命中的关键词计一次，同一关键词多次出现不重复计分
pub struct KeywordFeature {
    keywords: Vec<String>,
}

impl KeywordFeature {
    pub fn new(keywords: &[String]) -> Self {
        let mut distinct: Vec<String> = Vec::new();
        for keyword in keywords {
            if !keyword.is_empty() && !distinct.contains(keyword) {
                distinct.push(keyword.clone());
            }
        }
        Self { keywords: distinct }
    }
}

impl SentenceFeature for KeywordFeature {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        let hits = self
            .keywords
            .iter()
            .filter(|keyword| record.text.contains(keyword.as_str()))
            .count();
        2.0 * hits as f64
    }
}

/// 数字分
pub struct DigitFeature;

impl SentenceFeature for DigitFeature {
    fn name(&self) -> &'static str {
        "digit"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        if record.text.chars().any(is_digit) {
            1.0
        } else {
            0.0
        }
    }
}

/// 时间表达分（如 10:30、９時、7時半）
pub struct TimePatternFeature {
    pattern: Option<Regex>,
}

impl TimePatternFeature {
    pub fn new(separators: &[char]) -> Self {
        if separators.is_empty() {
            return Self { pattern: None };
        }
        let separator_class: String = separators
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = format!(r"[0-9０-９]{{1,2}}[{}][0-9０-９]{{0,2}}", separator_class);
        match Regex::new(&pattern) {
            Ok(regex) => Self {
                pattern: Some(regex),
            },
            Err(e) => {
                log::warn!("时间表达正则构建失败，time_pattern 特征停用: {}", e);
                Self { pattern: None }
            }
        }
    }
}

impl SentenceFeature for TimePatternFeature {
    fn name(&self) -> &'static str {
        "time_pattern"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        match self.pattern {
            Some(ref regex) if regex.is_match(&record.text) => 1.0,
            _ => 0.0,
        }
    }
}

/// 中英混写分
pub struct MixedScriptFeature {
    language: LanguageProfile,
}

impl MixedScriptFeature {
    pub fn new(language: &LanguageProfile) -> Self {
        Self {
            language: language.clone(),
        }
    }
}

impl SentenceFeature for MixedScriptFeature {
    fn name(&self) -> &'static str {
        "mixed_script"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        let has_latin = record.text.chars().any(is_latin_letter);
        let has_native = record
            .text
            .chars()
            .any(|c| self.language.is_native_script(c));
        if has_latin && has_native {
            1.0
        } else {
            0.0
        }
    }
}

/// 首句分
pub struct LeadPositionFeature;

impl SentenceFeature for LeadPositionFeature {
    fn name(&self) -> &'static str {
        "lead_position"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        if record.is_lead() {
            0.5
        } else {
            0.0
        }
    }
}

/// 疑问句惩罚
pub struct QuestionEndingFeature {
    question_marks: Vec<char>,
}

impl QuestionEndingFeature {
    pub fn new(question_marks: &[char]) -> Self {
        Self {
            question_marks: question_marks.to_vec(),
        }
    }
}

impl SentenceFeature for QuestionEndingFeature {
    fn name(&self) -> &'static str {
        "question_ending"
    }

    fn evaluate(&self, record: &SentenceRecord) -> f64 {
        match record.text.chars().last() {
            Some(last) if self.question_marks.contains(&last) => -1.0,
            _ => 0.0,
        }
    }
}

/// 默认特征表（按评估顺序）
pub fn default_features(config: &SummaryConfig) -> Vec<Box<dyn SentenceFeature>> {
    vec![
        Box::new(LengthBandFeature),
        Box::new(KeywordFeature::new(&config.keywords)),
        Box::new(DigitFeature),
        Box::new(TimePatternFeature::new(&config.language.time_separators)),
        Box::new(MixedScriptFeature::new(&config.language)),
        Box::new(LeadPositionFeature),
        Box::new(QuestionEndingFeature::new(&config.language.question_marks)),
    ]
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('Ａ'..='Ｚ').contains(&c) || ('ａ'..='ｚ').contains(&c)
}
