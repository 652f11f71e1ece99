use serde::{Deserialize, Serialize};

/// 句子记录
/// Segmenter 输出的最小单元，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub text: String,
    pub paragraph_index: usize,     // 所在段落序号（只计入产生了句子的段落）
    pub is_first_in_paragraph: bool,
    pub original_index: usize,      // 在整个切分序列中的位置，用于按原文顺序重组
}

impl SentenceRecord {
    /// 句子长度（按字符计）
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// 是否为全文第一段的第一句
    pub fn is_lead(&self) -> bool {
        self.paragraph_index == 0 && self.is_first_in_paragraph
    }
}

/// 带评分的句子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub record: SentenceRecord,
    pub score: f64,
}

/// 被选中的句子
/// `text` 通常是原句本身；强制截断时为截断后的文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSentence {
    pub original_index: usize,
    pub text: String,
    pub truncated: bool,
}

impl SelectedSentence {
    /// 原样选入
    pub fn verbatim(sentence: &ScoredSentence) -> Self {
        Self {
            original_index: sentence.record.original_index,
            text: sentence.record.text.clone(),
            truncated: false,
        }
    }
}

/// 单个特征的得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub name: String,
    pub value: f64,
}

/// Debug 评分数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub original_index: usize,
    pub text: String,
    pub features: Vec<FeatureScore>,
    pub total_score: f64,
}
