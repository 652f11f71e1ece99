use crate::summarizer::config::SummaryConfig;
use crate::summarizer::fallback_strategy::FallbackStrategy;
use crate::summarizer::types::*;
use std::collections::HashSet;

/// 计算重叠率时忽略的标点
const IGNORED_PUNCTUATION: &[char] = &[
    '。', '、', '，', '．', '！', '？', '「', '」', '『', '』', '（', '）',
    '【', '】', '・', '…', '：', '；', '〜', '～', '“', '”', '‘', '’',
];

/// 重叠率超过该值视为冗余
const OVERLAP_THRESHOLD: f64 = 0.5;

/// Sentence Selector
/// 按评分贪心选择句子，同时受总长度、句数和冗余度约束
pub struct SentenceSelector {
    max_length: usize,
    max_sentences: usize,
    overlap_threshold: f64,
    fallback: FallbackStrategy,
}

impl SentenceSelector {
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            max_length: config.max_length,
            max_sentences: config.max_sentences,
            overlap_threshold: OVERLAP_THRESHOLD,
            fallback: FallbackStrategy::new(config.max_length),
        }
    }

    /// 选择句子
    ///
    /// # 参数
    /// - `sentences`: 按原文顺序排列的评分句子
    ///
    /// # 返回
    /// 选中的句子（按选入顺序，尚未恢复原文顺序）
    pub fn select(&self, sentences: &[ScoredSentence]) -> Vec<SelectedSentence> {
        match sentences.len() {
            0 => return Vec::new(),
            1 => return vec![self.fallback.bound_sentence(&sentences[0])],
            _ => {}
        }

        // 稳定排序：分数降序，同分按原文顺序
        let mut ranked: Vec<&ScoredSentence> = sentences.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.record.original_index.cmp(&b.record.original_index))
        });

        let mut selected: Vec<SelectedSentence> = Vec::new();
        let mut accepted_chars: Vec<HashSet<char>> = Vec::new();
        let mut used_length = 0;

        for candidate in ranked {
            if selected.len() >= self.max_sentences {
                break;
            }

            let length = candidate.record.char_len();
            if used_length + length > self.max_length {
                if selected.is_empty() {
                    // 保证结果非空：强制选入截断后的版本并结束
                    selected.push(self.fallback.bound_sentence(candidate));
                    break;
                }
                continue;
            }

            let chars = distinct_chars(&candidate.record.text);
            if self.is_redundant(&chars, &accepted_chars) {
                log::debug!(
                    "跳过冗余句子 #{}: {}",
                    candidate.record.original_index,
                    candidate.record.text
                );
                continue;
            }

            used_length += length;
            accepted_chars.push(chars);
            selected.push(SelectedSentence::verbatim(candidate));
        }

        if selected.is_empty() {
            return self.fallback.first_sentence(sentences).into_iter().collect();
        }

        selected
    }

    /// 与任一已选句子重叠率过高即为冗余
    fn is_redundant(&self, candidate: &HashSet<char>, accepted: &[HashSet<char>]) -> bool {
        accepted
            .iter()
            .any(|chars| overlap_ratio(candidate, chars) > self.overlap_threshold)
    }
}

impl Default for SentenceSelector {
    fn default() -> Self {
        Self::new(&SummaryConfig::default())
    }
}

/// 句子的去重字符集合（不含空白与常见标点）
pub fn distinct_chars(text: &str) -> HashSet<char> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| !c.is_ascii_punctuation() && !IGNORED_PUNCTUATION.contains(c))
        .collect()
}

/// 重叠率 = |候选 ∩ 已选| / |候选|
///
/// 候选集合为空时返回 0
pub fn overlap_ratio(candidate: &HashSet<char>, accepted: &HashSet<char>) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    let shared = candidate.intersection(accepted).count();
    shared as f64 / candidate.len() as f64
}
