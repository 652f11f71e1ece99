use crate::summarizer::assembler::Assembler;
use crate::summarizer::config::SummaryConfig;
use crate::summarizer::scoring_engine::ScoringEngine;
use crate::summarizer::segmenter::Segmenter;
use crate::summarizer::selector::SentenceSelector;
use crate::summarizer::types::*;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("摘要引擎异常终止: {0}")]
    Panicked(String),
    #[error("摘要失败: {0}")]
    Failed(String),
}

/// 摘要引擎
/// Entry Store 只依赖这个接口，产出字符串或失败信号
pub trait SummaryEngine: Send + Sync {
    fn name(&self) -> &str;

    fn try_summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// 规则摘要器
/// Segmenter → ScoringEngine → SentenceSelector → Assembler 单向流水线，
/// 不持有可变状态，可在多个线程间共享
pub struct RuleBasedSummarizer {
    config: SummaryConfig,
    segmenter: Segmenter,
    scorer: ScoringEngine,
    selector: SentenceSelector,
    assembler: Assembler,
}

impl RuleBasedSummarizer {
    pub fn new(config: SummaryConfig) -> Self {
        let segmenter = Segmenter::new(&config.language);
        let scorer = ScoringEngine::new(&config);
        let selector = SentenceSelector::new(&config);

        Self {
            config,
            segmenter,
            scorer,
            selector,
            assembler: Assembler::new(),
        }
    }

    /// 替换评分引擎（自定义特征表）
    pub fn with_scorer(mut self, scorer: ScoringEngine) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// 生成摘要
    ///
    /// 对任意输入都返回结果：空白输入得到空串，短文原样返回
    pub fn summarize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        if trimmed.chars().count() <= self.config.effective_min_length() {
            return trimmed.to_string();
        }

        self.assembler.assemble(self.selection(trimmed))
    }

    /// 选出的句子（已按原文顺序排列）
    ///
    /// 不做短文短路，供 `summarize` 与 `--explain` 共用
    pub fn selection(&self, text: &str) -> Vec<SelectedSentence> {
        let mut selection = self.select_sentences(text.trim());
        selection.sort_by_key(|s| s.original_index);
        selection
    }

    /// 每个句子的评分明细
    pub fn explain(&self, text: &str) -> Vec<ScoreBreakdown> {
        self.segmenter
            .segment(text.trim())
            .iter()
            .map(|record| self.scorer.explain(record))
            .collect()
    }

    fn select_sentences(&self, text: &str) -> Vec<SelectedSentence> {
        let records = self.segmenter.segment(text);
        let scored = self.scorer.score_all(records);
        let selection = self.selector.select(&scored);

        log::debug!(
            "摘要：{} 个句子中选出 {} 个",
            scored.len(),
            selection.len()
        );

        selection
    }
}

impl Default for RuleBasedSummarizer {
    fn default() -> Self {
        Self::new(SummaryConfig::default())
    }
}

impl SummaryEngine for RuleBasedSummarizer {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn try_summarize(&self, text: &str) -> Result<String, SummarizeError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.summarize(text)))
            .map_err(|payload| SummarizeError::Panicked(panic_message(payload.as_ref())))
    }
}

/// 使用给定配置生成摘要
pub fn summarize(text: &str, config: &SummaryConfig) -> String {
    RuleBasedSummarizer::new(config.clone()).summarize(text)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "未知错误".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::features::SentenceFeature;

    struct Exploding;

    impl SentenceFeature for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn evaluate(&self, _record: &SentenceRecord) -> f64 {
            panic!("特征计算失败")
        }
    }

    #[test]
    fn test_blank_input() {
        let summarizer = RuleBasedSummarizer::default();
        assert_eq!(summarizer.summarize(""), "");
        assert_eq!(summarizer.summarize("  \n\n\t "), "");
    }

    #[test]
    fn test_short_input_returned_trimmed() {
        let summarizer = RuleBasedSummarizer::default();
        assert_eq!(summarizer.summarize("\n  今日は楽しかった。 \n"), "今日は楽しかった。");
    }

    #[test]
    fn test_try_summarize_ok() {
        let summarizer = RuleBasedSummarizer::default();
        assert_eq!(summarizer.try_summarize("短い。").unwrap(), "短い。");
        assert_eq!(summarizer.name(), "rule-based");
    }

    #[test]
    fn test_try_summarize_catches_panic() {
        let scorer = ScoringEngine::with_features(vec![Box::new(Exploding)]);
        let summarizer = RuleBasedSummarizer::default().with_scorer(scorer);
        let text = "長い文章です。".repeat(30);

        match summarizer.try_summarize(&text) {
            Err(SummarizeError::Panicked(message)) => assert!(message.contains("特征计算失败")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_min_length_capped_by_max_length() {
        let mut config = SummaryConfig::default();
        config.min_length = 1000;
        config.max_length = 20;
        let summarizer = RuleBasedSummarizer::new(config);

        let summary = summarizer.summarize(&"ことば。".repeat(20));
        assert!(summary.chars().count() <= 20);
    }

    #[test]
    fn test_explain_lists_every_sentence() {
        let summarizer = RuleBasedSummarizer::default();
        let breakdown = summarizer.explain("一文目。二文目。\n\n三文目？");

        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[2].text, "三文目？");
        assert!(breakdown[2].features.iter().any(|f| f.name == "question_ending"));
    }

    #[test]
    fn test_free_function_uses_config() {
        let mut config = SummaryConfig::default();
        config.min_length = 0;
        config.max_length = 10;
        let summary = summarize("あいうえおかきくけこさしすせそ", &config);

        assert_eq!(summary, "あいうえおかき...");
    }
}
