use crate::summarizer::types::*;

/// 截断标记
pub const ELLIPSIS: &str = "...";

/// Fallback Strategy
/// 选择无法正常进行时的降级处理：单句过长时截断、没有选中任何句子时回退到首句
pub struct FallbackStrategy {
    max_length: usize,
}

impl FallbackStrategy {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// 把文本限制在 `max_length` 以内
    ///
    /// 超长时保留前 `max_length - 3` 个字符并追加省略号，总长恰好为 `max_length`；
    /// `max_length` 不足以放下省略号时只做截断
    ///
    /// # 返回
    /// (限制后的文本, 是否发生截断)
    pub fn bound(&self, text: &str) -> (String, bool) {
        if text.chars().count() <= self.max_length {
            return (text.to_string(), false);
        }

        let ellipsis_len = ELLIPSIS.chars().count();
        if self.max_length <= ellipsis_len {
            return (text.chars().take(self.max_length).collect(), true);
        }

        let mut bounded: String = text.chars().take(self.max_length - ellipsis_len).collect();
        bounded.push_str(ELLIPSIS);
        (bounded, true)
    }

    /// 限制单个句子的长度
    pub fn bound_sentence(&self, sentence: &ScoredSentence) -> SelectedSentence {
        let (text, truncated) = self.bound(&sentence.record.text);
        SelectedSentence {
            original_index: sentence.record.original_index,
            text,
            truncated,
        }
    }

    /// 回退到原文顺序的第一句
    pub fn first_sentence(&self, sentences: &[ScoredSentence]) -> Option<SelectedSentence> {
        sentences
            .iter()
            .min_by_key(|s| s.record.original_index)
            .map(|s| self.bound_sentence(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_scored(text: &str, original_index: usize) -> ScoredSentence {
        ScoredSentence {
            record: SentenceRecord {
                text: text.to_string(),
                paragraph_index: 0,
                is_first_in_paragraph: original_index == 0,
                original_index,
            },
            score: 0.0,
        }
    }

    #[test]
    fn test_bound_fits() {
        let strategy = FallbackStrategy::new(10);
        let (text, truncated) = strategy.bound("短い文。");

        assert_eq!(text, "短い文。");
        assert!(!truncated);
    }

    #[test]
    fn test_bound_exact_limit() {
        let strategy = FallbackStrategy::new(5);
        let (text, truncated) = strategy.bound("あいうえお");

        assert_eq!(text, "あいうえお");
        assert!(!truncated);
    }

    #[test]
    fn test_bound_truncates_with_ellipsis() {
        let strategy = FallbackStrategy::new(200);
        let long = "長".repeat(250);
        let (text, truncated) = strategy.bound(&long);

        assert!(truncated);
        assert_eq!(text.chars().count(), 200);
        assert_eq!(text, format!("{}...", "長".repeat(197)));
    }

    #[test]
    fn test_bound_tiny_limit() {
        let strategy = FallbackStrategy::new(2);
        let (text, truncated) = strategy.bound("あいうえお");

        assert_eq!(text, "あい");
        assert!(truncated);
    }

    #[test]
    fn test_first_sentence_uses_document_order() {
        let strategy = FallbackStrategy::new(200);
        let sentences = vec![create_scored("二文目。", 1), create_scored("一文目。", 0)];

        let selected = strategy.first_sentence(&sentences).unwrap();
        assert_eq!(selected.original_index, 0);
        assert_eq!(selected.text, "一文目。");
        assert!(!selected.truncated);
    }

    #[test]
    fn test_first_sentence_truncated() {
        let strategy = FallbackStrategy::new(8);
        let sentences = vec![create_scored("とても長い最初の一文です。", 0)];

        let selected = strategy.first_sentence(&sentences).unwrap();
        assert_eq!(selected.text, "とても長い...");
        assert!(selected.truncated);
    }

    #[test]
    fn test_first_sentence_empty() {
        let strategy = FallbackStrategy::new(200);
        assert!(strategy.first_sentence(&[]).is_none());
    }
}
