use crate::summarizer::types::SelectedSentence;

/// Assembler
/// 按原文位置恢复顺序并直接拼接（句子自带句末符号，不插入分隔符）
#[derive(Clone, Default)]
pub struct Assembler;

impl Assembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, mut selection: Vec<SelectedSentence>) -> String {
        selection.sort_by_key(|s| s.original_index);
        selection.into_iter().map(|s| s.text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(text: &str, original_index: usize) -> SelectedSentence {
        SelectedSentence {
            original_index,
            text: text.to_string(),
            truncated: false,
        }
    }

    #[test]
    fn test_restores_document_order() {
        let assembler = Assembler::new();
        let summary = assembler.assemble(vec![
            selected("三。", 2),
            selected("一。", 0),
            selected("二。", 1),
        ]);
        assert_eq!(summary, "一。二。三。");
    }

    #[test]
    fn test_identical_sentences_ordered_by_index() {
        let assembler = Assembler::new();
        let summary = assembler.assemble(vec![
            selected("同じ。", 4),
            selected("別。", 2),
            selected("同じ。", 0),
        ]);
        assert_eq!(summary, "同じ。別。同じ。");
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(Assembler::new().assemble(Vec::new()), "");
    }
}
