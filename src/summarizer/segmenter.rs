use crate::summarizer::config::LanguageProfile;
use crate::summarizer::types::SentenceRecord;

/// Segmenter
/// 把原文切分为带位置信息的句子序列
pub struct Segmenter {
    terminals: Vec<char>,
}

impl Segmenter {
    pub fn new(language: &LanguageProfile) -> Self {
        Self {
            terminals: language.sentence_terminals.clone(),
        }
    }

    /// 切分原文
    ///
    /// - 连续两个及以上换行为段落边界
    /// - 段内按单个换行分行，空白行丢弃
    /// - 行内在句末符号之后断句，符号保留在前一句
    ///
    /// # 参数
    /// - `text`: 原文
    ///
    /// # 返回
    /// 按原文顺序排列的句子记录，`original_index` 从 0 连续递增
    pub fn segment(&self, text: &str) -> Vec<SentenceRecord> {
        let normalized = text.replace("\r\n", "\n");
        let mut records: Vec<SentenceRecord> = Vec::new();
        let mut paragraph_index = 0;
        let mut paragraph_has_sentence = false;

        for line in normalized.split('\n') {
            // 空字符串意味着两个换行相邻，即段落边界
            if line.is_empty() {
                if paragraph_has_sentence {
                    paragraph_index += 1;
                    paragraph_has_sentence = false;
                }
                continue;
            }

            for sentence in self.split_sentences(line) {
                let original_index = records.len();
                records.push(SentenceRecord {
                    text: sentence.to_string(),
                    paragraph_index,
                    is_first_in_paragraph: !paragraph_has_sentence,
                    original_index,
                });
                paragraph_has_sentence = true;
            }
        }

        records
    }

    /// 行内断句
    fn split_sentences<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut chars = line.char_indices().peekable();

        while let Some((_, ch)) = chars.next() {
            if !self.is_terminal(ch) {
                continue;
            }
            // 连续的句末符号（如“！？”）归入同一句
            while let Some(&(_, next)) = chars.peek() {
                if !self.is_terminal(next) {
                    break;
                }
                chars.next();
            }
            let end = chars.peek().map_or(line.len(), |&(idx, _)| idx);
            pieces.push(&line[start..end]);
            start = end;
        }

        if start < line.len() {
            pieces.push(&line[start..]);
        }

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn is_terminal(&self, ch: char) -> bool {
        self.terminals.contains(&ch)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&LanguageProfile::default())
    }
}
