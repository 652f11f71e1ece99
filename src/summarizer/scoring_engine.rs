use crate::summarizer::config::SummaryConfig;
use crate::summarizer::features::{default_features, SentenceFeature};
use crate::summarizer::types::*;

/// Scoring Engine
/// 把特征表逐项应用到句子上，总分为各项之和（不设上下限）
pub struct ScoringEngine {
    features: Vec<Box<dyn SentenceFeature>>,
}

impl ScoringEngine {
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            features: default_features(config),
        }
    }

    /// 使用自定义特征表
    pub fn with_features(features: Vec<Box<dyn SentenceFeature>>) -> Self {
        Self { features }
    }

    /// 追加特征（不影响选择与重组逻辑）
    pub fn add_feature(&mut self, feature: Box<dyn SentenceFeature>) {
        self.features.push(feature);
    }

    /// 计算单句评分
    pub fn score(&self, record: &SentenceRecord) -> f64 {
        self.features.iter().map(|f| f.evaluate(record)).sum()
    }

    /// 对整篇的句子评分，保持原顺序
    pub fn score_all(&self, records: Vec<SentenceRecord>) -> Vec<ScoredSentence> {
        records
            .into_iter()
            .map(|record| {
                let score = self.score(&record);
                ScoredSentence { record, score }
            })
            .collect()
    }

    /// 生成评分明细（只列出非零项）
    pub fn explain(&self, record: &SentenceRecord) -> ScoreBreakdown {
        let features: Vec<FeatureScore> = self
            .features
            .iter()
            .map(|f| FeatureScore {
                name: f.name().to_string(),
                value: f.evaluate(record),
            })
            .filter(|f| f.value != 0.0)
            .collect();
        let total_score = features.iter().map(|f| f.value).sum();

        ScoreBreakdown {
            original_index: record.original_index,
            text: record.text.clone(),
            features,
            total_score,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&SummaryConfig::default())
    }
}
