// 规则摘要模块
// 从日记正文中抽取原句，生成长度受限的摘要

pub mod types;
pub mod config;
pub mod segmenter;
pub mod features;
pub mod scoring_engine;
pub mod selector;
pub mod fallback_strategy;
pub mod assembler;
pub mod engine;


// 重新导出主要类型
pub use types::*;
pub use config::{ConfigError, LanguageProfile, SummaryConfig};
pub use segmenter::Segmenter;
pub use features::SentenceFeature;
pub use scoring_engine::ScoringEngine;
pub use selector::SentenceSelector;
pub use fallback_strategy::{FallbackStrategy, ELLIPSIS};
pub use assembler::Assembler;
pub use engine::{summarize, RuleBasedSummarizer, SummarizeError, SummaryEngine};
