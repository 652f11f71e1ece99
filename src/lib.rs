pub mod summarizer;
pub mod entry;
pub mod db;
pub mod settings;
pub mod entry_store;
pub mod encryption;
pub mod backup;

pub use summarizer::{summarize, RuleBasedSummarizer, SummaryConfig, SummaryEngine};
pub use entry::{CreateEntryParams, Entry, SummaryStatus, UpdateEntryParams};
pub use entry_store::EntryStore;
pub use db::StoreError;
