pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod detection;
pub mod history;
pub mod input;
pub mod normalization;
pub mod remote;
pub mod statistics;
pub mod verdict;

pub use analyzer::{analyze, HeuristicAnalyzer, ScanReport};
pub use classifier::{compare, Comparison, ContentClassifier};
pub use config::PhishGuardConfig;
pub use detection::{DetectorResult, SignalCategory, CATALOGUE};
pub use history::{HistoryStore, JsonFileStore, MemoryStore, ScanHistory, ScanRecord};
pub use input::{InputError, ScanInput};
pub use remote::RemoteClassifier;
pub use statistics::DashboardStats;
pub use verdict::{AnalysisOutput, Status};
