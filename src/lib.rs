pub mod config;
pub mod engine;
pub mod message;
pub mod normalize;
pub mod reputation;
pub mod rules;
pub mod samples;
pub mod spam;

pub use config::{ClassificationSettings, Config, ProcessingSettings, ReputationLists};
pub use engine::ClassificationEngine;
pub use message::{Category, ClassificationResult, Email, MatchedRule};
pub use rules::{Condition, ConditionKind, Field, Operator, Rule, ValueSpec};
