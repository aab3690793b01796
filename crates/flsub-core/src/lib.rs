//! FL 記述論理 構造的包摂推論エンジン
//!
//! このクレートは以下を提供します:
//! - 概念式モデル (⊤, ⊥, リテラル, ⊓, ⊔, ¬, ∀R.C / ∃R.C)
//! - 正規化 (否定の内側への移動, ⊔ の ⊓ 上への分配, 定数吸収)
//! - 構造的包摂アルゴリズム (FL + リテラル否定)
//! - 同値性・素性・充足可能性・全ペア包摂 (推移閉包) クエリ

pub mod model;
pub mod matcher;
pub mod query;

pub use model::Expression;
pub use matcher::{StructuralSubsumption, Subsumption};
pub use query::{transitive_closure, Classification, SubsumptionQueryProcessor};

// Error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasonerError {
    /// The matcher met a clause outside the supported fragment. This is
    /// never the same answer as "not subsumed".
    #[error("Unsupported construct {construct}: {reason}")]
    UnsupportedConstruct {
        construct: Expression,
        reason: String,
    },
}

impl ReasonerError {
    pub fn unsupported(construct: &Expression, reason: impl Into<String>) -> Self {
        ReasonerError::UnsupportedConstruct {
            construct: construct.clone(),
            reason: reason.into(),
        }
    }
}
