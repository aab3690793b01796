//! # flsub CLI Library
//!
//! 記述論理の概念式をコマンドラインから正規化・包摂判定するための
//! インターフェース

pub mod commands;
pub mod interactive;

pub use commands::*;
pub use interactive::*;
