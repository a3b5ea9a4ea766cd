//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量生成和输出调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量题目生成器
//! - 管理应用生命周期（初始化、运行）
//! - 持有随机数来源和批次存储
//! - 按题目数量生成一批题（Vec<Question>）
//! - 写出题目页，输出统计信息
//!
//! ### `answer_key` - 答案页
//! - 从批次存储读取一次批次
//! - 生成并写出答案页
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 QuestionBatch)
//!     ↓
//! workflow::QuestionFlow (处理单个 Question)
//!     ↓
//! services (能力层：bounds / generator / engine / steps / markup)
//!     ↓
//! infrastructure (基础设施：RandomSource / BatchStore)
//! ```

pub mod answer_key;
pub mod batch_processor;

// 重新导出主要类型
pub use answer_key::{take_answer_key, write_answer_key};
pub use batch_processor::{generate_batch, App, RunSummary};
