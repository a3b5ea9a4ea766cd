//! # Arithmetic Worksheet
//!
//! 一个用于生成口算练习题和答案页的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有随机数来源和批次存储，只暴露能力
//! - `RandomSource` - 均匀分布随机数，可注入固定序列用于测试
//! - `BatchStore` - 题目批次的整体写入和一次性读取
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Question
//! - `bounds_resolver` - 数位和上限 → 取值范围
//! - `number_generator` - 在范围内抽取操作数
//! - `operation_engine` - 调整操作数并计算答案
//! - `step_formatter` - 竖式计算步骤
//! - `markup` - 题目页和答案页排版
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整生成流程
//! - `GenerationCtx` - 上下文封装（运算 + 每一项的取值范围）
//! - `QuestionFlow` - 流程编排（generate → apply → steps）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量生成，管理资源
//! - `orchestrator/answer_key` - 读取批次，生成答案页
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{BatchStore, FileBatchStore, MemoryBatchStore, RandomSource, StdRandom};
pub use models::{Layout, Number, Operation, Question, QuestionBatch, StepTrace};
pub use orchestrator::{generate_batch, take_answer_key, App};
pub use workflow::{GenerationCtx, QuestionFlow};
