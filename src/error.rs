use thiserror::Error;

use crate::models::Operation;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 取值范围错误
    #[error("范围错误: {0}")]
    Range(#[from] RangeError),
    /// 题目生成错误
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 题目批次存取错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
///
/// 在开始生成之前报告，不会产生半成品批次
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数位设置含有非法字符
    #[error("数位设置 '{input}' 只允许数字和 'x'")]
    InvalidCharacters { input: String },
    /// 数位不是正整数
    #[error("无法解析数位 '{token}'，需要正整数")]
    InvalidDigitCount { token: String },
    /// 数位过大
    #[error("数位 {digits} 超过上限 {max}")]
    DigitCountTooLarge { digits: u32, max: u32 },
    /// 小数位数过大
    #[error("小数位数 {places} 超过上限 {max}")]
    DecimalPlacesTooLarge { places: u32, max: u32 },
    /// 数位个数与运算数个数不一致
    #[error("需要 {expected} 个数位设置 (例如 3x2x1)，实际为 {found}")]
    TermCountMismatch { expected: usize, found: usize },
    /// 上限不是整数
    #[error("无法解析上限 '{token}'")]
    InvalidCap { token: String },
    /// 运算数个数为 0
    #[error("运算数个数必须大于 0")]
    ZeroOperandCount,
    /// 运算只支持固定个数的运算数
    #[error("{operation} 需要 {expected} 个运算数，实际为 {found}")]
    ArityMismatch {
        operation: Operation,
        expected: usize,
        found: usize,
    },
    /// 未知运算
    #[error("未知运算: {value}")]
    UnknownOperation { value: String },
    /// 未知排版方式
    #[error("未知排版方式: {value}")]
    UnknownLayout { value: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 取值范围错误
#[derive(Debug, Error)]
pub enum RangeError {
    /// 上限导致没有可用的取值
    #[error("第 {term} 项 ({digit_count} 位, 上限 {cap}) 没有有效取值")]
    NoValidValue {
        term: usize,
        digit_count: u32,
        cap: i128,
    },
}

/// 题目生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 运算结果超出 i128 表示范围
    #[error("{operation} 运算溢出")]
    Overflow { operation: Operation },
    /// 放大为定点整数后的运算数超出 i128 表示范围
    #[error("带 {places} 位小数的运算数超出表示范围")]
    OperandOverflow { places: u32 },
    /// 运算数个数与运算不符
    #[error("{operation} 需要 {expected} 个运算数，实际为 {found}")]
    OperandCount {
        operation: Operation,
        expected: usize,
        found: usize,
    },
}

/// 题目批次存取错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 还没有生成题目
    #[error("请先生成题目")]
    Empty,
    /// 读写存储文件失败
    #[error("读写 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(StoreError::Json(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建运算溢出错误
    pub fn overflow(operation: Operation) -> Self {
        AppError::Generation(GenerationError::Overflow { operation })
    }

    /// 是否属于需要在生成前报告给用户的配置类错误
    pub fn is_config_error(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Range(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
