use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{Layout, Operation};

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 运算类型
    pub operation: Operation,
    /// 每道题的运算数个数
    pub num_values: usize,
    /// 每个运算数的位数，例如 "3x2x1"
    pub num_numerals: String,
    /// 是否启用上限
    pub max_limit_enabled: bool,
    /// 每个运算数的上限，例如 "500x9" 或 "50"
    pub max_value_limit: String,
    /// 是否生成小数
    pub include_decimal: bool,
    /// 小数位数
    pub decimal_places: u32,
    /// 竖式或横式
    pub orientation: Layout,
    /// 除法是否使用长除法题面（未设置时除法默认开启）
    pub long_division: Option<bool>,
    /// 题目数量
    pub num_questions: usize,
    /// 随机数种子，设置后结果可复现
    pub rng_seed: Option<u64>,
    /// 输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operation: Operation::Addition,
            num_values: 2,
            num_numerals: "2".to_string(),
            max_limit_enabled: false,
            max_value_limit: String::new(),
            include_decimal: false,
            decimal_places: 2,
            orientation: Layout::Traditional,
            long_division: None,
            num_questions: 12,
            rng_seed: None,
            output_dir: "output".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env()
    }

    /// 从 TOML 文件读取，缺少的字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            AppError::from(ConfigError::FileParseFailed {
                path: path.display().to_string(),
                source,
            })
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 使用环境变量覆盖
    pub fn with_env(self) -> AppResult<Self> {
        let lookup = |name: &str| std::env::var(name).ok();
        Ok(self.with_overrides(lookup)?)
    }

    /// 使用给定的变量来源覆盖配置
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = self;
        Ok(Self {
            operation: match lookup("OPERATION") {
                Some(value) => Operation::find(&value)
                    .ok_or(ConfigError::UnknownOperation { value })?,
                None => default.operation,
            },
            num_values: parse_var(&lookup, "NUM_VALUES")?.unwrap_or(default.num_values),
            num_numerals: lookup("NUM_NUMERALS").unwrap_or(default.num_numerals),
            max_limit_enabled: parse_var(&lookup, "MAX_LIMIT_ENABLED")?
                .unwrap_or(default.max_limit_enabled),
            max_value_limit: lookup("MAX_VALUE_LIMIT").unwrap_or(default.max_value_limit),
            include_decimal: parse_var(&lookup, "INCLUDE_DECIMAL")?
                .unwrap_or(default.include_decimal),
            decimal_places: parse_var(&lookup, "DECIMAL_PLACES")?.unwrap_or(default.decimal_places),
            orientation: match lookup("ORIENTATION") {
                Some(value) => Layout::find(&value).ok_or(ConfigError::UnknownLayout { value })?,
                None => default.orientation,
            },
            long_division: parse_var(&lookup, "LONG_DIVISION")?.or(default.long_division),
            num_questions: parse_var(&lookup, "NUM_QUESTIONS")?.unwrap_or(default.num_questions),
            rng_seed: parse_var(&lookup, "RNG_SEED")?.or(default.rng_seed),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING")?
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 启用小数时返回小数位数
    pub fn decimal_places_enabled(&self) -> Option<u32> {
        self.include_decimal.then_some(self.decimal_places)
    }

    /// 长除法只用于除法，除法默认开启
    pub fn long_division_enabled(&self) -> bool {
        self.operation == Operation::Division && self.long_division.unwrap_or(true)
    }

    pub fn worksheet_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join("worksheet.html")
    }

    pub fn answer_key_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join("answer_key.html")
    }

    /// 生成页与答案页之间交接批次的文件
    pub fn batch_store_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join("math_answers.json")
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_toml_uses_defaults_for_missing_fields() {
        let config = Config::from_toml_str(
            r#"
            operation = "division"
            num_numerals = "3x1"
            num_questions = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.operation, Operation::Division);
        assert_eq!(config.num_values, 2);
        assert_eq!(config.num_questions, 6);
        assert!(config.long_division_enabled());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_overrides(vars(&[
                ("OPERATION", "subtraction"),
                ("NUM_NUMERALS", "3"),
                ("INCLUDE_DECIMAL", "true"),
                ("DECIMAL_PLACES", "1"),
                ("ORIENTATION", "inline"),
                ("RNG_SEED", "99"),
            ]))
            .unwrap();
        assert_eq!(config.operation, Operation::Subtraction);
        assert_eq!(config.decimal_places_enabled(), Some(1));
        assert_eq!(config.orientation, Layout::Inline);
        assert_eq!(config.rng_seed, Some(99));
        assert!(!config.long_division_enabled());
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let err = Config::default()
            .with_overrides(vars(&[("NUM_QUESTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));

        let err = Config::default()
            .with_overrides(vars(&[("OPERATION", "modulo")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOperation { .. }));
    }

    #[test]
    fn test_long_division_can_be_turned_off() {
        let config = Config {
            operation: Operation::Division,
            long_division: Some(false),
            ..Config::default()
        };
        assert!(!config.long_division_enabled());
    }
}
