/// 运算类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// 加法
    Addition,
    /// 减法
    Subtraction,
    /// 乘法
    Multiplication,
    /// 除法
    Division,
}

impl Operation {
    /// 获取标准标签
    pub fn label(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    /// 获取中文名称
    pub fn name(self) -> &'static str {
        match self {
            Operation::Addition => "加法",
            Operation::Subtraction => "减法",
            Operation::Multiplication => "乘法",
            Operation::Division => "除法",
        }
    }

    /// 公式中使用的运算符（TeX）
    pub fn tex_symbol(self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "-",
            Operation::Multiplication => "\\times",
            Operation::Division => "\\div",
        }
    }

    /// 答案页纯文本中使用的运算符
    pub fn plain_symbol(self) -> &'static str {
        match self {
            Operation::Addition => " + ",
            Operation::Subtraction => " - ",
            Operation::Multiplication => " × ",
            Operation::Division => " ÷ ",
        }
    }

    /// 是否只支持两个运算数
    pub fn requires_two_operands(self) -> bool {
        matches!(self, Operation::Division)
    }

    /// 尝试从字符串解析运算（支持标签、中文和符号）
    pub fn find(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" | "add" | "plus" | "+" | "加法" | "加" => Some(Operation::Addition),
            "subtraction" | "sub" | "minus" | "-" | "减法" | "减" => {
                Some(Operation::Subtraction)
            }
            "multiplication" | "mul" | "times" | "*" | "x" | "×" | "乘法" | "乘" => {
                Some(Operation::Multiplication)
            }
            "division" | "div" | "/" | "÷" | "除法" | "除" => Some(Operation::Division),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 题目排版方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// 竖式
    #[default]
    Traditional,
    /// 横式
    Inline,
}

impl Layout {
    pub fn find(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "traditional" | "vertical" | "竖式" => Some(Layout::Traditional),
            "inline" | "horizontal" | "横式" => Some(Layout::Inline),
            _ => None,
        }
    }
}
