//! 路径搜索引擎的错误类型

use thiserror::Error;

/// 引擎内部可能出现的错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeciderError {
    /// 输入不合法：缺少端点、报价列表混杂、参数越界等
    #[error("Validation error: {0}")]
    Validation(String),

    /// 数据无法使用：价格解析失败、中位价 <= 0 等
    #[error("Data error: {0}")]
    Data(String),

    /// 外部数据源失败（读取/解析行情快照等）
    #[error("Provider error: {0}")]
    Provider(String),
}

impl DeciderError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}

/// 引擎操作的结果类型
pub type DeciderResult<T> = Result<T, DeciderError>;
