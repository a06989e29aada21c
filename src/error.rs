//! 错误类型
//!
//! 每个错误的 `Display` 就是展示给用户的那一行提示，
//! 在 CLI 边界统一恢复，不会让进程退出。

use thiserror::Error;

/// 上传文件归一化错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 既不是 .txt 也不是 .zip
    #[error("Please upload a .txt or .zip file")]
    UnsupportedFileType { name: String },

    /// 压缩包里没有 .txt 条目
    #[error("No .txt file found in the ZIP archive")]
    NoTextEntryInArchive,

    /// 压缩包损坏或无法读取
    #[error("Failed to extract text file from ZIP")]
    ArchiveCorrupt(#[source] zip::result::ZipError),

    /// 从磁盘读取上传文件失败
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 后端 HTTP 调用错误（摄取与生成共用）
#[derive(Debug, Error)]
pub enum ApiError {
    /// 非 2xx 状态码，message 取自响应体 error 字段或状态行
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 没有收到响应
    #[error("Could not reach the meme service. Check your connection and try again")]
    Network(#[source] reqwest::Error),

    /// 请求超时
    #[error("The meme service did not answer in time, please retry")]
    Timeout,

    /// 响应体无法解析
    #[error("Unexpected response from the meme service: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// 把 reqwest 的发送错误归类为超时或网络错误
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 表情包生成错误
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 响应里完全没有 image_data 字段
    #[error("No image data received from server")]
    MissingImageData,

    /// image_data 不是合法的十六进制串
    #[error("Received a corrupted image from server: {0}")]
    MalformedImagePayload(#[from] hex::FromHexError),

    /// 空提示词不发请求
    #[error("Describe the meme you want before generating")]
    EmptyPrompt,
}

/// 配额服务错误
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("You've reached your limit of {limit} memes")]
    Exhausted { limit: u32 },

    /// 外部计数存储失败
    #[error("Quota store error: {0}")]
    Store(String),
}

/// 流程控制错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Cannot {event} while on step {step}")]
    InvalidTransition { step: String, event: &'static str },

    #[error("Select a chat file first")]
    NoFileSelected,
}

/// 对外统一的错误分类
#[derive(Debug, Error)]
pub enum MemeError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    IngestFailed(ApiError),

    #[error(transparent)]
    GenerateFailed(#[from] GenerateError),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl MemeError {
    /// 配额耗尽是预期内的终态，由专门的界面处理，而不是错误提示
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Self::Quota(QuotaError::Exhausted { .. }))
    }
}
