//! 上传与摄取相关的数据模型

use serde::{Deserialize, Serialize};

pub const TXT_EXTENSION: &str = ".txt";
pub const ZIP_EXTENSION: &str = ".zip";

/// 上传文件的声明类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    PlainText,
    Archive,
}

impl FileKind {
    /// 根据文件名后缀判断类型（忽略大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        if has_suffix(name, TXT_EXTENSION) {
            Some(Self::PlainText)
        } else if has_suffix(name, ZIP_EXTENSION) {
            Some(Self::Archive)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Archive => "application/zip",
        }
    }
}

pub(crate) fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .map(|tail| tail.eq_ignore_ascii_case(suffix))
            .unwrap_or(false)
}

/// 用户选择的文件
///
/// 每次重新选择整体替换，摄取成功后丢弃
#[derive(Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    pub bytes: Vec<u8>,
    /// 无法识别的后缀为 None，由解压器拒绝
    pub kind: Option<FileKind>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let kind = FileKind::from_name(&name);
        Self { name, bytes, kind }
    }

    pub fn plain_text(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            kind: Some(FileKind::PlainText),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .field("kind", &self.kind)
            .finish()
    }
}

/// 摄取接口的原始响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub senders: Option<Vec<String>>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 摄取成功后的会话信息，会话期间不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedSession {
    pub group_name: String,
    /// 有序且唯一
    pub participants: Vec<String>,
}

impl IngestedSession {
    /// 构建会话，重复的参与者只保留第一次出现
    pub fn new(group_name: impl Into<String>, senders: Vec<String>) -> Self {
        let mut participants: Vec<String> = Vec::with_capacity(senders.len());
        for sender in senders {
            if !participants.contains(&sender) {
                participants.push(sender);
            }
        }
        Self {
            group_name: group_name.into(),
            participants,
        }
    }
}

impl From<IngestResponse> for IngestedSession {
    fn from(resp: IngestResponse) -> Self {
        Self::new(
            resp.group_name.unwrap_or_default(),
            resp.senders.unwrap_or_default(),
        )
    }
}
