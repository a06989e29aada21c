pub mod meme_model;
pub mod prompt_model;
pub mod upload_model;

pub use meme_model::{
    ContextExcerpt, ErrorBody, GenerateRequest, GenerateResponse, GeneratedMeme, PingResponse,
};
pub use prompt_model::{PromptDraft, PromptSuggestion, PROMPT_SUGGESTIONS};
pub use upload_model::{FileKind, IngestResponse, IngestedSession, UploadCandidate};
