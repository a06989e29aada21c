//! 一次完整的表情包会话
//!
//! 持有客户端、上传控制器、提示词草稿、当前图片、步骤编排器和配额服务。
//! 失败不会破坏已有状态：生成失败时保留之前的图片和步骤。

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use super::flow::{spawn_quota_observer, FlowStep, GenerateGate, StepOrchestrator};
use super::mention::{self, MentionSuggestions};
use super::upload::UploadController;
use crate::config::Config;
use crate::error::{FlowError, MemeError, QuotaError};
use crate::models::{GeneratedMeme, IngestedSession, PromptDraft, PROMPT_SUGGESTIONS};
use crate::providers::{BackendClient, ChatIngestionClient, MemeGenerationClient};
use crate::services::{QuotaService, QuotaSnapshot};

pub struct MemeSession {
    ingestion: ChatIngestionClient,
    generation: MemeGenerationClient,
    upload: UploadController,
    session: Option<IngestedSession>,
    draft: PromptDraft,
    meme: Option<GeneratedMeme>,
    flow: Arc<RwLock<StepOrchestrator>>,
    quota: Arc<QuotaService>,
    last_error: Option<String>,
    observer: Option<JoinHandle<()>>,
}

impl MemeSession {
    pub fn new(backend: BackendClient, quota: Arc<QuotaService>) -> Self {
        Self {
            ingestion: ChatIngestionClient::new(backend.clone()),
            generation: MemeGenerationClient::new(backend),
            upload: UploadController::new(),
            session: None,
            draft: PromptDraft::default(),
            meme: None,
            flow: Arc::new(RwLock::new(StepOrchestrator::new())),
            quota,
            last_error: None,
            observer: None,
        }
    }

    /// 按配置创建，配额记录保存在本地 JSON 文件
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            BackendClient::new(&config.api),
            Arc::new(QuotaService::from_config(config)),
        )
    }

    pub fn step(&self) -> FlowStep {
        self.flow.read().step()
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadController {
        &mut self.upload
    }

    pub fn session(&self) -> Option<&IngestedSession> {
        self.session.as_ref()
    }

    pub fn participants(&self) -> &[String] {
        self.session
            .as_ref()
            .map(|s| s.participants.as_slice())
            .unwrap_or_default()
    }

    pub fn draft(&self) -> &PromptDraft {
        &self.draft
    }

    pub fn meme(&self) -> Option<&GeneratedMeme> {
        self.meme.as_ref()
    }

    pub fn meme_mut(&mut self) -> Option<&mut GeneratedMeme> {
        self.meme.as_mut()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn quota(&self) -> &Arc<QuotaService> {
        &self.quota
    }

    /// 更新提示词和光标
    pub fn set_prompt(&mut self, text: impl Into<String>, cursor: usize) {
        self.draft.update(text, cursor);
    }

    /// 当前草稿的提及建议
    pub fn mention_suggestions(&self) -> Option<MentionSuggestions> {
        mention::suggest(&self.draft, self.participants())
    }

    /// 选中一条提及建议，`captured_cursor` 为建议计算时的光标
    pub fn choose_mention(&mut self, captured_cursor: usize, name: &str) -> bool {
        match mention::apply_mention(self.draft.text(), captured_cursor, name) {
            Some(draft) => {
                self.draft = draft;
                true
            }
            None => false,
        }
    }

    /// 用随机成员填充的预置提示词
    pub fn prompt_suggestions(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        PROMPT_SUGGESTIONS
            .iter()
            .map(|s| s.fill_random(self.participants(), &mut rng))
            .collect()
    }

    /// 启动配额观察任务，重复调用会替换旧任务
    pub fn watch_quota(&mut self) {
        if let Some(old) = self.observer.take() {
            old.abort();
        }
        self.observer = Some(spawn_quota_observer(
            self.flow.clone(),
            self.quota.subscribe(),
        ));
    }

    /// 读取最新配额并广播
    pub async fn refresh_quota(&self) -> Result<QuotaSnapshot, MemeError> {
        Ok(self.quota.refresh().await?)
    }

    /// 上传已选择的聊天记录，成功后进入 Generate
    pub async fn ingest(&mut self) -> Result<&IngestedSession, MemeError> {
        let step = self.step();
        if step != FlowStep::Upload {
            return Err(self.fail(
                FlowError::InvalidTransition {
                    step: step.to_string(),
                    event: "upload a chat",
                }
                .into(),
            ));
        }

        let processed = self.upload.process(&self.ingestion).await;
        let session = match processed {
            Ok(session) => session,
            Err(e) => return Err(self.fail(e)),
        };
        let advanced = self.flow.write().on_ingested();
        if let Err(e) = advanced {
            return Err(self.fail(e.into()));
        }

        self.last_error = None;
        Ok(self.session.insert(session))
    }

    /// 用当前草稿生成表情包
    ///
    /// 配额耗尽时直接进入 LimitReached，不发请求；
    /// 失败时保留之前的图片和步骤。
    ///
    /// 请求期间持有 `&mut self`，同一会话不能同时发起两次生成：
    ///
    /// ```compile_fail
    /// async fn twice(session: &mut chatmeme_lib::MemeSession) {
    ///     let first = session.generate();
    ///     let second = session.generate();
    ///     let _ = tokio::join!(first, second);
    /// }
    /// ```
    pub async fn generate(&mut self) -> Result<&GeneratedMeme, MemeError> {
        let step = self.step();
        if !step.can_generate() {
            return Err(self.fail(
                FlowError::InvalidTransition {
                    step: step.to_string(),
                    event: "generate",
                }
                .into(),
            ));
        }

        let checked = self.quota.check().await;
        let quota_available = match checked {
            Ok(_) => true,
            Err(QuotaError::Exhausted { .. }) => false,
            Err(e) => return Err(self.fail(e.into())),
        };
        let requested = self.flow.write().request_generate(quota_available);
        let gate = match requested {
            Ok(gate) => gate,
            Err(e) => return Err(self.fail(e.into())),
        };
        if gate == GenerateGate::LimitReached {
            tracing::info!("[SESSION] 配额耗尽，跳过生成请求");
            self.last_error = None;
            return Err(QuotaError::Exhausted {
                limit: self.quota.limit(),
            }
            .into());
        }

        let prompt = self.draft.text().to_string();
        let generated = self.generation.generate(&prompt).await;
        let meme = match generated {
            Ok(meme) => meme,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.last_error = None;
        let advanced = self.flow.write().on_generated();
        if let Err(e) = advanced {
            tracing::warn!("[SESSION] 生成完成但步骤未推进: {}", e);
        }

        // 计数达到上限后由观察者切到 LimitReached
        if let Err(e) = self.quota.increment().await {
            tracing::warn!("[SESSION] 更新配额失败: {}", e);
        }

        // 旧图片在这里被替换并释放
        Ok(self.meme.insert(meme))
    }

    fn fail(&mut self, err: MemeError) -> MemeError {
        if !err.is_quota_exhausted() {
            self.last_error = Some(err.to_string());
        }
        err
    }
}

impl Drop for MemeSession {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.abort();
        }
    }
}
