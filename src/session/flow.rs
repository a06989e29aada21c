//! 三步流程编排
//!
//! Upload(1) → Generate(2) → Result(3)，配额耗尽时进入 LimitReached。
//! LimitReached 是终态；状态不对的事件被拒绝，步骤保持不变。

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::FlowError;
use crate::services::QuotaSnapshot;

/// 当前步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStep {
    /// 上传聊天记录
    #[default]
    Upload,
    /// 输入提示词
    Generate,
    /// 展示结果，可继续生成
    Result,
    /// 配额耗尽
    LimitReached,
}

impl FlowStep {
    /// 步骤指示器上的编号，LimitReached 没有编号
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Upload => Some(1),
            Self::Generate => Some(2),
            Self::Result => Some(3),
            Self::LimitReached => None,
        }
    }

    pub fn can_generate(&self) -> bool {
        matches!(self, Self::Generate | Self::Result)
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "Upload"),
            Self::Generate => write!(f, "Generate"),
            Self::Result => write!(f, "Result"),
            Self::LimitReached => write!(f, "LimitReached"),
        }
    }
}

/// 生成请求的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateGate {
    /// 可以发起请求
    Proceed,
    /// 配额耗尽，已切到 LimitReached
    LimitReached,
}

/// 步骤编排器
#[derive(Debug, Default)]
pub struct StepOrchestrator {
    step: FlowStep,
}

impl StepOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// 摄取成功
    pub fn on_ingested(&mut self) -> Result<FlowStep, FlowError> {
        self.ensure(self.step == FlowStep::Upload, "finish ingestion")?;
        self.move_to(FlowStep::Generate);
        Ok(self.step)
    }

    /// 请求生成，配额已耗尽时直接进入 LimitReached
    pub fn request_generate(&mut self, quota_available: bool) -> Result<GenerateGate, FlowError> {
        self.ensure(self.step.can_generate(), "generate")?;
        if quota_available {
            Ok(GenerateGate::Proceed)
        } else {
            self.move_to(FlowStep::LimitReached);
            Ok(GenerateGate::LimitReached)
        }
    }

    /// 生成成功
    pub fn on_generated(&mut self) -> Result<FlowStep, FlowError> {
        self.ensure(self.step.can_generate(), "show a result")?;
        self.move_to(FlowStep::Result);
        Ok(self.step)
    }

    /// 配额观察者报告耗尽，任何步骤都切到 LimitReached
    pub fn on_quota_exhausted(&mut self) -> FlowStep {
        if self.step != FlowStep::LimitReached {
            self.move_to(FlowStep::LimitReached);
        }
        self.step
    }

    fn ensure(&self, allowed: bool, event: &'static str) -> Result<(), FlowError> {
        if allowed {
            Ok(())
        } else {
            tracing::warn!(step = %self.step, event, "[FLOW] 拒绝当前步骤不允许的事件");
            Err(FlowError::InvalidTransition {
                step: self.step.to_string(),
                event,
            })
        }
    }

    fn move_to(&mut self, next: FlowStep) {
        tracing::info!("[FLOW] {} -> {}", self.step, next);
        self.step = next;
    }
}

/// 启动配额观察任务
///
/// 当前值已耗尽时立即切换；之后每次计数变化都重新判断。发送端关闭后任务退出
pub fn spawn_quota_observer(
    orchestrator: Arc<RwLock<StepOrchestrator>>,
    mut rx: watch::Receiver<QuotaSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let snapshot = *rx.borrow_and_update();
            if snapshot.is_exhausted() {
                let step = orchestrator.write().on_quota_exhausted();
                tracing::debug!(
                    "[FLOW] 配额观察者: {}/{} -> {}",
                    snapshot.count,
                    snapshot.limit,
                    step
                );
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
