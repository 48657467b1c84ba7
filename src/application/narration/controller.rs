//! Narration Controller - 朗读播放控制器
//!
//! 每个听众一个实例。负责：
//! - 构建片段并逐段请求合成（有界并发，结果按顺序处理）
//! - 通过 epoch 丢弃被新请求取代的迟到响应
//! - 驱动 PlaybackSession 状态机并向渲染端发命令
//! - 会话替换或关闭时释放全部音频句柄

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{stream, StreamExt};
use tokio::sync::Mutex;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioHandleStorePort, AudioRendererPort, HexagramRepositoryPort, RenderCommand,
    SpeechSynthesisPort, SynthesisError, SynthesizedAudio,
};
use crate::domain::hexagram::{HexagramNumber, Language};
use crate::domain::narration::{
    build_segments, build_text_segments, ChunkConfig, NarrationSegment,
};
use crate::domain::playback::{
    EndedOutcome, HandleId, PlayAction, PlaybackSession, PlaybackSnapshot, SessionId, Step,
};

/// 默认同时进行的合成请求数
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 3;

/// 朗读目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationTarget {
    Hexagram(HexagramNumber),
    Text(String),
}

/// 控制器配置
#[derive(Debug, Clone)]
pub struct NarrationConfig {
    /// 同时进行的合成请求上限
    pub max_concurrent_requests: usize,
    /// 自由文本分块参数
    pub chunk: ChunkConfig,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            chunk: ChunkConfig::default(),
        }
    }
}

/// 已建立但尚未加载音频的会话
#[derive(Debug, Clone)]
pub struct PreparedNarration {
    pub session_id: SessionId,
    pub epoch: u64,
    pub segments: Vec<NarrationSegment>,
}

impl PreparedNarration {
    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }
}

struct ControllerState {
    session: Option<PlaybackSession>,
    /// 静音跨会话保留
    is_muted: bool,
}

pub struct NarrationController {
    listener_id: String,
    config: NarrationConfig,
    hexagrams: Arc<dyn HexagramRepositoryPort>,
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    store: Arc<dyn AudioHandleStorePort>,
    renderer: Arc<dyn AudioRendererPort>,
    /// 每次新请求或关闭时递增
    epoch: AtomicU64,
    state: Mutex<ControllerState>,
}

impl NarrationController {
    pub fn new(
        listener_id: impl Into<String>,
        config: NarrationConfig,
        hexagrams: Arc<dyn HexagramRepositoryPort>,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        store: Arc<dyn AudioHandleStorePort>,
        renderer: Arc<dyn AudioRendererPort>,
    ) -> Self {
        Self {
            listener_id: listener_id.into(),
            config,
            hexagrams,
            synthesizer,
            store,
            renderer,
            epoch: AtomicU64::new(0),
            state: Mutex::new(ControllerState {
                session: None,
                is_muted: false,
            }),
        }
    }

    pub fn listener_id(&self) -> &str {
        &self.listener_id
    }

    // ========================================================================
    // 请求朗读
    // ========================================================================

    /// 建立会话并加载全部音频
    pub async fn request_narration(
        &self,
        target: NarrationTarget,
        language: Language,
    ) -> Result<PlaybackSnapshot, ApplicationError> {
        let prepared = self.prepare(target, language).await?;
        self.load(prepared).await
    }

    /// 构建片段，替换旧会话，新会话进入 Loading
    pub async fn prepare(
        &self,
        target: NarrationTarget,
        language: Language,
    ) -> Result<PreparedNarration, ApplicationError> {
        let segments = self.build(&target, language).await?;

        let mut state = self.state.lock().await;
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(mut old) = state.session.take() {
            self.teardown(&mut old);
        }

        let session = PlaybackSession::new(epoch, language, segments.clone(), state.is_muted)?;
        let prepared = PreparedNarration {
            session_id: session.id(),
            epoch,
            segments,
        };

        tracing::info!(
            listener_id = %self.listener_id,
            session_id = %prepared.session_id,
            epoch = epoch,
            language = %language,
            total_segments = prepared.total_segments(),
            "Narration session created"
        );

        self.renderer.publish_state(&session.snapshot());
        state.session = Some(session);

        Ok(prepared)
    }

    /// 合成全部片段
    ///
    /// 请求并发进行，结果按片段顺序处理；第一个失败停止后续请求，
    /// 已完成的片段保留可播放
    pub async fn load(
        &self,
        prepared: PreparedNarration,
    ) -> Result<PlaybackSnapshot, ApplicationError> {
        let PreparedNarration {
            session_id,
            epoch,
            segments,
        } = prepared;
        let limit = self.config.max_concurrent_requests.max(1);

        let mut results = stream::iter(segments)
            .map(|segment| self.fetch(epoch, segment))
            .buffered(limit);

        while let Some((order, result)) = results.next().await {
            match result {
                Ok(Some(audio)) => self.attach(epoch, order, audio).await?,
                Ok(None) => return Err(ApplicationError::Superseded),
                Err(err) => {
                    drop(results);
                    self.fail_loading(epoch, order, &err).await?;
                    return Err(err.into());
                }
            }
        }

        let snapshot = self.finish_loading(epoch).await?;
        tracing::info!(
            listener_id = %self.listener_id,
            session_id = %session_id,
            state = %snapshot.state,
            "Narration loaded"
        );
        Ok(snapshot)
    }

    async fn build(
        &self,
        target: &NarrationTarget,
        language: Language,
    ) -> Result<Vec<NarrationSegment>, ApplicationError> {
        match target {
            NarrationTarget::Hexagram(number) => {
                let content = self
                    .hexagrams
                    .find_by_number(*number)
                    .await?
                    .ok_or_else(|| ApplicationError::not_found("Hexagram", number))?;
                Ok(build_segments(&content, language))
            }
            NarrationTarget::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ApplicationError::validation("Narration text is empty"));
                }
                let segments = build_text_segments(text, language, &self.config.chunk);
                if segments.is_empty() {
                    return Err(ApplicationError::validation(
                        "Narration text has nothing to speak",
                    ));
                }
                Ok(segments)
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    /// 合成一段；请求已过期时返回 `Ok(None)`
    async fn fetch(
        &self,
        epoch: u64,
        segment: NarrationSegment,
    ) -> (usize, Result<Option<SynthesizedAudio>, SynthesisError>) {
        if !self.is_current(epoch) {
            return (segment.order, Ok(None));
        }

        tracing::debug!(
            listener_id = %self.listener_id,
            epoch = epoch,
            segment = segment.order,
            chars = segment.text.chars().count(),
            "Synthesizing segment"
        );

        let result = self
            .synthesizer
            .synthesize(&segment.text, segment.language)
            .await;
        (segment.order, result.map(Some))
    }

    /// 把合成结果挂到会话上；会话已被替换时不分配句柄
    async fn attach(
        &self,
        epoch: u64,
        order: usize,
        audio: SynthesizedAudio,
    ) -> Result<(), ApplicationError> {
        let mut state = self.state.lock().await;
        let session = match state.session.as_mut() {
            Some(session) if session.epoch() == epoch => session,
            _ => {
                tracing::debug!(
                    listener_id = %self.listener_id,
                    epoch = epoch,
                    segment = order,
                    "Discarding stale synthesis response"
                );
                return Err(ApplicationError::Superseded);
            }
        };

        let handle = match self.store.allocate(order, audio) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(
                    listener_id = %self.listener_id,
                    segment = order,
                    error = %e,
                    "Failed to allocate audio handle, segment will be skipped"
                );
                session.mark_unplayable(order, &e)?;
                return Ok(());
            }
        };

        let handle_id = handle.id;
        match session.attach_handle(handle) {
            Ok(Some(replaced)) => self.release(&replaced.id),
            Ok(None) => {}
            Err(e) => {
                self.release(&handle_id);
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn fail_loading(
        &self,
        epoch: u64,
        order: usize,
        err: &SynthesisError,
    ) -> Result<(), ApplicationError> {
        let mut state = self.state.lock().await;
        let session = match state.session.as_mut() {
            Some(session) if session.epoch() == epoch => session,
            _ => return Err(ApplicationError::Superseded),
        };

        tracing::warn!(
            listener_id = %self.listener_id,
            session_id = %session.id(),
            segment = order,
            error = %err,
            "Synthesis failed, narration stopped loading"
        );

        session.fail(err.to_string())?;
        self.renderer.publish_state(&session.snapshot());
        Ok(())
    }

    async fn finish_loading(&self, epoch: u64) -> Result<PlaybackSnapshot, ApplicationError> {
        let mut state = self.state.lock().await;
        let session = match state.session.as_mut() {
            Some(session) if session.epoch() == epoch => session,
            _ => return Err(ApplicationError::Superseded),
        };

        if let Err(e) = session.mark_ready() {
            // 没有任何片段分配到句柄
            session.fail(e.to_string())?;
        }

        let snapshot = session.snapshot();
        self.renderer.publish_state(&snapshot);
        Ok(snapshot)
    }

    // ========================================================================
    // 传输控制
    // ========================================================================

    pub async fn play(&self) -> Result<PlaybackSnapshot, ApplicationError> {
        let mut state = self.state.lock().await;
        let session = Self::active(&mut state)?;

        match session.play()? {
            PlayAction::Start(index) => {
                self.load_segment(session, index);
                self.renderer.render(RenderCommand::Play);
            }
            PlayAction::Resume => self.renderer.render(RenderCommand::Play),
            PlayAction::AlreadyPlaying => {}
        }

        Ok(self.publish(session))
    }

    pub async fn pause(&self) -> Result<PlaybackSnapshot, ApplicationError> {
        let mut state = self.state.lock().await;
        let session = Self::active(&mut state)?;

        if session.pause()? {
            self.renderer.render(RenderCommand::Pause);
        }
        Ok(self.publish(session))
    }

    pub async fn next(&self) -> Result<PlaybackSnapshot, ApplicationError> {
        self.step(Step::Next).await
    }

    pub async fn previous(&self) -> Result<PlaybackSnapshot, ApplicationError> {
        self.step(Step::Previous).await
    }

    async fn step(&self, step: Step) -> Result<PlaybackSnapshot, ApplicationError> {
        let mut state = self.state.lock().await;
        let session = Self::active(&mut state)?;

        let index = session.step(step)?;
        self.load_segment(session, index);
        self.renderer.render(RenderCommand::Play);

        tracing::debug!(listener_id = %self.listener_id, segment = index, "Jumped to segment");
        Ok(self.publish(session))
    }

    /// 静音不影响播放状态，没有会话时也会记住
    pub async fn set_muted(&self, muted: bool) -> PlaybackSnapshot {
        let mut state = self.state.lock().await;
        state.is_muted = muted;
        self.renderer.render(RenderCommand::SetMuted { muted });

        match state.session.as_mut() {
            Some(session) => {
                session.set_muted(muted);
                self.publish(session)
            }
            None => {
                let snapshot = PlaybackSnapshot::idle(muted);
                self.renderer.publish_state(&snapshot);
                snapshot
            }
        }
    }

    /// 渲染端报告某段播放完毕
    pub async fn on_segment_ended(
        &self,
        session_id: SessionId,
        segment_index: usize,
    ) -> PlaybackSnapshot {
        let mut state = self.state.lock().await;
        let is_muted = state.is_muted;
        let session = match state.session.as_mut() {
            Some(session) if session.id() == session_id => session,
            Some(session) => return session.snapshot(),
            None => return PlaybackSnapshot::idle(is_muted),
        };

        match session.on_ended(segment_index) {
            EndedOutcome::Advanced(index) => {
                self.load_segment(session, index);
                self.renderer.render(RenderCommand::Play);
                tracing::debug!(listener_id = %self.listener_id, segment = index, "Auto-advanced");
            }
            EndedOutcome::Finished => {
                tracing::info!(
                    listener_id = %self.listener_id,
                    session_id = %session_id,
                    "Narration finished"
                );
            }
            EndedOutcome::Ignored => return session.snapshot(),
        }

        self.publish(session)
    }

    /// 渲染端上报进度；过期上报被忽略
    pub async fn on_time_update(
        &self,
        session_id: SessionId,
        segment_index: usize,
        current_time: f64,
        duration: f64,
    ) -> PlaybackSnapshot {
        let mut state = self.state.lock().await;
        let is_muted = state.is_muted;
        match state.session.as_mut() {
            Some(session) if session.id() == session_id => {
                session.update_time(segment_index, current_time, duration);
                session.snapshot()
            }
            Some(session) => session.snapshot(),
            None => PlaybackSnapshot::idle(is_muted),
        }
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.state.lock().await;
        match state.session.as_ref() {
            Some(session) => session.snapshot(),
            None => PlaybackSnapshot::idle(state.is_muted),
        }
    }

    /// 关闭会话并释放全部句柄；进行中的加载随之失效
    pub async fn close(&self) -> PlaybackSnapshot {
        let mut state = self.state.lock().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);

        if let Some(mut session) = state.session.take() {
            self.teardown(&mut session);
            tracing::info!(
                listener_id = %self.listener_id,
                session_id = %session.id(),
                "Narration session closed"
            );
        }

        let snapshot = PlaybackSnapshot::idle(state.is_muted);
        self.renderer.publish_state(&snapshot);
        snapshot
    }

    // ========================================================================
    // 内部
    // ========================================================================

    fn active(state: &mut ControllerState) -> Result<&mut PlaybackSession, ApplicationError> {
        state
            .session
            .as_mut()
            .ok_or_else(|| ApplicationError::invalid_state("No active narration"))
    }

    fn load_segment(&self, session: &PlaybackSession, index: usize) {
        if let Some(handle) = session.handle(index) {
            self.renderer.render(RenderCommand::Load {
                session_id: session.id().to_string(),
                segment_index: index,
                handle_id: handle.id.to_string(),
                content_type: handle.content_type.clone(),
            });
        }
    }

    fn publish(&self, session: &PlaybackSession) -> PlaybackSnapshot {
        let snapshot = session.snapshot();
        self.renderer.publish_state(&snapshot);
        snapshot
    }

    fn teardown(&self, session: &mut PlaybackSession) {
        self.renderer.render(RenderCommand::Stop);
        let handles = session.teardown();
        let count = handles.len();
        for handle in handles {
            self.release(&handle.id);
        }
        tracing::debug!(
            listener_id = %self.listener_id,
            session_id = %session.id(),
            released = count,
            "Session handles released"
        );
    }

    fn release(&self, id: &HandleId) {
        if let Err(e) = self.store.release(id) {
            tracing::warn!(listener_id = %self.listener_id, error = %e, "Failed to release audio handle");
        }
    }
}
