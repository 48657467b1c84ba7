//! Playback Context - 播放会话聚合根
//!
//! 一个会话对应一次朗读请求：持有有序片段、每段的音频句柄和传输状态。
//! 所有状态转换都在这里完成，控制器只负责 IO

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AudioHandle, PlaybackError, PlaybackSnapshot, PlaybackState};
use crate::domain::hexagram::Language;
use crate::domain::narration::NarrationSegment;

/// 会话唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `play` 需要渲染端执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    /// 装载该片段的音频并从头播放
    Start(usize),
    /// 从暂停位置继续
    Resume,
    /// 已经在播放
    AlreadyPlaying,
}

/// 片段播放结束的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedOutcome {
    /// 自动前进到该片段
    Advanced(usize),
    /// 最后一段播完
    Finished,
    /// 过期或重复的通知
    Ignored,
}

/// 手动换段方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

#[derive(Debug)]
pub struct PlaybackSession {
    id: SessionId,
    epoch: u64,
    language: Language,
    segments: Vec<NarrationSegment>,
    handles: BTreeMap<usize, AudioHandle>,
    current_index: usize,
    state: PlaybackState,
    is_muted: bool,
    current_time: f64,
    duration: f64,
    error: Option<String>,
}

impl PlaybackSession {
    /// 创建会话，初始状态为 `Loading`
    pub fn new(
        epoch: u64,
        language: Language,
        segments: Vec<NarrationSegment>,
        is_muted: bool,
    ) -> Result<Self, PlaybackError> {
        if segments.is_empty() {
            return Err(PlaybackError::NoSegments);
        }

        Ok(Self {
            id: SessionId::new(),
            epoch,
            language,
            segments,
            handles: BTreeMap::new(),
            current_index: 0,
            state: PlaybackState::Loading,
            is_muted,
            current_time: 0.0,
            duration: 0.0,
            error: None,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn segments(&self) -> &[NarrationSegment] {
        &self.segments
    }

    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn handle(&self, index: usize) -> Option<&AudioHandle> {
        self.handles.get(&index)
    }

    pub fn current_handle(&self) -> Option<&AudioHandle> {
        self.handles.get(&self.current_index)
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    // ========================================================================
    // 加载阶段
    // ========================================================================

    /// 记录某段合成完成的句柄，返回被替换的旧句柄（需要释放）
    pub fn attach_handle(
        &mut self,
        handle: AudioHandle,
    ) -> Result<Option<AudioHandle>, PlaybackError> {
        if self.state != PlaybackState::Loading {
            return Err(self.invalid("attach_handle"));
        }
        let index = handle.segment_order;
        if index >= self.segments.len() {
            return Err(PlaybackError::SegmentOutOfRange {
                index,
                total: self.segments.len(),
            });
        }
        Ok(self.handles.insert(index, handle))
    }

    /// 某段合成成功但分配句柄失败：该段不可播放，其余片段不受影响
    pub fn mark_unplayable(
        &mut self,
        index: usize,
        message: impl std::fmt::Display,
    ) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Loading {
            return Err(self.invalid("mark_unplayable"));
        }
        if index >= self.segments.len() {
            return Err(PlaybackError::SegmentOutOfRange {
                index,
                total: self.segments.len(),
            });
        }
        self.error = Some(format!("segment {} unplayable: {}", index, message));
        Ok(())
    }

    /// 加载结束，从第一个可播放片段开始；不可播放片段的错误保留在快照里
    pub fn mark_ready(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Loading {
            return Err(self.invalid("mark_ready"));
        }
        let first = self
            .playable_from(0)
            .ok_or(PlaybackError::MissingHandle(0))?;
        self.current_index = first;
        self.state = PlaybackState::Ready;
        Ok(())
    }

    /// 加载失败；已解析的句柄保留
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Loading {
            return Err(self.invalid("fail"));
        }
        self.state = PlaybackState::Error;
        self.error = Some(message.into());
        Ok(())
    }

    // ========================================================================
    // 传输控制
    // ========================================================================

    pub fn play(&mut self) -> Result<PlayAction, PlaybackError> {
        match self.state {
            PlaybackState::Playing => Ok(PlayAction::AlreadyPlaying),
            PlaybackState::Paused => {
                self.require_handle(self.current_index)?;
                self.state = PlaybackState::Playing;
                Ok(PlayAction::Resume)
            }
            PlaybackState::Ready | PlaybackState::Error => {
                let index = self
                    .playable_from(self.current_index)
                    .ok_or(PlaybackError::MissingHandle(self.current_index))?;
                self.start_at(index);
                Ok(PlayAction::Start(index))
            }
            PlaybackState::Ended => {
                let index = self.playable_from(0).ok_or(PlaybackError::MissingHandle(0))?;
                self.start_at(index);
                Ok(PlayAction::Start(index))
            }
            PlaybackState::Idle | PlaybackState::Loading => Err(self.invalid("play")),
        }
    }

    /// 暂停；已暂停时返回 `false`
    pub fn pause(&mut self) -> Result<bool, PlaybackError> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Ok(true)
            }
            PlaybackState::Paused => Ok(false),
            _ => Err(self.invalid("pause")),
        }
    }

    /// 渲染端报告片段播完
    ///
    /// 只处理当前片段且处于播放中的通知，重复的 ended 被忽略。
    /// 不可播放的片段被跳过
    pub fn on_ended(&mut self, index: usize) -> EndedOutcome {
        if self.state != PlaybackState::Playing || index != self.current_index {
            return EndedOutcome::Ignored;
        }

        if let Some(next) = self.playable_from(index + 1) {
            self.start_at(next);
            return EndedOutcome::Advanced(next);
        }

        self.state = PlaybackState::Ended;
        self.current_time = self.duration;
        EndedOutcome::Finished
    }

    /// 手动换段到相邻的可播放片段，换段后立即播放
    pub fn step(&mut self, step: Step) -> Result<usize, PlaybackError> {
        if !self.state.accepts_transport() {
            return Err(self.invalid(match step {
                Step::Next => "next",
                Step::Previous => "previous",
            }));
        }

        let total = self.segments.len();
        let target = match step {
            Step::Next => self.playable_from(self.current_index + 1).ok_or(
                PlaybackError::SegmentOutOfRange {
                    index: self.current_index + 1,
                    total,
                },
            )?,
            Step::Previous => self
                .playable_before(self.current_index)
                .ok_or(PlaybackError::SegmentOutOfRange { index: 0, total })?,
        };

        self.start_at(target);
        Ok(target)
    }

    /// 静音与播放状态无关；返回是否有变化
    pub fn set_muted(&mut self, muted: bool) -> bool {
        let changed = self.is_muted != muted;
        self.is_muted = muted;
        changed
    }

    /// 渲染端上报播放进度，非当前片段的上报被忽略
    pub fn update_time(&mut self, index: usize, current_time: f64, duration: f64) -> bool {
        if index != self.current_index
            || !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
        {
            return false;
        }
        self.duration = duration.max(0.0);
        self.current_time = current_time.max(0.0);
        true
    }

    /// 结束会话，交出全部句柄由调用方释放
    pub fn teardown(&mut self) -> Vec<AudioHandle> {
        self.state = PlaybackState::Idle;
        self.current_time = 0.0;
        self.duration = 0.0;
        std::mem::take(&mut self.handles).into_values().collect()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            session_id: Some(self.id.to_string()),
            state: self.state,
            language: self.language,
            is_loading: self.state == PlaybackState::Loading,
            is_playing: self.state == PlaybackState::Playing,
            is_muted: self.is_muted,
            current_segment_index: self.current_index,
            total_segments: self.segments.len(),
            current_time: self.current_time,
            duration: self.duration,
            error: self.error.clone(),
        }
    }

    fn start_at(&mut self, index: usize) {
        self.current_index = index;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.state = PlaybackState::Playing;
    }

    fn require_handle(&self, index: usize) -> Result<(), PlaybackError> {
        if self.handles.contains_key(&index) {
            Ok(())
        } else {
            Err(PlaybackError::MissingHandle(index))
        }
    }

    /// `index` 及之后第一个有句柄的片段
    fn playable_from(&self, index: usize) -> Option<usize> {
        self.handles.range(index..).next().map(|(order, _)| *order)
    }

    /// `index` 之前最近一个有句柄的片段
    fn playable_before(&self, index: usize) -> Option<usize> {
        self.handles.range(..index).next_back().map(|(order, _)| *order)
    }

    fn invalid(&self, action: &'static str) -> PlaybackError {
        PlaybackError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::SegmentKind;
    use crate::domain::playback::HandleId;

    fn segments(count: usize) -> Vec<NarrationSegment> {
        (0..count)
            .map(|order| NarrationSegment {
                order,
                kind: SegmentKind::Passage,
                language: Language::En,
                raw_text: format!("segment {}", order),
                text: format!("segment {}", order),
            })
            .collect()
    }

    fn handle(order: usize) -> AudioHandle {
        AudioHandle {
            id: HandleId::new(),
            segment_order: order,
            content_type: "audio/mpeg".to_string(),
            size_bytes: 16,
        }
    }

    fn ready_session(count: usize) -> PlaybackSession {
        let mut session = PlaybackSession::new(1, Language::En, segments(count), false).unwrap();
        for order in 0..count {
            session.attach_handle(handle(order)).unwrap();
        }
        session.mark_ready().unwrap();
        session
    }

    #[test]
    fn test_new_session_is_loading() {
        let session = PlaybackSession::new(7, Language::Zh, segments(2), true).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Loading);
        assert!(snapshot.is_loading);
        assert!(!snapshot.is_playing);
        assert!(snapshot.is_muted);
        assert_eq!(snapshot.total_segments, 2);
        assert_eq!(session.epoch(), 7);
    }

    #[test]
    fn test_empty_segments_rejected() {
        let result = PlaybackSession::new(1, Language::En, Vec::new(), false);
        assert_eq!(result.unwrap_err(), PlaybackError::NoSegments);
    }

    #[test]
    fn test_play_requires_ready() {
        let mut session = PlaybackSession::new(1, Language::En, segments(2), false).unwrap();
        assert!(matches!(
            session.play(),
            Err(PlaybackError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_auto_advance_through_all_segments() {
        let mut session = ready_session(3);
        assert_eq!(session.play().unwrap(), PlayAction::Start(0));

        assert_eq!(session.on_ended(0), EndedOutcome::Advanced(1));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.state(), PlaybackState::Playing);

        assert_eq!(session.on_ended(1), EndedOutcome::Advanced(2));
        assert_eq!(session.on_ended(2), EndedOutcome::Finished);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Ended);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.current_segment_index, 2);
    }

    #[test]
    fn test_duplicate_ended_is_ignored() {
        let mut session = ready_session(3);
        session.play().unwrap();

        assert_eq!(session.on_ended(0), EndedOutcome::Advanced(1));
        assert_eq!(session.on_ended(0), EndedOutcome::Ignored);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_ended_while_paused_is_ignored() {
        let mut session = ready_session(2);
        session.play().unwrap();
        assert!(session.pause().unwrap());
        assert_eq!(session.on_ended(0), EndedOutcome::Ignored);
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = ready_session(2);
        session.play().unwrap();
        assert!(session.pause().unwrap());
        assert!(!session.pause().unwrap());
        assert_eq!(session.play().unwrap(), PlayAction::Resume);
        assert_eq!(session.play().unwrap(), PlayAction::AlreadyPlaying);
    }

    #[test]
    fn test_play_after_end_restarts() {
        let mut session = ready_session(1);
        session.play().unwrap();
        assert_eq!(session.on_ended(0), EndedOutcome::Finished);
        assert_eq!(session.play().unwrap(), PlayAction::Start(0));
        assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_manual_navigation_bounds() {
        let mut session = ready_session(3);
        session.play().unwrap();

        assert!(matches!(
            session.step(Step::Previous),
            Err(PlaybackError::SegmentOutOfRange { .. })
        ));
        assert_eq!(session.step(Step::Next).unwrap(), 1);
        assert_eq!(session.step(Step::Next).unwrap(), 2);
        assert!(matches!(
            session.step(Step::Next),
            Err(PlaybackError::SegmentOutOfRange { index: 3, total: 3 })
        ));
        assert_eq!(session.step(Step::Previous).unwrap(), 1);
        assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_navigation_from_paused_plays() {
        let mut session = ready_session(2);
        session.play().unwrap();
        session.pause().unwrap();
        assert_eq!(session.step(Step::Next).unwrap(), 1);
        assert!(session.snapshot().is_playing);
    }

    #[test]
    fn test_mute_is_independent() {
        let mut session = ready_session(2);
        session.play().unwrap();
        assert!(session.set_muted(true));
        assert!(!session.set_muted(true));
        assert_eq!(session.state(), PlaybackState::Playing);
        assert!(session.snapshot().is_muted);
    }

    #[test]
    fn test_error_keeps_resolved_handles() {
        let mut session = PlaybackSession::new(1, Language::En, segments(3), false).unwrap();
        session.attach_handle(handle(0)).unwrap();
        session.fail("provider down").unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Error);
        assert_eq!(snapshot.error.as_deref(), Some("provider down"));

        assert_eq!(session.play().unwrap(), PlayAction::Start(0));
        assert_eq!(session.on_ended(0), EndedOutcome::Finished);
    }

    #[test]
    fn test_progress_only_for_current_segment() {
        let mut session = ready_session(2);
        session.play().unwrap();
        assert!(!session.update_time(1, 1.0, 3.0));
        assert!(session.update_time(0, 1.5, 3.0));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_time, 1.5);
        assert_eq!(snapshot.duration, 3.0);
    }

    #[test]
    fn test_teardown_drains_handles() {
        let mut session = ready_session(3);
        session.play().unwrap();
        let released = session.teardown();
        assert_eq!(released.len(), 3);
        assert_eq!(session.handle_count(), 0);
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(!session.snapshot().is_playing);
    }

    fn session_with_gap(count: usize, gap: usize) -> PlaybackSession {
        let mut session = PlaybackSession::new(1, Language::En, segments(count), false).unwrap();
        for order in (0..count).filter(|order| *order != gap) {
            session.attach_handle(handle(order)).unwrap();
        }
        session.mark_unplayable(gap, "empty audio payload").unwrap();
        session.mark_ready().unwrap();
        session
    }

    #[test]
    fn test_auto_advance_skips_unplayable_segment() {
        let mut session = session_with_gap(4, 1);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Ready);
        assert!(snapshot.error.as_deref().unwrap().contains("segment 1"));

        assert_eq!(session.play().unwrap(), PlayAction::Start(0));
        assert_eq!(session.on_ended(0), EndedOutcome::Advanced(2));
        assert_eq!(session.on_ended(2), EndedOutcome::Advanced(3));
        assert_eq!(session.on_ended(3), EndedOutcome::Finished);
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn test_navigation_skips_unplayable_segment() {
        let mut session = session_with_gap(4, 2);
        session.play().unwrap();
        assert_eq!(session.step(Step::Next).unwrap(), 1);
        assert_eq!(session.step(Step::Next).unwrap(), 3);
        assert_eq!(session.step(Step::Previous).unwrap(), 1);
    }

    #[test]
    fn test_ready_starts_at_first_playable_segment() {
        let mut session = session_with_gap(3, 0);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.play().unwrap(), PlayAction::Start(1));
        assert!(matches!(
            session.step(Step::Previous),
            Err(PlaybackError::SegmentOutOfRange { .. })
        ));

        let mut empty = PlaybackSession::new(1, Language::En, segments(2), false).unwrap();
        assert_eq!(empty.mark_ready(), Err(PlaybackError::MissingHandle(0)));
    }

    #[test]
    fn test_attach_out_of_range() {
        let mut session = PlaybackSession::new(1, Language::En, segments(1), false).unwrap();
        assert!(matches!(
            session.attach_handle(handle(4)),
            Err(PlaybackError::SegmentOutOfRange { index: 4, total: 1 })
        ));
    }
}
