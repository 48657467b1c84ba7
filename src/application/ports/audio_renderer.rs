//! Audio Renderer Port - 音频渲染端
//!
//! 控制器只发出命令，真正的播放在听众的浏览器里完成

use serde::Serialize;

use crate::domain::playback::PlaybackSnapshot;

/// 渲染命令
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    /// 装载某段音频，`handle_id` 通过 `/api/audio/:handle_id` 获取
    Load {
        session_id: String,
        segment_index: usize,
        handle_id: String,
        content_type: String,
    },
    Play,
    Pause,
    SetMuted { muted: bool },
    /// 停止并清空渲染端
    Stop,
}

/// Audio Renderer Port
///
/// 每个实例绑定一个听众；发送失败不影响状态机
pub trait AudioRendererPort: Send + Sync {
    fn render(&self, command: RenderCommand);

    fn publish_state(&self, snapshot: &PlaybackSnapshot);
}
