//! Listener Registry Port - 听众生命周期管理
//!
//! 每个听众持有一个独立的朗读控制器，具体实现在 infrastructure/memory 层

use std::sync::Arc;

use crate::application::narration::NarrationController;

/// Listener Registry Port
///
/// 所有状态存储在内存中
pub trait ListenerRegistryPort: Send + Sync {
    /// 获取或创建听众的控制器，同时刷新活动时间
    fn get_or_create(&self, listener_id: &str) -> Arc<NarrationController>;

    /// 获取已存在的控制器，同时刷新活动时间
    fn get(&self, listener_id: &str) -> Option<Arc<NarrationController>>;

    /// 刷新最后活动时间，未知听众忽略
    fn touch(&self, listener_id: &str);

    /// 移除听众，返回其控制器供调用方关闭
    fn remove(&self, listener_id: &str) -> Option<Arc<NarrationController>>;

    /// 获取超过空闲时间的听众
    fn get_idle_listeners(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 当前听众数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
