//! In-Memory Audio Handle Store Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{AudioBlob, AudioHandleStorePort, ResourceError, SynthesizedAudio};
use crate::domain::playback::{AudioHandle, HandleId};

/// 内存句柄存储
pub struct InMemoryAudioHandleStore {
    blobs: DashMap<HandleId, AudioBlob>,
}

impl InMemoryAudioHandleStore {
    pub fn new() -> Self {
        Self {
            blobs: DashMap::new(),
        }
    }

    /// 存活句柄占用的总字节数
    pub fn total_bytes(&self) -> usize {
        self.blobs.iter().map(|entry| entry.data.len()).sum()
    }
}

impl Default for InMemoryAudioHandleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHandleStorePort for InMemoryAudioHandleStore {
    fn allocate(
        &self,
        segment_order: usize,
        audio: SynthesizedAudio,
    ) -> Result<AudioHandle, ResourceError> {
        if audio.audio_data.is_empty() {
            return Err(ResourceError::EmptyPayload(segment_order));
        }

        let handle = AudioHandle {
            id: HandleId::new(),
            segment_order,
            content_type: audio.content_type.clone(),
            size_bytes: audio.audio_data.len(),
        };

        self.blobs.insert(
            handle.id,
            AudioBlob {
                data: Arc::new(audio.audio_data),
                content_type: audio.content_type,
            },
        );
        tracing::debug!(handle_id = %handle.id, segment = segment_order, size = handle.size_bytes, "Audio handle allocated");
        Ok(handle)
    }

    fn resolve(&self, id: &HandleId) -> Option<AudioBlob> {
        self.blobs.get(id).map(|blob| blob.clone())
    }

    fn release(&self, id: &HandleId) -> Result<(), ResourceError> {
        self.blobs
            .remove(id)
            .map(|_| {
                tracing::debug!(handle_id = %id, "Audio handle released");
            })
            .ok_or(ResourceError::NotFound(*id))
    }

    fn live_count(&self) -> usize {
        self.blobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(bytes: &[u8]) -> SynthesizedAudio {
        SynthesizedAudio {
            audio_data: bytes.to_vec(),
            content_type: "audio/mpeg".to_string(),
        }
    }

    #[test]
    fn test_handle_lifecycle() {
        let store = InMemoryAudioHandleStore::new();

        let handle = store.allocate(2, audio(b"ID3abc")).unwrap();
        assert_eq!(handle.segment_order, 2);
        assert_eq!(handle.size_bytes, 6);
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.total_bytes(), 6);

        let blob = store.resolve(&handle.id).unwrap();
        assert_eq!(blob.data.as_slice(), b"ID3abc");
        assert_eq!(blob.content_type, "audio/mpeg");

        store.release(&handle.id).unwrap();
        assert!(store.resolve(&handle.id).is_none());
        assert_eq!(store.live_count(), 0);
        assert_eq!(
            store.release(&handle.id),
            Err(ResourceError::NotFound(handle.id))
        );
    }

    #[test]
    fn test_empty_payload_not_allocated() {
        let store = InMemoryAudioHandleStore::new();
        assert_eq!(
            store.allocate(0, audio(b"")),
            Err(ResourceError::EmptyPayload(0))
        );
        assert_eq!(store.live_count(), 0);
    }
}
