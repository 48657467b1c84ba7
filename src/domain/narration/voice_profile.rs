//! 每种语言的合成音色参数
//!
//! 这些是针对各语言调好的常量，不在运行时计算

use serde::Serialize;

use crate::domain::hexagram::Language;

/// 多语言合成模型
pub const MULTILINGUAL_MODEL: &str = "eleven_multilingual_v2";

/// 音色配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub voice_id: &'static str,
    pub model_id: &'static str,
    /// 稳定度 (0.0 - 1.0)
    pub stability: f32,
    /// 相似度增强 (0.0 - 1.0)
    pub similarity_boost: f32,
    /// 风格夸张度 (0.0 - 1.0)
    pub style: f32,
    pub use_speaker_boost: bool,
}

const EN_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "pNInz6obpgDQGcFmaJgB",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.55,
    similarity_boost: 0.75,
    style: 0.25,
    use_speaker_boost: true,
};

const ZH_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "21m00Tcm4TlvDq8ikWAM",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.65,
    similarity_boost: 0.8,
    style: 0.1,
    use_speaker_boost: true,
};

const HI_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "EXAVITQu4vr4xnSDxMaL",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.6,
    similarity_boost: 0.8,
    style: 0.15,
    use_speaker_boost: true,
};

const ES_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "ErXwobaYiN019PkySvjV",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.5,
    similarity_boost: 0.75,
    style: 0.3,
    use_speaker_boost: true,
};

const FR_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "MF3mGyEYCl7XYWbV9V6O",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.55,
    similarity_boost: 0.75,
    style: 0.2,
    use_speaker_boost: true,
};

const JA_PROFILE: VoiceProfile = VoiceProfile {
    voice_id: "TxGEqnHWrfWFTfGW9XjX",
    model_id: MULTILINGUAL_MODEL,
    stability: 0.7,
    similarity_boost: 0.8,
    style: 0.05,
    use_speaker_boost: false,
};

/// 获取语言对应的音色
pub fn voice_profile(language: Language) -> &'static VoiceProfile {
    match language {
        Language::En => &EN_PROFILE,
        Language::Zh => &ZH_PROFILE,
        Language::Hi => &HI_PROFILE,
        Language::Es => &ES_PROFILE,
        Language::Fr => &FR_PROFILE,
        Language::Ja => &JA_PROFILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_within_provider_ranges() {
        for language in Language::ALL {
            let profile = voice_profile(language);
            assert!(!profile.voice_id.is_empty());
            assert!((0.0..=1.0).contains(&profile.stability));
            assert!((0.0..=1.0).contains(&profile.similarity_boost));
            assert!((0.0..=1.0).contains(&profile.style));
        }
    }
}
