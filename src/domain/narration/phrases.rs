//! 叙述用语模板
//!
//! 每种语言一套固定句式：开场、核心智慧引语、辅助信息引语、结束语

use crate::domain::hexagram::Language;

/// 一种语言的叙述句式
#[derive(Debug, Clone, Copy)]
pub struct PhraseSet {
    /// 开场（`{number}`、`{name}` 占位）
    pub introduction: &'static str,
    /// 带繁体卦名的开场（额外 `{chinese}` 占位）
    pub introduction_with_chinese: &'static str,
    /// 没有卦名时的开场
    pub introduction_unnamed: &'static str,
    /// 核心智慧引语
    pub wisdom_intro: &'static str,
    /// 辅助信息（卦辞）引语
    pub message_intro: &'static str,
    /// 固定结束语
    pub closing: &'static str,
}

const EN: PhraseSet = PhraseSet {
    introduction: "You have received hexagram {number}, {name}.",
    introduction_with_chinese: "You have received hexagram {number}, {name}, known in Chinese as {chinese}.",
    introduction_unnamed: "You have received hexagram {number}.",
    wisdom_intro: "Here is the wisdom for you:",
    message_intro: "The ancient judgement adds this message:",
    closing: "Take a quiet moment to reflect on how this wisdom speaks to your situation.",
};

const ZH: PhraseSet = PhraseSet {
    introduction: "您得到的是第{number}卦，{name}。",
    introduction_with_chinese: "您得到的是第{number}卦，{name}，繁体写作{chinese}。",
    introduction_unnamed: "您得到的是第{number}卦。",
    wisdom_intro: "这是给您的智慧：",
    message_intro: "古老的卦辞还告诉您：",
    closing: "请静下心来，思考这份智慧与您当下处境的关联。",
};

const HI: PhraseSet = PhraseSet {
    introduction: "आपको हेक्साग्राम {number}, {name} प्राप्त हुआ है।",
    introduction_with_chinese: "आपको हेक्साग्राम {number}, {name} प्राप्त हुआ है, जिसे चीनी में {chinese} कहते हैं।",
    introduction_unnamed: "आपको हेक्साग्राम {number} प्राप्त हुआ है।",
    wisdom_intro: "आपके लिए यह ज्ञान है:",
    message_intro: "प्राचीन निर्णय यह संदेश भी देता है:",
    closing: "कुछ क्षण शांत होकर सोचें कि यह ज्ञान आपकी स्थिति से कैसे जुड़ता है।",
};

const ES: PhraseSet = PhraseSet {
    introduction: "Has recibido el hexagrama {number}, {name}.",
    introduction_with_chinese: "Has recibido el hexagrama {number}, {name}, conocido en chino como {chinese}.",
    introduction_unnamed: "Has recibido el hexagrama {number}.",
    wisdom_intro: "Esta es la sabiduría para ti:",
    message_intro: "El antiguo dictamen añade este mensaje:",
    closing: "Tómate un momento de calma para reflexionar sobre cómo esta sabiduría habla de tu situación.",
};

const FR: PhraseSet = PhraseSet {
    introduction: "Vous avez reçu l'hexagramme {number}, {name}.",
    introduction_with_chinese: "Vous avez reçu l'hexagramme {number}, {name}, appelé {chinese} en chinois.",
    introduction_unnamed: "Vous avez reçu l'hexagramme {number}.",
    wisdom_intro: "Voici la sagesse qui vous est destinée :",
    message_intro: "L'antique jugement ajoute ce message :",
    closing: "Prenez un moment de calme pour réfléchir à ce que cette sagesse dit de votre situation.",
};

const JA: PhraseSet = PhraseSet {
    introduction: "あなたが受け取ったのは第{number}卦、{name}です。",
    introduction_with_chinese: "あなたが受け取ったのは第{number}卦、{name}、漢字では{chinese}です。",
    introduction_unnamed: "あなたが受け取ったのは第{number}卦です。",
    wisdom_intro: "あなたへの知恵はこちらです：",
    message_intro: "古の卦辞はこう告げています：",
    closing: "静かにひと息つき、この知恵があなたの状況にどう響くかを思い巡らせてください。",
};

/// 获取语言对应的句式
pub fn phrases(language: Language) -> &'static PhraseSet {
    match language {
        Language::En => &EN,
        Language::Zh => &ZH,
        Language::Hi => &HI,
        Language::Es => &ES,
        Language::Fr => &FR,
        Language::Ja => &JA,
    }
}

impl PhraseSet {
    /// 渲染开场句
    pub fn render_introduction(&self, number: u8, name: &str, chinese: Option<&str>) -> String {
        let number = number.to_string();
        let name = name.trim();

        let template = match (name.is_empty(), chinese) {
            (true, _) => self.introduction_unnamed,
            // 卦名本身就是繁体名时不再重复
            (false, Some(chinese)) if chinese != name => self.introduction_with_chinese,
            (false, _) => self.introduction,
        };

        template
            .replace("{number}", &number)
            .replace("{name}", name)
            .replace("{chinese}", chinese.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_complete_phrases() {
        for language in Language::ALL {
            let set = phrases(language);
            assert!(set.introduction.contains("{name}"), "{}", language);
            assert!(set.introduction_with_chinese.contains("{chinese}"), "{}", language);
            assert!(!set.introduction_unnamed.contains("{name}"), "{}", language);
            assert!(!set.wisdom_intro.is_empty());
            assert!(!set.message_intro.is_empty());
            assert!(!set.closing.is_empty());
        }
    }

    #[test]
    fn test_render_introduction_variants() {
        let set = phrases(Language::En);
        assert_eq!(
            set.render_introduction(1, "The Creative", Some("乾")),
            "You have received hexagram 1, The Creative, known in Chinese as 乾."
        );
        assert_eq!(
            set.render_introduction(1, "The Creative", None),
            "You have received hexagram 1, The Creative."
        );
        assert_eq!(set.render_introduction(7, "  ", Some("師")), "You have received hexagram 7.");
    }

    #[test]
    fn test_chinese_name_not_repeated() {
        let set = phrases(Language::Zh);
        assert_eq!(set.render_introduction(1, "乾", Some("乾")), "您得到的是第1卦，乾。");
    }
}
