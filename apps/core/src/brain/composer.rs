//! Reply composition.
//!
//! Each intent has a fixed template. The best key sentence from the retrieved
//! passages is woven in, and a detected beach name fills the headline.

use super::intent::{Intent, IntentClassifier};
use super::keywords::KeySentenceExtractor;
use super::location::{LocationResolver, REGIONAL_KEYWORD};

/// Reply for an empty or whitespace-only question.
pub const EMPTY_MESSAGE_REPLY: &str = "Pesannya kosong nih. Coba tulis pertanyaanmu ya 😊";

const QUICK_STEPS: &[&str] = &[
    "1) Foto kondisi dari beberapa sudut + catat jam (kalau bisa) dan lokasi/titiknya.",
    "2) Pilah cepat: plastik (kresek/botol/sedotan) vs residu. Pakai sarung tangan kalau ada.",
    "3) Laporkan lewat EcoSea (foto + lokasi + detail). Kalau di area wisata, kabari juga pengelola/penjaga.",
];

const RIVER_MOUTH_NOTE: &str = "Catatan: muara/drainase itu sering jadi titik sampah kiriman (apalagi pas hujan/rob), jadi laporannya penting banget.";

const WHY_FALLBACK: &str = "Sampah (terutama plastik) bisa terbawa arus/ombak ke laut, merusak ekosistem, dan membahayakan biota.";

const WHY_PREVENTION: &[&str] = &[
    "Yang bisa dicegah bareng-bareng:",
    "- Kurangi plastik sekali pakai (botol isi ulang, tas belanja ulang).",
    "- Buang sampah di tempatnya / bawa pulang kalau tempat sampah penuh.",
    "- Ikut bersih pantai atau ajak teman 2–5 menit ambil sampah sebelum pulang.",
];

const WHY_LOCAL_NOTE: &str = "Di Pantura (terutama dekat muara/pemukiman), sampah juga sering kiriman dari sungai—jadi selain bersihin, laporan titik rawan itu ngebantu banget.";

const TRAVEL_PICKS: &[&str] = &[
    "Pantai Alam Indah (PAI)",
    "Pantai Muarareja",
    "Pantai Dampyak",
    "Pantai Purwahamba Indah",
    "Pantai Randusanga",
];

const TRAVEL_HEADER_LOCAL: &str = "Kalau sekitar Tegal/Pantura, beberapa opsi yang sering jadi pilihan:";
const TRAVEL_HEADER_GENERIC: &str = "Kalau kamu cari wisata pantai, coba pertimbangkan ini (terutama Pantura):";

const TRAVEL_TIPS: &[&str] = &[
    "Etika wisata bersih (biar pantainya tetap enak):",
    "- Datang tanpa ninggal sampah (bawa kantong sampah kecil).",
    "- Bawa botol minum isi ulang, kurangi jajan kemasan sekali pakai.",
    "- Sebelum pulang, 2–5 menit ambil sampah kecil di sekitar spotmu.",
];

const DEFAULT_FALLBACK: &str = "Pantai itu penyangga ekosistem laut dan juga ruang wisata, jadi kebersihannya penting banget.";

const DEFAULT_ACTIONS: &[&str] = &[
    "Yang bisa kamu lakukan sekarang:",
    "- Bawa kantong sampah + botol minum isi ulang.",
    "- Pilah sampah (plastik / logam-kaca / organik / residu).",
    "- Kalau lihat titik kotor, foto + lokasi lalu lapor lewat EcoSea.",
];

/// Builds the reply text from intent, location and key sentences.
///
/// Pure function of its inputs; `question` is only consulted for a few
/// extra notes (river mouth, Pantura/Tegal).
pub fn render_reply(
    intent: Intent,
    location: Option<&str>,
    key_sentences: &[String],
    question: &str,
) -> String {
    let q = question.trim().to_lowercase();
    let first_sentence = key_sentences.first().map(String::as_str);

    match intent {
        Intent::QuickAction => {
            let place = location
                .map(|l| format!("Kalau ini di {}, ", l))
                .unwrap_or_default();
            let mut reply = format!(
                "Oke, aku bantu. {}yang paling cepat bisa kamu lakukan:\n{}",
                place,
                QUICK_STEPS.join("\n")
            );
            if q.contains("muara") || q.contains("rob") {
                reply.push_str("\n\n");
                reply.push_str(RIVER_MOUTH_NOTE);
            }
            if let Some(info) = first_sentence {
                reply.push_str(&format!("\n\nInfo singkat: {}", info));
            }
            reply
        }
        Intent::ExplainWhy => {
            let explanation = first_sentence.unwrap_or(WHY_FALLBACK);
            let mut reply = format!(
                "Singkatnya: {}\n\n{}",
                explanation,
                WHY_PREVENTION.join("\n")
            );
            if location.is_some() || q.contains("pantura") || q.contains(REGIONAL_KEYWORD) {
                reply.push_str("\n\n");
                reply.push_str(WHY_LOCAL_NOTE);
            }
            reply
        }
        Intent::Travel => {
            let local = q.contains(REGIONAL_KEYWORD)
                || location.is_some_and(|l| l.contains("Tegal"));
            let header = if local {
                TRAVEL_HEADER_LOCAL
            } else {
                TRAVEL_HEADER_GENERIC
            };
            let mut reply = format!(
                "{}\n- {}\n\n{}",
                header,
                TRAVEL_PICKS.join("\n- "),
                TRAVEL_TIPS.join("\n")
            );
            if let Some(info) = first_sentence {
                reply.push_str(&format!("\n\nTambahan: {}", info));
            }
            reply
        }
        Intent::Default => {
            let explanation = first_sentence.unwrap_or(DEFAULT_FALLBACK);
            format!("{}\n\n{}", explanation, DEFAULT_ACTIONS.join("\n"))
        }
    }
}

/// Composes a reply for an already classified question.
pub fn compose(question: &str, intent: Intent, location: Option<&str>, contexts: &[String]) -> String {
    if question.trim().is_empty() {
        return EMPTY_MESSAGE_REPLY.to_string();
    }
    let key_sentences = KeySentenceExtractor::default().extract(contexts);
    render_reply(intent, location, &key_sentences, question)
}

/// Classifies, resolves the location and renders, reusing its rule tables.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    intents: IntentClassifier,
    locations: LocationResolver,
    sentences: KeySentenceExtractor,
}

impl ResponseComposer {
    pub fn new(
        intents: IntentClassifier,
        locations: LocationResolver,
        sentences: KeySentenceExtractor,
    ) -> Self {
        Self {
            intents,
            locations,
            sentences,
        }
    }

    pub fn intents(&self) -> &IntentClassifier {
        &self.intents
    }

    pub fn locations(&self) -> &LocationResolver {
        &self.locations
    }

    pub fn compose(&self, question: &str, contexts: &[String]) -> String {
        let q = question.trim();
        if q.is_empty() {
            return EMPTY_MESSAGE_REPLY.to_string();
        }
        let intent = self.intents.classify(q).intent;
        let location = self.locations.resolve(q);
        let key_sentences = self.sentences.extract(contexts);
        render_reply(intent, location.as_deref(), &key_sentences, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quick_action_with_location() {
        let reply = render_reply(
            Intent::QuickAction,
            Some("Pantai Dampyak"),
            &[],
            "lapor sampah di dampyak",
        );
        assert!(reply.starts_with(
            "Oke, aku bantu. Kalau ini di Pantai Dampyak, yang paling cepat bisa kamu lakukan:\n1) "
        ));
        assert!(reply.contains("\n3) Laporkan lewat EcoSea"));
        assert!(!reply.contains("Catatan:"));
        assert!(!reply.contains("Info singkat"));
    }

    #[test]
    fn test_quick_action_river_mouth_note_and_info() {
        let reply = render_reply(
            Intent::QuickAction,
            None,
            &sentences(&["Sampah kiriman sering menumpuk di muara setelah hujan deras."]),
            "ada sampah numpuk di muara",
        );
        assert!(reply.starts_with("Oke, aku bantu. yang paling cepat"));
        assert!(reply.contains(RIVER_MOUTH_NOTE));
        assert!(reply.ends_with(
            "\n\nInfo singkat: Sampah kiriman sering menumpuk di muara setelah hujan deras."
        ));
    }

    #[test]
    fn test_explain_why_uses_key_sentence() {
        let reply = render_reply(
            Intent::ExplainWhy,
            None,
            &sentences(&["Plastik terurai jadi mikroplastik yang dimakan biota laut."]),
            "kenapa plastik bahaya?",
        );
        assert!(reply.starts_with(
            "Singkatnya: Plastik terurai jadi mikroplastik yang dimakan biota laut.\n\n"
        ));
        assert!(reply.contains("Yang bisa dicegah bareng-bareng:"));
        assert!(!reply.contains("Di Pantura"));
    }

    #[test]
    fn test_explain_why_fallback_and_local_note() {
        let reply = render_reply(Intent::ExplainWhy, None, &[], "kenapa pantai Tegal kotor?");
        assert!(reply.contains(WHY_FALLBACK));
        assert!(reply.ends_with(WHY_LOCAL_NOTE));
    }

    #[test]
    fn test_travel_headers() {
        let generic = render_reply(Intent::Travel, None, &[], "rekomendasi wisata pantai");
        assert!(generic.starts_with(TRAVEL_HEADER_GENERIC));
        assert!(generic.contains("\n- Pantai Randusanga\n\n"));

        let local = render_reply(Intent::Travel, None, &[], "wisata di tegal");
        assert!(local.starts_with(TRAVEL_HEADER_LOCAL));

        let regional = render_reply(
            Intent::Travel,
            Some("pantai sekitar Tegal"),
            &[],
            "liburan",
        );
        assert!(regional.starts_with(TRAVEL_HEADER_LOCAL));

        let place = render_reply(Intent::Travel, Some("Pantai Komodo"), &[], "liburan ke komodo");
        assert!(place.starts_with(TRAVEL_HEADER_GENERIC));
    }

    #[test]
    fn test_default_template() {
        let reply = render_reply(Intent::Default, None, &[], "Apa itu EcoSea?");
        assert!(reply.starts_with(DEFAULT_FALLBACK));
        assert!(reply.ends_with("foto + lokasi lalu lapor lewat EcoSea."));
    }

    #[test]
    fn test_compose_empty_question() {
        assert_eq!(compose("   ", Intent::Default, None, &[]), EMPTY_MESSAGE_REPLY);
        assert_eq!(ResponseComposer::default().compose("", &[]), EMPTY_MESSAGE_REPLY);
    }

    #[test]
    fn test_composer_end_to_end() {
        let composer = ResponseComposer::default();
        let contexts = sentences(&[
            "EcoSea adalah platform untuk melapor sampah di pantai dan mengajak edukasi konservasi pesisir.",
        ]);
        let reply = composer.compose("pantai PAI kotor banget", &contexts);

        assert!(reply.starts_with(
            "Oke, aku bantu. Kalau ini di Pantai Alam Indah (PAI), yang paling cepat"
        ));
        assert!(reply.contains("Info singkat: EcoSea adalah platform"));
    }
}
