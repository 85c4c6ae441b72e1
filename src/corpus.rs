use indexmap::IndexMap;

use crate::types::{CorpusText, SubjectId};

/// Shared texts applied to every tokenizer subject, in output order.
///
/// The set is versioned data: reordering or editing entries invalidates every
/// previously generated tokenizer bundle.
pub const SHARED_TEXTS: &[&str] = &[
    "hello world",
    "Hello World",
    "How are you doing?",
    "You should've done this",
    "A\n'll !!to?'d''d of, can't.",
    "def main():\n\tpass",
    "This\n\nis\na\ntest.",
    "let a = obj.toString();\ntoString();",
    "Hi  Hello",
    "trailing space   ",
    "   leading space",
    "生活的真谛是",
    "The company was founded in 2016.",
    "test $1 R2 #3 €4 £5 ¥6 ₣7 ₹8 ₱9 test",
    "I bought an apple for $1.00 at the store.",
    "you\u{2026}  ",
    "you\u{2026}\u{a0}\u{a0}",
    "you\u{2026}\u{a0}\u{a0}you\u{2026}\u{a0}\u{a0}",
    "▁This ▁is ▁a ▁test ▁.",
    "weird \u{ff5e} edge \u{ff5e} case",
];

/// Per-subject custom texts, appended after the shared set for that subject.
pub const CUSTOM_TEXTS: &[(&str, &[&str])] = &[
    (
        "facebook/blenderbot_small-90M",
        &[
            // Exercises special-token markers inside plain text.
            "__start__hello world__end__",
            "__start__ hey __end____start__hey __end__",
        ],
    ),
    (
        "tiiuae/falcon-7b",
        &[
            // Exercises digit splitting on runs of three numbers.
            "12 and 123 and 1234",
        ],
    ),
    (
        "hf-internal-testing/llama-tokenizer",
        &[
            "grabbed",
            " grabbed",
            "           grabbed",
            "\n",
            " \n",
            "\ttabs\t\t\t\tout here",
            "ax\n####\nboo",
            "镇",
            "🦙",
            "🦙Ꙋ",
            "Ꙋ🦙",
            concat!(
                "The llama (/ˈlɑːmə/; 🦙Spanish pronunciation: [ˈʎama]) (Lama glama) is a domesticated South American ",
                "camelid, widely used as a meat and pack animal by Andean cultures since the Pre-Columbian era. Llamas ",
                "are social animals and live with others as a herd. Their wool is soft and contains only a small ",
                "amount of lanolin.[2] Llamas can learn simple tasks after a few repetitions. When using a pack, they ",
                "can carry about 25 to 30% of their body weight for 8 to 13 km (5–8 miles).[3] The name llama (in the ",
                "past also spelled \"lama\" or \"glama\") was adopted by European settlers from native Peruvians.[4] ",
                "The ancestors of llamas are thought to have originated from the Great Plains of North America about ",
                "40 million years ago, and subsequently migrated to South America about three million years ago during ",
                "the Great American Interchange. By the end of the last ice age (10,000–12,000 years ago), camelids were ",
                "extinct in North America.[3] As of 2007, there were over seven million llamas and alpacas in South ",
                "America and over 158,000 llamas and 100,000Ꙋ🦙 alpacas, descended from progenitors imported late in ",
                "the 20th century, in the United States and Canada.[5] In Aymara mythology, llamas are important beings. ",
                "The Heavenly Llama is said to drink water from the ocean and urinates as it rains.[6] According to ",
                "Aymara eschatology, llamas will return to the water springs and lagoons where they come from at the ",
                "end of time.[6]",
            ),
        ],
    ),
];

/// Ordered text corpus driven through every tokenizer subject.
///
/// `shared` texts apply to all subjects; `custom` texts apply only to the
/// subject they are registered under and always follow the shared set. Record
/// positions in the output bundle mirror this order.
#[derive(Clone, Debug)]
pub struct TestCorpus {
    shared: Vec<CorpusText>,
    custom: IndexMap<SubjectId, Vec<CorpusText>>,
}

impl TestCorpus {
    /// Create a corpus from explicit shared and custom text sets.
    pub fn new(
        shared: impl IntoIterator<Item = CorpusText>,
        custom: impl IntoIterator<Item = (SubjectId, Vec<CorpusText>)>,
    ) -> Self {
        Self {
            shared: shared.into_iter().collect(),
            custom: custom.into_iter().collect(),
        }
    }

    /// The curated corpus shipped with this crate.
    pub fn curated() -> Self {
        Self::new(
            SHARED_TEXTS.iter().map(|text| text.to_string()),
            CUSTOM_TEXTS.iter().map(|(subject, texts)| {
                (
                    subject.to_string(),
                    texts.iter().map(|text| text.to_string()).collect(),
                )
            }),
        )
    }

    /// Shared texts in order.
    pub fn shared(&self) -> &[CorpusText] {
        &self.shared
    }

    /// Custom texts registered for `subject`, or an empty slice.
    pub fn custom_for(&self, subject: &str) -> &[CorpusText] {
        self.custom
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Effective corpus for `subject`: shared texts followed by its custom texts.
    pub fn effective_texts<'a>(&'a self, subject: &str) -> impl Iterator<Item = &'a str> {
        self.shared
            .iter()
            .chain(self.custom_for(subject))
            .map(String::as_str)
    }

    /// Number of texts the generator will attempt for `subject`.
    pub fn effective_len(&self, subject: &str) -> usize {
        self.shared.len() + self.custom_for(subject).len()
    }
}

impl Default for TestCorpus {
    fn default() -> Self {
        Self::curated()
    }
}
