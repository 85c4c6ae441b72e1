/// Category key grouping subjects by model family.
/// Examples: `bert`, `llama`, `marian`
pub type CategoryId = String;
/// Task label inside a registry category (dropped during flattening).
/// Examples: `feature-extraction`, `text2text-generation`
pub type TaskId = String;
/// Identifier naming one tokenizer/config subject to exercise.
/// Examples: `bert-base-uncased`, `tiiuae/falcon-7b`
pub type SubjectId = String;
/// Key identifying one spectral oracle case by size and domain.
/// Examples: `fft_8_real`, `fft_128_complex`
pub type CaseKey = String;
/// One input text drawn from the shared or custom corpus.
/// Example: `hello world`
pub type CorpusText = String;
