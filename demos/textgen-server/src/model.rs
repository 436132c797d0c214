use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use robata::error::GenerateError;
use robata::generation::{Generator, SampleMap};

/// Word-level vocabulary of the toy model. Ids are positions in this table.
const VOCAB: &[&str] = &[
    "the", "a", "sky", "sea", "light", "dark", "wind", "stone", "river",
    "mountain", "quiet", "bright", "slowly", "falls", "rises", "over",
    "under", "between", "morning", "evening", "city", "forest", "dream",
    "voice", "distant", "golden", "shadow", "memory", "returns", "begins",
    "ends", "open", "closed", "warm", "cold", "song", "silver", "path",
    "horizon", "rain",
];

/// A toy sampling generator standing in for a real language model.
///
/// Tokenization is whitespace splitting against [`VOCAB`]; generation is
/// uniform sampling. Small as it is, it honors the full variant contract:
/// per-sample outputs, the prompt-tokens-plus-`length` target, and the
/// denylist.
pub struct ToyModel;

impl ToyModel {
    pub fn new() -> Self {
        Self
    }

    fn encode(prompt: &str) -> Vec<u32> {
        prompt.split_whitespace().map(Self::token_id).collect()
    }

    /// Every out-of-vocabulary word collapses onto one OOV id; only the
    /// token count matters for the toy tokenizer.
    fn token_id(word: &str) -> u32 {
        VOCAB
            .iter()
            .position(|entry| *entry == word)
            .map(|idx| idx as u32)
            .unwrap_or(VOCAB.len() as u32)
    }

    fn decode(id: u32) -> &'static str {
        VOCAB[id as usize % VOCAB.len()]
    }

    /// Ids the sampler may draw from once the denylist is applied.
    fn allowed_ids(denylist: &[u32]) -> Result<Vec<u32>, GenerateError> {
        let allowed: Vec<u32> = (0..VOCAB.len() as u32)
            .filter(|id| !denylist.contains(id))
            .collect();
        if allowed.is_empty() {
            return Err(GenerateError::Model(
                "denylist covers the entire vocabulary".to_string(),
            ));
        }
        Ok(allowed)
    }

    fn validate(prompt: &str, num_samples: usize) -> Result<(), GenerateError> {
        if prompt.is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }
        if num_samples == 0 {
            return Err(GenerateError::NoSamples);
        }
        Ok(())
    }
}

#[async_trait]
impl Generator for ToyModel {
    async fn complete_short(
        &self,
        prompt: &str,
        num_samples: usize,
    ) -> Result<SampleMap, GenerateError> {
        let prompt = prompt.trim();
        Self::validate(prompt, num_samples)?;

        let mut rng = StdRng::from_entropy();
        let mut samples = SampleMap::new();
        for idx in 0..num_samples {
            let id = rng.gen_range(0..VOCAB.len() as u32);
            samples.insert(idx, Self::decode(id).to_string());
        }
        Ok(samples)
    }

    async fn complete_long(
        &self,
        prompt: &str,
        num_samples: usize,
        length: usize,
        denylist: &[u32],
    ) -> Result<SampleMap, GenerateError> {
        let prompt = prompt.trim();
        Self::validate(prompt, num_samples)?;
        let allowed = Self::allowed_ids(denylist)?;

        let mut rng = StdRng::from_entropy();
        let mut samples = SampleMap::new();
        for idx in 0..num_samples {
            // `length` counts tokens beyond the prompt; the generation
            // target includes the prompt's own tokens.
            let mut ids = Self::encode(prompt);
            let prompt_tokens = ids.len();
            let target = prompt_tokens + length;

            while ids.len() < target {
                ids.push(allowed[rng.gen_range(0..allowed.len())]);
            }

            let continuation = ids[prompt_tokens..]
                .iter()
                .map(|&id| Self::decode(id))
                .collect::<Vec<_>>()
                .join(" ");
            samples.insert(idx, continuation);
        }
        Ok(samples)
    }
}
