use std::collections::BTreeMap;

use crate::error::JobFailed;

/// Ordered mapping from 0-based sample index to generated text. Supports
/// multiple samples per request.
pub type SampleMap = BTreeMap<usize, String>;

/// What the dispatcher writes to a job's result slot: the success mapping,
/// or the distinguished failure marker.
pub type JobOutcome = Result<SampleMap, JobFailed>;

/// A submitted unit of generation work, tagged by processing variant.
///
/// The tag is decided at submission time; the dispatcher routes on it and
/// nothing downstream ever inspects payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// One single-token continuation sample per requested sample.
    Short { prompt: String, num_samples: usize },

    /// Per sample, a continuation of up to `length` tokens beyond the
    /// prompt. The variant derives its internal target from the prompt's own
    /// token count plus `length`, and honors the engine's denylist.
    Long {
        prompt: String,
        num_samples: usize,
        length: usize,
    },
}

impl GenerationRequest {
    /// Variant tag, for routing diagnostics and log correlation.
    pub fn variant(&self) -> &'static str {
        match self {
            GenerationRequest::Short { .. } => "short",
            GenerationRequest::Long { .. } => "long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_tags_match_the_request_shape() {
        let short = GenerationRequest::Short {
            prompt: "hello".to_string(),
            num_samples: 1,
        };
        let long = GenerationRequest::Long {
            prompt: "hello".to_string(),
            num_samples: 1,
            length: 20,
        };

        assert_eq!(short.variant(), "short");
        assert_eq!(long.variant(), "long");
    }
}
