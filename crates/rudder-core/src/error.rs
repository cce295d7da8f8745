/// Failure of a fire-and-forget effect, as observed by the effect executor.
///
/// Effects carry no result channel back to the program, so the executor is
/// the only place a failure can surface. The source error comes from the
/// capability the effect touched (e.g. a host rejecting a malformed URL).
#[derive(Debug, thiserror::Error)]
#[error("effect failed: {source}")]
pub struct EffectError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl EffectError {
    /// Wrap a capability-level error.
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// The underlying capability error.
    pub fn source_ref(&self) -> &(dyn std::error::Error + Send + Sync) {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn effect_error_displays_source() {
        let err = EffectError::new(Boom);
        assert_eq!(err.to_string(), "effect failed: boom");
    }

    #[test]
    fn effect_error_exposes_source() {
        let err = EffectError::new(Boom);
        assert_eq!(err.source_ref().to_string(), "boom");
    }
}
