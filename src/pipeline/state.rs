use std::fmt;

/// Stages of one pipeline run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Started,
    Located,
    Copied,
    Scanned,
    Rendered,
    Finalized,
}

impl PipelineState {
    /// The state that follows this one, `None` once finalized.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Started => Some(Self::Located),
            Self::Located => Some(Self::Copied),
            Self::Copied => Some(Self::Scanned),
            Self::Scanned => Some(Self::Rendered),
            Self::Rendered => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "started",
            Self::Located => "located",
            Self::Copied => "copied",
            Self::Scanned => "scanned",
            Self::Rendered => "rendered",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_advance_in_order() {
        let mut state = PipelineState::Started;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(next > state);
            seen.push(next);
            state = next;
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(state, PipelineState::Finalized);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(PipelineState::Scanned.to_string(), "scanned");
    }
}
