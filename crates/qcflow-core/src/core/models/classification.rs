use std::fmt;

/// Name of the directory that collects negative-frequency results.
pub const NEGATIVE_FREQUENCY_DIR: &str = "neg_freq";

/// Prefix of the per-kind error directories (`error_<kind>`).
pub const ERROR_DIR_PREFIX: &str = "error_";

/// The outcome category of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    /// Positive lowest frequency: a true minimum, accepted as a final result.
    Normal,
    /// Negative lowest frequency: a saddle point that needs resubmission.
    NegativeFrequency,
    /// The engine stopped with an error termination from the named link.
    Error(String),
}

impl Classification {
    /// A stable short label, also used as the key of per-category counts.
    pub fn label(&self) -> String {
        match self {
            Classification::Normal => "normal".to_string(),
            Classification::NegativeFrequency => NEGATIVE_FREQUENCY_DIR.to_string(),
            Classification::Error(kind) => format!("{}{}", ERROR_DIR_PREFIX, kind),
        }
    }

    pub fn needs_resubmission(&self) -> bool {
        !matches!(self, Classification::Normal)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Normal => write!(f, "normal termination"),
            Classification::NegativeFrequency => write!(f, "negative frequency"),
            Classification::Error(kind) => write!(f, "error termination ({})", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_directory_names() {
        assert_eq!(Classification::Normal.label(), "normal");
        assert_eq!(Classification::NegativeFrequency.label(), "neg_freq");
        assert_eq!(Classification::Error("l502".into()).label(), "error_l502");
    }

    #[test]
    fn only_normal_is_accepted() {
        assert!(!Classification::Normal.needs_resubmission());
        assert!(Classification::NegativeFrequency.needs_resubmission());
        assert!(Classification::Error("l9999".into()).needs_resubmission());
    }
}
