use std::fmt;

/// One road-quality category as reported by a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualityLabel(String);

impl QualityLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Text to draw for this label, or `fallback` when the label is blank.
    pub fn display_text(&self, fallback: &str) -> String {
        if self.is_blank() {
            fallback.to_string()
        } else {
            self.0.trim().to_string()
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QualityLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for QualityLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_trims_label() {
        let label = QualityLabel::new("  bad_road ");
        assert_eq!(label.display_text("Unknown"), "bad_road");
    }

    #[test]
    fn test_blank_label_uses_fallback() {
        assert_eq!(QualityLabel::new("").display_text("Unknown"), "Unknown");
        assert_eq!(QualityLabel::new(" \t").display_text("Unknown"), "Unknown");
    }
}
