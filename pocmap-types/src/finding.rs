use serde::{Deserialize, Serialize};

/// A single match reported by the scan-check engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Host the check matched against, as reported by the engine.
    pub url: String,
    /// Identifier of the check that matched.
    pub check_id: String,
    /// Template path reported by the engine, or the check id when absent.
    pub template: String,
    /// Severity as reported, passed through verbatim. Empty when absent.
    pub severity: String,
}

impl Finding {
    pub fn new(url: impl Into<String>, check_id: impl Into<String>, severity: impl Into<String>) -> Self {
        let check_id = check_id.into();
        Self {
            url: url.into(),
            template: check_id.clone(),
            check_id,
            severity: severity.into(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}
