//! Field-level request validation.
//!
//! Request schemas collect every problem before failing, so a client sees all
//! missing and invalid fields in one response.

/// The set of offending fields found while validating one request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire names of required fields that were absent, null or blank.
    pub missing: Vec<&'static str>,
    /// Wire names of present fields whose value breaks an invariant, with the reason.
    pub invalid: Vec<(&'static str, &'static str)>,
}

impl ValidationError {
    /// Record `field` as missing when `value` is absent or blank; pass it through otherwise.
    pub fn required_str(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.missing.push(field);
                None
            }
        }
    }

    /// Record `field` as missing when `value` is absent.
    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    pub fn invalid(&mut self, field: &'static str, reason: &'static str) {
        self.invalid.push((field, reason));
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// Every offending field name, missing ones first.
    pub fn fields(&self) -> Vec<&'static str> {
        self.missing
            .iter()
            .copied()
            .chain(self.invalid.iter().map(|(f, _)| *f))
            .collect()
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!(
                "Missing required field(s): {}",
                self.missing.join(", ")
            ));
        }
        if !self.invalid.is_empty() {
            let reasons: Vec<String> = self
                .invalid
                .iter()
                .map(|(field, reason)| format!("{field} {reason}"))
                .collect();
            parts.push(format!("Invalid field(s): {}", reasons.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}
