use oig_core::{AppError, AppResult};

/// Parsed import identifier: a bare id or `parent/child`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    raw: String,
    parts: Vec<String>,
}

impl ImportId {
    /// Splits an import id on `/`, rejecting empty segments.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        let parts: Vec<String> = raw.split('/').map(str::to_owned).collect();
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "import id '{raw}' contains an empty segment"
            )));
        }

        Ok(Self {
            raw: raw.to_owned(),
            parts,
        })
    }

    /// Returns the id as given.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Requires a bare id.
    pub fn single(&self) -> AppResult<&str> {
        match self.parts.as_slice() {
            [id] => Ok(id.as_str()),
            _ => Err(self.arity_error("<id>")),
        }
    }

    /// Requires a `parent/child` pair; `format` names both parts for the message.
    pub fn pair(&self, format: &str) -> AppResult<(&str, &str)> {
        match self.parts.as_slice() {
            [parent, child] => Ok((parent.as_str(), child.as_str())),
            _ => Err(self.arity_error(format)),
        }
    }

    fn arity_error(&self, format: &str) -> AppError {
        AppError::Validation(format!(
            "unexpected import id '{}': expected the form {format}",
            self.raw
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ImportId;

    #[test]
    fn bare_and_composite_ids() {
        let bare = ImportId::parse("gra1").unwrap_or_else(|_| unreachable!());
        assert_eq!(bare.single().ok(), Some("gra1"));
        assert!(bare.pair("<collection_id>/<assignment_id>").is_err());

        let composite = ImportId::parse("col1/asn1").unwrap_or_else(|_| unreachable!());
        assert_eq!(
            composite.pair("<collection_id>/<assignment_id>").ok(),
            Some(("col1", "asn1"))
        );
        let error = composite.single().err().map(|error| error.to_string());
        assert_eq!(
            error.as_deref(),
            Some("validation error: unexpected import id 'col1/asn1': expected the form <id>")
        );
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(ImportId::parse("col1/").is_err());
        assert!(ImportId::parse("").is_err());
        assert!(ImportId::parse("a//b").is_err());
    }
}
