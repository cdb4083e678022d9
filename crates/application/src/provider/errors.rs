use oig_core::{AppError, AppResult, AttributePath, Diagnostic, Diagnostics};

/// Lifecycle operation named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create.
    Create,
    /// Read.
    Read,
    /// Update.
    Update,
    /// Delete.
    Delete,
    /// Import.
    Import,
}

impl Operation {
    /// Returns the stable log name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Read => "reading",
            Self::Update => "updating",
            Self::Delete => "deleting",
            Self::Import => "importing",
        }
    }
}

/// Converts one failed operation into exactly one diagnostic.
///
/// The summary names the operation and entity; the detail carries the id when
/// known and the underlying message.
#[must_use]
pub fn operation_error(
    label: &str,
    operation: Operation,
    id: Option<&str>,
    error: &AppError,
) -> Diagnostic {
    let subject = label.to_lowercase();
    let target = match id {
        Some(id) if !id.is_empty() => format!("{subject} '{id}'"),
        _ => subject,
    };

    match error {
        AppError::Unsupported(message) => Diagnostic::error(
            format!("Unsupported change to {label}"),
            format!("Cannot {} {target}: {message}", operation.as_str()),
        ),
        AppError::Cancelled => Diagnostic::error(
            format!("Error {} {label}", operation.gerund()),
            format!("Operation on {target} was cancelled before it completed."),
        ),
        other => Diagnostic::error(
            format!("Error {} {label}", operation.gerund()),
            format!("Could not {} {target}: {other}", operation.as_str()),
        ),
    }
}

/// Records a failed validator result as an attribute-scoped error.
pub fn check(diagnostics: &mut Diagnostics, path: AttributePath, result: AppResult<()>) {
    if let Err(error) = result {
        let detail = match error {
            AppError::Validation(message) => message,
            other => other.to_string(),
        };
        diagnostics.attribute_error(path, "Invalid attribute value", detail);
    }
}

#[cfg(test)]
mod tests {
    use oig_core::{AppError, AttributePath, Diagnostics};

    use super::{Operation, check, operation_error};

    #[test]
    fn remote_errors_name_entity_and_id() {
        let diagnostic = operation_error(
            "Grant",
            Operation::Read,
            Some("gra1"),
            &AppError::Remote {
                status: 500,
                message: "E0000009: Internal Server Error".to_owned(),
            },
        );
        assert_eq!(diagnostic.summary, "Error reading Grant");
        assert_eq!(
            diagnostic.detail,
            "Could not read grant 'gra1': remote error (status 500): E0000009: Internal Server Error"
        );
    }

    #[test]
    fn unsupported_changes_get_their_own_summary() {
        let diagnostic = operation_error(
            "Campaign",
            Operation::Update,
            Some("ici1"),
            &AppError::Unsupported("destroy and recreate".to_owned()),
        );
        assert_eq!(diagnostic.summary, "Unsupported change to Campaign");
        assert!(diagnostic.detail.ends_with("destroy and recreate"));
    }

    #[test]
    fn validator_failures_keep_the_attribute_path() {
        let mut diagnostics = Diagnostics::new();
        check(
            &mut diagnostics,
            AttributePath::attribute("time_zone"),
            Err(AppError::Validation("time_zone requires expiration_date".to_owned())),
        );
        check(&mut diagnostics, AttributePath::attribute("name"), Ok(()));

        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["time_zone".to_owned()]);
    }
}
