use thiserror::Error;

/// Structural failures; per-cell coercion problems are imputed, never raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("missing identifier column(s): {}", .columns.join(", "))]
    MissingIdentifiers { columns: Vec<String> },

    #[error("subject '{subject}' has no numeric values; cannot impute its mean")]
    EmptySubject { subject: String },
}
