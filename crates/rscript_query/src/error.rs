use rscript_parser::ParseError;
use thiserror::Error;

/// Failure of a fallible batch entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("failed to parse {file_name}")]
    Parse {
        file_name: String,
        #[source]
        source: ParseError,
    },
}
