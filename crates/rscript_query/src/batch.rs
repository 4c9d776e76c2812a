//! Export analysis over many files at once.
//!
//! Each file is parsed into its own arena, so files are independent and can
//! be processed on the rayon pool. Results always come back in input order.

use crate::error::QueryError;
use crate::exports::{analyze_exports, ExportSummary};
use bumpalo::Bump;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rscript_parser::{parse_source_file, try_parse_source_file, ParserOptions};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Analyze files on the rayon thread pool.
    pub parallel: bool,
    /// Limits applied by the fallible entry point.
    pub parser: ParserOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parser: ParserOptions::default(),
        }
    }
}

fn analyze_one(file_name: &str, text: &str) -> ExportSummary {
    let arena = Bump::new();
    let source_file = parse_source_file(&arena, file_name, text);
    analyze_exports(&source_file)
}

fn try_analyze_one(file_name: &str, text: &str, options: &ParserOptions) -> Result<ExportSummary, QueryError> {
    let arena = Bump::new();
    let source_file =
        try_parse_source_file(&arena, file_name, text, options.clone()).map_err(|source| {
            QueryError::Parse {
                file_name: file_name.to_string(),
                source,
            }
        })?;
    Ok(analyze_exports(&source_file))
}

/// Parse each `(file_name, source_text)` pair and summarize its exports.
pub fn analyze_exports_batch<S>(files: &[(S, S)], options: &BatchOptions) -> Vec<(String, ExportSummary)>
where
    S: AsRef<str> + Sync,
{
    let _span = tracing::debug_span!("analyze_exports_batch", files = files.len(), parallel = options.parallel)
        .entered();
    let run = |(file_name, text): &(S, S)| {
        let file_name = file_name.as_ref();
        (file_name.to_string(), analyze_one(file_name, text.as_ref()))
    };
    if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    }
}

/// Like [`analyze_exports_batch`], but stops at the first file that cannot
/// be parsed at all.
pub fn try_analyze_exports_batch<S>(
    files: &[(S, S)],
    options: &BatchOptions,
) -> Result<Vec<(String, ExportSummary)>, QueryError>
where
    S: AsRef<str> + Sync,
{
    let _span = tracing::debug_span!("try_analyze_exports_batch", files = files.len(), parallel = options.parallel)
        .entered();
    let run = |(file_name, text): &(S, S)| {
        let file_name = file_name.as_ref();
        try_analyze_one(file_name, text.as_ref(), &options.parser).map(|summary| (file_name.to_string(), summary))
    };
    let results: Result<Vec<(String, ExportSummary)>, QueryError> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };
    if let Err(error) = &results {
        tracing::debug!(%error, "batch export analysis failed");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exports::ExportKind;

    fn sample() -> Vec<(&'static str, &'static str)> {
        vec![
            ("a.ts", "export const a = 1;"),
            ("b.ts", "export default function () {}"),
            ("c.ts", "import x from './x';"),
            ("d.ts", "export { x as y };\nexport default 1;"),
        ]
    }

    #[test]
    fn test_batch_preserves_order() {
        for parallel in [false, true] {
            let options = BatchOptions {
                parallel,
                ..BatchOptions::default()
            };
            let results = analyze_exports_batch(&sample(), &options);
            let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["a.ts", "b.ts", "c.ts", "d.ts"]);
            let kinds: Vec<_> = results.iter().map(|(_, s)| s.export_kind).collect();
            assert_eq!(
                kinds,
                vec![ExportKind::Named, ExportKind::Default, ExportKind::None, ExportKind::Both]
            );
        }
    }

    #[test]
    fn test_try_batch_reports_file() {
        let files = vec![("ok.ts", "export {}"), ("big.ts", "export const big = 1;")];
        let options = BatchOptions {
            parser: ParserOptions {
                max_source_length: 12,
                ..ParserOptions::default()
            },
            ..BatchOptions::default()
        };
        let error = try_analyze_exports_batch(&files, &options).expect_err("too large");
        assert!(matches!(error, QueryError::Parse { ref file_name, .. } if file_name == "big.ts"));
        assert_eq!(error.to_string(), "failed to parse big.ts");
    }

    #[test]
    fn test_try_batch_ok() {
        let options = BatchOptions {
            parallel: false,
            ..BatchOptions::default()
        };
        let results = try_analyze_exports_batch(&sample(), &options).expect("parses");
        assert_eq!(results.len(), 4);
    }
}
