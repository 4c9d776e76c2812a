//! Interface scan integration tests.
//!
//! Runs handler sets over raw module text and checks the reported member
//! names, the accumulator threading and the failure path.

use indexmap::IndexMap;
use rscript_ast::node::*;
use rscript_query::{scan_interfaces, InterfaceHandlers};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

const ENV: &str = r#"
    export interface Env {
        API_URL: string;
        readonly "x-region"?: string;
        [key: `VITE_${string}`]: string;
        [`${prefix}_${name}_${suffix}`]: number;
        [key: `${string}_${string}_${string}`]: boolean;
        reload(): void;
    }

    interface Flags { beta: boolean }

    function setup() {
        interface Env { LOCAL_ONLY: string }
    }
"#;

/// Helper: records `interface.member` for every scanned member.
fn recorder(interface: &'static str) -> impl FnMut(&str, &TypeElement<'_>, &mut Vec<String>) {
    move |name, _, out| out.push(format!("{interface}.{name}"))
}

// ============================================================================
// Member Names
// ============================================================================

#[test]
fn test_env_member_names() {
    let mut handlers = InterfaceHandlers::new().with("Env", recorder("Env"));
    let names = scan_interfaces(ENV, &mut handlers, Vec::new());
    assert_eq!(
        names,
        vec![
            "Env.API_URL",
            "Env.x-region",
            "Env.VITE_${string}",
            "Env.${string}_${string}_${string}",
            "Env.${string}_${string}_${string}",
            "Env.LOCAL_ONLY",
        ]
    );
}

#[test]
fn test_handler_sees_member_node() {
    let mut handlers = InterfaceHandlers::new().with(
        "Env",
        |name: &str, member: &TypeElement<'_>, optional: &mut Vec<String>| {
            if let TypeElement::PropertySignature(signature) = member {
                if signature.question_token {
                    optional.push(name.to_string());
                }
            }
        },
    );
    assert_eq!(scan_interfaces(ENV, &mut handlers, Vec::new()), vec!["x-region"]);
}

// ============================================================================
// Accumulator
// ============================================================================

#[test]
fn test_handlers_share_one_accumulator() {
    let mut handlers = InterfaceHandlers::new()
        .with("Env", recorder("Env"))
        .with("Flags", recorder("Flags"));
    let names = scan_interfaces(ENV, &mut handlers, vec!["seed".to_string()]);
    assert_eq!(names.first().map(String::as_str), Some("seed"));
    assert!(names.contains(&"Flags.beta".to_string()));
    assert_eq!(names.len(), 1 + 6 + 1);
}

#[test]
fn test_counts_per_interface() {
    let mut handlers = InterfaceHandlers::new();
    for interface in ["Env", "Flags", "Missing"] {
        handlers.insert(interface, move |_: &str, _: &TypeElement<'_>, counts: &mut IndexMap<String, usize>| {
            *counts.entry(interface.to_string()).or_default() += 1;
        });
    }
    let counts = scan_interfaces(ENV, &mut handlers, IndexMap::new());
    assert_eq!(counts.get("Env"), Some(&6));
    assert_eq!(counts.get("Flags"), Some(&1));
    assert_eq!(counts.get("Missing"), None);
}

#[test]
fn test_handler_borrows_caller_state() {
    let mut calls = 0;
    {
        let mut handlers = InterfaceHandlers::new().with("Flags", |_: &str, _: &TypeElement<'_>, _: &mut ()| {
            calls += 1;
        });
        scan_interfaces(ENV, &mut handlers, ());
        scan_interfaces(ENV, &mut handlers, ());
    }
    assert_eq!(calls, 2);
}

#[test]
fn test_no_handlers_returns_initial() {
    let mut handlers: InterfaceHandlers<'_, Vec<String>> = InterfaceHandlers::default();
    assert!(handlers.is_empty());
    assert_eq!(scan_interfaces(ENV, &mut handlers, vec!["kept".to_string()]), vec!["kept"]);
}

#[test]
fn test_syntax_errors_do_not_stop_the_scan() {
    let mut handlers = InterfaceHandlers::new().with("Flags", recorder("Flags"));
    let names = scan_interfaces("interface Flags { beta: boolean }\nconst = ;", &mut handlers, Vec::new());
    assert_eq!(names, vec!["Flags.beta"]);
}

// ============================================================================
// Failure Path
// ============================================================================

#[derive(Clone, Default)]
struct SharedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct SharedWriterGuard<'a> {
    buffer: &'a Arc<Mutex<Vec<u8>>>,
}

impl io::Write for SharedWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriterGuard { buffer: &self.buffer }
    }
}

#[test]
fn test_unparseable_source_logs_and_returns_initial() {
    // Run on a larger stack so only the parser's depth guard decides.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let writer = SharedWriter::default();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .with_ansi(false)
                .with_writer(writer.clone())
                .finish();
            let _guard = tracing::subscriber::set_default(subscriber);

            let source = format!(
                "interface Flags {{ beta: boolean }}\nconst x = {}1{};",
                "(".repeat(1000),
                ")".repeat(1000)
            );
            let mut handlers = InterfaceHandlers::new().with("Flags", recorder("Flags"));
            let names = scan_interfaces(&source, &mut handlers, vec!["initial".to_string()]);
            let output = String::from_utf8(writer.buffer.lock().expect("log buffer").clone()).expect("utf-8 log");
            (names, output)
        })
        .expect("spawn scan thread");
    let (names, output) = handle.join().expect("scan thread panicked");
    assert_eq!(names, vec!["initial"]);
    assert!(output.contains("WARN"), "expected a warning, got: {output}");
    assert!(output.contains("interface scan skipped"), "got: {output}");
}
