//! rscript_query: stateless queries over parsed TypeScript.
//!
//! Tree walks, literal and modifier inspection, export-shape analysis,
//! object-literal reading, and two type-inference paths that both produce
//! canonical type strings:
//!
//! - the syntactic path ([`infer`]) works from type nodes and expressions
//!   alone;
//! - the checker-backed path ([`resolve`]) asks a [`TypeResolver`] such as
//!   [`rscript_checker::Checker`].
//!
//! Nothing here mutates its input or caches across calls.

pub mod batch;
pub mod calls;
pub mod declarations;
mod error;
pub mod exports;
pub mod format;
pub mod infer;
pub mod interface_scan;
pub mod literals;
pub mod object_literal;
pub mod query;
pub mod resolve;

pub use batch::{analyze_exports_batch, try_analyze_exports_batch, BatchOptions};
pub use calls::{find_exported_functions, find_function_calls, ExportedFunction, FunctionCallRecord};
pub use declarations::{
    declaration_name, has_modifier, is_async, is_default_export, is_exported, line_of_node,
};
pub use error::QueryError;
pub use exports::{analyze_exports, ExportKind, ExportSummary};
pub use format::{format_property_key, is_valid_identifier, type_maps_equal};
pub use infer::{
    extract_properties_from_object_literal, find_type_alias, infer_type_from_expression,
    infer_type_from_type_node, parse_object_type, parse_object_type_unwrapping_promise,
    try_infer_type_from_expression, unwrap_promise_type_node,
};
pub use interface_scan::{interface_property_names, scan_interfaces, InterfaceHandlers};
pub use literals::{generic_array_values, literal_value, string_array_values, LiteralValue};
pub use object_literal::{
    get_boolean_property, get_property_value, has_property, read_object_literal,
    PropertyDescriptor, RawValue,
};
pub use query::{find_all, find_first};
pub use resolve::{extract_properties_from_type, type_to_canonical_string, unwrap_promise_type, TypeResolver};
