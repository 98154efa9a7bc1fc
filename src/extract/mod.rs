//! Structured extraction from generative service responses
//!
//! Every function here is a pure transformation of untrusted text. Nothing
//! assumes the service followed its prompt: each path ends in a typed record,
//! a sentinel value, an empty list, or a typed failure, never a partial record.
//!
//! # Modes
//!
//! - **JSON** (`json`): optional surrounding fence, structural parse, required
//!   top-level keys, typed deserialization.
//! - **Labeled field / labeled list** (`labeled`): `Label: value` lines and
//!   bullet lists under a heading.
//! - **Fenced segment** (`fenced`): split prose and triple-backtick code blocks
//!   into ordered message parts.

pub mod fenced;
pub mod json;
pub mod labeled;

pub use fenced::{segment, strip_fences};
pub use json::{parse_json_record, parse_json_value};
pub use labeled::{
    parse_error_diagnosis, parse_labeled_field, parse_labeled_fields, parse_labeled_list,
    parse_list_items, NOT_AVAILABLE,
};
