//! Material file handling: load with encoding detection, rewrite paths in
//! memory, write back with the original encoding.

pub mod encoding;
mod loader;
mod rewrite;
mod writer;

pub use encoding::{CANDIDATES, TextEncoding};
pub use loader::{SourceFile, decode_with_candidates, load, split_lines};
pub use rewrite::{ChangeKey, PathChange, Rewrite, RewriteResult, relocate, rewrite, rewrite_line};
pub use writer::{WriteOutcome, apply};
