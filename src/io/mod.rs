//! I/O layer: concurrent acquisition of sources and externs, the bundled
//! default extern set, and the compiled-code output channel.
pub mod sources;
pub use sources::{
    Extern, FsReader, InputBuffer, InputSource, SourceBuffer, SourceReader, acquire_externs,
    acquire_sources,
};

pub mod externs;
pub use externs::{default_externs, init_default_externs, load_externs};

pub mod output;
pub use output::{source_map_comment, write_compiled};
