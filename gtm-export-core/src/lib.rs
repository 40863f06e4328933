//! Generic Google Tag Manager export primitives used by higher-level tools.

mod lenient;
pub mod model;
pub mod parser;
pub mod scanner;

pub use model::{Container, ContainerExport, ContainerVersion, Folder, FolderSet, Tag, Trigger};
pub use parser::{parse, parse_file, ParseError};
pub use scanner::{contains_any_variable, contains_variable};
