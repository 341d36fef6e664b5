//! Local notes: frontmatter codec, file operations and vault access.

pub mod file_ops;
pub mod frontmatter;
pub mod vault;

pub use frontmatter::FrontMatter;
pub use vault::{DocumentHandle, FsVault, Vault};
