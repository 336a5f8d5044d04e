//! Intel Extract Common Library
//!
//! Web(WASM)とネイティブ版で共有するレコード型・選択モデル・ワークフロー

pub mod error;
pub mod layout;
pub mod selection;
pub mod session;
pub mod transport;
pub mod types;
pub mod wire;
pub mod workflow;

pub use error::{Error, Result, SelectionError, TransportError, ValidationError};
pub use layout::{column_layout, Column, ColumnWidth};
pub use selection::Selection;
pub use session::Session;
pub use transport::{ExportRequest, SavedExport, Transport};
pub use types::{ChosenFile, Field, FieldValue, Record};
pub use workflow::{Command, Completion, Intent, Phase, Ticket, Workflow};
