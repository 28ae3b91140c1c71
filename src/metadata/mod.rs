pub mod fields;
pub mod patch;

pub use self::fields::{FieldUpdates, FolderName, MetadataField};
pub use self::patch::{patch_fields, patch_fields_report, write_patched, Patched};
