pub mod update;

pub use update::{BinaryFile, Update, UpdateAction, UpdateRelationship};
