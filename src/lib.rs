#![deny(unused, nonstandard_style, rust_2018_idioms)]

pub mod command;
pub mod naming;
pub mod store;

pub use naming::uniquify;
pub use store::{NamedEntryStore, SelectionSet, SelectionSets};
