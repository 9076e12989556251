#![warn(missing_docs)]
//! Core library entry points for the portfolio link index.

pub mod dataset;
pub mod index;
pub mod store;

pub use dataset::{PortfolioDataset, PortfolioRecord};
pub use index::{PortfolioIndex, SkillQuery, LINKS_KEY};
pub use store::{ChromaCollection, ChromaStore, CollectionEntry, Metadata, VectorCollection};

#[cfg(feature = "debug_logs")]
#[macro_export]
// This allows use of the `eprintln!` macro via `debug_log!` macro.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// This effectively disables the `eprintln!` macro, effectively removing it from the code during
// compilation.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
