//! Route `name=value` option strings to typed fields.
//!
//! A [`Dispatcher`] splits each raw token at its first separator and hands the
//! `(name, value)` pair to a handler. The handler picks a destination by name
//! and assigns it through the [`Coerce`] conversions, either by hand or through
//! an [`OptionTable`].
//!
//! ```
//! use optf::OptionTable;
//!
//! #[derive(Default)]
//! struct Settings {
//!     verbose: bool,
//!     ratio: f64,
//! }
//!
//! let table = OptionTable::new()
//!     .define("verbose", |s: &mut Settings| &mut s.verbose)
//!     .define("ratio", |s: &mut Settings| &mut s.ratio);
//!
//! let mut settings = Settings::default();
//! table.load(&mut settings, ["verbose=yes", "ratio=0.5"]).unwrap();
//! assert!(settings.verbose);
//! assert_eq!(settings.ratio, 0.5);
//! ```
use thiserror::Error;

mod coerce;
mod dispatch;
mod table;

pub use coerce::{define, object, stob, transform, try_transform, Coerce};
pub use dispatch::{dispatch, split_option, DispatchReport, Dispatcher, OptionPair, DEFAULT_SEPARATOR};
pub use table::OptionTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid {target} literal {value:?}")]
    InvalidLiteral { target: &'static str, value: String },
    #[error("{target} literal {value:?} is out of range")]
    OutOfRange { target: &'static str, value: String },
    #[error("cannot build value from {value:?}: {message}")]
    Custom { value: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("option `{name}`: {source}")]
    Conversion {
        name: String,
        #[source]
        source: ConversionError,
    },
    #[error("option `{name}` targets an object that has not been selected")]
    NoDestination { name: String },
}

impl OptionError {
    /// Name of the option that failed.
    pub fn name(&self) -> &str {
        match self {
            OptionError::Conversion { name, .. } | OptionError::NoDestination { name } => name,
        }
    }
}
