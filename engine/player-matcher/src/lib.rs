//! Player Matcher - finds players who appear on more than one wiki
//!
//! Every reference/candidate pair is compared on up to three independent
//! signals (real name, handle, date of birth). A pair is kept when enough
//! signals agree; signals either side cannot be evaluated on count for
//! nothing.

pub mod crossref;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod signals;

pub use crossref::{CrossReferenceReport, CrossReferencer, SiteSummary};
pub use error::{MatchError, PolicyError, Result};
pub use matcher::match_roster;
pub use policy::{MatchPolicy, Signal};
pub use signals::{evaluate, MatchKeys};
