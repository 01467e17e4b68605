mod chain;
mod destination;
mod error;
mod metadata;
mod router;
mod routing_report;
mod step;
mod value;

pub use chain::RuleChain;
pub use destination::Destination;
pub use error::ChainIssue;
pub use metadata::{FileMetadata, Frontmatter};
pub use router::Router;
pub use routing_report::{ChainOutcome, ChainTrace, RoutingReport};
pub use step::{match_name, match_tag, match_yaml, RuleStep, StepBuilder, StepKind};
pub use value::Value;
