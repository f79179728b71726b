mod assertion;
mod data;
mod error;
mod interaction_ledger;
mod interaction_recorder;
mod result_aggregator;
mod validator_configuration;

pub mod entropy;
pub mod http_client;
pub mod mutations;
pub mod ssdp;
pub mod util;

pub use assertion::AssertionId;
pub use data::{
    Body, Interaction, RequestData, RequestVariant, ResourceType, ResponseData, StructuredBody,
    XmlElement,
};
pub use entropy::{EntropyThresholds, TokenAnalyzer, TokenClassification, TokenVerdict};
pub use error::Error;
pub use http_client::{HttpClient, HyperHttpClient};
pub use interaction_ledger::{InteractionLedger, UriMatch};
pub use interaction_recorder::InteractionRecorder;
pub use mutations::Credentials;
pub use result_aggregator::{Outcome, ResultAggregator, Summary, Verdict};
pub use ssdp::{DiscoveredService, DiscoveredServices, SsdpDiscoveryClient};
pub use validator_configuration::{DiscoveryConfiguration, ValidatorConfiguration};
