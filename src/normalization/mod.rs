pub mod confidence;
pub mod publisher;

pub use confidence::{
    ConfidenceThresholds, PublisherClassifier, PublisherConfidence, PublisherFrequencyTable,
};
pub use publisher::{normalize_publishers, PublisherNormalizer, PublisherTokens};
