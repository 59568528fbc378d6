pub mod catalog;
pub mod config;
pub mod demand;
pub mod domain;
pub mod errors;
pub mod matching;
pub mod vectorize;

pub use catalog::{load_catalog, parse_catalog, sample_catalog, CatalogError};
pub use demand::{DemandAnalysis, DemandParser};
pub use domain::budget::{BudgetDescriptor, BudgetSource, PricingMode};
pub use domain::dimension::{DemandVector, Dimension, DimensionVector, PerformanceVector};
pub use domain::phone::{Brand, CatalogItem};
pub use domain::requirement::{RequirementType, SpecificRequirement, Unit};
pub use errors::{ApplicationError, DomainError};
pub use matching::{
    match_catalog, parse_demand, MatchBreakdown, MatchResult, MatchingConfig, MatchingEngine,
    RankedMatch, SimilarItem,
};
pub use vectorize::{PhoneVectorizer, VectorCache};
