pub mod address;
pub mod division;
pub mod election;
pub mod states;
pub mod summary;

pub use address::AddressInput;
pub use division::JurisdictionIdentifier;
pub use election::{DivisionSubRecord, ElectionRecord, VotingMethod, VotingMethodType};
pub use states::POSTAL_ABBREVIATIONS;
pub use summary::{ElectionSummary, MethodMatching};
