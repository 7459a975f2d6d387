// Core algorithm exports
pub mod eligibility;
pub mod lifecycle;
pub mod pair;
pub mod range;
pub mod ranker;
pub mod recommender;

pub use eligibility::check_eligibility;
pub use lifecycle::{MatchLifecycle, RequestOutcome};
pub use pair::{canonicalize, parse_user_id, CanonicalPair};
pub use range::DateRange;
pub use ranker::{normalize_seed, shared_interest_count, Ranker, RankerLimits};
pub use recommender::Recommender;
