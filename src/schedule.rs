pub mod engine;
pub mod ledger;
pub mod scorer;


pub use engine::{Scheduler, link_return_legs};
pub use ledger::{Allocation, Ledger, LedgerSummary, expand};
pub use scorer::{CandidateScorer, Scored};
