pub mod cache;
pub mod config;
pub mod desk;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod lookup;
pub mod rest;
pub mod types;
pub mod workflow;

// ---- Top-level re-exports for ergonomic usage ----

// Driver + config
pub use config::{ClaimDeskConfig, DEFAULT_PAGE_SIZE};
pub use desk::{ClaimDesk, Notice, NoticeLevel, ResolutionOutcome, StalledResolution};
pub use error::{ClaimDeskError, Result};

// Remote side
pub use gateway::ClaimGateway;
pub use rest::ClaimDeskHttpClient;

// State
pub use cache::PageCache;
pub use listing::{estimate_total, ClaimList, LoadStep, LOAD_ERROR_MESSAGE};
pub use lookup::{LookupOutcome, LookupTicket, UserLookup, LOOKUP_ERROR_MESSAGE};
pub use workflow::{
    resume_resolution, run_resolution, FlowState, Resolution, ResolutionError,
    ResolutionFailure, ResolutionFlows, ResolutionPlan, SagaStage,
};

// Wire types
pub use types::{
    Claim, ClaimPage, ClaimRecord, ClaimsRequest, Cursor, MutationResult, PageVariant,
    UserDetails, UserRef, Venue,
};
