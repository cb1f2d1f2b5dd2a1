mod claim;
mod mutation;
mod page;
mod user;

pub use claim::{Claim, ClaimRecord, UserRef, Venue};
pub use mutation::MutationResult;
pub use page::{ClaimPage, ClaimsRequest, Cursor, PageVariant};
pub use user::{UserDetails, UserDetailsEnvelope, USER_DETAILS_KEY};
