//! The invitation workflow, one action per operation.
//!
//! Actions are built per call from explicit handles and hold no state
//! between calls.

mod accept_invitation;
mod extend_invitation;
mod invite_users;

pub use accept_invitation::AcceptInvitationAction;
pub use extend_invitation::ExtendInvitationAction;
pub use invite_users::InviteUsersAction;
