//! Process exit codes for `radport`.
//!
//! Backend failures map through `PortalError::exit_code`:
//! 1 rejected input, 2 configuration, 3 unauthenticated, 4 backend error,
//! 5 network.

pub const SUCCESS: i32 = 0;
pub const NOT_FOUND: i32 = 1; // Nothing matched the request
pub const INTERNAL_ERROR: i32 = 2; // Setup failed outside the portal client
