//! Case-data client for the radiograph portal backend.
//!
//! This crate is the data layer behind the patient and doctor dashboards:
//!
//! - GraphQL and REST calls with bearer-token auth
//! - One typed parser for the response shapes the backend has used
//! - Normalization of every case dialect into a single [`CaseRecord`]
//! - Placeholder data and caller-owned view state for dashboards
//!
//! # Quick Start
//!
//! ```no_run
//! use radport_client::{PortalClient, Session};
//!
//! # async fn example() -> Result<(), radport_client::PortalError> {
//! let client = PortalClient::from_env()?;
//! let session = Session::from_cookie_header("auth-token=eyJhbGci...; user-role=paciente");
//!
//! for case in client.list_cases(&session).await? {
//!     println!("{} {} {:?}", case.id, case.status, case.urgency());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `RADPORT_URL` | Backend base URL (default: `http://localhost:8080`) |
//! | `RADPORT_GRAPHQL_PATH` | GraphQL endpoint path (default: `/query`) |
//! | `RADPORT_TOKEN` | Bearer token |
//! | `RADPORT_ROLE` | User role (`paciente` or `doctor`) |
//! | `RADPORT_COOKIE` | Cookie header holding `auth-token` / `user-role` |
//! | `RADPORT_TIMEOUT` | Request timeout in seconds (default: 30) |

pub mod case;
pub mod client;
pub mod diagnostic;
pub mod envelope;
pub mod error;
pub mod placeholder;
pub mod prediagnostic;
pub mod queries;
pub mod session;
pub mod types;
pub mod upload;
pub mod view;

// Re-export main types
pub use case::{
    format_timestamp, normalize_case, normalize_cases, CaseRecord, CaseStatus, DoctorReview,
    Finding, ModelResult, RawCase, Urgency,
};
pub use client::PortalClient;
pub use diagnostic::{Approval, DiagnosticPayload, DiagnosticReceipt};
pub use envelope::{GraphQlError, ResponseShape};
pub use error::{PortalError, PortalResult};
pub use placeholder::{is_placeholder, placeholder_cases};
pub use prediagnostic::PreDiagnostic;
pub use session::{Role, Session, UserProfile};
pub use types::{PortalConfig, Registration};
pub use upload::{RadiographUpload, MAX_UPLOAD_BYTES};
pub use view::{CaseCounts, CaseFeed, CaseSource, CaseView, FeedSource, RefreshTicket};

/// User-Agent sent with every request.
pub const PORTAL_USER_AGENT: &str = client::USER_AGENT_VALUE;
