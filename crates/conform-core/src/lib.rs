//! Compliance evaluation and remediation engine
//!
//! Audits a declared desired state for a set of filesystem paths (mode,
//! owner, group, content) and optionally remediates deviations. One
//! request in, one response out; entirely synchronous and stateless across
//! invocations. The wire format is handled by [`conform_codec`]; this
//! crate owns the semantics: inspection, evaluation, the ordered
//! remediation plan, and result aggregation.

pub mod content;
pub mod digest;
pub mod driver;
pub mod error;
pub mod evaluate;
pub mod identity;
pub mod inspect;
pub mod remediate;
pub mod report;
pub mod request;

pub use driver::run;
pub use error::{Error, Result};
pub use evaluate::ComplianceIssue;
pub use remediate::{FixError, FixKind};
pub use report::{FileResult, FixOutcome, Response, Status};
pub use request::{FileSpec, Request};
