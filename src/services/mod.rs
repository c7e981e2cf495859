//! Business services
//!
//! The workflow core: code minting, status transition validation,
//! visibility scoping and the notes projection. Everything here is
//! pure logic; persistence lives in the repositories.

pub mod codes;
pub mod notes;
pub mod transitions;
pub mod visibility;
