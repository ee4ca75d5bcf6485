//! Image blob storage for message attachments.
//!
//! Image messages carry only a reference; the bytes live here. The module
//! follows the same port/adapter split as the message store:
//!
//! - **Port**: [`store::MediaStore`] with content-hash addressing
//! - **Adapters**: [`fs::FsMediaStore`] (capability-scoped directory) and
//!   [`memory::InMemoryMediaStore`] (tests)

pub mod error;
pub mod fs;
pub mod memory;
pub mod store;
