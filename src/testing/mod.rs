mod fake_portal;
mod locking_filesystem;

#[allow(unused_imports)]
pub use fake_portal::{FakePortal, OBJECT_ID_FIELD};
pub use locking_filesystem::LockingFilesystem;
