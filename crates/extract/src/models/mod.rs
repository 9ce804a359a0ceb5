mod descriptor;
mod file;
mod number;

pub use self::descriptor::ReleaseDescriptor;
pub use self::file::{Extension, FileType, ReleaseFile};
pub use self::number::{MultiKind, MultiNumber, Number, ReleaseNumber};
