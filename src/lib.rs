// Crate root: declare modules and control visibility
pub mod debug;
pub mod dump;
pub mod error;
pub mod helper_requests;
pub mod profile;
pub mod protocol;
pub mod registers;
pub mod request_handler;
pub mod rle;
pub mod transport;

// Re-export commonly used API from the library for binaries/tests
pub use error::{CodecError, DumpFault, EncodingFault, LayoutError};
pub use profile::{Cisco2600, DebuggerOptions, ProfileKind, TargetProfile};
pub use registers::{RegisterDescriptor, RegisterLayout, RegisterValue};
