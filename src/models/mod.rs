pub mod beneficiary;
pub mod campaign;
pub mod collection_point;
pub mod donation;
pub mod donor;
pub mod stats;
pub mod volunteer;

pub use beneficiary::*;
pub use campaign::*;
pub use collection_point::*;
pub use donation::*;
pub use donor::*;
pub use stats::*;
pub use volunteer::*;
