mod block;
mod body;
mod errors;
mod header;
mod signer;
mod transaction;

pub use block::Block;
pub use body::Body;
pub use errors::TypesError;
pub use header::Header;
pub use signer::SethSigner;
pub use transaction::Transaction;
