use seth_common::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxPoolError {
    #[error("txpool: transaction {0} already present")]
    DuplicateTxHash(Hash),
    #[error("txpool: types error: {0}")]
    Types(#[from] seth_types::TypesError),
}
