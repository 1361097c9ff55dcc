//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::TileIndex;

/// Required world or catalog data could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("tile {0} not found")]
    TileNotFound(TileIndex),

    #[error("tile {0} has no world position")]
    TileWithoutPosition(TileIndex),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            TileNotFound(_) => "ORACLE_TILE_NOT_FOUND",
            TileWithoutPosition(_) => "ORACLE_TILE_WITHOUT_POSITION",
        }
    }
}
