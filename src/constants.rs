//! Chain constants

use crate::types::Natural;

/// How many levels behind the best height block state is retained
pub const CUT_OFF_AGE: Natural = 10;

/// Height of the genesis block
pub const GENESIS_HEIGHT: Natural = 1;
