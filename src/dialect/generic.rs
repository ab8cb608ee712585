//! The neutral dialect: ANSI-leaning defaults with no overrides.

use super::Dialect;
use crate::error::BridgeResult;

pub fn dialect() -> BridgeResult<Dialect> {
    Dialect::builder("generic").build()
}
