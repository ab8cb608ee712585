//! Grammar productions, grouped by statement family.

pub mod ddl;
pub mod dml;
pub mod expressions;
