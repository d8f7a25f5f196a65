mod eval;

pub use eval::eval;

// the grammar crate's types are part of this crate's public seam
pub use condexpr::{static_parse_condition, CmpOp, CondExpr, Operand};
