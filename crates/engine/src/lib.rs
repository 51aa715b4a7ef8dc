//! Core engine for group expense splitting.
//!
//! The engine owns the split computation and its gates: a monetary total
//! and a split request go in, exact per-member cent shares come out, and
//! the expense plus its splits are committed as one atomic write. HTTP
//! routing, authentication and the concrete database live outside; the
//! database connection is injected via [`Engine::builder`].

pub use commands::ExpenseCmd;
pub use error::EngineError;
pub use expenses::Expense;
pub use groups::Group;
pub use money::{BASIS_POINTS_PER_WHOLE, MoneyCents, basis_points_from_percent};
pub use ops::{Engine, EngineBuilder};
pub use split::{MemberSplit, SplitShare, SplitType, compute_splits};

mod commands;
mod error;
mod expense_splits;
mod expenses;
mod group_memberships;
mod groups;
mod money;
mod ops;
mod split;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
