/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod harness;
pub mod matrix;
pub mod rank;
pub mod utils;
mod vector;

pub use vector::RankVector;

pub mod prelude {
    pub use crate::RankVector;
    pub use crate::harness::{
        Convergence, ConvergenceFailure, ConvergenceRecord, Harness, Iterative, Recorder, State,
    };
    pub use crate::matrix::{PageOrder, TransitionMatrix};
    pub use crate::rank::*;
    pub use crate::utils::Stopwatch;
}
