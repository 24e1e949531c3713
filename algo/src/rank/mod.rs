/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking algorithms.
//!
//! - [`eigen`]: exact PageRank as an eigenvector of the transition matrix;
//! - [`power`]: powers of the transition matrix;
//! - [`recursive`]: synchronous recursive updates on the inbound links;
//! - [`surfer`]: Monte Carlo simulation of a random surfer.

pub mod eigen;
pub mod power;
pub mod recursive;
pub mod surfer;

pub use eigen::{EigenSolver, NoStationaryDistribution, eigenvector_pagerank};
pub use power::{PowerIteration, fixed_power};
pub use recursive::{RecursiveUpdate, recursive_pagerank};
pub use surfer::{RandomSurfer, SurferWalk, random_surf, step_distribution};
