// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules, grouped by booth stage

pub mod capture;
pub mod editing;
