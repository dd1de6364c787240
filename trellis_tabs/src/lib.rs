// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run-packing layout for tab-like widgets.
//!
//! Tabs that do not fit one line along their edge are wrapped into *runs*.
//! The engine packs greedily, rebalances so the last run is not nearly empty,
//! rotates the selected run to sit adjacent to the content, and pads every
//! run out to the full line when there is more than one. A scrolling style
//! keeps a single run and moves a whole-tab viewport over it instead.
//!
//! [`TabLayout`] owns the configuration and a cached [`TabGeometry`];
//! mutations record invalidation bits and queries revalidate lazily.
//!
//! ```
//! use kurbo::{Point, Size};
//! use trellis_tabs::TabLayout;
//!
//! let mut layout = TabLayout::new(|_tab| Size::new(40.0, 20.0));
//! layout.set_tab_count(7);
//! layout.set_viewport(Size::new(150.0, 300.0));
//!
//! // Seven 40-wide tabs in 150 points wrap into three runs.
//! assert_eq!(layout.run_count(), 3);
//! let hit = layout.tab_at(Point::new(10.0, 10.0));
//! assert_eq!(hit, layout.geometry().runs().last().map(|r| r.start));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod runs;
mod types;

pub use engine::{TabGeometry, TabLayout};
pub use runs::{normalize_runs, pad_run, partition_into_runs, rotated_order, run_extent};
pub use types::{Direction, Invalidation, LayoutStyle, Placement, Run, TabMeasure};
