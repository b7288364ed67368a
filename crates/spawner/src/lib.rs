// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! axon-spawner: the Spawner Loop that runs inside a TaskSpawner's
//! Deployment — ticker, discovery sources, prompt templating, and Task
//! creation under a concurrency cap. Everything the TaskSpawner
//! reconciler itself does not own lives here.

pub mod cycle;
pub mod source;
pub mod template;
