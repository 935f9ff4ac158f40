// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bbpl-runtime: the Runtime Driver, a thin façade over the Docker Engine
//! API used to create, run, and tear down step containers and the shared
//! pipeline network.

mod driver;
mod error;
mod resources;
mod script;
mod spec;

pub use driver::RuntimeDriver;
pub use error::{RuntimeError, RuntimeResult};
pub use resources::{parse_memory_bytes, parse_nano_cpus};
pub use script::{build_command, WORKSPACE_MOUNT};
pub use spec::{Bind, ContainerHandle, ContainerSpec, RunOutcome};
