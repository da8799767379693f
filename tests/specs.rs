// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs: real child processes and filesystem fixtures,
//! in-memory collaborators everywhere else.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/lifecycle.rs"]
mod lifecycle;

#[path = "specs/inventory.rs"]
mod inventory;

#[path = "specs/services.rs"]
mod services;
