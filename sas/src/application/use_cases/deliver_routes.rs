// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Deliver Routes
//!
//! The router's poll loop, reduced to a single-pass use case so the
//! bootstrap process can drive it on a timer without reaching into
//! `infrastructure::runtime` directly.

use crate::infrastructure::runtime::RouterDispatcher;
use sas_domain::IngestError;
use std::sync::Arc;

pub struct DeliverRoutes {
    dispatcher: Arc<RouterDispatcher>,
}

impl DeliverRoutes {
    pub fn new(dispatcher: Arc<RouterDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn execute(&self) -> Result<usize, IngestError> {
        self.dispatcher.dispatch_once().await
    }
}
