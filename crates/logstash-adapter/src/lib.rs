// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logstash adapter for container log routing.
//!
//! Records arrive one line at a time per container. Lines are coalesced into multi-line events
//! (stack traces, indented continuations, SQL error context), enriched with container metadata
//! and shipped as one JSON document per event over UDP or another registered transport.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod adapter;
pub mod coalescer;
pub mod config;
pub mod errors;
pub mod event;
pub mod hostname;
pub mod multiline;
pub mod record;
pub mod route;
pub mod transport;
