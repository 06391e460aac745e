//! Invidious video search engine for meta-search hosts, with a small HTTP host.

// Strict bans on unsafe or non-idiomatic code
#![deny(warnings)] // Every warning is an error
#![deny(unsafe_code)] // No unsafe code
#![deny(missing_docs)] // Every public item is documented
#![deny(dead_code)] // No unused code
#![deny(non_camel_case_types)]

// Nothing slips through
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Results and Options are handled explicitly
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy discipline
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)] // No unwrap()
#![deny(clippy::expect_used)] // No expect()
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)] // Log through tracing
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)] // const wherever possible
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic, clippy::shadow_unrelated))]

#![deny(overflowing_literals)]

/// Invidious request building and result normalization.
#[allow(
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod engine;
/// HTTP host serving the engine.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async
)]
pub mod server;
/// Entry helpers to start the host.
#[allow(clippy::missing_errors_doc)]
pub mod start;
