//! # mabfeat Core Library
//!
//! A batch pipeline for antibody structure files: repair missing hydrogens,
//! run an external numbering annotator, and compute molecular descriptor
//! features, one parallel task per input file.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers to keep the thin orchestration code
//! separate from its external collaborators.
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: structure-file
//!   discovery, temporary-artifact ownership, and the residue charge model
//!   used by the native charge-asymmetry descriptor.
//!
//! - **[`pipeline`]: The Stage Layer.** The three external-collaborator seams
//!   (`Repair`, `Annotate`, `Featurize`) with command-spawning production
//!   implementations, the per-file task that composes them, and the immutable
//!   configuration shared by every task.
//!
//! - **[`workflows`]: The Public API.** The batch entry point that resolves
//!   inputs, fans one task per file out onto the thread pool, and collects
//!   the results either in one barrier or incrementally as tasks complete.

pub mod core;
pub mod pipeline;
pub mod workflows;
