//! Shared test fixtures for Marionette crates.
//!
//! Provides [`TestSkeleton`], a synthetic in-memory bone-pose store
//! implementing [`SkeletonPose`], plus helpers for building common chain
//! shapes.

pub mod skeleton;

pub use skeleton::{straight_chain, TestSkeleton};
