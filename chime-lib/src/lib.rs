//! # Chime Library
//!
//! This library provides the playback controller and media-element plumbing
//! for the chime audio player. The controller owns the UI-facing state
//! (playing, muted, current time, duration); the playback module provides a
//! media element backed by rodio and symphonia.

pub mod controller;
pub mod element;
pub mod info;
pub mod playback;
mod tools;
