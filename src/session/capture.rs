// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer capture for the duration of one interaction.
//!
//! Once a drag or resize starts, pointer movement and release must keep
//! reaching the session even when the pointer leaves the image. The host
//! provides that through a [`PointerCapture`]; the session holds the guard
//! for exactly as long as the interaction lasts.

/// Something that can route all pointer events to the crop session.
pub trait PointerCapture {
    /// Releases the capture when dropped.
    type Guard;

    fn acquire(&mut self) -> Self::Guard;
}
