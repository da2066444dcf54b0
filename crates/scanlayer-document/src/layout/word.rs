// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognised words and page-space rectangles.

/// One recognised word with its bounding box in source-image pixels.
///
/// The box is normalised on construction so that `left <= right` and
/// `top <= bottom`; width and height are therefore never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Word {
    pub fn new(text: impl Into<String>, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            text: text.into(),
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Clip the box to an image of `width` x `height` pixels.
    ///
    /// Detectors occasionally report boxes a pixel or two outside the image;
    /// clipping keeps every mapped box inside the page footprint.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            text: self.text.clone(),
            left: self.left.clamp(0, max_x),
            top: self.top.clamp(0, max_y),
            right: self.right.clamp(0, max_x),
            bottom: self.bottom.clamp(0, max_y),
        }
    }
}

/// An axis-aligned rectangle in page space (millimetres, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}
