#![forbid(unsafe_code)]

//! Bubble, selection, and insertion sort.
//!
//! These loops check only the stop token; a selection change mid-run does
//! not interrupt them.

use super::SortEngine;
use crate::step::{IndexPair, StepSink};

impl<S: StepSink> SortEngine<S> {
    /// One step per adjacent swap.
    pub(super) fn bubble_sort(&mut self) {
        let n = self.values.len();
        for i in 0..n.saturating_sub(1) {
            if self.cancelled() {
                break;
            }
            for j in 0..n - i - 1 {
                if self.cancelled() {
                    break;
                }
                self.count_comparison();
                if self.values[j] > self.values[j + 1] {
                    self.values.swap(j, j + 1);
                    self.step(IndexPair::at(j, j + 1));
                }
            }
        }
        if !self.cancelled() {
            self.complete();
        }
    }

    /// One step per outer pass, swapping the minimum into place even when it
    /// is already there.
    pub(super) fn selection_sort(&mut self) {
        let n = self.values.len();
        for i in 0..n.saturating_sub(1) {
            if self.cancelled() {
                break;
            }
            let mut min_idx = i;
            for j in i + 1..n {
                if self.cancelled() {
                    break;
                }
                self.count_comparison();
                if self.values[j] < self.values[min_idx] {
                    min_idx = j;
                }
            }
            if self.cancelled() {
                break;
            }
            self.values.swap(min_idx, i);
            self.step(IndexPair::at(min_idx, i));
        }
        if !self.cancelled() {
            self.complete();
        }
    }

    /// One step per shift. Counts one comparison per shift plus one for the
    /// comparison that ends each inner loop.
    pub(super) fn insertion_sort(&mut self) {
        let n = self.values.len();
        for i in 1..n {
            if self.cancelled() {
                break;
            }
            let key = self.values[i];
            // `hole` is one past the classic `j` cursor.
            let mut hole = i;
            while hole > 0 && self.values[hole - 1] > key {
                if self.cancelled() {
                    break;
                }
                self.count_comparison();
                self.values[hole] = self.values[hole - 1];
                hole -= 1;
                self.step(IndexPair::new(hole as isize - 1, hole as isize));
            }
            if !self.cancelled() {
                self.count_comparison();
            }
            // Always drop the key back in, so a cancelled run still holds a
            // permutation of its input.
            self.values[hole] = key;
        }
        if !self.cancelled() {
            self.complete();
        }
    }
}
