#![forbid(unsafe_code)]

//! Merge sort and quick sort.
//!
//! Every recursive entry and every loop iteration goes through
//! [`SortEngine::live`], which fails on a stop request or on a generation
//! change. Completion is decided by one order scan after the top-level call.

use super::SortEngine;
use crate::step::{IndexPair, StepSink};

impl<S: StepSink> SortEngine<S> {
    pub(super) fn merge_sort_all(&mut self) {
        if let Some(last) = self.values.len().checked_sub(1) {
            self.merge_sort(0, last);
        }
        self.complete_if_sorted();
    }

    fn merge_sort(&mut self, l: usize, r: usize) {
        if !self.live() {
            return;
        }
        if l < r {
            let m = l + (r - l) / 2;
            self.merge_sort(l, m);
            self.merge_sort(m + 1, r);
            self.merge(l, m, r);
        }
    }

    /// Merge `l..=m` with `m+1..=r`, one step per element written.
    ///
    /// The highlighted pair is `(k, k + i)` or `(k, k + j)`, where the cursor
    /// has already advanced in the main loop but not yet in the flush loops.
    fn merge(&mut self, l: usize, m: usize, r: usize) {
        if !self.live() {
            return;
        }
        let left = self.values[l..=m].to_vec();
        let right = self.values[m + 1..=r].to_vec();
        let (mut i, mut j, mut k) = (0usize, 0usize, l);

        while i < left.len() && j < right.len() {
            if !self.live() {
                return;
            }
            self.count_comparison();
            if left[i] <= right[j] {
                self.values[k] = left[i];
                i += 1;
                self.step(IndexPair::at(k, k + i));
            } else {
                self.values[k] = right[j];
                j += 1;
                self.step(IndexPair::at(k, k + j));
            }
            k += 1;
        }

        while i < left.len() {
            if !self.live() {
                return;
            }
            self.values[k] = left[i];
            self.step(IndexPair::at(k, k + i));
            i += 1;
            k += 1;
        }

        while j < right.len() {
            if !self.live() {
                return;
            }
            self.values[k] = right[j];
            self.step(IndexPair::at(k, k + j));
            j += 1;
            k += 1;
        }
    }

    pub(super) fn quick_sort_all(&mut self) {
        if let Some(last) = self.values.len().checked_sub(1) {
            self.quick_sort(0, last);
        }
        self.complete_if_sorted();
    }

    fn quick_sort(&mut self, low: usize, high: usize) {
        if !self.live() {
            return;
        }
        if low < high {
            let Some(pivot) = self.partition(low, high) else {
                return;
            };
            if pivot > low {
                self.quick_sort(low, pivot - 1);
            }
            self.quick_sort(pivot + 1, high);
        }
    }

    /// Lomuto partition around `values[high]`. One step per swap plus one
    /// for placing the pivot. `None` when the run stood down midway.
    fn partition(&mut self, low: usize, high: usize) -> Option<usize> {
        if !self.live() {
            return None;
        }
        let pivot = self.values[high];
        let mut store = low;

        for j in low..high {
            if !self.live() {
                return None;
            }
            self.count_comparison();
            if self.values[j] < pivot {
                self.values.swap(store, j);
                self.step(IndexPair::at(store, j));
                store += 1;
            }
        }

        if !self.live() {
            return None;
        }
        self.values.swap(store, high);
        self.step(IndexPair::at(store, high));
        Some(store)
    }
}
