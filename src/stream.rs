//! Streaming document assembly.
//!
//! [`stream`] processes pages on the rayon pool and hands finished pages to
//! the caller through a channel as soon as they are ready, buffering
//! out-of-order completions so the receiver always observes pages in index
//! order.

use std::collections::BTreeMap;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver};
use rayon::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::input::PagePrimitives;
use crate::model::Page;
use crate::pipeline::{new_document_prefix, process_page, validate};

/// Reorder buffer keyed by page index. Items pushed in any order come back
/// out in index order, each exactly once.
pub struct OrderedEmitter<T> {
    pending: BTreeMap<usize, T>,
    next: usize,
}

impl<T> OrderedEmitter<T> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next: 0,
        }
    }

    /// Accept one completed item and return every item that is now
    /// releasable in order.
    pub fn push(&mut self, index: usize, item: T) -> Vec<T> {
        self.pending.insert(index, item);
        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next) {
            ready.push(item);
            self.next += 1;
        }
        ready
    }

    /// Number of buffered items still waiting on a predecessor.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for OrderedEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process pages concurrently and emit them in page order as they become
/// available. The receiver end closes once every page has been emitted;
/// dropping it early cancels emission without affecting in-flight pages.
pub fn stream(
    source_name: &str,
    pages: Vec<PagePrimitives>,
    config: Config,
) -> Result<Receiver<Page>> {
    validate(&pages)?;
    let prefix = new_document_prefix(source_name, &config);

    let (raw_tx, raw_rx) = bounded::<(usize, Page)>(pages.len().max(1));
    let (out_tx, out_rx) = unbounded::<Page>();

    thread::spawn(move || {
        pages
            .par_iter()
            .enumerate()
            .for_each_with(raw_tx, |tx, (index, primitives)| {
                let page = process_page(index, primitives, &config).with_tag(&prefix);
                // A closed channel means the consumer went away; the page
                // is discarded, not partially emitted.
                let _ = tx.send((index, page));
            });
    });

    thread::spawn(move || {
        let mut emitter = OrderedEmitter::new();
        for (index, page) in raw_rx {
            for ready in emitter.push(index, page) {
                if out_tx.send(ready).is_err() {
                    return;
                }
            }
        }
    });

    Ok(out_rx)
}
