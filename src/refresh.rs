use crate::{
    humanize::Formatter,
    page::{Document, Element, TimeElement},
    time::{parse_instant, SafeClock},
};
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which elements of a page a refresher rewrites.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    /// Every element with this tag.
    Tags { tag: String },
    /// The first child of cell `column` in each data row of table `id`.
    Table { id: String, column: usize },
}

impl Default for Target {
    fn default() -> Self {
        Target::Tags {
            tag: "time".to_string(),
        }
    }
}

pub struct Refresher {
    fmt: Formatter,
    clock: SafeClock,
}

impl Refresher {
    pub fn new(fmt: Formatter, clock: SafeClock) -> Refresher {
        Refresher { fmt, clock }
    }

    /// Rewrite one element against `now`. Returns false if it has no instant.
    pub fn refresh_one<E: TimeElement + ?Sized>(&self, el: &mut E, now: DateTime<Utc>) -> bool {
        let raw = match el.instant() {
            Some(raw) => raw,
            None => return false,
        };
        let instant = parse_instant(raw);
        if instant.is_none() {
            warn!("Unparseable instant {:?}, rendering as invalid date", raw);
        }
        let stamp = self.fmt.stamp(instant, now);
        el.set_text(stamp.text);
        el.set_title(stamp.title);
        true
    }

    /// Rewrite every element yielded, all against the same "now".
    pub fn refresh_elements<'a, E, I>(&self, elems: I) -> usize
    where
        E: TimeElement + 'a,
        I: IntoIterator<Item = &'a mut E>,
    {
        let now = self.clock.now();
        elems
            .into_iter()
            .filter_map(|e| self.refresh_one(e, now).then_some(()))
            .count()
    }

    /// Rewrite every element with the given tag.
    pub fn refresh_tags(&self, doc: &mut Document, tag: &str) -> usize {
        let now = self.clock.now();
        let mut n = 0;
        doc.root.for_each_tag_mut(tag, |e| {
            if self.refresh_one(e, now) {
                n += 1;
            }
        });
        n
    }

    /// Rewrite the timestamp cell of each data row of the table with `id`,
    /// leaving the header row alone.
    pub fn refresh_table(&self, doc: &mut Document, id: &str, column: usize) -> usize {
        let table = match doc.root.find_by_id_mut(id) {
            Some(t) => t,
            None => {
                debug!("No table #{} on page, nothing to refresh", id);
                return 0;
            }
        };
        let now = self.clock.now();
        let mut row = 0;
        let mut n = 0;
        table.for_each_tag_mut("tr", |tr| {
            row += 1;
            if row == 1 {
                return;
            }
            let cell: Option<&mut Element> = tr
                .children
                .get_mut(column)
                .and_then(|td| td.children.first_mut());
            let done = match cell {
                Some(cell) => self.refresh_one(cell, now),
                None => false,
            };
            if done {
                n += 1;
            } else {
                debug!("Row {} of #{} has no timestamp in column {}", row - 1, id, column);
            }
        });
        n
    }

    /// One refresh cycle over `target`.
    pub fn refresh(&self, doc: &mut Document, target: &Target) -> usize {
        match target {
            Target::Tags { tag } => self.refresh_tags(doc, tag),
            Target::Table { id, column } => self.refresh_table(doc, id, *column),
        }
    }

    /// Refresh `doc` and write it out. A failed write is logged and the
    /// in-memory page stays refreshed, so the next cycle can try again.
    pub fn cycle(&self, doc: &mut Document, target: &Target, out: &Path, html: Option<&Path>) -> usize {
        let n = self.refresh(doc, target);
        debug!("- Refreshed {} timestamps", n);
        if let Err(e) = doc.store(out, html) {
            error!("Could not write refreshed page to {}: {}", out.display(), e);
        }
        n
    }
}
