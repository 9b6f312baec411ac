use crate::graph::AtomId;

/// Accumulates charge-bearing atoms the acyclic/cyclic writers couldn't
/// express inline: charges are deferred and emitted after the main
/// string as a ` &n/m` suffix.
///
/// Numbers the suffix by the atom's 1-based creation order rather than by
/// byte position in the emitted string, matching
/// [`super::super::read`]'s interpretation of the same suffix (see
/// `DESIGN.md`) so a written-then-read molecule's charges land back on
/// the same atoms even if the string grows around them.
#[derive(Debug, Default)]
pub struct ChargeLedger {
    positives: Vec<AtomId>,
    negatives: Vec<AtomId>,
}

impl ChargeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, atom: AtomId, charge: i8) {
        if charge > 0 {
            self.positives.push(atom);
        } else if charge < 0 {
            self.negatives.push(atom);
        }
    }

    pub fn render(&self) -> String {
        match (self.positives.first(), self.negatives.first()) {
            (Some(p), Some(n)) => {
                if self.positives.len() > 1 || self.negatives.len() > 1 {
                    log::warn!("more than one deferred charge pair; only the first is emitted");
                }
                format!(" &{}/{}", p.index() + 1, n.index() + 1)
            }
            (Some(p), None) => {
                log::warn!("unpaired positive charge on atom {p} has no suffix form");
                String::new()
            }
            (None, Some(n)) => {
                log::warn!("unpaired negative charge on atom {n} has no suffix form");
                String::new()
            }
            (None, None) => String::new(),
        }
    }
}
