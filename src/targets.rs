use glam::Vec2;

use crate::flowers::FlowerBed;

/// Opaque handle to a highlightable word in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Capability interface over the host document's highlightable words.
///
/// The simulation never touches host elements directly; an adapter over the
/// UI toolkit implements this. All calls happen on the simulation thread, so
/// `claim` is an atomic check-and-set from the simulation's point of view.
pub trait TargetProvider {
    /// Append every currently unclaimed target to `out`.
    fn unclaimed(&self, out: &mut Vec<TargetId>);

    /// Claim `id` for one butterfly. Returns false if it was already claimed
    /// or no longer exists.
    fn claim(&mut self, id: TargetId) -> bool;

    fn release(&mut self, id: TargetId);

    /// Center of the element in page coordinates, `None` once detached.
    fn page_position(&self, id: TargetId) -> Option<Vec2>;

    /// Set or clear the element's highlight color (RGBA).
    fn set_highlight(&mut self, id: TargetId, color: Option<u32>);
}

/// A word element tracked by [`WordTargets`].
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub pos: Vec2,
    pub claimed: bool,
    pub highlight: Option<u32>,
    pub attached: bool,
}

/// In-memory target set, used by the headless driver and in tests.
#[derive(Debug, Default)]
pub struct WordTargets {
    words: Vec<Word>,
}

impl WordTargets {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn add(&mut self, text: impl Into<String>, pos: Vec2) -> TargetId {
        let id = TargetId(self.words.len() as u32);
        self.words.push(Word {
            text: text.into(),
            pos,
            claimed: false,
            highlight: None,
            attached: true,
        });
        id
    }

    pub fn get(&self, id: TargetId) -> Option<&Word> {
        self.words.get(id.0 as usize)
    }

    /// Move a word (reflow).
    pub fn set_position(&mut self, id: TargetId, pos: Vec2) {
        if let Some(word) = self.words.get_mut(id.0 as usize) {
            word.pos = pos;
        }
    }

    /// Remove a word from the document. Its claim flag is left as-is until
    /// the owning butterfly notices and releases it.
    pub fn detach(&mut self, id: TargetId) {
        if let Some(word) = self.words.get_mut(id.0 as usize) {
            word.attached = false;
        }
    }

    pub fn claimed_count(&self) -> usize {
        self.words.iter().filter(|w| w.claimed).count()
    }

    pub fn highlighted_count(&self) -> usize {
        self.words.iter().filter(|w| w.highlight.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl TargetProvider for WordTargets {
    fn unclaimed(&self, out: &mut Vec<TargetId>) {
        out.extend(
            self.words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.attached && !w.claimed)
                .map(|(i, _)| TargetId(i as u32)),
        );
    }

    fn claim(&mut self, id: TargetId) -> bool {
        match self.words.get_mut(id.0 as usize) {
            Some(word) if word.attached && !word.claimed => {
                word.claimed = true;
                true
            }
            _ => false,
        }
    }

    fn release(&mut self, id: TargetId) {
        if let Some(word) = self.words.get_mut(id.0 as usize) {
            word.claimed = false;
        }
    }

    fn page_position(&self, id: TargetId) -> Option<Vec2> {
        self.words
            .get(id.0 as usize)
            .filter(|w| w.attached)
            .map(|w| w.pos)
    }

    fn set_highlight(&mut self, id: TargetId, color: Option<u32>) {
        if let Some(word) = self.words.get_mut(id.0 as usize) {
            word.highlight = color;
        }
    }
}

/// Ids with this bit set name a flower in the bed, not a host word. Host
/// providers keep their ids below it.
const FLOWER_BIT: u32 = 1 << 31;

/// The host's words plus the garden's blooming flowers, seen as one target
/// set. Flowers are never highlighted.
pub struct GardenTargets<'a, W: TargetProvider + ?Sized> {
    pub words: &'a mut W,
    pub flowers: &'a mut FlowerBed,
}

/// Target id of a flower in the bed.
pub fn flower_target(flower: u32) -> TargetId {
    TargetId(flower | FLOWER_BIT)
}

fn as_flower(id: TargetId) -> Option<u32> {
    (id.0 & FLOWER_BIT != 0).then_some(id.0 & !FLOWER_BIT)
}

impl<'a, W: TargetProvider + ?Sized> GardenTargets<'a, W> {
    pub fn new(words: &'a mut W, flowers: &'a mut FlowerBed) -> Self {
        Self { words, flowers }
    }
}

impl<W: TargetProvider + ?Sized> TargetProvider for GardenTargets<'_, W> {
    fn unclaimed(&self, out: &mut Vec<TargetId>) {
        self.words.unclaimed(out);
        let mut blooms = Vec::new();
        self.flowers.free_blooms(&mut blooms);
        out.extend(blooms.into_iter().map(flower_target));
    }

    fn claim(&mut self, id: TargetId) -> bool {
        match as_flower(id) {
            Some(flower) => self.flowers.claim(flower),
            None => self.words.claim(id),
        }
    }

    fn release(&mut self, id: TargetId) {
        match as_flower(id) {
            Some(flower) => self.flowers.release(flower),
            None => self.words.release(id),
        }
    }

    fn page_position(&self, id: TargetId) -> Option<Vec2> {
        match as_flower(id) {
            Some(flower) => self.flowers.bloom_position(flower),
            None => self.words.page_position(id),
        }
    }

    fn set_highlight(&mut self, id: TargetId, color: Option<u32>) {
        if as_flower(id).is_none() {
            self.words.set_highlight(id, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive() {
        let mut words = WordTargets::new();
        let id = words.add("Rust", Vec2::new(10.0, 10.0));
        assert!(words.claim(id));
        assert!(!words.claim(id));

        let mut free = Vec::new();
        words.unclaimed(&mut free);
        assert!(free.is_empty());

        words.release(id);
        assert!(words.claim(id));
    }

    #[test]
    fn detached_words_disappear() {
        let mut words = WordTargets::new();
        let id = words.add("gone", Vec2::ZERO);
        words.detach(id);
        assert_eq!(words.page_position(id), None);
        assert!(!words.claim(id));

        let mut free = Vec::new();
        words.unclaimed(&mut free);
        assert!(free.is_empty());
    }

    #[test]
    fn garden_targets_route_words_and_flowers() {
        let mut words = WordTargets::new();
        let word = words.add("petal", Vec2::new(5.0, 5.0));
        let mut bed = FlowerBed::new();
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(bed.plant(Vec2::new(200.0, 200.0), &mut rng));
        for i in 0..100 {
            bed.update(i as f32 / 60.0);
        }
        let flower = flower_target(bed.flowers()[0].id);

        let mut targets = GardenTargets::new(&mut words, &mut bed);
        let mut free = Vec::new();
        targets.unclaimed(&mut free);
        assert_eq!(free, vec![word, flower]);

        assert!(targets.claim(flower));
        assert_eq!(targets.page_position(flower), Some(Vec2::new(200.0, 200.0)));
        targets.set_highlight(flower, Some(0xFF0000FF));
        targets.set_highlight(word, Some(0xFF0000FF));
        targets.release(flower);

        assert!(!bed.flowers()[0].claimed);
        assert_eq!(words.get(word).unwrap().highlight, Some(0xFF0000FF));
    }
}
