use crate::coord::SectionCoord;

/// Notified synchronously from inside the store's load and eviction path.
pub trait SectionObserver {
    fn section_loaded(&mut self, coord: SectionCoord);
    fn section_saved(&mut self, coord: SectionCoord);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SectionObserver for NoopObserver {
    fn section_loaded(&mut self, _coord: SectionCoord) {}
    fn section_saved(&mut self, _coord: SectionCoord) {}
}
