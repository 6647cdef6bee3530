//! Ordered post-processing chain.
//!
//! Passes run in insertion order. A pass can be pulled out and a replacement
//! put back at the same index, which is how the bloom stage is rebuilt at a
//! new resolution without disturbing its neighbours.

/// Ordered list of post-processing passes.
#[derive(Debug)]
pub struct PassChain<P> {
    passes: Vec<P>,
}

impl<P> Default for PassChain<P> {
    fn default() -> Self {
        Self { passes: Vec::new() }
    }
}

impl<P> PassChain<P> {
    /// Empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the end of the chain.
    pub fn add_pass(&mut self, pass: P) {
        self.passes.push(pass);
    }

    /// Insert a pass at `index`, clamped to the chain length.
    pub fn insert_pass(&mut self, index: usize, pass: P) {
        let index = index.min(self.passes.len());
        self.passes.insert(index, pass);
    }

    /// Remove the first pass matching `pred`, returning it with the index it
    /// occupied.
    pub fn remove_pass(
        &mut self,
        pred: impl Fn(&P) -> bool,
    ) -> Option<(usize, P)> {
        let index = self.passes.iter().position(pred)?;
        Some((index, self.passes.remove(index)))
    }

    /// Index of the first pass matching `pred`.
    pub fn position(&self, pred: impl Fn(&P) -> bool) -> Option<usize> {
        self.passes.iter().position(pred)
    }

    /// Passes in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.passes.iter()
    }

    /// Mutable passes in execution order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.passes.iter_mut()
    }

    /// Number of passes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether the chain has no passes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&'static str]) -> PassChain<&'static str> {
        let mut chain = PassChain::new();
        for name in names {
            chain.add_pass(*name);
        }
        chain
    }

    fn order(chain: &PassChain<&'static str>) -> Vec<&'static str> {
        chain.iter().copied().collect()
    }

    #[test]
    fn add_appends_in_order() {
        let chain = chain(&["render", "bloom", "output"]);
        assert_eq!(order(&chain), ["render", "bloom", "output"]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn remove_reports_index() {
        let mut chain = chain(&["render", "bloom", "output"]);
        let removed = chain.remove_pass(|p| *p == "bloom");
        assert_eq!(removed, Some((1, "bloom")));
        assert_eq!(order(&chain), ["render", "output"]);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut chain = chain(&["output"]);
        assert_eq!(chain.remove_pass(|p| *p == "bloom"), None);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn remove_then_insert_restores_slot() {
        let mut chain = chain(&["render", "bloom", "output"]);
        let (index, _) = chain.remove_pass(|p| *p == "bloom").unwrap();
        chain.insert_pass(index, "bloom");
        assert_eq!(order(&chain), ["render", "bloom", "output"]);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut chain = chain(&["render"]);
        chain.insert_pass(10, "output");
        assert_eq!(order(&chain), ["render", "output"]);
    }

    #[test]
    fn empty_chain() {
        let chain: PassChain<u8> = PassChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.position(|_| true), None);
    }
}
