//! The ordered codomain transform pipeline.

use smallvec::SmallVec;

use crate::codomain::context::CodomainContext;
use crate::foundation::error::{LumiplaneError, LumiplaneResult};

/// Ordered pipeline of codomain transforms.
///
/// Values fold through the contexts in insertion order. The chain owns the
/// authoritative codomain bounds; contexts added to it are rebound so a
/// resolution change keeps the whole pipeline consistent.
#[derive(Clone, Debug)]
pub struct CodomainChain {
    cd_start: i32,
    cd_end: i32,
    contexts: SmallVec<[CodomainContext; 4]>,
}

impl CodomainChain {
    /// An empty chain over `[cd_start, cd_end]`.
    pub fn new(cd_start: i32, cd_end: i32) -> Self {
        Self {
            cd_start,
            cd_end,
            contexts: SmallVec::new(),
        }
    }

    /// Append a context. Adding a second context of the same kind is a
    /// configuration error; use [`CodomainChain::update_context`] instead.
    pub fn add_context(&mut self, mut context: CodomainContext) -> LumiplaneResult<()> {
        if self.position_of(&context).is_some() {
            return Err(LumiplaneError::configuration(
                "a context of this kind is already in the chain",
            ));
        }
        context.set_codomain(self.cd_start, self.cd_end);
        self.contexts.push(context);
        Ok(())
    }

    /// Replace the context of the same kind, keeping its chain position.
    pub fn update_context(&mut self, mut context: CodomainContext) -> LumiplaneResult<()> {
        let Some(i) = self.position_of(&context) else {
            return Err(LumiplaneError::configuration(
                "no context of this kind in the chain",
            ));
        };
        context.set_codomain(self.cd_start, self.cd_end);
        self.contexts[i] = context;
        Ok(())
    }

    /// Remove the context of the same kind as `context`. Returns whether a
    /// context was removed.
    pub fn remove_context(&mut self, context: &CodomainContext) -> bool {
        match self.position_of(context) {
            Some(i) => {
                self.contexts.remove(i);
                true
            }
            None => false,
        }
    }

    /// Fold a codomain value through the chain.
    #[inline]
    pub fn transform(&self, v: i32) -> i32 {
        self.contexts.iter().fold(v, |acc, c| c.transform(acc))
    }

    /// Rebind the chain and every context to new codomain bounds.
    pub fn set_codomain(&mut self, start: i32, end: i32) {
        self.cd_start = start;
        self.cd_end = end;
        for c in &mut self.contexts {
            c.set_codomain(start, end);
        }
    }

    /// Contexts in application order.
    pub fn contexts(&self) -> &[CodomainContext] {
        &self.contexts
    }

    fn position_of(&self, context: &CodomainContext) -> Option<usize> {
        let kind = std::mem::discriminant(context);
        self.contexts
            .iter()
            .position(|c| std::mem::discriminant(c) == kind)
    }
}
