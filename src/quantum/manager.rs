//! Per-channel strategy ownership and whole-array rebuilds.

use crate::foundation::core::PixelsType;
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::quantum::strategy::QuantumStrategy;
use crate::settings::model::{ChannelBinding, QuantumDef};

/// Owns one [`QuantumStrategy`] per channel and rebuilds them together when
/// the global quantization settings change.
#[derive(Clone, Debug, Default)]
pub struct QuantumManager {
    strategies: Vec<QuantumStrategy>,
}

impl QuantumManager {
    /// An empty manager; populate with [`QuantumManager::set_strategy`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every channel strategy from `def` and the channel bindings.
    ///
    /// The rebuild is whole-array. A channel that already had a strategy
    /// keeps its current window, so changing only the family or resolution
    /// does not reset user-chosen contrast; a channel seen for the first time
    /// takes its window from the binding.
    pub fn set_strategy(
        &mut self,
        def: &QuantumDef,
        pixels_type: PixelsType,
        channels: &[ChannelBinding],
    ) -> LumiplaneResult<()> {
        let mut next = Vec::with_capacity(channels.len());
        for (i, binding) in channels.iter().enumerate() {
            let mut strategy = QuantumStrategy::new(def, pixels_type)?;
            strategy.set_map(binding.family, binding.coefficient)?;
            let (start, end) = match self.strategies.get(i) {
                Some(prev) => prev.window(),
                None => (binding.input_start, binding.input_end),
            };
            strategy.set_window(start, end)?;
            next.push(strategy);
        }
        self.strategies = next;
        Ok(())
    }

    /// Strategy bound to `channel`.
    pub fn strategy_for(&self, channel: usize) -> LumiplaneResult<&QuantumStrategy> {
        self.strategies.get(channel).ok_or_else(|| {
            LumiplaneError::configuration(format!(
                "no quantum strategy for channel {channel} ({} bound)",
                self.strategies.len()
            ))
        })
    }

    /// Narrow one channel's input window.
    pub fn set_window(&mut self, channel: usize, start: f64, end: f64) -> LumiplaneResult<()> {
        let n = self.strategies.len();
        let strategy = self.strategies.get_mut(channel).ok_or_else(|| {
            LumiplaneError::configuration(format!(
                "no quantum strategy for channel {channel} ({n} bound)"
            ))
        })?;
        strategy.set_window(start, end)
    }

    /// Number of bound channels.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether any channel is bound.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
