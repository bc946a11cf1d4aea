use crate::decoder::{BlockBody, GuardCondition, MapEntry, NormalizeBlock, ParseDirective};

/// Where the builder stands between two processors
#[derive(Debug, Default)]
enum BuilderState {
    /// No unguarded block is open; the next unguarded processor starts one
    #[default]
    StartingBlock,
    /// An unguarded block is open and collecting map entries
    Accumulating(Vec<MapEntry>),
}

/// Groups translated processors into `normalize` blocks.
///
/// Every guarded processor gets a block of its own. Consecutive unguarded
/// processors share one block, which never spans a guarded one.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    blocks: Vec<NormalizeBlock>,
    state: BuilderState,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one processor's translation into the block list
    pub fn push(
        &mut self,
        guard: Option<GuardCondition>,
        parse: Option<ParseDirective>,
        entries: Vec<MapEntry>,
    ) {
        match guard {
            Some(check) => {
                self.flush();
                let body = match parse {
                    Some(directive) => BlockBody::Parse(directive),
                    None => BlockBody::Map(entries),
                };
                tracing::debug!(check = %check.as_str(), "emitting guarded block");
                self.blocks.push(NormalizeBlock {
                    check: Some(check),
                    body,
                });
            }
            None => match &mut self.state {
                BuilderState::Accumulating(open) => open.extend(entries),
                BuilderState::StartingBlock => {
                    tracing::debug!(block = self.blocks.len(), "opening map block");
                    self.state = BuilderState::Accumulating(entries);
                }
            },
        }
    }

    /// Close the open unguarded block, if any
    fn flush(&mut self) {
        if let BuilderState::Accumulating(entries) = std::mem::take(&mut self.state) {
            tracing::debug!(entries = entries.len(), "closing map block");
            self.blocks.push(NormalizeBlock {
                check: None,
                body: BlockBody::Map(entries),
            });
        }
    }

    pub fn finish(mut self) -> Vec<NormalizeBlock> {
        self.flush();
        self.blocks
    }
}
