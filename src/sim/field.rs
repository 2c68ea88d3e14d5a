//! Block field - the breakable rectangles of the current level

use serde::{Deserialize, Serialize};

/// A breakable block. Geometry and color are fixed at creation; only `alive`
/// ever changes, true to false, once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Fill color sampled from the level image (saturation-boosted)
    pub color: [u8; 3],
    pub alive: bool,
}

impl Block {
    /// Center of the block rectangle
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// The live block collection for one level. Replaced wholesale on level
/// transitions; never partially merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockField {
    blocks: Vec<Block>,
    remaining: usize,
}

impl BlockField {
    pub fn new(blocks: Vec<Block>) -> Self {
        let remaining = blocks.iter().filter(|b| b.alive).count();
        Self { blocks, remaining }
    }

    /// Alive blocks left in the field
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// All blocks, dead ones included (renderers skip them by flag)
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Alive blocks with their field indices, in field order
    pub fn alive(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.alive)
    }

    /// Mark a block destroyed. Idempotent: a second call on the same block is
    /// a no-op and returns false.
    pub fn mark_destroyed(&mut self, index: usize) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) if block.alive => {
                block.alive = false;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_block(x: f32) -> Block {
        Block {
            x,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            color: [120, 80, 40],
            alive: true,
        }
    }

    #[test]
    fn remaining_counts_alive_blocks() {
        let mut blocks = vec![test_block(0.0), test_block(20.0), test_block(40.0)];
        blocks[1].alive = false;
        let field = BlockField::new(blocks);
        assert_eq!(field.remaining(), 2);
        assert_eq!(field.alive().count(), 2);
    }

    #[test]
    fn mark_destroyed_is_idempotent() {
        let mut field = BlockField::new(vec![test_block(0.0), test_block(20.0)]);
        assert!(field.mark_destroyed(0));
        assert_eq!(field.remaining(), 1);
        // Double-trigger within a tick must not decrement twice
        assert!(!field.mark_destroyed(0));
        assert_eq!(field.remaining(), 1);
    }

    #[test]
    fn mark_destroyed_out_of_bounds_is_noop() {
        let mut field = BlockField::new(vec![test_block(0.0)]);
        assert!(!field.mark_destroyed(5));
        assert_eq!(field.remaining(), 1);
    }
}
