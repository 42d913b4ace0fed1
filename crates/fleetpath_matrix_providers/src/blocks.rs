use std::ops::Range;

/// A contiguous run of node indices sent as the origins or destinations of one
/// backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub len: usize,
}

impl Block {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Splits `num_nodes` into consecutive blocks of `min(num_nodes, max_rows)` nodes;
/// the last block takes the remainder. `max_rows` must be at least 1.
pub fn partition(num_nodes: usize, max_rows: usize) -> Vec<Block> {
    let block_size = num_nodes.min(max_rows);
    if block_size == 0 {
        return Vec::new();
    }

    (0..num_nodes)
        .step_by(block_size)
        .map(|offset| Block {
            offset,
            len: block_size.min(num_nodes - offset),
        })
        .collect()
}

/// Every (row block, column block) pair in row-major order.
pub fn block_pairs(num_nodes: usize, max_rows: usize) -> Vec<(Block, Block)> {
    let blocks = partition(num_nodes, max_rows);

    blocks
        .iter()
        .flat_map(|&rows| blocks.iter().map(move |&cols| (rows, cols)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_when_limit_exceeds_nodes() {
        assert_eq!(partition(4, 10), vec![Block { offset: 0, len: 4 }]);
        assert_eq!(partition(4, 4), vec![Block { offset: 0, len: 4 }]);
    }

    #[test]
    fn remainder_goes_to_last_block() {
        assert_eq!(
            partition(7, 3),
            vec![
                Block { offset: 0, len: 3 },
                Block { offset: 3, len: 3 },
                Block { offset: 6, len: 1 },
            ]
        );
    }

    #[test]
    fn no_blocks_for_empty_input() {
        assert!(partition(0, 10).is_empty());
        assert!(block_pairs(0, 10).is_empty());
    }

    #[test]
    fn pairs_are_row_major() {
        let pairs = block_pairs(4, 2);
        let offsets: Vec<(usize, usize)> = pairs
            .iter()
            .map(|(rows, cols)| (rows.offset, cols.offset))
            .collect();

        assert_eq!(offsets, vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn blocks_cover_every_node_once() {
        let covered: Vec<usize> = partition(11, 4).iter().flat_map(|b| b.range()).collect();
        assert_eq!(covered, (0..11).collect::<Vec<_>>());
    }
}
