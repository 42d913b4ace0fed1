use crate::{coordinate::Coordinate, define_index_newtype};

// A node is a waypoint: a position in the coordinate list handed to the
// matrix builder, and a row/column of the resulting cost matrix.
define_index_newtype!(NodeIdx, Coordinate);
