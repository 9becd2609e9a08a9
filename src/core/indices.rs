use hashbrown::HashMap;

/// Maps a key to positions in one of the owned row collections.
pub type VecIndex<K> = HashMap<K, Vec<usize>>;

/// Maps a key to the position of its single row.
pub type PosIndex<K> = HashMap<K, usize>;
