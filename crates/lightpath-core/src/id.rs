use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node in the topology arena.
    pub struct NodeId;

    /// Identifies a directed link in the topology arena.
    pub struct LinkId;
}
